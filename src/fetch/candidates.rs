//! Candidate-URL fallback.

use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::config::HTTP_STATUS_FORBIDDEN;
use crate::error_handling::{FetchError, InfoType, RefreshStats};

/// An ordered list of equivalent URLs for one logical page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    /// Human-readable name used in error messages ("profile", "upload page")
    pub label: String,
    pub urls: Vec<String>,
    pub timeout: Duration,
}

impl FetchTarget {
    pub fn new(label: impl Into<String>, urls: Vec<String>, timeout: Duration) -> Self {
        Self {
            label: label.into(),
            urls,
            timeout,
        }
    }

    /// Profile page candidates: localized path first, then the bare handle.
    pub fn profile(origin: &str, subject: &str, timeout: Duration) -> Self {
        Self::new(
            "profile",
            vec![
                format!("{}/en/@{}", origin, subject),
                format!("{}/@{}", origin, subject),
            ],
            timeout,
        )
    }

    /// Upload listing candidates, labelled for the representation being fetched.
    pub fn uploads(
        label: impl Into<String>,
        origin: &str,
        subject: &str,
        timeout: Duration,
    ) -> Self {
        Self::new(
            label,
            vec![
                format!("{}/en/@{}/upload", origin, subject),
                format!("{}/@{}/upload", origin, subject),
            ],
            timeout,
        )
    }
}

/// Runs `attempt` against each candidate URL until one succeeds.
///
/// A failure that is not fallback-eligible (a status other than 403/404) is
/// returned immediately. When every candidate fails, a final 403 becomes
/// `FetchError::Forbidden`; anything else becomes
/// `FetchError::CandidatesExhausted` listing every attempt.
///
/// Returns the value together with the URL that produced it.
pub async fn try_candidates<T, F, Fut>(
    target: &FetchTarget,
    stats: &RefreshStats,
    mut attempt: F,
) -> Result<(T, String), FetchError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempts = Vec::with_capacity(target.urls.len());
    let mut last_err = None;

    for (i, url) in target.urls.iter().enumerate() {
        debug!("Trying {} candidate URL: {}", target.label, url);
        match attempt(url.clone()).await {
            Ok(value) => {
                debug!("Selected {} candidate URL: {}", target.label, url);
                return Ok((value, url.clone()));
            }
            Err(err) => {
                debug!("Failed {} candidate URL {}: {}", target.label, url, err);
                if !err.is_fallback_eligible() {
                    return Err(err);
                }
                if i + 1 < target.urls.len() {
                    stats.increment_info(InfoType::CandidateFallback);
                }
                attempts.push(format!("{}: {}", url, err));
                last_err = Some(err);
            }
        }
    }

    let label = target.label.clone();
    match last_err {
        None => Err(FetchError::NoCandidates { label }),
        Some(err) if err.status() == Some(HTTP_STATUS_FORBIDDEN) => Err(FetchError::Forbidden {
            label,
            source: Box::new(err),
        }),
        Some(err) => Err(FetchError::CandidatesExhausted {
            label,
            attempts,
            source: Box::new(err),
        }),
    }
}
