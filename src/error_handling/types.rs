//! Error type definitions.
//!
//! This module defines the failures a refresh can produce, plus the warning and
//! info categories counted by `RefreshStats`.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::{HTTP_STATUS_FORBIDDEN, HTTP_STATUS_NOT_FOUND};

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Failure to obtain a page or its embedded payload.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, timeout, or body-read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The server answered with a 4xx or 5xx status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The body exceeded `MAX_RESPONSE_BODY_SIZE`.
    #[error("response from {url} too large ({size} bytes)")]
    BodyTooLarge { url: String, size: usize },

    /// The page has no `__NEXT_DATA__` script, or it is empty.
    #[error("__NEXT_DATA__ not found for {url}")]
    MissingNextData { url: String },

    /// The `__NEXT_DATA__` script is not valid JSON.
    #[error("__NEXT_DATA__ for {url} is not valid JSON: {source}")]
    InvalidNextData {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Every candidate failed and the last one answered 403.
    #[error(
        "{label} blocked with 403 on all known URLs. \
         The MakerWorld cookie is likely expired or missing permissions."
    )]
    Forbidden {
        label: String,
        #[source]
        source: Box<FetchError>,
    },

    /// Every candidate failed; `attempts` holds one `url: reason` entry per candidate.
    #[error("Failed to fetch {label}: {}", .attempts.join("; "))]
    CandidatesExhausted {
        label: String,
        attempts: Vec<String>,
        #[source]
        source: Box<FetchError>,
    },

    /// The target listed no URLs at all.
    #[error("Failed to fetch {label}: no attempts made")]
    NoCandidates { label: String },
}

impl FetchError {
    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether candidate-URL fallback may move on to the next URL.
    ///
    /// Statuses other than 403 and 404 abort the whole candidate list; every
    /// other failure (transport, shape) lets the next candidate be tried.
    pub fn is_fallback_eligible(&self) -> bool {
        match self.status() {
            Some(status) => status == HTTP_STATUS_FORBIDDEN || status == HTTP_STATUS_NOT_FOUND,
            None => true,
        }
    }
}

/// The one failure a refresh cycle reports to its caller.
#[derive(Error, Debug)]
pub enum RefreshError {
    /// The profile page could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The profile payload has no user-info record.
    #[error("props.pageProps.userInfo not found")]
    MissingUserInfo,
}

/// Types of warnings recorded during a refresh.
///
/// Warnings are absorbed failures: the refresh continues with reduced data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    UploadFetchFailed,   // Upload page HTML or payload unavailable
    ModelFetchFailed,    // One model page failed; the model is skipped
    MissingSummaryField, // A summary counter was absent from user-info
}

/// Types of informational events recorded during a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    CandidateFallback,  // A candidate URL failed and the next one was tried
    ModelsTruncated,    // max_models dropped some references
    HtmlOnlyReference,  // A reference came only from anchor links
}

impl std::fmt::Display for WarningType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WarningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::UploadFetchFailed => "Upload page fetch failed",
            WarningType::ModelFetchFailed => "Model page fetch failed",
            WarningType::MissingSummaryField => "Missing summary field",
        }
    }
}

impl std::fmt::Display for InfoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::CandidateFallback => "Candidate URL fallback",
            InfoType::ModelsTruncated => "Models truncated by max_models",
            InfoType::HtmlOnlyReference => "Model found only in upload HTML",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_eligibility() {
        let status = |status| FetchError::Status {
            url: "https://makerworld.com/en/@a".to_string(),
            status,
        };
        assert!(status(403).is_fallback_eligible());
        assert!(status(404).is_fallback_eligible());
        assert!(!status(500).is_fallback_eligible());
        assert!(!status(401).is_fallback_eligible());
        assert!(!status(429).is_fallback_eligible());
        assert!(FetchError::MissingNextData {
            url: "u".to_string()
        }
        .is_fallback_eligible());
    }

    #[test]
    fn test_forbidden_message_mentions_cookie() {
        let err = FetchError::Forbidden {
            label: "profile".to_string(),
            source: Box::new(FetchError::Status {
                url: "https://makerworld.com/@a".to_string(),
                status: 403,
            }),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("profile blocked with 403"));
        assert!(msg.contains("cookie is likely expired"));
    }

    #[test]
    fn test_candidates_exhausted_lists_attempts() {
        let err = FetchError::CandidatesExhausted {
            label: "upload page".to_string(),
            attempts: vec![
                "http://a/x: HTTP 404 from http://a/x".to_string(),
                "http://a/y: HTTP 404 from http://a/y".to_string(),
            ],
            source: Box::new(FetchError::Status {
                url: "http://a/y".to_string(),
                status: 404,
            }),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch upload page: http://a/x: HTTP 404 from http://a/x; http://a/y: HTTP 404 from http://a/y"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_refresh_error_is_transparent_over_fetch() {
        let err: RefreshError = FetchError::MissingNextData {
            url: "http://a/en/@x".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "__NEXT_DATA__ not found for http://a/en/@x");
    }
}
