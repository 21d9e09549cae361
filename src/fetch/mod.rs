//! Page fetching.
//!
//! This module provides:
//! - `PageFetcher`: authenticated GETs with the normalized cookie
//! - Candidate-URL fallback over equivalent endpoints (`FetchTarget`)
//! - `__NEXT_DATA__` payload extraction
//!
//! Every request carries an explicit timeout. Dropping a pending future aborts
//! the underlying request.

mod candidates;
mod next_data;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, log, Level};
use reqwest::header::{HeaderMap, CONTENT_TYPE, COOKIE, LOCATION, SERVER};
use serde_json::Value;

use crate::config::{BODY_SNIPPET_MAX_LEN, MAX_RESPONSE_BODY_SIZE};
use crate::error_handling::{FetchError, RefreshStats};
use crate::utils::{compact_snippet, cookie_fingerprint, normalize_cookie};

// Re-export public API
pub use candidates::{try_candidates, FetchTarget};
pub use next_data::extract_next_data;

const HEADER_CF_RAY: &str = "cf-ray";
const SNIPPET_READ_LIMIT: usize = 64 * 1024;

fn header_str<'a>(headers: &'a HeaderMap, name: impl reqwest::header::AsHeaderName) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

/// Reads at most `SNIPPET_READ_LIMIT` bytes of an error body for logging.
///
/// Read failures just end the snippet early.
async fn read_snippet(mut response: reqwest::Response) -> String {
    let mut buf = Vec::new();
    while buf.len() < SNIPPET_READ_LIMIT {
        match response.chunk().await {
            Ok(Some(chunk)) => buf.extend_from_slice(&chunk),
            Ok(None) | Err(_) => break,
        }
    }
    compact_snippet(&String::from_utf8_lossy(&buf), BODY_SNIPPET_MAX_LEN)
}

/// Fetches MakerWorld pages with the configured client and cookie.
#[derive(Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    cookie: String,
    stats: Arc<RefreshStats>,
}

impl PageFetcher {
    /// Creates a fetcher. The raw cookie is normalized here, once.
    pub fn new(client: reqwest::Client, raw_cookie: &str, stats: Arc<RefreshStats>) -> Self {
        let cookie = normalize_cookie(raw_cookie);
        debug!("Page fetcher ready: cookie={}", cookie_fingerprint(&cookie));
        Self {
            client,
            cookie,
            stats,
        }
    }

    pub fn stats(&self) -> &RefreshStats {
        &self.stats
    }

    /// GETs one URL and returns its body.
    ///
    /// # Errors
    ///
    /// - `FetchError::Transport` on connection failure or timeout
    /// - `FetchError::Status` on a 4xx/5xx response, whatever its body
    /// - `FetchError::BodyTooLarge` past `MAX_RESPONSE_BODY_SIZE` (successful responses only)
    pub async fn get_html(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        debug!(
            "Request start: url={} timeout={}s cookie={}",
            url,
            timeout.as_secs(),
            cookie_fingerprint(&self.cookie)
        );

        let mut request = self.client.get(url).timeout(timeout);
        if !self.cookie.is_empty() {
            request = request.header(COOKIE, self.cookie.as_str());
        }

        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;

        let status = response.status();
        let response_url = response.url().to_string();
        if status.is_client_error() || status.is_server_error() {
            let headers = response.headers().clone();
            let snippet = read_snippet(response).await;
            let err = FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            };
            // 403/404 are routine while walking candidates.
            let level = if err.is_fallback_eligible() {
                Level::Debug
            } else {
                Level::Warn
            };
            log!(
                level,
                "HTTP error: status={} request_url={} response_url={} content_type={} server={} cf_ray={} location={} cookie={} body_snippet={}",
                status,
                url,
                response_url,
                header_str(&headers, CONTENT_TYPE),
                header_str(&headers, SERVER),
                header_str(&headers, HEADER_CF_RAY),
                header_str(&headers, LOCATION),
                cookie_fingerprint(&self.cookie),
                snippet
            );
            return Err(err);
        }

        if let Some(declared) = response.content_length() {
            if declared > MAX_RESPONSE_BODY_SIZE as u64 {
                return Err(FetchError::BodyTooLarge {
                    url: url.to_string(),
                    size: usize::try_from(declared).unwrap_or(usize::MAX),
                });
            }
        }
        let bytes = response.bytes().await.map_err(transport)?;
        if bytes.len() > MAX_RESPONSE_BODY_SIZE {
            return Err(FetchError::BodyTooLarge {
                url: url.to_string(),
                size: bytes.len(),
            });
        }
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!(
            "Request success: request_url={} response_url={} status={} body_len={}",
            url,
            response_url,
            status,
            body.len()
        );
        Ok(body)
    }

    /// GETs one URL and parses its `__NEXT_DATA__` payload.
    pub async fn get_next_data(&self, url: &str, timeout: Duration) -> Result<Value, FetchError> {
        let html = self.get_html(url, timeout).await?;
        extract_next_data(&html, url)
    }

    /// Fetches raw HTML from the first working candidate.
    ///
    /// Returns the body and the URL that served it.
    pub async fn fetch_html(&self, target: &FetchTarget) -> Result<(String, String), FetchError> {
        let timeout = target.timeout;
        try_candidates(target, &self.stats, |url| async move {
            self.get_html(&url, timeout).await
        })
        .await
    }

    /// Fetches and parses the `__NEXT_DATA__` payload from the first working candidate.
    ///
    /// A candidate whose page lacks a valid payload counts as a failed attempt.
    pub async fn fetch_structured_payload(
        &self,
        target: &FetchTarget,
    ) -> Result<(Value, String), FetchError> {
        let timeout = target.timeout;
        let (payload, url) = try_candidates(target, &self.stats, |url| async move {
            self.get_next_data(&url, timeout).await
        })
        .await?;
        debug!(
            "{} payload from {} (top-level keys: {:?})",
            target.label,
            url,
            payload
                .as_object()
                .map(|m| m.keys().cloned().collect::<Vec<_>>())
                .unwrap_or_default()
        );
        Ok((payload, url))
    }
}
