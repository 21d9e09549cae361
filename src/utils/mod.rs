//! Utility functions.
//!
//! This module provides:
//! - Cookie normalization and log-safe fingerprints
//! - Response body snippets for warnings
//! - CSS selector parsing for static selectors

pub mod sanitize;
mod selector;

pub use sanitize::{compact_snippet, cookie_fingerprint, normalize_cookie};
pub use selector::parse_selector_unsafe;
