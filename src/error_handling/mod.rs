//! Error handling and refresh statistics.
//!
//! This module provides:
//! - The failure taxonomy for fetches and refresh cycles
//! - Refresh statistics tracking (warnings and info events)
//!
//! Only `RefreshError` ever reaches the caller of a refresh. Best-effort steps
//! convert their `FetchError`s into warnings counted by `RefreshStats`.

mod stats;
mod types;

// Re-export public API
pub use stats::RefreshStats;
pub use types::{FetchError, InfoType, InitializationError, RefreshError, WarningType};
