//! Command-line presentation.
//!
//! This module renders refresh results for the binary:
//! - Human-readable report (summary, top models, profile, debug)
//! - `--json` document (snapshot plus `debug` and `models`)
//! - Refresh statistics via the logger

pub mod report;
pub mod statistics;

// Re-export public API
pub use report::{render_human, render_json, JsonReport};
pub use statistics::print_refresh_statistics;
