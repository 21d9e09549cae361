//! makerworld_stats library: MakerWorld profile statistics scraping
//!
//! This library fetches a MakerWorld user's public profile, upload listing, and
//! model pages, reads the `__NEXT_DATA__` payload each page embeds, and folds
//! everything into one `RefreshSnapshot`: summary counters, the top model per
//! metric, the model count, and profile diagnostics.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use makerworld_stats::{Config, RefreshStats, Refresher};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     user: "@alice".to_string(),
//!     cookie: "Cookie: session=abc".to_string(),
//!     max_models: 20,
//!     ..Default::default()
//! };
//!
//! let stats = Arc::new(RefreshStats::new());
//! let refresher = Refresher::from_config(config, Arc::clone(&stats))?;
//! let snapshot = refresher.refresh().await?;
//! println!("{} models, likes: {:?}", snapshot.models, snapshot.summary.likes);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod app;
pub mod config;
mod error_handling;
mod fetch;
pub mod initialization;
mod models;
mod parse;
mod run;
mod utils;

// Re-export public API
pub use config::{Config, ConfigValidationError, LogFormat, LogLevel, Opt};
pub use error_handling::{
    FetchError, InfoType, InitializationError, RefreshError, RefreshStats, WarningType,
};
pub use fetch::{extract_next_data, try_candidates, FetchTarget, PageFetcher};
pub use models::{
    Diagnostics, FailedModel, MetricValue, ModelOutcome, ModelRecord, ModelReference,
    RefreshSnapshot, RefreshTrace, Summary, TopModel, TopModels,
};
pub use parse::{
    best_record, coerce_int, deep_get, merge_refs, ref_from_record, refs_from_html,
    refs_from_next_data, score, walk, ReferenceSet, Records,
};
pub use run::{
    extract_diagnostics, extract_summary, fetch_model_metrics, model_record, rank, top_by,
    Refresher,
};
pub use utils::{cookie_fingerprint, normalize_cookie};
