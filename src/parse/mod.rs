//! Payload parsing and data extraction.
//!
//! This module extracts model data from fetched pages:
//! - Tree scanning over the untyped `__NEXT_DATA__` payload
//! - Model references from anchor links and from the payload
//! - The best-scoring record on a model page
//!
//! HTML parsing uses CSS selectors via the `scraper` crate.

mod best;
mod refs;
pub mod tree;

// Re-export public API
pub use best::{best_record, score};
pub use refs::{
    merge_refs, ref_from_record, refs_from_html, refs_from_next_data, ReferenceSet,
};
pub use tree::{coerce_int, deep_get, walk, Records};
