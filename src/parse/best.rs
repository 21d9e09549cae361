//! Best-record heuristic for model pages.
//!
//! A model page payload holds many records (navigation, related models,
//! comments). The one describing the model itself has the densest overlap of
//! identity and metric fields, so it is found by score rather than by path.

use serde_json::{Map, Value};

use crate::config::MODEL_METRIC_KEYS;
use crate::parse::tree::{is_integer, walk};

/// Scores how much `record` looks like a model's own metrics record.
///
/// +3 for a string `title`, +2 for a string `slug`, +2 for an integer `id` or
/// `modelId`, and +1 per metric key present (any value type).
pub fn score(record: &Map<String, Value>) -> u32 {
    let mut score = 0;
    if record.get("title").is_some_and(Value::is_string) {
        score += 3;
    }
    if record.get("slug").is_some_and(Value::is_string) {
        score += 2;
    }
    if record.get("id").is_some_and(is_integer) || record.get("modelId").is_some_and(is_integer) {
        score += 2;
    }
    score
        + MODEL_METRIC_KEYS
            .iter()
            .filter(|key| record.contains_key(**key))
            .count() as u32
}

/// Returns the highest-scoring record in `payload`.
///
/// The first record reaching the top score wins ties. `None` when no record
/// scores above zero.
pub fn best_record(payload: &Value) -> Option<&Map<String, Value>> {
    let mut best: Option<(&Map<String, Value>, u32)> = None;
    for record in walk(payload) {
        let candidate = score(record);
        if candidate > best.map_or(0, |(_, s)| s) {
            best = Some((record, candidate));
        }
    }
    best.map(|(record, _)| record)
}
