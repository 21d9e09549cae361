//! Per-model metrics.

use std::collections::BTreeMap;
use std::time::Duration;

use log::debug;
use serde_json::{Map, Value};

use crate::config::MODEL_METRIC_KEYS;
use crate::error_handling::FetchError;
use crate::fetch::PageFetcher;
use crate::models::{MetricValue, ModelRecord, ModelReference};
use crate::parse::tree::get_str;
use crate::parse::{best_record, coerce_int};

/// Builds a record from the best-scoring record on a model page.
///
/// Metric keys present in `info` are coerced to counts where possible and
/// passed through raw otherwise. The title falls back to the reference's.
pub fn model_record(reference: &ModelReference, url: String, info: &Map<String, Value>) -> ModelRecord {
    let metrics: BTreeMap<String, MetricValue> = MODEL_METRIC_KEYS
        .iter()
        .filter_map(|key| {
            let value = info.get(*key)?;
            let metric = match coerce_int(value) {
                Some(n) => MetricValue::Count(n),
                None => MetricValue::Raw(value.clone()),
            };
            Some((key.to_string(), metric))
        })
        .collect();

    ModelRecord {
        id: reference.id,
        slug: reference.slug.clone(),
        url,
        title: get_str(info, "title")
            .map(str::to_string)
            .or_else(|| reference.title.clone()),
        metrics,
    }
}

/// Fetches one model's detail page and extracts its metrics.
///
/// # Errors
///
/// Any `FetchError` from the page or its `__NEXT_DATA__` payload. A payload
/// with no recognizable model record is not an error: the record then has no
/// metrics and keeps the reference's title.
pub async fn fetch_model_metrics(
    fetcher: &PageFetcher,
    origin: &str,
    reference: &ModelReference,
    timeout: Duration,
) -> Result<ModelRecord, FetchError> {
    let url = reference.url(origin);
    let payload = fetcher.get_next_data(&url, timeout).await?;

    let empty = Map::new();
    let info = best_record(&payload).unwrap_or(&empty);
    let record = model_record(reference, url, info);
    debug!(
        "Model {}-{}: {} metric(s) found",
        record.id,
        record.slug,
        record.metrics.len()
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference(title: Option<&str>) -> ModelReference {
        ModelReference::new(77, "vase", title.map(str::to_string))
    }

    fn info(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_model_record_coerces_metrics() {
        let record = model_record(
            &reference(None),
            "u".to_string(),
            &info(json!({
                "title": "Vase",
                "likeCount": 12,
                "downloadCount": "30",
                "printCount": "1.2k",
                "boost": null,
                "collectionCount": 5
            })),
        );
        assert_eq!(record.count("likeCount"), Some(12));
        assert_eq!(record.count("downloadCount"), Some(30));
        assert_eq!(
            record.metrics.get("printCount"),
            Some(&MetricValue::Raw(json!("1.2k")))
        );
        assert_eq!(record.metrics.get("boost"), Some(&MetricValue::Raw(Value::Null)));
        assert!(!record.metrics.contains_key("collectionCount"));
        assert_eq!(record.title.as_deref(), Some("Vase"));
    }

    #[test]
    fn test_model_record_title_falls_back_to_hint() {
        let hint = reference(Some("From listing"));
        let record = model_record(&hint, "u".to_string(), &info(json!({"title": 5})));
        assert_eq!(record.title.as_deref(), Some("From listing"));

        let record = model_record(&reference(None), "u".to_string(), &Map::new());
        assert_eq!(record.title, None);
        assert!(record.metrics.is_empty());
    }

    #[test]
    fn test_model_record_keeps_reference_identity() {
        let record = model_record(
            &reference(None),
            "https://makerworld.com/en/models/77-vase".to_string(),
            &info(json!({"id": 1, "slug": "other"})),
        );
        assert_eq!(record.id, 77);
        assert_eq!(record.slug, "vase");
        assert_eq!(record.url, "https://makerworld.com/en/models/77-vase");
    }
}
