//! Data types produced by a refresh.
//!
//! `RefreshSnapshot` is the wire contract with presentation layers: key names
//! and nesting (`Likes`, `Top`, `Most Liked Model`, `Diagnostics`, ...) are fixed
//! and must not change.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::BANNED_PERMISSION_KEYS;

/// Identity of one model: enough to build its detail-page URL.
///
/// Identity is `(id, slug)`; `title` is supplementary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReference {
    pub id: i64,
    pub slug: String,
    pub title: Option<String>,
}

impl ModelReference {
    pub fn new(id: i64, slug: impl Into<String>, title: Option<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            title,
        }
    }

    /// Canonical detail-page URL under `origin`.
    pub fn url(&self, origin: &str) -> String {
        format!("{}/en/models/{}-{}", origin, self.id, self.slug)
    }
}

/// A metric as found on a model page.
///
/// Integers and all-digit strings become `Count`; anything else is passed
/// through unchanged as `Raw` and is ignored by rankings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(i64),
    Raw(Value),
}

impl MetricValue {
    pub fn as_count(&self) -> Option<i64> {
        match self {
            MetricValue::Count(n) => Some(*n),
            MetricValue::Raw(_) => None,
        }
    }
}

/// Metrics for one model, built once per refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRecord {
    pub id: i64,
    pub slug: String,
    pub url: String,
    pub title: Option<String>,
    pub metrics: BTreeMap<String, MetricValue>,
}

impl ModelRecord {
    /// Integer value of `metric`, if present and countable.
    pub fn count(&self, metric: &str) -> Option<i64> {
        self.metrics.get(metric).and_then(MetricValue::as_count)
    }
}

/// The top-ranked model for one metric.
///
/// Serializes as `{"id", "title", "url", <metric>: value}`.
#[derive(Debug, Clone, PartialEq)]
pub struct TopModel {
    pub id: i64,
    pub title: Option<String>,
    pub url: String,
    pub metric: &'static str,
    pub value: i64,
}

impl Serialize for TopModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("title", &self.title)?;
        map.serialize_entry("url", &self.url)?;
        map.serialize_entry(self.metric, &self.value)?;
        map.end()
    }
}

/// Top-ranked models; `None` when no fetched model had the metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopModels {
    #[serde(rename = "Most Liked Model")]
    pub most_liked: Option<TopModel>,
    #[serde(rename = "Most Downloaded Model")]
    pub most_downloaded: Option<TopModel>,
    #[serde(rename = "Most Printed Model")]
    pub most_printed: Option<TopModel>,
}

impl TopModels {
    pub fn entries(&self) -> [(&'static str, Option<&TopModel>); 3] {
        [
            ("Most Liked Model", self.most_liked.as_ref()),
            ("Most Downloaded Model", self.most_downloaded.as_ref()),
            ("Most Printed Model", self.most_printed.as_ref()),
        ]
    }
}

/// Profile-level counters, passed through from user-info as found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    #[serde(rename = "Likes")]
    pub likes: Option<Value>,
    #[serde(rename = "Downloads")]
    pub downloads: Option<Value>,
    #[serde(rename = "Prints")]
    pub prints: Option<Value>,
    #[serde(rename = "Points")]
    pub points: Option<Value>,
    #[serde(rename = "Followers")]
    pub followers: Option<Value>,
    #[serde(rename = "Boosts Received")]
    pub boosts_received: Option<Value>,
}

impl Summary {
    pub fn entries(&self) -> [(&'static str, Option<&Value>); 6] {
        [
            ("Likes", self.likes.as_ref()),
            ("Downloads", self.downloads.as_ref()),
            ("Prints", self.prints.as_ref()),
            ("Points", self.points.as_ref()),
            ("Followers", self.followers.as_ref()),
            ("Boosts Received", self.boosts_received.as_ref()),
        ]
    }
}

/// Profile flags and counts. Missing or mistyped fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub banned_permission: Option<Map<String, Value>>,
    pub handle: Option<String>,
    pub name: Option<String>,
    pub uid: Option<Value>,
    pub badges: Option<Vec<Value>>,
    pub certificated: Option<bool>,
    pub can_subscribe_commercial_license: Option<bool>,
    pub design_count: Option<i64>,
    pub collection_count: Option<i64>,
    pub download_count: Option<i64>,
    pub follow_count: Option<i64>,
    pub featured_design_cnt: Option<i64>,
    pub win_contest_times: Option<i64>,
}

impl Diagnostics {
    /// Titles of badges that are objects with a string `title`.
    pub fn badge_titles(&self) -> Vec<&str> {
        self.badges
            .iter()
            .flatten()
            .filter_map(|badge| badge.get("title").and_then(Value::as_str))
            .collect()
    }

    /// A `bannedPermission` sub-flag, only when it is a boolean.
    pub fn banned_flag(&self, key: &str) -> Option<bool> {
        self.banned_permission
            .as_ref()
            .and_then(|banned| banned.get(key))
            .and_then(Value::as_bool)
    }

    /// Every known banned-permission flag, in display order.
    pub fn banned_flags(&self) -> Vec<(&'static str, Option<bool>)> {
        BANNED_PERMISSION_KEYS
            .iter()
            .map(|key| (*key, self.banned_flag(key)))
            .collect()
    }
}

/// The result of one refresh cycle. Superseded wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshSnapshot {
    #[serde(flatten)]
    pub summary: Summary,
    #[serde(rename = "Top")]
    pub top: TopModels,
    /// Merged reference count, whether or not each model's page was fetched
    #[serde(rename = "Models")]
    pub models: usize,
    #[serde(rename = "Diagnostics")]
    pub diagnostics: Diagnostics,
    pub last_update: DateTime<Utc>,
}

/// A model page that could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedModel {
    pub id: i64,
    pub slug: String,
    pub title: Option<String>,
    pub error: String,
}

/// Outcome of one per-model fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelOutcome {
    Fetched(ModelRecord),
    Failed(FailedModel),
}

impl ModelOutcome {
    pub fn record(&self) -> Option<&ModelRecord> {
        match self {
            ModelOutcome::Fetched(record) => Some(record),
            ModelOutcome::Failed(_) => None,
        }
    }
}

/// How a refresh arrived at its snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefreshTrace {
    pub profile_url: String,
    pub upload_url: Option<String>,
    pub upload_error: Option<String>,
    /// References left after `max_models` truncation
    pub resolved_model_refs: usize,
    /// Model pages fetched successfully
    pub parsed_models: usize,
    #[serde(skip)]
    pub models: Vec<ModelOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(likes: Value) -> ModelRecord {
        let mut metrics = BTreeMap::new();
        metrics.insert(
            "likeCount".to_string(),
            match likes.as_i64() {
                Some(n) => MetricValue::Count(n),
                None => MetricValue::Raw(likes),
            },
        );
        ModelRecord {
            id: 7,
            slug: "benchy".to_string(),
            url: "https://makerworld.com/en/models/7-benchy".to_string(),
            title: Some("Benchy".to_string()),
            metrics,
        }
    }

    #[test]
    fn test_model_reference_url() {
        let r = ModelReference::new(42, "widget", None);
        assert_eq!(
            r.url("https://makerworld.com"),
            "https://makerworld.com/en/models/42-widget"
        );
    }

    #[test]
    fn test_metric_value_serializes_untagged() {
        assert_eq!(serde_json::to_value(MetricValue::Count(5)).unwrap(), json!(5));
        assert_eq!(
            serde_json::to_value(MetricValue::Raw(json!("1.2k"))).unwrap(),
            json!("1.2k")
        );
    }

    #[test]
    fn test_record_count_ignores_raw() {
        assert_eq!(record(json!(12)).count("likeCount"), Some(12));
        assert_eq!(record(json!("1.2k")).count("likeCount"), None);
        assert_eq!(record(json!(12)).count("printCount"), None);
    }

    #[test]
    fn test_top_model_serializes_metric_key() {
        let top = TopModel {
            id: 7,
            title: Some("Benchy".to_string()),
            url: "https://makerworld.com/en/models/7-benchy".to_string(),
            metric: "likeCount",
            value: 99,
        };
        assert_eq!(
            serde_json::to_value(&top).unwrap(),
            json!({
                "id": 7,
                "title": "Benchy",
                "url": "https://makerworld.com/en/models/7-benchy",
                "likeCount": 99
            })
        );
    }

    #[test]
    fn test_snapshot_top_level_keys() {
        let snapshot = RefreshSnapshot {
            summary: Summary {
                likes: Some(json!(10)),
                ..Default::default()
            },
            top: TopModels::default(),
            models: 0,
            diagnostics: Diagnostics::default(),
            last_update: Utc::now(),
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec![
                "Likes",
                "Downloads",
                "Prints",
                "Points",
                "Followers",
                "Boosts Received",
                "Top",
                "Models",
                "Diagnostics",
                "last_update"
            ]
        );
        assert_eq!(value["Likes"], json!(10));
        assert_eq!(value["Downloads"], Value::Null);
        assert_eq!(value["Top"]["Most Liked Model"], Value::Null);
        assert_eq!(value["Diagnostics"]["canSubscribeCommercialLicense"], Value::Null);
        assert!(value["Diagnostics"].get("featuredDesignCnt").is_some());
    }

    #[test]
    fn test_diagnostics_badges_and_flags() {
        let mut banned = Map::new();
        banned.insert("comment".to_string(), json!(true));
        banned.insert("upload".to_string(), json!("no"));
        let diagnostics = Diagnostics {
            banned_permission: Some(banned),
            badges: Some(vec![
                json!({"title": "Early Maker"}),
                json!({"title": 3}),
                json!("loose"),
                json!({"title": "Boosted"}),
            ]),
            ..Default::default()
        };
        assert_eq!(diagnostics.badge_titles(), vec!["Early Maker", "Boosted"]);
        assert_eq!(diagnostics.banned_flag("comment"), Some(true));
        assert_eq!(diagnostics.banned_flag("upload"), None);
        assert_eq!(diagnostics.banned_flag("whole"), None);
        assert_eq!(diagnostics.banned_flags().len(), 7);
    }
}
