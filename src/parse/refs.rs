//! Model reference extraction.
//!
//! References come from two independent places on the upload page:
//! - anchor links in the rendered HTML (`/en/models/<id>-<slug>`), no titles
//! - records in the `__NEXT_DATA__` payload carrying an integer `id` and a
//!   string `slug`, optionally a `title`
//!
//! The payload is authoritative for titles; anchors only fill coverage gaps.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::{Map, Value};

use crate::config::{ANCHOR_SELECTOR_STR, MODEL_HREF_PATTERN};
use crate::models::ModelReference;
use crate::parse::tree::{get_i64, get_str, walk};
use crate::utils::parse_selector_unsafe;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(ANCHOR_SELECTOR_STR, "model anchor extraction"));

static MODEL_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(MODEL_HREF_PATTERN).expect("Failed to compile model href pattern - this is a bug")
});

/// Collects `(id, slug)` pairs from anchor `href`s in the upload page HTML.
pub fn refs_from_html(html: &str) -> BTreeSet<(i64, String)> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| {
            let caps = MODEL_HREF_RE.captures(href)?;
            let id = caps.get(1)?.as_str().parse::<i64>().ok()?;
            Some((id, caps.get(2)?.as_str().to_string()))
        })
        .collect()
}

/// Reads a reference from one payload record.
///
/// Requires a non-zero integer `id` and a non-empty string `slug`.
pub fn ref_from_record(record: &Map<String, Value>) -> Option<ModelReference> {
    let id = get_i64(record, "id").filter(|id| *id != 0)?;
    let slug = get_str(record, "slug").filter(|slug| !slug.is_empty())?;
    let title = get_str(record, "title").map(str::to_string);
    Some(ModelReference::new(id, slug, title))
}

/// Payload references keyed by identity, in first-seen order.
///
/// A later record with the same `(id, slug)` replaces the title (including
/// with `None`) but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSet {
    refs: Vec<ModelReference>,
    index: HashMap<(i64, String), usize>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the title of an existing reference.
    pub fn upsert(&mut self, reference: ModelReference) {
        let key = (reference.id, reference.slug.clone());
        match self.index.get(&key) {
            Some(&pos) => self.refs[pos].title = reference.title,
            None => {
                self.index.insert(key, self.refs.len());
                self.refs.push(reference);
            }
        }
    }

    /// Inserts with no title unless the identity is already known.
    ///
    /// Returns `true` when the reference was new.
    pub fn insert_if_absent(&mut self, id: i64, slug: &str) -> bool {
        let key = (id, slug.to_string());
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.refs.len());
        self.refs.push(ModelReference::new(id, slug, None));
        true
    }

    pub fn get(&self, id: i64, slug: &str) -> Option<&ModelReference> {
        self.index
            .get(&(id, slug.to_string()))
            .map(|&pos| &self.refs[pos])
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// References sorted ascending by id. Equal ids keep insertion order.
    pub fn into_sorted(self) -> Vec<ModelReference> {
        let mut refs = self.refs;
        refs.sort_by_key(|r| r.id);
        refs
    }
}

/// Collects references from every qualifying record in the upload payload.
pub fn refs_from_next_data(next_data: &Value) -> ReferenceSet {
    let mut found = ReferenceSet::new();
    for reference in walk(next_data).filter_map(ref_from_record) {
        found.upsert(reference);
    }
    found
}

/// Merges anchor-link pairs into the payload references.
///
/// Payload entries (and their titles) win; anchor pairs not already present are
/// appended without a title. Returns the merged set and how many references came
/// only from anchors.
pub fn merge_refs(
    from_next_data: ReferenceSet,
    from_html: &BTreeSet<(i64, String)>,
) -> (ReferenceSet, usize) {
    let mut merged = from_next_data;
    let html_only = from_html
        .iter()
        .filter(|(id, slug)| merged.insert_if_absent(*id, slug))
        .count();
    (merged, html_only)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[(i64, &str)]) -> BTreeSet<(i64, String)> {
        items.iter().map(|(id, s)| (*id, s.to_string())).collect()
    }

    #[test]
    fn test_refs_from_html_matches_model_links_only() {
        let html = r#"
            <html><body>
                <a href="/en/models/123-cool-vase">Vase</a>
                <a href="/en/models/45-hook?from=upload">Query string</a>
                <a href="/en/models/67-bracket#comments">Fragment</a>
                <a href="/de/models/8-other">Other locale</a>
                <a href="https://makerworld.com/en/models/9-absolute">Absolute</a>
                <a href="/en/models/10-nested/extra">Nested</a>
                <a href="/en/models/123-cool-vase">Duplicate</a>
                <a>No href</a>
                <a href="/en/models/11-ok">Ok</a>
            </body></html>
        "#;
        assert_eq!(
            refs_from_html(html),
            pairs(&[(11, "ok"), (123, "cool-vase")])
        );
    }

    #[test]
    fn test_refs_from_html_empty_page() {
        assert!(refs_from_html("<html></html>").is_empty());
        assert!(refs_from_html("").is_empty());
    }

    #[test]
    fn test_ref_from_record_requires_id_and_slug() {
        let ok = json!({"id": 5, "slug": "s", "title": "T"});
        let no_title = json!({"id": 5, "slug": "s", "title": 9});
        let zero_id = json!({"id": 0, "slug": "s"});
        let string_id = json!({"id": "5", "slug": "s"});
        let empty_slug = json!({"id": 5, "slug": ""});
        let read = |v: &Value| ref_from_record(v.as_object().unwrap());

        assert_eq!(
            read(&ok),
            Some(ModelReference::new(5, "s", Some("T".to_string())))
        );
        assert_eq!(read(&no_title), Some(ModelReference::new(5, "s", None)));
        assert_eq!(read(&zero_id), None);
        assert_eq!(read(&string_id), None);
        assert_eq!(read(&empty_slug), None);
    }

    #[test]
    fn test_refs_from_next_data_last_title_wins() {
        let payload = json!({
            "props": {
                "list": [
                    {"id": 2, "slug": "b", "title": "First"},
                    {"id": 1, "slug": "a"},
                    {"id": 2, "slug": "b", "title": "Second"}
                ],
                "user": {"id": 99, "name": "no slug"}
            }
        });
        let found = refs_from_next_data(&payload);
        assert_eq!(found.len(), 2);
        assert_eq!(
            found.get(2, "b").and_then(|r| r.title.as_deref()),
            Some("Second")
        );
        assert_eq!(found.get(1, "a").map(|r| r.title.clone()), Some(None));
        assert!(found.get(99, "").is_none());
    }

    #[test]
    fn test_merge_prefers_payload_titles() {
        let mut from_nd = ReferenceSet::new();
        from_nd.upsert(ModelReference::new(1, "a", Some("Title A".to_string())));
        let from_html = pairs(&[(1, "a"), (2, "b")]);

        let (merged, html_only) = merge_refs(from_nd, &from_html);
        assert_eq!(html_only, 1);
        assert_eq!(
            merged.into_sorted(),
            vec![
                ModelReference::new(1, "a", Some("Title A".to_string())),
                ModelReference::new(2, "b", None),
            ]
        );
    }

    #[test]
    fn test_same_id_different_slug_are_distinct() {
        let mut set = ReferenceSet::new();
        set.upsert(ModelReference::new(3, "new-slug", None));
        let (merged, html_only) = merge_refs(set, &pairs(&[(3, "old-slug")]));
        assert_eq!(html_only, 1);
        let sorted = merged.into_sorted();
        assert_eq!(sorted.len(), 2);
        // Equal ids keep insertion order: payload first, then anchors.
        assert_eq!(sorted[0].slug, "new-slug");
        assert_eq!(sorted[1].slug, "old-slug");
    }

    #[test]
    fn test_into_sorted_orders_by_id() {
        let mut set = ReferenceSet::new();
        for id in [30, 10, 20] {
            set.upsert(ModelReference::new(id, format!("m{}", id), None));
        }
        let ids: Vec<i64> = set.into_sorted().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }
}
