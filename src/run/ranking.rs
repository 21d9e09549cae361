//! Top-model ranking.

use crate::config::{METRIC_DOWNLOADS, METRIC_LIKES, METRIC_PRINTS};
use crate::models::{ModelRecord, TopModel, TopModels};

/// Picks the record with the highest integer value for `metric`.
///
/// Records without an integer value are skipped. Ties go to the record seen
/// first, so the result depends only on the order of `records`.
pub fn top_by<'a, I>(records: I, metric: &'static str) -> Option<TopModel>
where
    I: IntoIterator<Item = &'a ModelRecord>,
{
    let mut best: Option<(&ModelRecord, i64)> = None;
    for record in records {
        let Some(value) = record.count(metric) else {
            continue;
        };
        if best.is_none_or(|(_, best_value)| value > best_value) {
            best = Some((record, value));
        }
    }

    best.map(|(record, value)| TopModel {
        id: record.id,
        title: record.title.clone(),
        url: record.url.clone(),
        metric,
        value,
    })
}

/// Ranks fetched records by likes, downloads and prints.
pub fn rank(records: &[&ModelRecord]) -> TopModels {
    TopModels {
        most_liked: top_by(records.iter().copied(), METRIC_LIKES),
        most_downloaded: top_by(records.iter().copied(), METRIC_DOWNLOADS),
        most_printed: top_by(records.iter().copied(), METRIC_PRINTS),
    }
}
