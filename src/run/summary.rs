//! Summary counters and diagnostics read from the profile's user-info record.
//!
//! Every field is optional. A missing or mistyped field becomes `None`; only the
//! user-info record itself is required (see `RefreshError::MissingUserInfo`).

use log::debug;
use serde_json::{Map, Value};

use crate::config::{POINTS_FIELDS, SUMMARY_POINTS_PATH};
use crate::error_handling::{RefreshStats, WarningType};
use crate::models::{Diagnostics, Summary};
use crate::parse::tree::{deep_get, get_bool, get_i64, get_present, get_str};

fn nested<'a>(user_info: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let (head, rest) = path.split_once('.')?;
    deep_get(user_info.get(head)?, rest)
}

/// Points live under one of several names, or in the page-level summary.
fn points(user_info: &Map<String, Value>, profile_payload: &Value) -> Option<Value> {
    POINTS_FIELDS
        .iter()
        .find_map(|field| get_present(user_info, field))
        .or_else(|| deep_get(profile_payload, SUMMARY_POINTS_PATH).filter(|v| !v.is_null()))
        .cloned()
}

/// Builds the six summary counters.
///
/// Each absent counter is logged at debug level and counted as a
/// `MissingSummaryField` warning.
pub fn extract_summary(
    user_info: &Map<String, Value>,
    profile_payload: &Value,
    stats: &RefreshStats,
) -> Summary {
    let summary = Summary {
        likes: get_present(user_info, "likeCount").cloned(),
        downloads: nested(user_info, "MWCount.myDesignDownloadCount")
            .filter(|v| !v.is_null())
            .cloned(),
        prints: nested(user_info, "MWCount.myDesignPrintCount")
            .filter(|v| !v.is_null())
            .cloned(),
        points: points(user_info, profile_payload),
        followers: get_present(user_info, "fanCount").cloned(),
        boosts_received: get_present(user_info, "boostGained").cloned(),
    };

    for (name, value) in summary.entries() {
        if value.is_none() {
            debug!("Summary field '{}' not found in user info", name);
            stats.increment_warning(WarningType::MissingSummaryField);
        }
    }
    summary
}

/// Builds the diagnostics block from user-info fields.
pub fn extract_diagnostics(user_info: &Map<String, Value>) -> Diagnostics {
    Diagnostics {
        banned_permission: user_info
            .get("bannedPermission")
            .and_then(Value::as_object)
            .cloned(),
        handle: get_str(user_info, "handle").map(str::to_string),
        name: get_str(user_info, "name").map(str::to_string),
        uid: get_present(user_info, "uid").cloned(),
        badges: user_info
            .get("badges")
            .and_then(Value::as_array)
            .cloned(),
        certificated: get_bool(user_info, "certificated"),
        can_subscribe_commercial_license: get_bool(user_info, "canSubscribeCommercialLicense"),
        design_count: nested(user_info, "MWCount.designCount").and_then(Value::as_i64),
        collection_count: get_i64(user_info, "collectionCount"),
        download_count: get_i64(user_info, "downloadCount"),
        follow_count: get_i64(user_info, "followCount"),
        featured_design_cnt: get_i64(user_info, "featuredDesignCnt"),
        win_contest_times: get_i64(user_info, "winContestTimes"),
    }
}
