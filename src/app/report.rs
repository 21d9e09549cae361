//! Report output for the command-line binary.

use std::fmt::Write;

use serde::Serialize;
use serde_json::Value;

use crate::models::{ModelOutcome, RefreshSnapshot, RefreshTrace};

/// The `--json` document: the snapshot plus `debug` and `models` blocks.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    #[serde(flatten)]
    pub snapshot: &'a RefreshSnapshot,
    pub debug: &'a RefreshTrace,
    pub models: &'a [ModelOutcome],
}

impl<'a> JsonReport<'a> {
    pub fn new(snapshot: &'a RefreshSnapshot, trace: &'a RefreshTrace) -> Self {
        Self {
            snapshot,
            debug: trace,
            models: &trace.models,
        }
    }
}

/// Renders the `--json` document, pretty-printed.
pub fn render_json(
    snapshot: &RefreshSnapshot,
    trace: &RefreshTrace,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport::new(snapshot, trace))
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "none".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn display_flag(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    }
}

/// Renders the human-readable report.
pub fn render_human(snapshot: &RefreshSnapshot, trace: &RefreshTrace) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_human(&mut out, snapshot, trace);
    out
}

fn write_human(
    out: &mut String,
    snapshot: &RefreshSnapshot,
    trace: &RefreshTrace,
) -> std::fmt::Result {
    writeln!(out, "Summary:")?;
    for (key, value) in snapshot.summary.entries() {
        writeln!(out, "  {}: {}", key, display_value(value))?;
    }
    writeln!(out, "  Models: {}", snapshot.models)?;

    writeln!(out, "\nTop Models:")?;
    for (key, top) in snapshot.top.entries() {
        match top {
            Some(top) => writeln!(
                out,
                "  {}: {} ({}) {}={}",
                key,
                top.title.as_deref().unwrap_or("untitled"),
                top.url,
                top.metric,
                top.value
            )?,
            None => writeln!(out, "  {}: none", key)?,
        }
    }

    let diagnostics = &snapshot.diagnostics;
    writeln!(out, "\nProfile:")?;
    writeln!(
        out,
        "  handle: {}",
        diagnostics.handle.as_deref().unwrap_or("none")
    )?;
    writeln!(out, "  verified: {}", display_flag(diagnostics.certificated))?;
    writeln!(
        out,
        "  commercial licence: {}",
        display_flag(diagnostics.can_subscribe_commercial_license)
    )?;
    let badges = diagnostics.badge_titles();
    if badges.is_empty() {
        writeln!(out, "  badges: none")?;
    } else {
        writeln!(out, "  badges: {}", badges.join(", "))?;
    }
    let banned: Vec<String> = diagnostics
        .banned_flags()
        .into_iter()
        .map(|(key, flag)| format!("{}={}", key, display_flag(flag)))
        .collect();
    writeln!(out, "  banned: {}", banned.join(", "))?;

    writeln!(out, "\nDebug:")?;
    writeln!(out, "  profile_url: {}", trace.profile_url)?;
    writeln!(
        out,
        "  upload_url: {}",
        trace.upload_url.as_deref().unwrap_or("none")
    )?;
    writeln!(
        out,
        "  upload_error: {}",
        trace.upload_error.as_deref().unwrap_or("none")
    )?;
    writeln!(out, "  resolved_model_refs: {}", trace.resolved_model_refs)?;
    writeln!(out, "  parsed_models: {}", trace.parsed_models)?;
    for outcome in &trace.models {
        if let ModelOutcome::Failed(failed) = outcome {
            writeln!(
                out,
                "  failed model {}-{}: {}",
                failed.id, failed.slug, failed.error
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Diagnostics, FailedModel, Summary, TopModel, TopModels};
    use chrono::Utc;
    use serde_json::json;

    fn snapshot() -> RefreshSnapshot {
        RefreshSnapshot {
            summary: Summary {
                likes: Some(json!(10)),
                points: Some(json!("1,204")),
                ..Default::default()
            },
            top: TopModels {
                most_liked: Some(TopModel {
                    id: 7,
                    title: Some("Benchy".to_string()),
                    url: "https://makerworld.com/en/models/7-benchy".to_string(),
                    metric: "likeCount",
                    value: 9,
                }),
                ..Default::default()
            },
            models: 2,
            diagnostics: Diagnostics {
                certificated: Some(true),
                badges: Some(vec![json!({"title": "Early Maker"})]),
                ..Default::default()
            },
            last_update: Utc::now(),
        }
    }

    fn trace() -> RefreshTrace {
        RefreshTrace {
            profile_url: "https://makerworld.com/en/@alice".to_string(),
            upload_url: None,
            upload_error: Some("HTTP 500 from x".to_string()),
            resolved_model_refs: 2,
            parsed_models: 1,
            models: vec![ModelOutcome::Failed(FailedModel {
                id: 8,
                slug: "hook".to_string(),
                title: None,
                error: "HTTP 404 from y".to_string(),
            })],
        }
    }

    #[test]
    fn test_render_human_sections() {
        let text = render_human(&snapshot(), &trace());
        assert!(text.starts_with("Summary:\n  Likes: 10\n  Downloads: none\n"));
        assert!(text.contains("  Points: 1,204\n"));
        assert!(text.contains(
            "  Most Liked Model: Benchy (https://makerworld.com/en/models/7-benchy) likeCount=9"
        ));
        assert!(text.contains("  Most Printed Model: none"));
        assert!(text.contains("  verified: yes"));
        assert!(text.contains("  commercial licence: unknown"));
        assert!(text.contains("  badges: Early Maker"));
        assert!(text.contains("  banned: comment=unknown, community=unknown"));
        assert!(text.contains("  upload_error: HTTP 500 from x"));
        assert!(text.contains("  failed model 8-hook: HTTP 404 from y"));
    }

    #[test]
    fn test_render_json_layout() {
        let snapshot = snapshot();
        let trace = trace();
        let value: Value = serde_json::from_str(&render_json(&snapshot, &trace).unwrap()).unwrap();

        assert_eq!(value["Likes"], json!(10));
        assert_eq!(value["Models"], json!(2));
        assert_eq!(value["Top"]["Most Liked Model"]["likeCount"], json!(9));
        assert_eq!(value["debug"]["parsed_models"], json!(1));
        assert_eq!(value["debug"]["upload_url"], Value::Null);
        assert!(value["debug"].get("models").is_none());
        assert_eq!(value["models"][0]["error"], json!("HTTP 404 from y"));
    }
}
