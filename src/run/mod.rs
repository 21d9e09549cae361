//! Refresh cycle.
//!
//! One refresh is a single linear pass:
//! profile → summary → upload references (best-effort) → per-model metrics
//! (best-effort per model) → ranking → snapshot.
//!
//! Only the profile fetch and its user-info record are load-bearing. Every other
//! failure is logged, counted in `RefreshStats`, and reflected as missing data.

mod model;
mod ranking;
mod summary;

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

use crate::config::{Config, USER_INFO_PATH};
use crate::error_handling::{
    FetchError, InfoType, InitializationError, RefreshError, RefreshStats, WarningType,
};
use crate::fetch::{FetchTarget, PageFetcher};
use crate::initialization::init_client;
use crate::models::{
    FailedModel, ModelOutcome, ModelRecord, ModelReference, RefreshSnapshot, RefreshTrace,
};
use crate::parse::{deep_get, merge_refs, refs_from_html, refs_from_next_data, ReferenceSet};

// Re-export public API
pub use model::{fetch_model_metrics, model_record};
pub use ranking::{rank, top_by};
pub use summary::{extract_diagnostics, extract_summary};

/// Runs refresh cycles for one configured user.
///
/// Holds no state between cycles apart from the configuration, the HTTP client,
/// and the diagnostic sink supplied by the caller. Dropping a pending refresh
/// future cancels its in-flight requests.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use makerworld_stats::{Config, RefreshStats, Refresher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     user: "@alice".to_string(),
///     cookie: std::fs::read_to_string("cookie.txt")?,
///     ..Default::default()
/// };
/// let refresher = Refresher::from_config(config, Arc::new(RefreshStats::new()))?;
/// let snapshot = refresher.refresh().await?;
/// println!("{} models", snapshot.models);
/// # Ok(())
/// # }
/// ```
pub struct Refresher {
    config: Config,
    fetcher: PageFetcher,
}

impl Refresher {
    pub fn new(config: Config, client: reqwest::Client, stats: Arc<RefreshStats>) -> Self {
        let fetcher = PageFetcher::new(client, &config.cookie, stats);
        Self { config, fetcher }
    }

    /// Builds the HTTP client from `config` and wraps it in a refresher.
    pub fn from_config(
        config: Config,
        stats: Arc<RefreshStats>,
    ) -> Result<Self, InitializationError> {
        let client = init_client(&config)?;
        Ok(Self::new(config, client, stats))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> &RefreshStats {
        self.fetcher.stats()
    }

    /// Runs one refresh cycle and returns its snapshot.
    ///
    /// # Errors
    ///
    /// - `RefreshError::Fetch` if no profile candidate yields a payload
    /// - `RefreshError::MissingUserInfo` if the payload has no user-info record
    pub async fn refresh(&self) -> Result<RefreshSnapshot, RefreshError> {
        self.refresh_with_trace().await.map(|(snapshot, _)| snapshot)
    }

    /// Runs one refresh cycle and also reports how it got there.
    pub async fn refresh_with_trace(
        &self,
    ) -> Result<(RefreshSnapshot, RefreshTrace), RefreshError> {
        let origin = self.config.origin();
        let subject = self.config.subject();
        let timeout = self.config.timeout();
        let stats = self.stats();
        let mut trace = RefreshTrace::default();

        debug!("Starting refresh for user '{}' at {}", subject, origin);

        let (profile, profile_url) = self
            .fetcher
            .fetch_structured_payload(&FetchTarget::profile(origin, subject, timeout))
            .await?;
        trace.profile_url = profile_url;

        let Some(user_info) = deep_get(&profile, USER_INFO_PATH).and_then(|v| v.as_object())
        else {
            debug!(
                "Profile payload keys under props.pageProps: {:?}",
                deep_get(&profile, "props.pageProps")
                    .and_then(|v| v.as_object())
                    .map(|m| m.keys().collect::<Vec<_>>())
            );
            return Err(RefreshError::MissingUserInfo);
        };

        let summary = extract_summary(user_info, &profile, stats);
        let diagnostics = extract_diagnostics(user_info);

        let merged = self.collect_references(&mut trace).await;
        let total_models = merged.len();
        debug!("Merged model refs before max_models limit: {}", total_models);

        let mut refs = merged.into_sorted();
        if let Some(limit) = self.config.model_limit() {
            if refs.len() > limit {
                stats.add_info(InfoType::ModelsTruncated, refs.len() - limit);
                refs.truncate(limit);
                debug!("Applied max_models={}, scanning {} refs", limit, refs.len());
            }
        }
        trace.resolved_model_refs = refs.len();

        let outcomes: Vec<ModelOutcome> = stream::iter(&refs)
            .map(|reference| self.model_outcome(reference))
            .buffered(self.config.model_concurrency.max(1))
            .collect()
            .await;

        let records: Vec<&ModelRecord> = outcomes.iter().filter_map(ModelOutcome::record).collect();
        let top = rank(&records);
        trace.parsed_models = records.len();

        info!(
            "Refreshed '{}': {} model(s), {} fetched",
            subject,
            total_models,
            records.len()
        );

        let snapshot = RefreshSnapshot {
            summary,
            top,
            models: total_models,
            diagnostics,
            last_update: Utc::now(),
        };
        trace.models = outcomes;
        Ok((snapshot, trace))
    }

    /// Upload-page references from both the HTML anchors and the payload.
    ///
    /// Best-effort: a failure keeps whatever was collected before it.
    async fn collect_references(&self, trace: &mut RefreshTrace) -> ReferenceSet {
        let origin = self.config.origin();
        let subject = self.config.subject();
        let timeout = self.config.timeout();

        let mut from_html = BTreeSet::new();
        let mut from_next_data = ReferenceSet::new();

        let upload: Result<(), FetchError> = async {
            let target = FetchTarget::uploads("upload page", origin, subject, timeout);
            let (html, url) = self.fetcher.fetch_html(&target).await?;
            from_html = refs_from_html(&html);
            trace.upload_url = Some(url);

            let target = FetchTarget::uploads("upload data", origin, subject, timeout);
            let (payload, _) = self.fetcher.fetch_structured_payload(&target).await?;
            from_next_data = refs_from_next_data(&payload);
            Ok(())
        }
        .await;

        if let Err(e) = upload {
            warn!(
                "Failed to load upload data for user '{}'; continuing with profile summary only. Profile URL: {}. Error: {}",
                subject, trace.profile_url, e
            );
            self.stats().increment_warning(WarningType::UploadFetchFailed);
            trace.upload_error = Some(e.to_string());
        }

        debug!(
            "Upload refs extracted: html={} next_data={}",
            from_html.len(),
            from_next_data.len()
        );
        let (merged, html_only) = merge_refs(from_next_data, &from_html);
        self.stats().add_info(InfoType::HtmlOnlyReference, html_only);
        merged
    }

    async fn model_outcome(&self, reference: &ModelReference) -> ModelOutcome {
        match fetch_model_metrics(
            &self.fetcher,
            self.config.origin(),
            reference,
            self.config.timeout(),
        )
        .await
        {
            Ok(record) => ModelOutcome::Fetched(record),
            Err(e) => {
                debug!(
                    "Failed model metrics fetch for id={} slug={}: {}",
                    reference.id, reference.slug, e
                );
                self.stats().increment_warning(WarningType::ModelFetchFailed);
                ModelOutcome::Failed(FailedModel {
                    id: reference.id,
                    slug: reference.slug.clone(),
                    title: reference.title.clone(),
                    error: e.to_string(),
                })
            }
        }
    }
}
