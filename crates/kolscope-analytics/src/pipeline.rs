//! Whole-payload analytics recomputation.

use serde::Serialize;
use serde_json::Value;

use crate::filter::filter_out_retweets;
use crate::ingest::normalize_records;
use crate::summary::recompute_summary;
use crate::types::{AnalysisSummary, EngagementRecord, ProfileMetrics};

/// Result of [`recompute_analytics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecomputedAnalytics {
    /// Posts with retweets removed, in input order.
    pub tweets: Vec<EngagementRecord>,
    pub summary: AnalysisSummary,
    pub retweets_excluded: usize,
}

/// Recompute an analytics payload of the shape
/// `{ "tweets": [...], "summary": {...}?, "profile": {...}? }`.
///
/// `tweets` goes through the ingestion adapter (absent or malformed input is
/// an empty set). An unparseable `summary` or `profile` is ignored with a
/// warning rather than failing the whole payload.
#[must_use]
pub fn recompute_analytics(payload: &Value) -> RecomputedAnalytics {
    let records = normalize_records(payload.get("tweets"));
    let existing = parse_section::<AnalysisSummary>(payload, "summary");
    let profile = parse_section::<ProfileMetrics>(payload, "profile");

    let followers = profile.as_ref().map(|p| p.followers_count);
    let summary = recompute_summary(&records, existing.as_ref(), followers);
    let tweets = filter_out_retweets(&records);
    let retweets_excluded = records.len() - tweets.len();

    tracing::debug!(
        input = records.len(),
        kept = tweets.len(),
        retweets_excluded,
        "recomputed analytics payload"
    );

    RecomputedAnalytics {
        tweets,
        summary,
        retweets_excluded,
    }
}

fn parse_section<T: serde::de::DeserializeOwned>(payload: &Value, key: &str) -> Option<T> {
    let raw = payload.get(key).filter(|v| !v.is_null())?;
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(section = key, error = %e, "ignoring malformed analytics section");
            None
        }
    }
}
