//! Retweet exclusion.

use crate::types::EngagementRecord;

/// Literal prefix marking a retweet.
pub const RETWEET_PREFIX: &str = "RT @";

/// True if `text`, trimmed, starts with [`RETWEET_PREFIX`].
#[must_use]
pub fn is_retweet(text: &str) -> bool {
    text.trim().starts_with(RETWEET_PREFIX)
}

/// Drop every retweet, keeping the remaining records in their original order.
#[must_use]
pub fn filter_out_retweets(records: &[EngagementRecord]) -> Vec<EngagementRecord> {
    records
        .iter()
        .filter(|r| !is_retweet(&r.text))
        .cloned()
        .collect()
}
