//! Summary recomputation over the retweet-free record set.

use crate::filter::filter_out_retweets;
use crate::types::{AnalysisSummary, EngagementRecord};

/// Maximum length of `top_performing`.
pub const TOP_PERFORMING_LIMIT: usize = 5;

/// Recompute an [`AnalysisSummary`] from `records` with retweets excluded.
///
/// 1. Retweets are filtered out of `records`.
/// 2. If nothing is left, `existing` is returned unchanged (or an all-zero
///    summary when there is none). Recomputation is skipped, not zeroed.
/// 3. Otherwise totals and per-post averages are taken over the filtered set.
/// 4. `engagement_rate_percent` is `total_engagement / followers * 100` when
///    `followers_count > 0`, else `avg_engagement_per_tweet / count * 100`.
/// 5. `top_performing` is the existing top list (or, when that is empty, the
///    filtered set) with retweets removed, ranked by engagement descending
///    with ties kept in input order, truncated to [`TOP_PERFORMING_LIMIT`].
///
/// `existing` is never modified; fields this function does not recompute,
/// including unknown `extra` keys, are carried over from it.
#[must_use]
pub fn recompute_summary(
    records: &[EngagementRecord],
    existing: Option<&AnalysisSummary>,
    followers_count: Option<u64>,
) -> AnalysisSummary {
    let filtered = filter_out_retweets(records);

    if filtered.is_empty() {
        tracing::debug!(
            input = records.len(),
            "no non-retweet records; keeping existing summary"
        );
        return existing.cloned().unwrap_or_default();
    }

    let count = filtered.len() as u64;
    let mut likes = 0_u64;
    let mut retweets = 0_u64;
    let mut replies = 0_u64;
    let mut quotes = 0_u64;
    for record in &filtered {
        likes = likes.saturating_add(record.likes);
        retweets = retweets.saturating_add(record.retweets);
        replies = replies.saturating_add(record.replies);
        quotes = quotes.saturating_add(record.quotes);
    }
    let total_engagement = likes
        .saturating_add(retweets)
        .saturating_add(replies)
        .saturating_add(quotes);

    #[allow(clippy::cast_precision_loss)]
    let (avg_likes, avg_retweets, avg_engagement, engagement_rate) = {
        let n = count as f64;
        let avg_engagement = total_engagement as f64 / n;
        // The zero-follower fallback divides an average by the count again.
        // Kept as-is so existing dashboards read the same numbers.
        let rate = match followers_count {
            Some(followers) if followers > 0 => total_engagement as f64 / followers as f64 * 100.0,
            _ => avg_engagement / n * 100.0,
        };
        (likes as f64 / n, retweets as f64 / n, avg_engagement, rate)
    };

    let top_source = match existing {
        Some(summary) if !summary.top_performing.is_empty() => &summary.top_performing,
        _ => &filtered,
    };

    AnalysisSummary {
        total_tweets_analyzed: count,
        total_likes_received: likes,
        total_retweets_received: retweets,
        total_replies_received: replies,
        total_quotes_received: quotes,
        total_engagement,
        avg_likes_per_tweet: avg_likes,
        avg_retweets_per_tweet: avg_retweets,
        avg_engagement_per_tweet: avg_engagement,
        engagement_rate_percent: engagement_rate,
        top_performing: rank_top_performing(top_source),
        extra: existing.map(|s| s.extra.clone()).unwrap_or_default(),
    }
}

fn rank_top_performing(records: &[EngagementRecord]) -> Vec<EngagementRecord> {
    let mut ranked = filter_out_retweets(records);
    // `sort_by_key` is stable, so equal engagement keeps input order.
    ranked.sort_by_key(|r| std::cmp::Reverse(r.engagement()));
    ranked.truncate(TOP_PERFORMING_LIMIT);
    ranked
}
