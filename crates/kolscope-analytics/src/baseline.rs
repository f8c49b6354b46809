//! Heuristic baselines derived from historical analytics.

use crate::types::{AnalysisSummary, BuzzAnalytics, DerivedBaseline};

/// Upper bound applied to the share ratio.
pub const MAX_SHARE_RATIO: f64 = 0.8;

/// Derive a [`DerivedBaseline`] from mention-level analytics.
///
/// - `window_days = max(1, mentions_by_date.len())`
/// - `avg_rate_per_day = total_mentions / window_days`
/// - `rate_per_unit = total_likes / total_mentions`, or 0 without mentions
/// - `bounded_ratio` = value of the first breakdown entry whose name contains
///   "share" (case-insensitive) over the sum of all breakdown values, clamped
///   to `[0, MAX_SHARE_RATIO]`; 0 when the sum is not positive
#[must_use]
pub fn derive_baseline(analytics: &BuzzAnalytics) -> DerivedBaseline {
    let window_days = analytics.mentions_by_date.len().max(1) as u64;

    #[allow(clippy::cast_precision_loss)]
    let avg_rate_per_day = analytics.total_mentions / window_days as f64;

    let rate_per_unit = if analytics.total_mentions > 0.0 {
        analytics.total_likes / analytics.total_mentions
    } else {
        0.0
    };

    let share_value = analytics
        .engagement_by_type
        .iter()
        .find(|b| b.name.to_lowercase().contains("share"))
        .map_or(0.0, |b| b.value);
    let breakdown_total: f64 = analytics.engagement_by_type.iter().map(|b| b.value).sum();

    DerivedBaseline {
        window_days,
        avg_rate_per_day,
        rate_per_unit,
        bounded_ratio: bounded_ratio(share_value, breakdown_total),
    }
}

/// Derive a [`DerivedBaseline`] from a recomputed post summary.
///
/// Posts stand in for mentions: `avg_rate_per_day` is posts per day over
/// `window_days` (at least 1), `rate_per_unit` is likes per post and
/// `bounded_ratio` is retweets over total engagement.
#[must_use]
pub fn derive_baseline_from_summary(
    summary: &AnalysisSummary,
    window_days: u64,
) -> DerivedBaseline {
    let window_days = window_days.max(1);

    #[allow(clippy::cast_precision_loss)]
    let (avg_rate_per_day, share, total) = (
        summary.total_tweets_analyzed as f64 / window_days as f64,
        summary.total_retweets_received as f64,
        summary.total_engagement as f64,
    );

    DerivedBaseline {
        window_days,
        avg_rate_per_day,
        rate_per_unit: summary.avg_likes_per_tweet,
        bounded_ratio: bounded_ratio(share, total),
    }
}

fn bounded_ratio(share_value: f64, total: f64) -> f64 {
    if total > 0.0 {
        (share_value / total).clamp(0.0, MAX_SHARE_RATIO)
    } else {
        0.0
    }
}
