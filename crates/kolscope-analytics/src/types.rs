use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ingest::{
    deserialize_records, lenient_bool, lenient_count, lenient_float, lenient_string, lenient_vec,
};

/// One social post with its engagement counters.
///
/// Built once from loosely-keyed input by [`crate::ingest::normalize_record`];
/// downstream code only ever sees this canonical shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementRecord {
    pub id: String,
    pub text: String,
    pub likes: u64,
    /// Retweets, also reported as shares by some sources.
    pub retweets: u64,
    pub replies: u64,
    pub quotes: u64,
}

impl EngagementRecord {
    /// Likes + retweets + replies + quotes.
    #[must_use]
    pub fn engagement(&self) -> u64 {
        self.likes
            .saturating_add(self.retweets)
            .saturating_add(self.replies)
            .saturating_add(self.quotes)
    }
}

/// Aggregate statistics over a set of non-retweet posts.
///
/// Fields this crate does not know about are kept in `extra` so a
/// recomputed summary can be handed back without losing caller data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_tweets_analyzed: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_likes_received: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_retweets_received: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_replies_received: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_quotes_received: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_engagement: u64,
    #[serde(default, deserialize_with = "lenient_float")]
    pub avg_likes_per_tweet: f64,
    #[serde(default, deserialize_with = "lenient_float")]
    pub avg_retweets_per_tweet: f64,
    #[serde(default, deserialize_with = "lenient_float")]
    pub avg_engagement_per_tweet: f64,
    #[serde(default, deserialize_with = "lenient_float")]
    pub engagement_rate_percent: f64,
    #[serde(default, deserialize_with = "deserialize_records")]
    pub top_performing: Vec<EngagementRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read-only profile metrics supplied by the caller.
///
/// Every field reads leniently: a malformed `verified` or `username` must not
/// cost the caller its `followers_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetrics {
    #[serde(default, alias = "followers", deserialize_with = "lenient_count")]
    pub followers_count: u64,
    #[serde(default, alias = "following", deserialize_with = "lenient_count")]
    pub following_count: u64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub verified: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

/// One `name`/`value` entry of an engagement-by-type breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementBucket {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_float")]
    pub value: f64,
}

/// Mention-level analytics sent with a buzz-content request.
///
/// Fields read independently of each other; a malformed breakdown reads as
/// empty and never zeroes the totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuzzAnalytics {
    #[serde(default, deserialize_with = "lenient_float")]
    pub total_mentions: f64,
    #[serde(default, deserialize_with = "lenient_float")]
    pub total_likes: f64,
    /// Per-day mention buckets; only the count is used.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub mentions_by_date: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub engagement_by_type: Vec<EngagementBucket>,
}

impl BuzzAnalytics {
    /// True when there is no historical signal to anchor numeric estimates to.
    #[must_use]
    pub fn has_no_activity(&self) -> bool {
        self.total_mentions <= 0.0 && self.total_likes <= 0.0
    }
}

/// Heuristic magnitudes used to steer generated numeric estimates.
///
/// Advisory only: nothing downstream asserts these are true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedBaseline {
    /// Number of days the rate is spread over (never below 1).
    pub window_days: u64,
    /// Mentions (or posts) per day.
    pub avg_rate_per_day: f64,
    /// Likes per mention (or per post).
    pub rate_per_unit: f64,
    /// Share-type engagement as a fraction of all engagement, within `[0, 0.8]`.
    pub bounded_ratio: f64,
}
