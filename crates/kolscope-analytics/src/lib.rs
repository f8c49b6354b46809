//! Engagement analytics for KOLScope.
//!
//! Normalizes raw social-post records into a canonical shape, excludes
//! retweets, recomputes aggregate statistics from what remains, and derives
//! the heuristic baselines used to keep generated numbers plausible.

pub mod baseline;
pub mod filter;
pub mod ingest;
pub mod pipeline;
pub mod summary;
pub mod types;

pub use baseline::{derive_baseline, derive_baseline_from_summary, MAX_SHARE_RATIO};
pub use filter::{filter_out_retweets, is_retweet};
pub use ingest::{normalize_record, normalize_records};
pub use pipeline::{recompute_analytics, RecomputedAnalytics};
pub use summary::{recompute_summary, TOP_PERFORMING_LIMIT};
pub use types::{
    AnalysisSummary, BuzzAnalytics, DerivedBaseline, EngagementBucket, EngagementRecord,
    ProfileMetrics,
};
