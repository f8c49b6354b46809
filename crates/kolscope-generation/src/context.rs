//! Context and request assembly for the three call sites.
//!
//! Builders are pure: the same inputs always produce the same
//! [`GenerationRequest`], and the attached schema is the static one declared
//! by the output type.

use kolscope_analytics::{
    derive_baseline, derive_baseline_from_summary, recompute_analytics, BuzzAnalytics,
    DerivedBaseline, ProfileMetrics, RecomputedAnalytics,
};
use serde_json::{json, Value};

use crate::input::{BuzzInput, KolInput};
use crate::output::{AnomalyAlert, BuzzTweetList, KolRecommendation, StructuredOutput};
use crate::types::GenerationRequest;

const ANOMALY_INSTRUCTIONS: &str = "You are a marketing analytics monitor. \
Compare the KPI data against the description of expected behaviour and decide \
whether there is an anomaly worth alerting on. Respond only with JSON matching \
the provided schema. Keep alert_message to one or two sentences and name the \
metric involved.";

const BUZZ_INSTRUCTIONS: &str = "You are a social media copywriter for a brand \
account. Write original posts in the requested tone. Every item needs a unique \
id, the post text, and an estimates key. Respond only with JSON matching the \
provided schema.";

const BUZZ_NO_ACTIVITY_GUIDANCE: &str = "The account has no recorded mentions or \
likes. Do not fabricate numbers: set estimates to null for every item. Focus on \
qualitative content that starts conversations and invites first engagement.";

const KOL_INSTRUCTIONS: &str = "You are a partnership analyst evaluating a key \
opinion leader (KOL) for a brand. Judge audience fit, engagement quality and \
risk against the brand goals. Give a fit_score from 1 to 10, three to five \
strengths and two to four concerns. Respond only with JSON matching the \
provided schema.";

/// Analytics context for a buzz request.
#[derive(Debug, Clone, PartialEq)]
pub struct BuzzContext {
    /// Analytics payload as embedded in the request. When it carried posts,
    /// they are replaced with the retweet-free set and a recomputed summary.
    pub payload: Value,
    pub analytics: BuzzAnalytics,
    pub baseline: DerivedBaseline,
}

impl BuzzContext {
    /// Build the context from the caller's raw `analytics` object.
    ///
    /// Each metric field is read on its own: unreadable totals count as zero
    /// and a malformed breakdown reads as empty, without touching the others.
    #[must_use]
    pub fn from_analytics(raw: &Value) -> Self {
        let analytics: BuzzAnalytics = if raw.is_object() {
            serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "buzz analytics unreadable; treating as no activity");
                BuzzAnalytics::default()
            })
        } else {
            BuzzAnalytics::default()
        };
        let baseline = derive_baseline(&analytics);

        let mut payload = raw.clone();
        if let Some(obj) = payload.as_object_mut() {
            if obj.get("tweets").is_some_and(Value::is_array) {
                let recomputed = recompute_analytics(raw);
                obj.insert("tweets".to_string(), json!(recomputed.tweets));
                obj.insert("summary".to_string(), json!(recomputed.summary));
            }
        }

        Self {
            payload,
            analytics,
            baseline,
        }
    }
}

/// Partnership context: the KOL's recomputed analytics and baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct KolContext {
    pub recomputed: RecomputedAnalytics,
    pub profile: Option<ProfileMetrics>,
    pub baseline: DerivedBaseline,
}

impl KolContext {
    #[must_use]
    pub fn from_kol_data(kol_data: &Value, window_days: u64) -> Self {
        let recomputed = recompute_analytics(kol_data);
        let profile = kol_data
            .get("profile")
            .filter(|p| p.is_object())
            .and_then(|p| serde_json::from_value::<ProfileMetrics>(p.clone()).ok());
        let baseline = derive_baseline_from_summary(&recomputed.summary, window_days);

        Self {
            recomputed,
            profile,
            baseline,
        }
    }
}

/// Request for the anomaly call site. `kpi` is the already-parsed KPI data.
#[must_use]
pub fn build_anomaly_request(kpi: &Value, description: &str) -> GenerationRequest {
    let user_content = format!(
        "Description of expected behaviour:\n{description}\n\nKPI data:\n{}",
        pretty(kpi)
    );

    GenerationRequest {
        system_instructions: ANOMALY_INSTRUCTIONS.to_string(),
        user_content,
        output_schema: AnomalyAlert::schema(),
    }
}

/// Request for the buzz call site.
///
/// Without any recorded activity the instructions forbid numeric estimates;
/// otherwise estimates are tied to the derived baseline.
#[must_use]
pub fn build_buzz_request(input: &BuzzInput, context: &BuzzContext) -> GenerationRequest {
    let baseline = &context.baseline;
    let guidance = if context.analytics.has_no_activity() {
        BUZZ_NO_ACTIVITY_GUIDANCE.to_string()
    } else {
        format!(
            "Align every numeric estimate with the historical baseline and avoid \
             exaggeration. Baseline over {days} day(s): about {rate:.1} mentions per day, \
             {likes:.1} likes per mention, and retweets at roughly {share:.0}% of engagement.",
            days = baseline.window_days,
            rate = baseline.avg_rate_per_day,
            likes = baseline.rate_per_unit,
            share = baseline.bounded_ratio * 100.0,
        )
    };

    let user_content = format!(
        "Account: {id}\nTone: {tone}\nNumber of posts: {count}\n\n{guidance}\n\n\
         Derived baseline:\n{baseline}\n\nAnalytics:\n{analytics}",
        id = input.twitter_id,
        tone = input.tone,
        count = input.count,
        baseline = pretty(&json!(baseline)),
        analytics = pretty(&context.payload),
    );

    GenerationRequest {
        system_instructions: BUZZ_INSTRUCTIONS.to_string(),
        user_content,
        output_schema: BuzzTweetList::schema(),
    }
}

/// Request for the partnership call site.
#[must_use]
pub fn build_kol_request(input: &KolInput, context: &KolContext) -> GenerationRequest {
    let profile = context
        .profile
        .as_ref()
        .map_or(Value::Null, |p| json!(p));
    let analytics = json!({
        "profile": profile,
        "summary": context.recomputed.summary,
        "retweets_excluded": context.recomputed.retweets_excluded,
    });

    let user_content = format!(
        "Brand goals:\n{goals}\n\nKOL analytics (retweets excluded):\n{analytics}\n\n\
         Derived baseline over {days} day(s):\n{baseline}\n\nKOL data as supplied:\n{raw}",
        goals = pretty(&Value::Array(input.brand_goals.clone())),
        analytics = pretty(&analytics),
        days = context.baseline.window_days,
        baseline = pretty(&json!(context.baseline)),
        raw = pretty(&strip_posts(&input.kol_data)),
    );

    GenerationRequest {
        system_instructions: KOL_INSTRUCTIONS.to_string(),
        user_content,
        output_schema: KolRecommendation::schema(),
    }
}

/// Raw KOL data minus the post list and stale summary, which are sent
/// recomputed instead.
fn strip_posts(kol_data: &Value) -> Value {
    let mut out = kol_data.clone();
    if let Some(obj) = out.as_object_mut() {
        obj.remove("tweets");
        obj.remove("summary");
    }
    out
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
