//! Offline analytics commands. Each returns pretty-printed JSON for stdout.

use std::path::Path;

use anyhow::Context;
use kolscope_analytics::{
    derive_baseline, derive_baseline_from_summary, recompute_analytics, BuzzAnalytics,
};
use kolscope_generation::OutputKind;
use serde_json::Value;

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

pub(crate) fn recompute_value(payload: &Value) -> anyhow::Result<String> {
    let result = recompute_analytics(payload);
    tracing::info!(
        kept = result.tweets.len(),
        retweets_excluded = result.retweets_excluded,
        "recomputed analytics"
    );
    Ok(serde_json::to_string_pretty(&result)?)
}

pub(crate) fn baseline_value(payload: &Value, window_days: Option<u64>) -> anyhow::Result<String> {
    let baseline = if let Some(days) = window_days {
        let recomputed = recompute_analytics(payload);
        derive_baseline_from_summary(&recomputed.summary, days)
    } else {
        anyhow::ensure!(payload.is_object(), "mention analytics must be a JSON object");
        let analytics: BuzzAnalytics = serde_json::from_value(payload.clone())
            .context("input is not a mention analytics object")?;
        derive_baseline(&analytics)
    };
    Ok(serde_json::to_string_pretty(&baseline)?)
}

pub(crate) fn run_recompute(input: &Path) -> anyhow::Result<String> {
    recompute_value(&read_json(input)?)
}

pub(crate) fn run_baseline(input: &Path, window_days: Option<u64>) -> anyhow::Result<String> {
    baseline_value(&read_json(input)?, window_days)
}

pub(crate) fn render_schema(kind: OutputKind) -> anyhow::Result<String> {
    let schema = kind.schema();
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "name": schema.name,
        "strict": true,
        "schema": schema.to_json_schema(),
    }))?)
}
