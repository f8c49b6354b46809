//! End-to-end pipelines: validated input in, validated output out.
//!
//! Each run assembles one request, calls the generation service at most
//! once, and extracts and validates the result. Nothing is retried.

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::client::GenerationService;
use crate::context::{
    build_anomaly_request, build_buzz_request, build_kol_request, BuzzContext, KolContext,
};
use crate::error::PipelineError;
use crate::extract::decode_validated;
use crate::input::{AnomalyInput, BuzzInput, KolInput};
use crate::output::{AnomalyAlert, BuzzTweetList, KolRecommendation, StructuredOutput};
use crate::types::GenerationRequest;

/// Detect anomalies in caller-supplied KPI data.
///
/// KPI data that does not parse as JSON short-circuits to a synthesized
/// alert with `has_anomaly = true`; the generation service is not called
/// and no credential is required.
///
/// # Errors
///
/// [`PipelineError::MissingConfiguration`], [`PipelineError::UpstreamGeneration`],
/// [`PipelineError::MalformedOutput`] or [`PipelineError::SchemaValidation`].
pub async fn run_anomaly_detection(
    generator: &dyn GenerationService,
    input: &AnomalyInput,
    cancel: &CancellationToken,
) -> Result<AnomalyAlert, PipelineError> {
    let kpi: Value = match serde_json::from_str(&input.kpi_data) {
        Ok(kpi) => kpi,
        Err(e) => {
            tracing::warn!(error = %e, "KPI data is not valid JSON; synthesizing anomaly");
            return Ok(AnomalyAlert::invalid_kpi_data(&e.to_string()));
        }
    };

    ensure_configured(generator)?;
    let request = build_anomaly_request(&kpi, &input.description);
    let alert: AnomalyAlert = generate(generator, &request, cancel).await?;

    tracing::info!(has_anomaly = alert.has_anomaly, "anomaly detection complete");
    Ok(alert)
}

/// Generate buzz posts for an account.
///
/// # Errors
///
/// [`PipelineError::MissingConfiguration`], [`PipelineError::UpstreamGeneration`],
/// [`PipelineError::MalformedOutput`] or [`PipelineError::SchemaValidation`].
pub async fn run_buzz_generation(
    generator: &dyn GenerationService,
    input: &BuzzInput,
    cancel: &CancellationToken,
) -> Result<BuzzTweetList, PipelineError> {
    ensure_configured(generator)?;

    let context = BuzzContext::from_analytics(&input.analytics);
    let request = build_buzz_request(input, &context);
    let list: BuzzTweetList = generate(generator, &request, cancel).await?;

    tracing::info!(
        twitter_id = %input.twitter_id,
        requested = input.count,
        generated = list.items.len(),
        no_activity = context.analytics.has_no_activity(),
        "buzz generation complete"
    );
    Ok(list)
}

/// Recommend whether a brand should partner with a KOL.
///
/// # Errors
///
/// [`PipelineError::MissingConfiguration`], [`PipelineError::UpstreamGeneration`],
/// [`PipelineError::MalformedOutput`] or [`PipelineError::SchemaValidation`].
pub async fn run_kol_recommendation(
    generator: &dyn GenerationService,
    input: &KolInput,
    cancel: &CancellationToken,
) -> Result<KolRecommendation, PipelineError> {
    ensure_configured(generator)?;

    let context = KolContext::from_kol_data(&input.kol_data, input.window_days);
    let request = build_kol_request(input, &context);
    let recommendation: KolRecommendation = generate(generator, &request, cancel).await?;

    tracing::info!(
        fit_score = recommendation.fit_score,
        retweets_excluded = context.recomputed.retweets_excluded,
        "kol recommendation complete"
    );
    Ok(recommendation)
}

fn ensure_configured(generator: &dyn GenerationService) -> Result<(), PipelineError> {
    if generator.is_configured() {
        Ok(())
    } else {
        Err(PipelineError::MissingConfiguration(
            "OPENAI_API_KEY is not set".to_string(),
        ))
    }
}

async fn generate<T: StructuredOutput>(
    generator: &dyn GenerationService,
    request: &GenerationRequest,
    cancel: &CancellationToken,
) -> Result<T, PipelineError> {
    tracing::debug!(
        schema = request.output_schema.name,
        user_content_len = request.user_content.len(),
        "assembled generation request"
    );
    let raw = generator.invoke(request, cancel).await?;
    decode_validated::<T>(&raw)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
