use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::*;
use crate::error::GenerationError;
use crate::types::RawResponse;

/// In-memory generator that records every request it receives.
struct RecordingGenerator {
    configured: bool,
    response: Mutex<Option<Result<RawResponse, GenerationError>>>,
    calls: Mutex<Vec<GenerationRequest>>,
}

impl RecordingGenerator {
    fn replying(response: Result<RawResponse, GenerationError>) -> Self {
        Self {
            configured: true,
            response: Mutex::new(Some(response)),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn unconfigured() -> Self {
        Self {
            configured: false,
            response: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for RecordingGenerator {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn invoke(
        &self,
        request: &GenerationRequest,
        _cancel: &CancellationToken,
    ) -> Result<RawResponse, GenerationError> {
        self.calls.lock().unwrap().push(request.clone());
        self.response
            .lock()
            .unwrap()
            .take()
            .expect("generator invoked more than once")
    }
}

fn anomaly_input(kpi: &str) -> AnomalyInput {
    AnomalyInput {
        kpi_data: kpi.to_string(),
        description: "daily signups".to_string(),
    }
}

fn buzz_input(analytics: Value) -> BuzzInput {
    BuzzInput {
        twitter_id: "brand".to_string(),
        tone: "friendly".to_string(),
        count: 2,
        analytics,
    }
}

fn kol_input() -> KolInput {
    KolInput {
        kol_data: json!({
            "profile": {"followers_count": 5000},
            "tweets": [{"id": "1", "text": "review", "likes": 40}]
        }),
        brand_goals: vec![json!("awareness")],
        window_days: 30,
    }
}

fn valid_kol() -> Value {
    json!({
        "recommendation": "Partner on a review series",
        "fit_score": 8,
        "strengths": ["engaged audience", "credible voice", "consistent output"],
        "concerns": ["small reach", "slow posting"]
    })
}

#[tokio::test]
async fn invalid_kpi_is_synthesized_without_calling_generator() {
    let generator = RecordingGenerator::unconfigured();
    let alert = run_anomaly_detection(&generator, &anomaly_input("{not json"), &CancellationToken::new())
        .await
        .unwrap();
    assert!(alert.has_anomaly);
    assert!(alert.alert_message.contains("Invalid KPI data format"));
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn anomaly_without_credential_is_configuration_error() {
    let generator = RecordingGenerator::unconfigured();
    let err = run_anomaly_detection(&generator, &anomaly_input("{\"a\":1}"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::MissingConfiguration(_)));
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn anomaly_returns_validated_alert() {
    let generator = RecordingGenerator::replying(Ok(RawResponse::from_text(
        r#"{"has_anomaly": true, "alert_message": "Signups dropped 80%"}"#,
    )));
    let alert = run_anomaly_detection(&generator, &anomaly_input("[10, 11, 2]"), &CancellationToken::new())
        .await
        .unwrap();
    assert!(alert.has_anomaly);
    assert_eq!(alert.alert_message, "Signups dropped 80%");

    let calls = generator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].output_schema, AnomalyAlert::schema());
}

#[tokio::test]
async fn upstream_failure_is_passed_through() {
    let generator = RecordingGenerator::replying(Err(GenerationError::Status {
        status: 502,
        body: "bad gateway".to_string(),
    }));
    let err = run_anomaly_detection(&generator, &anomaly_input("{}"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::UpstreamGeneration(_)));
    assert!(err.detail().contains("bad gateway"));
}

#[tokio::test]
async fn buzz_without_activity_asks_for_null_estimates() {
    let generator = RecordingGenerator::replying(Ok(RawResponse::from_parsed(json!({
        "items": [
            {"id": "t1", "text": "Who else is excited?", "estimates": null},
            {"id": "t2", "text": "Tell us your favourite", "estimates": null}
        ]
    }))));
    let list = run_buzz_generation(
        &generator,
        &buzz_input(json!({"total_mentions": 0, "total_likes": 0})),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(list.items.len(), 2);
    assert!(list.items.iter().all(|item| item.estimates.is_none()));
    let calls = generator.calls();
    assert!(calls[0].user_content.contains("Do not fabricate numbers"));
}

#[tokio::test]
async fn buzz_item_missing_estimates_key_is_rejected() {
    let generator = RecordingGenerator::replying(Ok(RawResponse::from_parsed(json!({
        "items": [{"id": "t1", "text": "hello"}]
    }))));
    let err = run_buzz_generation(&generator, &buzz_input(json!({})), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::SchemaValidation { .. }));
    assert!(err.detail().contains("items[0].estimates"));
}

#[tokio::test]
async fn buzz_unparseable_text_is_malformed_output() {
    let generator = RecordingGenerator::replying(Ok(RawResponse::from_text("Sure! Here are")));
    let err = run_buzz_generation(&generator, &buzz_input(json!({})), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::MalformedOutput(_)));
}

#[tokio::test]
async fn kol_recommendation_is_validated() {
    let generator = RecordingGenerator::replying(Ok(RawResponse::from_parsed(valid_kol())));
    let rec = run_kol_recommendation(&generator, &kol_input(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(rec.fit_score, 8);
    assert_eq!(rec.strengths.len(), 3);
    assert_eq!(rec.concerns.len(), 2);
}

#[tokio::test]
async fn kol_missing_concerns_is_rejected_by_name() {
    let mut output = valid_kol();
    output.as_object_mut().unwrap().remove("concerns");
    let generator = RecordingGenerator::replying(Ok(RawResponse::from_parsed(output)));
    let err = run_kol_recommendation(&generator, &kol_input(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.detail(), "concerns: required key missing");
}

#[tokio::test]
async fn kol_without_credential_makes_no_call() {
    let generator = RecordingGenerator::unconfigured();
    let err = run_kol_recommendation(&generator, &kol_input(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::MissingConfiguration(_)));
    assert!(generator.calls().is_empty());
}
