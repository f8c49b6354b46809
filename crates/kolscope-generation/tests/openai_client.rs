//! Integration tests for `OpenAiGenerator` using wiremock HTTP mocks.

use kolscope_core::GenerationConfig;
use kolscope_generation::{
    run_kol_recommendation, AnomalyAlert, GenerationError, GenerationRequest, GenerationService,
    KolInput, OpenAiGenerator, PipelineError, StructuredOutput,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> OpenAiGenerator {
    let config = GenerationConfig {
        api_key: Some("test-key".to_string()),
        base_url: "https://api.openai.com/v1".to_string(),
        model: "gpt-4o-mini".to_string(),
        timeout_secs: 5,
        temperature: 0.7,
    };
    OpenAiGenerator::with_base_url(&config, base_url).expect("client construction should not fail")
}

fn anomaly_request() -> GenerationRequest {
    GenerationRequest {
        system_instructions: "detect anomalies".to_string(),
        user_content: "kpi: [1, 2, 300]".to_string(),
        output_schema: AnomalyAlert::schema(),
    }
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content, "refusal": null},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn invoke_posts_schema_and_returns_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(bearer_token("test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "response_format": {
                "type": "json_schema",
                "json_schema": {"name": "anomaly_alert", "strict": true}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"has_anomaly": true, "alert_message": "Spike on day 3"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let raw = client
        .invoke(&anomaly_request(), &CancellationToken::new())
        .await
        .expect("invoke should succeed");

    assert_eq!(
        raw.text.as_deref(),
        Some(r#"{"has_anomaly": true, "alert_message": "Spike on day 3"}"#)
    );
    assert!(raw.parsed.is_none());
}

#[tokio::test]
async fn non_success_status_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .invoke(&anomaly_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        GenerationError::Status { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn refusal_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": null, "refusal": "no"}}]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .invoke(&anomaly_request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Refused(msg) if msg == "no"));
}

#[tokio::test]
async fn non_json_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .invoke(&anomaly_request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::InvalidResponse(_)));
}

#[tokio::test]
async fn kol_pipeline_rejects_output_missing_concerns() {
    let server = MockServer::start().await;

    let content = json!({
        "recommendation": "Worth a pilot",
        "fit_score": 7,
        "strengths": ["niche reach", "authentic tone", "high reply rate"]
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "response_format": {"json_schema": {"name": "kol_recommendation"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&content)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let input = KolInput::from_json(&json!({
        "kol_data": {"tweets": [{"id": "1", "text": "hands-on review", "likes": 12}]},
        "brand_goals": ["launch awareness"]
    }))
    .expect("valid input");

    let err = run_kol_recommendation(&client, &input, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::SchemaValidation { .. }));
    assert!(err.detail().contains("concerns"));
}
