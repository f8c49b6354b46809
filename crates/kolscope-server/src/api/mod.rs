mod analytics;
mod anomaly;
mod buzz;
mod kol;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use kolscope_generation::{GenerationService, PipelineError};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn GenerationService>,
    /// Root token cancelled on shutdown; each request runs on a child.
    pub shutdown: CancellationToken,
}

/// Failure envelope: `{ "error": ..., "detail": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    code: &'static str,
    pub error: String,
    pub detail: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    generation: &'static str,
    timestamp: DateTime<Utc>,
}

impl ApiError {
    pub fn new(
        code: &'static str,
        error: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            code,
            error: error.into(),
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new("bad_request", "invalid request", detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code {
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let error = match &err {
            PipelineError::InvalidInput(_) => return Self::bad_request(err.detail()),
            PipelineError::MissingConfiguration(_) => "generation service is not configured",
            PipelineError::UpstreamGeneration(_) => "generation request failed",
            PipelineError::MalformedOutput(_) => "generated output is malformed",
            PipelineError::SchemaValidation { .. } => "generated output failed schema validation",
        };
        Self::new("internal_error", error, err.detail())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Unwrap a JSON body, turning extractor rejections into 400 envelopes.
pub(super) fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value).map_err(ApiError::from)
}

/// Log a pipeline failure at the level its status class deserves.
pub(super) fn map_pipeline_error(request_id: &str, endpoint: &'static str, err: PipelineError) -> ApiError {
    if err.is_client_error() {
        tracing::info!(request_id, endpoint, error = %err, "rejected invalid request");
    } else {
        tracing::error!(request_id, endpoint, error = %err, "pipeline failed");
    }
    ApiError::from(err)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/anomaly", post(anomaly::detect_anomaly))
        .route("/api/v1/buzz", post(buzz::generate_buzz))
        .route("/api/v1/kol/recommendation", post(kol::recommend_kol))
        .route(
            "/api/v1/analytics/recompute",
            post(analytics::recompute),
        )
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let generation = if state.generator.is_configured() {
        "configured"
    } else {
        "unconfigured"
    };

    Json(HealthData {
        status: "ok",
        generation,
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
