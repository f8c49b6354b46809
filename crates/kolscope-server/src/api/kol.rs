use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use kolscope_generation::{run_kol_recommendation, KolInput, KolRecommendation};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::RequestId;

use super::{json_body, map_pipeline_error, ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct KolRecommendationResponse {
    pub recommendation: String,
    pub fit_score: i64,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
}

impl From<KolRecommendation> for KolRecommendationResponse {
    fn from(rec: KolRecommendation) -> Self {
        Self {
            recommendation: rec.recommendation,
            fit_score: rec.fit_score,
            strengths: rec.strengths,
            concerns: rec.concerns,
        }
    }
}

pub(super) async fn recommend_kol(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<KolRecommendationResponse>, ApiError> {
    let body = json_body(body)?;
    let input =
        KolInput::from_json(&body).map_err(|e| map_pipeline_error(&req_id.0, "kol", e))?;

    let cancel = state.shutdown.child_token();
    let recommendation = run_kol_recommendation(state.generator.as_ref(), &input, &cancel)
        .await
        .map_err(|e| map_pipeline_error(&req_id.0, "kol", e))?;

    Ok(Json(recommendation.into()))
}
