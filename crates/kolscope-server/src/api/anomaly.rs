use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use kolscope_generation::{run_anomaly_detection, AnomalyAlert, AnomalyInput};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::RequestId;

use super::{json_body, map_pipeline_error, ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnomalyResponse {
    pub has_anomaly: bool,
    pub alert_message: String,
}

impl From<AnomalyAlert> for AnomalyResponse {
    fn from(alert: AnomalyAlert) -> Self {
        Self {
            has_anomaly: alert.has_anomaly,
            alert_message: alert.alert_message,
        }
    }
}

pub(super) async fn detect_anomaly(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AnomalyResponse>, ApiError> {
    let body = json_body(body)?;
    let input = AnomalyInput::from_json(&body)
        .map_err(|e| map_pipeline_error(&req_id.0, "anomaly", e))?;

    let cancel = state.shutdown.child_token();
    let alert = run_anomaly_detection(state.generator.as_ref(), &input, &cancel)
        .await
        .map_err(|e| map_pipeline_error(&req_id.0, "anomaly", e))?;

    Ok(Json(alert.into()))
}
