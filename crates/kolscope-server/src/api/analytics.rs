use axum::{extract::rejection::JsonRejection, Extension, Json};
use kolscope_analytics::{recompute_analytics, RecomputedAnalytics};
use serde_json::Value;

use crate::middleware::RequestId;

use super::{json_body, ApiError};

pub(super) async fn recompute(
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RecomputedAnalytics>, ApiError> {
    let body = json_body(body)?;
    if !body.is_object() {
        return Err(ApiError::bad_request("request body must be a JSON object"));
    }

    let result = recompute_analytics(&body);
    tracing::info!(
        request_id = %req_id.0,
        kept = result.tweets.len(),
        retweets_excluded = result.retweets_excluded,
        "recomputed analytics"
    );
    Ok(Json(result))
}
