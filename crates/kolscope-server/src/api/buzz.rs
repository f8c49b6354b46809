use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use kolscope_generation::{run_buzz_generation, BuzzEstimates, BuzzInput, BuzzTweet};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::RequestId;

use super::{json_body, map_pipeline_error, ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct BuzzResponse {
    pub items: Vec<BuzzItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct BuzzItem {
    pub id: String,
    pub text: String,
    /// Serialized as `null`, never omitted.
    pub estimates: Option<BuzzEstimatesItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct BuzzEstimatesItem {
    pub mentions: i64,
    pub likes: i64,
    pub retweets: i64,
}

impl From<BuzzEstimates> for BuzzEstimatesItem {
    fn from(e: BuzzEstimates) -> Self {
        Self {
            mentions: e.mentions,
            likes: e.likes,
            retweets: e.retweets,
        }
    }
}

impl From<BuzzTweet> for BuzzItem {
    fn from(tweet: BuzzTweet) -> Self {
        Self {
            id: tweet.id,
            text: tweet.text,
            estimates: tweet.estimates.map(Into::into),
        }
    }
}

pub(super) async fn generate_buzz(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BuzzResponse>, ApiError> {
    let body = json_body(body)?;
    let input =
        BuzzInput::from_json(&body).map_err(|e| map_pipeline_error(&req_id.0, "buzz", e))?;

    let cancel = state.shutdown.child_token();
    let list = run_buzz_generation(state.generator.as_ref(), &input, &cancel)
        .await
        .map_err(|e| map_pipeline_error(&req_id.0, "buzz", e))?;

    Ok(Json(BuzzResponse {
        items: list.items.into_iter().map(BuzzItem::from).collect(),
    }))
}
