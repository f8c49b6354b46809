//! Generation service port and its OpenAI-compatible HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use kolscope_core::GenerationConfig;
use reqwest::Client;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::error::GenerationError;
use crate::types::{GenerationRequest, RawResponse};

/// Port to the external text-generation service.
///
/// Called at most once per pipeline run and never retried.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Whether a credential is available. Pipelines check this before
    /// invoking so a missing key never reaches the network.
    fn is_configured(&self) -> bool {
        true
    }

    async fn invoke(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<RawResponse, GenerationError>;
}

/// Client for an OpenAI-compatible `chat/completions` endpoint.
///
/// Use [`OpenAiGenerator::new`] for the configured endpoint or
/// [`OpenAiGenerator::with_base_url`] to point at a mock server in tests.
pub struct OpenAiGenerator {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAiGenerator {
    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        Self::with_base_url(config, &config.base_url)
    }

    /// Same as [`OpenAiGenerator::new`] with `base_url` overriding the
    /// configured one.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        config: &GenerationConfig,
        base_url: &str,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("kolscope/0.1 (analytics-generation)")
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body(&self, request: &GenerationRequest) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": request.output_schema.name,
                    "strict": true,
                    "schema": request.output_schema.to_json_schema(),
                }
            },
            "messages": [
                { "role": "system", "content": request.system_instructions },
                { "role": "user", "content": request.user_content }
            ]
        })
    }

    async fn send(&self, api_key: &str, body: &Value) -> Result<RawResponse, GenerationError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).map_err(|e| {
            GenerationError::InvalidResponse(format!("response body is not JSON: {e}"))
        })?;
        RawResponse::from_chat_completion(&body)
    }
}

#[async_trait]
impl GenerationService for OpenAiGenerator {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn invoke(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<RawResponse, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;
        let body = self.request_body(request);

        tracing::debug!(
            model = %self.model,
            schema = request.output_schema.name,
            "invoking generation service"
        );

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(GenerationError::Cancelled),
            result = self.send(api_key, &body) => result,
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
