use serde_json::Value;

use crate::error::GenerationError;
use crate::schema::OutputSchema;

/// A fully assembled generation request.
///
/// Built fresh per pipeline run and never modified after assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instructions: String,
    pub user_content: String,
    pub output_schema: OutputSchema,
}

/// What the generation service handed back, before extraction.
///
/// `parsed` is the structured payload when the service already decoded it;
/// `text` is the raw message content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResponse {
    pub parsed: Option<Value>,
    pub text: Option<String>,
}

impl RawResponse {
    #[must_use]
    pub fn from_parsed(value: Value) -> Self {
        Self {
            parsed: Some(value),
            text: None,
        }
    }

    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parsed: None,
            text: Some(text.into()),
        }
    }

    /// Read the first choice of a chat-completions response body.
    ///
    /// A `refusal` on the message becomes [`GenerationError::Refused`]; a
    /// body without `choices[0].message` is [`GenerationError::InvalidResponse`].
    ///
    /// # Errors
    ///
    /// See above.
    pub fn from_chat_completion(body: &Value) -> Result<Self, GenerationError> {
        let message = body
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| {
                GenerationError::InvalidResponse("missing choices[0].message".to_string())
            })?;

        if let Some(refusal) = message.get("refusal").and_then(Value::as_str) {
            return Err(GenerationError::Refused(refusal.to_string()));
        }

        Ok(Self {
            parsed: message.get("parsed").filter(|v| !v.is_null()).cloned(),
            text: message
                .get("content")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}
