//! Two-path extraction of structured output, then schema validation.

use serde_json::Value;

use crate::error::PipelineError;
use crate::output::StructuredOutput;
use crate::types::RawResponse;

/// Result of looking for structured content in a [`RawResponse`].
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    /// The service already produced a structured payload.
    Parsed(Value),
    /// Only raw text is available; it still has to be parsed.
    RawText(String),
    Missing,
}

/// Prefer the structured payload, fall back to non-blank raw text.
#[must_use]
pub fn extract(raw: &RawResponse) -> Extracted {
    if let Some(value) = &raw.parsed {
        return Extracted::Parsed(value.clone());
    }
    match raw.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Extracted::RawText(text.to_string()),
        _ => Extracted::Missing,
    }
}

/// Extract, validate and decode a response into `T`.
///
/// # Errors
///
/// - [`PipelineError::MalformedOutput`] when nothing was extracted or the
///   raw text is not JSON.
/// - [`PipelineError::SchemaValidation`] listing every violated constraint.
pub fn decode_validated<T: StructuredOutput>(raw: &RawResponse) -> Result<T, PipelineError> {
    let schema = T::schema();
    let value = match extract(raw) {
        Extracted::Parsed(value) => value,
        Extracted::RawText(text) => serde_json::from_str::<Value>(&text).map_err(|e| {
            PipelineError::MalformedOutput(format!("response text is not valid JSON: {e}"))
        })?,
        Extracted::Missing => {
            return Err(PipelineError::MalformedOutput(
                "response carried neither a parsed payload nor text".to_string(),
            ))
        }
    };

    if let Err(violations) = schema.validate(&value) {
        tracing::warn!(
            schema = schema.name,
            violations = violations.len(),
            "generated output failed schema validation"
        );
        return Err(PipelineError::SchemaValidation {
            schema: schema.name,
            violations,
        });
    }

    serde_json::from_value(value).map_err(|e| {
        PipelineError::MalformedOutput(format!("validated output could not be decoded: {e}"))
    })
}
