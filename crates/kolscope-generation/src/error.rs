use thiserror::Error;

/// Errors raised by a generation service implementation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("generation service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The service declined to produce structured output.
    #[error("generation service refused the request: {0}")]
    Refused(String),

    /// The response envelope did not have the expected shape.
    #[error("unexpected generation response: {0}")]
    InvalidResponse(String),

    /// No credential is configured for the service.
    #[error("generation service credential is not configured")]
    MissingCredential,

    /// The in-flight call was cancelled by the caller.
    #[error("generation request was cancelled")]
    Cancelled,
}

/// Failures surfaced by the analytics pipelines.
///
/// Every variant maps onto one status class at the HTTP boundary:
/// `InvalidInput` is a client error, everything else a server error.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required request field is missing or malformed. No external call was made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required credential or setting is absent. No external call was made.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// The generation call itself failed.
    #[error("generation request failed: {0}")]
    UpstreamGeneration(#[from] GenerationError),

    /// Nothing could be extracted from the response, or its text was not JSON.
    #[error("generated output is malformed: {0}")]
    MalformedOutput(String),

    /// The extracted output does not satisfy the declared schema.
    #[error("generated output failed {schema} schema validation: {}", .violations.join("; "))]
    SchemaValidation {
        schema: &'static str,
        violations: Vec<String>,
    },
}

impl PipelineError {
    /// True for caller mistakes (the 400 class).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Human-readable detail without the variant prefix.
    ///
    /// Schema failures join every individual violation with `"; "`.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidInput(msg)
            | Self::MissingConfiguration(msg)
            | Self::MalformedOutput(msg) => msg.clone(),
            Self::UpstreamGeneration(e) => e.to_string(),
            Self::SchemaValidation { violations, .. } => violations.join("; "),
        }
    }
}
