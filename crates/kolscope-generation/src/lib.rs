//! Structured generation for KOLScope.
//!
//! Assembles constrained generation requests from recomputed analytics,
//! sends them through the [`GenerationService`] port, and validates what
//! comes back against a strict per-call-site schema.

pub mod client;
pub mod context;
pub mod error;
pub mod extract;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod schema;
pub mod types;

pub use client::{GenerationService, OpenAiGenerator};
pub use context::{
    build_anomaly_request, build_buzz_request, build_kol_request, BuzzContext, KolContext,
};
pub use error::{GenerationError, PipelineError};
pub use extract::{decode_validated, extract, Extracted};
pub use input::{AnomalyInput, BuzzInput, KolInput, DEFAULT_KOL_WINDOW_DAYS};
pub use output::{
    AnomalyAlert, BuzzEstimates, BuzzTweet, BuzzTweetList, KolRecommendation, OutputKind,
    StructuredOutput,
};
pub use pipeline::{run_anomaly_detection, run_buzz_generation, run_kol_recommendation};
pub use schema::{Field, FieldKind, ObjectSchema, OutputSchema};
pub use types::{GenerationRequest, RawResponse};
