use std::time::Duration;
use thiserror::Error;

use crate::guidelines::RejectionRule;

/// Errors produced by backends and by orchestrator construction.
///
/// None of these reach the caller of
/// [`GenerationOrchestrator::generate`](crate::GenerationOrchestrator::generate);
/// generation failures are absorbed into the fallback path.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Low-level HTTP transport failure (connection refused, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed at the serde level.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error with status code, response body, and optional Retry-After hint.
    ///
    /// The `retry_after` field is populated from the `Retry-After` response
    /// header when present.
    #[error("HTTP {status}: {body}")]
    HttpError {
        /// HTTP status code (e.g. 429, 500, 503).
        status: u16,
        /// Response body text.
        body: String,
        /// Parsed `Retry-After` header value, if present.
        retry_after: Option<Duration>,
    },

    /// A generation attempt exceeded its time budget.
    #[error("generation attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The request was cancelled by the caller.
    #[error("generation was cancelled")]
    Cancelled,

    /// The provider answered successfully but returned no usable text.
    #[error("generator returned an empty response")]
    EmptyResponse,

    /// Invalid configuration detected at construction time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// A questionnaire was rejected by the publication guidelines.
///
/// This is the only error [`generate`](crate::GenerationOrchestrator::generate)
/// ever returns. The message is meant to be shown to the submitter as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// Which guideline rule failed first.
    pub rule: RejectionRule,
    /// Human-readable, actionable rejection message.
    pub message: String,
}
