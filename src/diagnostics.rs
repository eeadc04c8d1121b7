//! Per-result telemetry.
//!
//! [`GenerationDiagnostics`] records what happened while producing a
//! [`GenerationResult`](crate::GenerationResult): how many external attempts
//! were made, how long was spent waiting on rate limits, how many generator
//! lines the formatter dropped, and why the fallback was used, if it was.

use serde::{Deserialize, Serialize};

/// Why the orchestrator fell back to the local composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum FallbackReason {
    /// Every attempt was rate limited.
    RateLimitExhausted,
    /// The provider failed with a non-retryable error.
    GeneratorFailed(String),
    /// An attempt exceeded its time budget.
    Timeout,
    /// The provider answered with blank text.
    EmptyResponse,
    /// The caller cancelled the request.
    Cancelled,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::RateLimitExhausted => f.write_str("rate limit retries exhausted"),
            FallbackReason::GeneratorFailed(reason) => write!(f, "generator failed: {}", reason),
            FallbackReason::Timeout => f.write_str("generation attempt timed out"),
            FallbackReason::EmptyResponse => f.write_str("generator returned empty text"),
            FallbackReason::Cancelled => f.write_str("request cancelled"),
        }
    }
}

/// Records what happened while generating one article.
///
/// # Example
///
/// ```
/// use article_pipeline::diagnostics::GenerationDiagnostics;
///
/// let diag = GenerationDiagnostics::default();
/// assert!(diag.generated());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationDiagnostics {
    /// External calls made (0 when cancelled before the first one).
    pub attempts: u32,

    /// How many of those calls were rate limited.
    pub rate_limited: u32,

    /// Total time spent in backoff waits (milliseconds).
    pub backoff_total_ms: u64,

    /// Generator lines the formatter could not place.
    pub dropped_lines: usize,

    /// Set when the content came from the fallback composer.
    pub fallback_reason: Option<FallbackReason>,
}

impl GenerationDiagnostics {
    /// Quick check: did the external generator produce the content?
    pub fn generated(&self) -> bool {
        self.fallback_reason.is_none()
    }
}
