//! Backend trait and normalized request/outcome types.
//!
//! The [`Backend`] trait abstracts over text-generation providers. Each call
//! resolves to a [`GeneratorOutcome`], which the orchestrator matches
//! exhaustively to decide between formatting, waiting and retrying, or
//! falling back.
//!
//! ## Architecture
//!
//! ```text
//! GenerationOrchestrator ──► GenerationRequest ──► Backend::generate() ──► GeneratorOutcome
//!                                                        │
//!                                          ┌─────────────┴─────────────┐
//!                                    GeminiBackend                MockBackend
//!                            /models/{model}:generateContent     scripted outcomes
//! ```

pub mod backoff;
pub mod gemini;
pub mod mock;

pub use backoff::{BackoffConfig, JitterStrategy};
pub use gemini::{GeminiBackend, GeminiConfig};
pub use mock::MockBackend;

use crate::PipelineError;
use async_trait::async_trait;
use std::time::Duration;

/// Sampling knobs forwarded to the provider. `None` leaves the provider default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplingConfig {
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
}

impl SamplingConfig {
    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.max_output_tokens.is_none()
    }
}

/// A normalized generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub sampling: SamplingConfig,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            sampling: SamplingConfig::default(),
        }
    }
}

/// How a single generation call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorOutcome {
    /// The provider returned text. It may still be empty.
    Success { text: String },
    /// The provider asked us to slow down (HTTP 429 or equivalent).
    RateLimited { retry_after: Option<Duration> },
    /// Any other failure. Never retried.
    Failed { reason: String },
}

impl GeneratorOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        GeneratorOutcome::Success { text: text.into() }
    }

    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        GeneratorOutcome::RateLimited { retry_after }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        GeneratorOutcome::Failed {
            reason: reason.into(),
        }
    }
}

impl From<PipelineError> for GeneratorOutcome {
    /// HTTP 429 becomes [`GeneratorOutcome::RateLimited`]; everything else is
    /// a permanent failure.
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::HttpError {
                status: 429,
                retry_after,
                ..
            } => GeneratorOutcome::RateLimited { retry_after },
            other => GeneratorOutcome::Failed {
                reason: other.to_string(),
            },
        }
    }
}

/// Abstraction over text-generation providers.
///
/// Implementations own their configuration (credentials, endpoint, HTTP
/// client) and must not panic; every failure is reported as a
/// [`GeneratorOutcome`].
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn Backend>`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Run one generation call.
    async fn generate(&self, request: &GenerationRequest) -> GeneratorOutcome;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_429_maps_to_rate_limited() {
        let err = PipelineError::HttpError {
            status: 429,
            body: "rate limited".into(),
            retry_after: Some(Duration::from_secs(5)),
        };
        assert_eq!(
            GeneratorOutcome::from(err),
            GeneratorOutcome::rate_limited(Some(Duration::from_secs(5)))
        );
    }

    #[test]
    fn test_503_is_not_retried() {
        let err = PipelineError::HttpError {
            status: 503,
            body: "service unavailable".into(),
            retry_after: None,
        };
        assert!(matches!(GeneratorOutcome::from(err), GeneratorOutcome::Failed { .. }));
    }

    #[test]
    fn test_other_errors_fail_with_reason() {
        let outcome = GeneratorOutcome::from(PipelineError::EmptyResponse);
        assert_eq!(
            outcome,
            GeneratorOutcome::failed("generator returned an empty response")
        );
    }

    #[test]
    fn test_sampling_config_builders() {
        assert!(SamplingConfig::default().is_empty());
        let s = SamplingConfig::default()
            .with_temperature(0.4)
            .with_max_output_tokens(1024);
        assert_eq!(s.temperature, Some(0.4));
        assert_eq!(s.max_output_tokens, Some(1024));
    }
}
