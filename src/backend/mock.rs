//! Mock backend for testing without a live provider.
//!
//! [`MockBackend`] returns pre-configured outcomes in order and records
//! every prompt it receives, so tests can assert how many external calls
//! the orchestrator made.
//!
//! # Example
//!
//! ```
//! use article_pipeline::backend::{GeneratorOutcome, MockBackend};
//!
//! let mock = MockBackend::new(vec![
//!     GeneratorOutcome::rate_limited(None),
//!     GeneratorOutcome::success("# Title"),
//! ]);
//! assert_eq!(mock.calls(), 0);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{Backend, GenerationRequest, GeneratorOutcome};

/// A test backend that returns canned outcomes in order.
///
/// Cycles back to the beginning when all outcomes have been consumed.
#[derive(Debug)]
pub struct MockBackend {
    outcomes: Vec<GeneratorOutcome>,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    latency: Option<Duration>,
}

impl MockBackend {
    /// Create a mock backend with the given canned outcomes.
    ///
    /// An empty list behaves like a provider that always fails.
    pub fn new(outcomes: Vec<GeneratorOutcome>) -> Self {
        Self {
            outcomes,
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            latency: None,
        }
    }

    /// Create a mock that always returns the same text.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::new(vec![GeneratorOutcome::success(text)])
    }

    /// Create a mock that always answers with the same outcome.
    pub fn always(outcome: GeneratorOutcome) -> Self {
        Self::new(vec![outcome])
    }

    /// Sleep this long (on the tokio clock) before answering each call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    fn next_outcome(&self) -> GeneratorOutcome {
        let idx = self.index.fetch_add(1, Ordering::SeqCst);
        if self.outcomes.is_empty() {
            return GeneratorOutcome::failed("mock backend has no scripted outcomes");
        }
        self.outcomes[idx % self.outcomes.len()].clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn generate(&self, request: &GenerationRequest) -> GeneratorOutcome {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt.clone());
        }
        let outcome = self.next_outcome();
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        outcome
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fixed_response() {
        let mock = MockBackend::fixed("Hello!");
        let outcome = mock.generate(&GenerationRequest::new("prompt")).await;
        assert_eq!(outcome, GeneratorOutcome::success("Hello!"));
        assert_eq!(mock.calls(), 1);
        assert_eq!(mock.prompts(), vec!["prompt".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_cycles_outcomes() {
        let mock = MockBackend::new(vec![
            GeneratorOutcome::rate_limited(None),
            GeneratorOutcome::success("second"),
        ]);
        let request = GenerationRequest::new("p");
        let r1 = mock.generate(&request).await;
        let r2 = mock.generate(&request).await;
        let r3 = mock.generate(&request).await;
        assert_eq!(r1, GeneratorOutcome::rate_limited(None));
        assert_eq!(r2, GeneratorOutcome::success("second"));
        assert_eq!(r3, GeneratorOutcome::rate_limited(None)); // cycles
        assert_eq!(mock.calls(), 3);
    }

    #[test]
    fn test_mock_empty_script_fails() {
        let mock = MockBackend::new(Vec::new());
        let outcome = tokio_test::block_on(mock.generate(&GenerationRequest::new("p")));
        assert!(matches!(outcome, GeneratorOutcome::Failed { .. }));
        assert_eq!(mock.name(), "mock");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_latency_uses_tokio_clock() {
        let mock = MockBackend::fixed("slow").with_latency(Duration::from_secs(45));
        let start = tokio::time::Instant::now();
        let _ = mock.generate(&GenerationRequest::new("p")).await;
        assert_eq!(start.elapsed(), Duration::from_secs(45));
    }
}
