//! Article generation orchestrator.
//!
//! [`GenerationOrchestrator`] runs the whole pipeline for one request:
//! guideline validation, prompt assembly, the external call with
//! rate-limit backoff, and then either HTML formatting of the generator's
//! output or the deterministic fallback article.
//!
//! Once validation passes, `generate` always returns content. With the
//! default configuration the worst case is 3 attempts of up to 30s each
//! plus three backoff waits of at most 8s each (about 104s). `Retry-After`
//! hints longer than [`BackoffConfig::max_retry_after`] end the attempt loop
//! early rather than stretch that bound.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::Instrument;

use crate::backend::{
    Backend, BackoffConfig, GeminiBackend, GeminiConfig, GenerationRequest, GeneratorOutcome,
    SamplingConfig,
};
use crate::diagnostics::{FallbackReason, GenerationDiagnostics};
use crate::error::{Result, ValidationError};
use crate::events::{emit, Event, EventHandler};
use crate::fallback::FallbackComposer;
use crate::formatter::MarkdownToHtmlFormatter;
use crate::guidelines::GuidelinePolicy;
use crate::prompt::PromptBuilder;
use crate::types::{ContentSource, GenerationResult, PublicationProfile, QuestionnaireData};

/// Default time budget for a single external call.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the article pipeline.
///
/// Cheap to share: wrap it in an `Arc` and call [`generate`](Self::generate)
/// from as many tasks as needed. Requests share no mutable state.
///
/// # Example
///
/// ```
/// use article_pipeline::{GenerationOrchestrator, PublicationProfile, QuestionnaireData};
/// use article_pipeline::backend::MockBackend;
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let backend = Arc::new(MockBackend::fixed("# Jane\n## Introduction\nHello"));
/// let orchestrator = GenerationOrchestrator::builder(backend).build();
///
/// let mut q = QuestionnaireData::new("profile");
/// q.background = Some("Grew up in rural Ohio".into());
/// q.challenges = Some("Faced funding rejection twelve times".into());
/// q.unique_perspective = Some("Combines AI with agriculture".into());
/// q.highlights = Some("Built a $2M startup".into());
/// q.aspirations = Some("Expand to three new markets".into());
///
/// let result = orchestrator
///     .generate(&q, &PublicationProfile::new("Tech Weekly"))
///     .await
///     .unwrap();
/// assert!(!result.is_fallback());
/// # });
/// ```
pub struct GenerationOrchestrator {
    backend: Arc<dyn Backend>,
    policy: GuidelinePolicy,
    prompts: PromptBuilder,
    formatter: MarkdownToHtmlFormatter,
    fallback: FallbackComposer,
    backoff: BackoffConfig,
    attempt_timeout: Duration,
    sampling: SamplingConfig,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl GenerationOrchestrator {
    /// Create a builder around the given backend.
    pub fn builder(backend: Arc<dyn Backend>) -> GenerationOrchestratorBuilder {
        GenerationOrchestratorBuilder {
            backend,
            backoff: None,
            attempt_timeout: None,
            formatter: None,
            sampling: SamplingConfig::default(),
            event_handler: None,
        }
    }

    /// Orchestrator backed by Gemini with default settings.
    ///
    /// Fails immediately when the configuration is unusable.
    pub fn gemini(config: GeminiConfig) -> Result<Self> {
        let backend = GeminiBackend::new(config)?;
        Ok(Self::builder(Arc::new(backend)).build())
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn backoff(&self) -> &BackoffConfig {
        &self.backoff
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Generate an article.
    ///
    /// Returns `Err` only when the questionnaire fails the guideline gate;
    /// in that case the backend is never called.
    pub async fn generate(
        &self,
        questionnaire: &QuestionnaireData,
        publication: &PublicationProfile,
    ) -> std::result::Result<GenerationResult, ValidationError> {
        self.run(questionnaire, publication, None).await
    }

    /// Like [`generate`](Self::generate), but aborts the in-flight attempt or
    /// backoff wait and returns the fallback article as soon as `cancel`
    /// turns `true`.
    pub async fn generate_with_cancel(
        &self,
        questionnaire: &QuestionnaireData,
        publication: &PublicationProfile,
        cancel: watch::Receiver<bool>,
    ) -> std::result::Result<GenerationResult, ValidationError> {
        self.run(questionnaire, publication, Some(cancel)).await
    }

    async fn run(
        &self,
        q: &QuestionnaireData,
        publication: &PublicationProfile,
        mut cancel: Option<watch::Receiver<bool>>,
    ) -> std::result::Result<GenerationResult, ValidationError> {
        let span = tracing::info_span!(
            "generate_article",
            story_type = %q.story_type,
            backend = self.backend.name(),
        );

        async move {
            if let Err(err) = self.policy.validate(q, publication).into_result() {
                tracing::info!(rule = ?err.rule, "questionnaire rejected by publication guidelines");
                emit(
                    &self.event_handler,
                    Event::ValidationRejected {
                        message: err.message.clone(),
                    },
                );
                return Err(err);
            }

            tracing::info!(
                max_attempts = self.backoff.max_attempts,
                "questionnaire accepted, generating article"
            );
            let request = GenerationRequest {
                prompt: self.prompts.build(q, publication),
                sampling: self.sampling.clone(),
            };

            let mut diag = GenerationDiagnostics::default();
            let generated = match self.call_with_backoff(&request, &mut cancel, &mut diag).await {
                Ok(text) => {
                    let formatted = self.formatter.format(&text);
                    diag.dropped_lines = formatted.dropped_lines;
                    if formatted.html.is_empty() {
                        Err(FallbackReason::EmptyResponse)
                    } else {
                        Ok(formatted.html)
                    }
                }
                Err(reason) => Err(reason),
            };

            let result = match generated {
                Ok(html) => {
                    if diag.dropped_lines > 0 {
                        tracing::debug!(dropped = diag.dropped_lines, "formatter dropped generator lines");
                    }
                    tracing::info!(attempts = diag.attempts, "article generated");
                    emit(
                        &self.event_handler,
                        Event::Generated {
                            attempts: diag.attempts,
                            dropped_lines: diag.dropped_lines,
                        },
                    );
                    GenerationResult {
                        content: html,
                        source: ContentSource::Generated,
                        diagnostics: diag,
                    }
                }
                Err(reason) => {
                    tracing::warn!(
                        %reason,
                        attempts = diag.attempts,
                        "generation unavailable, using fallback article"
                    );
                    emit(
                        &self.event_handler,
                        Event::FallbackUsed {
                            reason: reason.clone(),
                        },
                    );
                    diag.fallback_reason = Some(reason);
                    GenerationResult {
                        content: self.fallback.compose(q, publication),
                        source: ContentSource::Fallback,
                        diagnostics: diag,
                    }
                }
            };
            Ok(result)
        }
        .instrument(span)
        .await
    }

    /// Call the backend until it yields text, fails permanently, or the
    /// attempt budget is spent on rate limits.
    async fn call_with_backoff(
        &self,
        request: &GenerationRequest,
        cancel: &mut Option<watch::Receiver<bool>>,
        diag: &mut GenerationDiagnostics,
    ) -> std::result::Result<String, FallbackReason> {
        let max_attempts = self.backoff.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            if is_cancelled(cancel) {
                return Err(FallbackReason::Cancelled);
            }

            diag.attempts = attempt;
            emit(
                &self.event_handler,
                Event::AttemptStart {
                    attempt,
                    backend: self.backend.name(),
                },
            );

            let call = tokio::time::timeout(self.attempt_timeout, self.backend.generate(request));
            let outcome = tokio::select! {
                res = call => res,
                _ = cancelled(cancel) => return Err(FallbackReason::Cancelled),
            };

            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(_) => {
                    self.attempt_failed(attempt, "attempt timed out");
                    return Err(FallbackReason::Timeout);
                }
            };

            match outcome {
                GeneratorOutcome::Success { text } if text.trim().is_empty() => {
                    self.attempt_failed(attempt, "empty response");
                    return Err(FallbackReason::EmptyResponse);
                }
                GeneratorOutcome::Success { text } => return Ok(text),
                GeneratorOutcome::RateLimited { retry_after } => {
                    diag.rate_limited += 1;
                    let Some(delay) = self.backoff.wait_after(attempt, retry_after) else {
                        tracing::warn!(
                            attempt,
                            retry_after = ?retry_after,
                            "provider asked for a longer wait than the backoff allows"
                        );
                        return Err(FallbackReason::RateLimitExhausted);
                    };
                    let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms,
                        "rate limit hit, waiting before retry"
                    );
                    emit(
                        &self.event_handler,
                        Event::RateLimited {
                            attempt,
                            delay_ms,
                            from_retry_after: retry_after.is_some()
                                && self.backoff.respect_retry_after,
                        },
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = cancelled(cancel) => return Err(FallbackReason::Cancelled),
                    }
                    diag.backoff_total_ms = diag.backoff_total_ms.saturating_add(delay_ms);
                }
                GeneratorOutcome::Failed { reason } => {
                    self.attempt_failed(attempt, &reason);
                    return Err(FallbackReason::GeneratorFailed(reason));
                }
            }
        }

        Err(FallbackReason::RateLimitExhausted)
    }

    fn attempt_failed(&self, attempt: u32, reason: &str) {
        tracing::warn!(attempt, reason, "generation attempt failed, not retrying");
        emit(
            &self.event_handler,
            Event::AttemptFailed {
                attempt,
                reason: reason.to_string(),
            },
        );
    }
}

impl std::fmt::Debug for GenerationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationOrchestrator")
            .field("backend", &self.backend.name())
            .field("backoff", &self.backoff)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("sampling", &self.sampling)
            .field("has_event_handler", &self.event_handler.is_some())
            .finish()
    }
}

fn is_cancelled(cancel: &Option<watch::Receiver<bool>>) -> bool {
    cancel.as_ref().is_some_and(|rx| *rx.borrow())
}

/// Resolves once cancellation is signalled. Pending forever when there is
/// no signal or its sender is gone.
async fn cancelled(cancel: &mut Option<watch::Receiver<bool>>) {
    if let Some(rx) = cancel {
        if rx.wait_for(|flag| *flag).await.is_ok() {
            return;
        }
    }
    std::future::pending::<()>().await
}

/// Builder for [`GenerationOrchestrator`].
pub struct GenerationOrchestratorBuilder {
    backend: Arc<dyn Backend>,
    backoff: Option<BackoffConfig>,
    attempt_timeout: Option<Duration>,
    formatter: Option<MarkdownToHtmlFormatter>,
    sampling: SamplingConfig,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl GenerationOrchestratorBuilder {
    /// Set the rate-limit backoff policy. Default: [`BackoffConfig::standard()`].
    pub fn backoff(mut self, config: BackoffConfig) -> Self {
        self.backoff = Some(config);
        self
    }

    /// Set the per-attempt timeout. Default: 30 seconds.
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Use a formatter with custom styles.
    pub fn formatter(mut self, formatter: MarkdownToHtmlFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Sampling settings forwarded with every request.
    pub fn sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Set the event handler.
    pub fn event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the orchestrator.
    pub fn build(self) -> GenerationOrchestrator {
        GenerationOrchestrator {
            backend: self.backend,
            policy: GuidelinePolicy::new(),
            prompts: PromptBuilder::new(),
            formatter: self.formatter.unwrap_or_default(),
            fallback: FallbackComposer::new(),
            backoff: self.backoff.unwrap_or_else(BackoffConfig::standard),
            attempt_timeout: self.attempt_timeout.unwrap_or(DEFAULT_ATTEMPT_TIMEOUT),
            sampling: self.sampling,
            event_handler: self.event_handler,
        }
    }
}
