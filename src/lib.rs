//! # Article Pipeline
//!
//! Turns a creator's questionnaire into a publication-ready article.
//!
//! The crate covers the content side of a publishing marketplace: it checks
//! the questionnaire against publication guidelines, assembles the prompt
//! for an external text generator, retries through rate limits, and converts
//! the generator's markdown into styled HTML. When generation is not
//! available the caller still gets a complete article from a deterministic
//! local template.
//!
//! ## Core Concepts
//!
//! - **[`GuidelinePolicy`]** — pure validation gate. Returns
//!   [`ValidationOutcome::Pass`] or a rejection with a human-readable message.
//! - **[`PromptBuilder`]** — deterministic prompt text from the questionnaire
//!   and the [`PublicationProfile`].
//! - **[`Backend`]** — object-safe trait for the external generator. Answers
//!   with a [`GeneratorOutcome`]: success, rate limited, or failed.
//! - **[`GenerationOrchestrator`]** — runs the pipeline with exponential
//!   backoff on rate limits, a per-attempt timeout, and cancellation.
//! - **[`MarkdownToHtmlFormatter`]** — single-pass markdown subset to HTML.
//! - **[`FallbackComposer`]** — the template article used when generation
//!   fails.
//!
//! ## Quick Start
//!
//! ```no_run
//! use article_pipeline::{GeminiConfig, GenerationOrchestrator, PublicationProfile, QuestionnaireData};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = GenerationOrchestrator::gemini(GeminiConfig::from_env()?)?;
//!
//!     let mut q = QuestionnaireData::new("profile");
//!     q.name = Some("Jane Doe".into());
//!     q.background = Some("Grew up in rural Ohio".into());
//!     q.challenges = Some("Faced funding rejection twelve times".into());
//!     q.unique_perspective = Some("Combines AI with agriculture".into());
//!     q.highlights = Some("Built a $2M startup".into());
//!     q.aspirations = Some("Expand to three new markets".into());
//!
//!     let publication = PublicationProfile::new("Tech Weekly").with_word_limit(800);
//!     let result = orchestrator.generate(&q, &publication).await?;
//!     if result.is_fallback() {
//!         eprintln!("fallback used: {:?}", result.diagnostics.fallback_reason);
//!     }
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod fallback;
pub mod formatter;
pub mod guidelines;
pub mod orchestrator;
pub mod prompt;
pub mod types;

pub use backend::{
    Backend, BackoffConfig, GeminiBackend, GeminiConfig, GenerationRequest, GeneratorOutcome,
    JitterStrategy, MockBackend, SamplingConfig,
};
pub use diagnostics::{FallbackReason, GenerationDiagnostics};
pub use error::{PipelineError, Result, ValidationError};
pub use events::{Event, EventHandler, FnEventHandler};
pub use fallback::{FallbackComposer, LengthDirectives};
pub use formatter::{FormattedArticle, HtmlStyles, MarkdownToHtmlFormatter};
pub use guidelines::{GuidelinePolicy, Rejection, RejectionRule, ValidationOutcome};
pub use orchestrator::{GenerationOrchestrator, GenerationOrchestratorBuilder};
pub use prompt::PromptBuilder;
pub use types::{
    ContentSource, GenerationResult, PublicationProfile, QuestionnaireData, StoryType,
};
