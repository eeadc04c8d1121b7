//! Example: generating an article against MockBackend, no provider needed.
//!
//! Run with: `RUST_LOG=article_pipeline=debug cargo run --example mock_generation`

use std::sync::Arc;

use anyhow::Context;
use article_pipeline::{
    Event, FnEventHandler, GenerationOrchestrator, GeneratorOutcome, MockBackend,
    PublicationProfile, QuestionnaireData,
};
use tracing_subscriber::EnvFilter;

const ARTICLE: &str = "# Jane Doe: A profile Story

## Introduction
Jane grew up in rural Ohio.

## Key Achievements
- Built a $2M startup
- Hired a team of twelve

*This article was generated using AI technology for Tech Weekly.*";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // First call is rate limited, the retry succeeds
    let mock = MockBackend::new(vec![
        GeneratorOutcome::rate_limited(None),
        GeneratorOutcome::success(ARTICLE),
    ]);

    let orchestrator = GenerationOrchestrator::builder(Arc::new(mock))
        .event_handler(Arc::new(FnEventHandler(|event: Event| {
            println!("event: {:?}", event);
        })))
        .build();

    let mut q = QuestionnaireData::new("profile");
    q.name = Some("Jane Doe".into());
    q.background = Some("Grew up in rural Ohio".into());
    q.challenges = Some("Faced funding rejection twelve times".into());
    q.unique_perspective = Some("Combines AI with agriculture".into());
    q.highlights = Some("Built a $2M startup".into());
    q.aspirations = Some("Expand to three new markets".into());

    let publication = PublicationProfile::new("Tech Weekly").with_word_limit(800);
    let result = orchestrator
        .generate(&q, &publication)
        .await
        .context("questionnaire rejected")?;

    println!("source: {:?}", result.source);
    println!("attempts: {}", result.diagnostics.attempts);
    println!("{}", result.content);

    // Rejected questionnaires never reach the backend
    q.background = Some("spam".into());
    if let Err(err) = orchestrator.generate(&q, &publication).await {
        println!("rejected: {}", err);
    }

    Ok(())
}
