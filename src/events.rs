//! Event system for generation lifecycle hooks.
//!
//! Provides an optional, non-intrusive way to observe the orchestrator.
//! Users can implement [`EventHandler`] to receive these events for
//! metrics, audit logs, or progress reporting. Structured logging through
//! `tracing` happens regardless.

use std::sync::Arc;

use crate::diagnostics::FallbackReason;

/// Events emitted while generating one article.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The questionnaire was rejected; no external call will be made.
    ValidationRejected {
        /// The rejection message returned to the caller.
        message: String,
    },
    /// An external generation attempt is starting.
    AttemptStart {
        /// Attempt number (1-indexed).
        attempt: u32,
        /// Backend name.
        backend: &'static str,
    },
    /// An attempt was rate limited and the orchestrator is about to wait.
    RateLimited {
        /// Attempt number (1-indexed).
        attempt: u32,
        /// Wait before the next attempt in milliseconds.
        delay_ms: u64,
        /// Whether the wait came from the provider's Retry-After hint.
        from_retry_after: bool,
    },
    /// An attempt failed without being retried.
    AttemptFailed {
        /// Attempt number (1-indexed).
        attempt: u32,
        /// Error description.
        reason: String,
    },
    /// Generator output was formatted and returned.
    Generated {
        /// Attempts used.
        attempts: u32,
        /// Lines the formatter dropped.
        dropped_lines: usize,
    },
    /// The fallback composer produced the article.
    FallbackUsed {
        /// Why generation did not succeed.
        reason: FallbackReason,
    },
}

/// Handler for generation lifecycle events.
///
/// This is entirely optional -- the orchestrator works without one.
///
/// # Example
///
/// ```
/// use article_pipeline::events::{Event, EventHandler};
///
/// struct PrintHandler;
///
/// impl EventHandler for PrintHandler {
///     fn on_event(&self, event: Event) {
///         if let Event::FallbackUsed { reason } = event {
///             println!("fallback: {}", reason);
///         }
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    /// Called when the orchestrator emits an event.
    fn on_event(&self, event: Event);
}

/// Emit an event if a handler is present. No-op otherwise.
pub(crate) fn emit(handler: &Option<Arc<dyn EventHandler>>, event: Event) {
    if let Some(ref h) = handler {
        h.on_event(event);
    }
}

/// An [`EventHandler`] backed by a closure.
///
/// # Example
///
/// ```
/// use article_pipeline::events::{Event, FnEventHandler};
/// use std::sync::Arc;
///
/// let handler = Arc::new(FnEventHandler(|event: Event| {
///     if let Event::RateLimited { delay_ms, .. } = event {
///         println!("waiting {}ms", delay_ms);
///     }
/// }));
/// ```
pub struct FnEventHandler<F: Fn(Event) + Send + Sync>(pub F);

impl<F: Fn(Event) + Send + Sync> EventHandler for FnEventHandler<F> {
    fn on_event(&self, event: Event) {
        (self.0)(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_emit_without_handler_is_noop() {
        emit(&None, Event::AttemptStart { attempt: 1, backend: "mock" });
    }

    #[test]
    fn test_fn_handler_receives_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler: Arc<dyn EventHandler> = Arc::new(FnEventHandler(move |e: Event| {
            sink.lock().unwrap().push(e);
        }));
        emit(
            &Some(handler),
            Event::FallbackUsed {
                reason: FallbackReason::EmptyResponse,
            },
        );
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Event::FallbackUsed {
                reason: FallbackReason::EmptyResponse
            }]
        );
    }
}
