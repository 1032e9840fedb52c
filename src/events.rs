//! Event system for generation lifecycle hooks.
//!
//! Provides an optional, non-intrusive way to observe a
//! [`SongWriter`](crate::songwriter::SongWriter) request. Events fire when
//! generation starts and ends, when the heuristic fallback kicks in, and
//! when extraction finishes. Implement [`EventHandler`] to receive them
//! for logging, progress tracking or UI updates.

use std::sync::Arc;

use crate::diagnostics::{FallbackReason, Strategy};

/// Events emitted during a compose request.
#[derive(Debug, Clone)]
pub enum Event {
    /// The generator is about to be called.
    GenerationStart {
        /// Name of the generator (e.g. `"mock"`).
        generator: &'static str,
        /// The song concept being generated.
        concept: String,
    },
    /// The generator returned (or failed).
    GenerationEnd {
        /// Name of the generator.
        generator: &'static str,
        /// Whether at least one output record came back.
        ok: bool,
    },
    /// The model's JSON was unusable and the regex heuristics ran.
    FallbackTriggered {
        /// Why the fallback fired.
        reason: FallbackReason,
    },
    /// Extraction finished.
    Extracted {
        /// Strategy that produced the fields.
        strategy: Strategy,
        /// Final title (may be empty when the concept had no words).
        title: String,
    },
}

/// Handler for compose lifecycle events.
///
/// This is entirely optional; a `SongWriter` works without one.
///
/// # Example
///
/// ```
/// use prompt_lyrics::events::{Event, EventHandler};
///
/// struct PrintHandler;
///
/// impl EventHandler for PrintHandler {
///     fn on_event(&self, event: Event) {
///         match event {
///             Event::FallbackTriggered { reason } => println!("[fallback] {}", reason),
///             Event::Extracted { title, .. } => println!("[done] {}", title),
///             _ => {}
///         }
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    /// Called for every event.
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
/// use prompt_lyrics::events::{Event, FnEventHandler};
/// use std::sync::Arc;
///
/// let handler = Arc::new(FnEventHandler(|event: Event| {
///     if let Event::GenerationEnd { ok, .. } = event {
///         println!("generation ok={}", ok);
///     }
/// }));
/// ```
pub struct FnEventHandler<F: Fn(Event) + Send + Sync>(pub F);

impl<F: Fn(Event) + Send + Sync> EventHandler for FnEventHandler<F> {
    fn on_event(&self, event: Event) {
        (self.0)(event);
    }
}
