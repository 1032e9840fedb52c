//! One compose request: instructions in, song fields out.
//!
//! [`SongWriter`] ties the pieces together around an injected
//! [`Generator`]: it renders the instructions, runs the generator (one
//! generation at a time), strips an echoed prompt, and hands the text to
//! the extraction engine.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::config::GenerationConfig;
use crate::diagnostics::ExtractDiagnostics;
use crate::engine::extract_with_diagnostics;
use crate::error::{ComposeError, Result};
use crate::events::{emit, Event, EventHandler};
use crate::generator::{GenerationRequest, Generator};
use crate::output_parser::error::truncate;
use crate::prompt::build_instructions;
use crate::types::{ExtractedFields, RequestContext};

/// Composes prompt, lyrics and title with an injected generator.
///
/// Generations are serialized: concurrent `compose` calls wait for the
/// generator one at a time, while extraction itself runs unlocked.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use prompt_lyrics::{MockGenerator, RequestContext, SongWriter};
///
/// let mock = MockGenerator::fixed(
///     r#"Sure! {"prompt": "sea shanty, 100 bpm", "lyrics": "[verse]\nheave ho", "title": "Heave Ho"}"#,
/// );
/// let writer = SongWriter::new(Arc::new(mock));
/// let fields = tokio_test::block_on(writer.compose(&RequestContext::new("sailors"))).unwrap();
/// assert_eq!(fields.title, "Heave Ho");
/// assert_eq!(fields.lyrics, "[verse]\nheave ho");
/// ```
pub struct SongWriter {
    generator: Arc<dyn Generator>,
    config: GenerationConfig,
    event_handler: Option<Arc<dyn EventHandler>>,
    generation_lock: Mutex<()>,
}

impl SongWriter {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            config: GenerationConfig::default(),
            event_handler: None,
            generation_lock: Mutex::new(()),
        }
    }

    /// Set the sampling configuration. Validated on every compose.
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach an event handler.
    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// The request the generator will see for `ctx`.
    pub fn request_for(&self, ctx: &RequestContext) -> GenerationRequest {
        GenerationRequest {
            system_prompt: self.config.system_prompt.clone(),
            prompt: build_instructions(ctx),
            config: self.config.clone(),
        }
    }

    /// Generate and extract song fields for `ctx`.
    pub async fn compose(&self, ctx: &RequestContext) -> Result<ExtractedFields> {
        Ok(self.compose_with_diagnostics(ctx).await?.0)
    }

    /// Like [`compose`](Self::compose), also returning extraction diagnostics.
    ///
    /// Fails only when the configuration is invalid, the generator errors,
    /// or the generator returns no records.
    pub async fn compose_with_diagnostics(
        &self,
        ctx: &RequestContext,
    ) -> Result<(ExtractedFields, ExtractDiagnostics)> {
        self.config.validate()?;

        let request = self.request_for(ctx);
        let name = self.generator.name();

        emit(
            &self.event_handler,
            Event::GenerationStart {
                generator: name,
                concept: ctx.concept.clone(),
            },
        );

        let records = {
            let _guard = self.generation_lock.lock().await;
            self.generator.generate(&request).await
        };

        let raw_full = match records {
            Ok(records) => records.into_iter().next(),
            Err(err) => {
                emit(&self.event_handler, Event::GenerationEnd { generator: name, ok: false });
                return Err(match err {
                    ComposeError::Other(message) => ComposeError::Generation {
                        generator: name.to_string(),
                        message,
                    },
                    other => other,
                });
            }
        };

        emit(
            &self.event_handler,
            Event::GenerationEnd {
                generator: name,
                ok: raw_full.is_some(),
            },
        );
        let raw_full = raw_full.ok_or_else(|| ComposeError::NoOutput {
            generator: name.to_string(),
        })?;

        let raw_text = strip_echoed_prompt(&raw_full, &request.prompt);
        info!(raw = %truncate(raw_text, 500), "raw generator output");

        let (fields, diag) = extract_with_diagnostics(raw_text, ctx);

        for reason in &diag.fallback_reasons {
            emit(&self.event_handler, Event::FallbackTriggered { reason: *reason });
        }
        if let Some(strategy) = diag.strategy {
            emit(
                &self.event_handler,
                Event::Extracted {
                    strategy,
                    title: fields.title.clone(),
                },
            );
        }

        info!(
            prompt = %fields.prompt,
            lyrics = %truncate(&fields.lyrics, 200),
            title = %fields.title,
            "composed song fields"
        );
        Ok((fields, diag))
    }
}

/// Drop an echo of `prompt` from the front of `raw`.
///
/// Raw text-generation pipelines return the input followed by the
/// continuation; only the continuation is model output.
pub fn strip_echoed_prompt<'a>(raw: &'a str, prompt: &str) -> &'a str {
    if prompt.is_empty() {
        return raw;
    }
    raw.strip_prefix(prompt).unwrap_or(raw)
}
