//! Generator trait and the normalized request type.
//!
//! The [`Generator`] trait is the seam between this crate and whatever
//! actually runs the language model. The crate never loads a model: the
//! embedding application injects one, and tests inject [`MockGenerator`]
//! or a closure via [`FnGenerator`].
//!
//! ```text
//! SongWriter ──► GenerationRequest ──► Generator::generate() ──► Vec<String>
//!                                              │
//!                               ┌──────────────┼──────────────┐
//!                          your model     FnGenerator     MockGenerator
//! ```

pub mod mock;

pub use mock::MockGenerator;

use async_trait::async_trait;

use crate::config::GenerationConfig;
use crate::error::Result;

/// A normalized generation request.
///
/// [`SongWriter`](crate::songwriter::SongWriter) builds this from the
/// request context and its [`GenerationConfig`].
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// System prompt for chat-style models.
    pub system_prompt: String,

    /// Rendered instruction text (see [`crate::prompt::build_instructions`]).
    pub prompt: String,

    /// Sampling configuration.
    pub config: GenerationConfig,
}

/// Abstraction over text generators.
///
/// Returns every output record the model produced. An empty `Vec` means
/// the model produced nothing, which the caller treats as fatal. A record
/// may start with an echo of `request.prompt`; the caller strips it.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn Generator>`.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run one generation.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// A [`Generator`] backed by a synchronous closure returning one record.
///
/// # Example
///
/// ```
/// use prompt_lyrics::generator::{FnGenerator, GenerationRequest};
///
/// let generator = FnGenerator::new(|_req: &GenerationRequest| {
///     Ok(r#"{"prompt": "lofi", "lyrics": "[inst]", "title": "Rain"}"#.to_string())
/// });
/// ```
pub struct FnGenerator<F>
where
    F: Fn(&GenerationRequest) -> anyhow::Result<String> + Send + Sync,
{
    f: F,
}

impl<F> FnGenerator<F>
where
    F: Fn(&GenerationRequest) -> anyhow::Result<String> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> Generator for FnGenerator<F>
where
    F: Fn(&GenerationRequest) -> anyhow::Result<String> + Send + Sync,
{
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>> {
        Ok(vec![(self.f)(request)?])
    }

    fn name(&self) -> &'static str {
        "fn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComposeError;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_prompt: "sys".into(),
            prompt: "write a song".into(),
            config: GenerationConfig::default(),
        }
    }

    #[tokio::test]
    async fn fn_generator_sees_request() {
        let generator = FnGenerator::new(|req: &GenerationRequest| Ok(format!("echo: {}", req.prompt)));
        let records = generator.generate(&request()).await.unwrap();
        assert_eq!(records, vec!["echo: write a song".to_string()]);
        assert_eq!(generator.name(), "fn");
    }

    #[tokio::test]
    async fn fn_generator_error_converts() {
        let generator = FnGenerator::new(|_: &GenerationRequest| Err(anyhow::anyhow!("out of memory")));
        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(err, ComposeError::Other(ref m) if m == "out of memory"));
    }
}
