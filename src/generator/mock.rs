//! Mock generator for testing without a model.
//!
//! [`MockGenerator`] returns pre-configured responses in order, so code
//! built on this crate can be tested deterministically.
//!
//! # Example
//!
//! ```
//! use prompt_lyrics::generator::MockGenerator;
//!
//! let mock = MockGenerator::new(vec!["{\"prompt\": \"lofi\"}".to_string()]);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{GenerationRequest, Generator};
use crate::error::Result;

/// A test generator that returns canned responses in order.
///
/// Cycles back to the beginning when all responses have been consumed.
/// With no responses it returns no records, like a model that produced
/// nothing. Optionally echoes the request prompt in front of each response,
/// the way raw text-generation pipelines do.
#[derive(Debug)]
pub struct MockGenerator {
    responses: Vec<String>,
    echo_prompt: bool,
    index: AtomicUsize,
}

impl MockGenerator {
    /// Create a mock with the given canned responses.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            echo_prompt: false,
            index: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }

    /// Create a mock that never returns any record.
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    /// Prefix every response with the request prompt.
    pub fn echoing_prompt(mut self) -> Self {
        self.echo_prompt = true;
        self
    }

    /// Number of calls served so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }

    fn next_response(&self) -> Option<String> {
        let idx = self.index.fetch_add(1, Ordering::Relaxed);
        if self.responses.is_empty() {
            return None;
        }
        Some(self.responses[idx % self.responses.len()].clone())
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>> {
        let records = self
            .next_response()
            .map(|text| {
                if self.echo_prompt {
                    format!("{}{}", request.prompt, text)
                } else {
                    text
                }
            })
            .into_iter()
            .collect();
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
