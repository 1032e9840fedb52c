use serde::{Deserialize, Serialize};

use crate::error::{ComposeError, Result};

/// Default system prompt sent alongside the instructions.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert songwriter and producer for a \
text-to-music model. You MUST obey the output format exactly and always return valid JSON.";

/// Sampling configuration handed to the [`Generator`](crate::generator::Generator).
///
/// Deserializable so an embedding application can load it from its own
/// settings; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model identifier, interpreted by the generator.
    pub model: String,

    /// System prompt for chat-style generators.
    pub system_prompt: String,

    /// Maximum tokens to generate.
    pub max_new_tokens: u32,

    /// Temperature (0.0 = deterministic).
    pub temperature: f64,

    /// Nucleus sampling cutoff, in `(0, 1]`.
    pub top_p: f64,

    /// Top-k sampling cutoff.
    pub top_k: u32,

    /// Penalty for repeated tokens; 1.0 disables it.
    pub repetition_penalty: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "Qwen/Qwen2-7B-Instruct".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_new_tokens: 512,
            temperature: 0.8,
            top_p: 0.95,
            top_k: 40,
            repetition_penalty: 1.02,
        }
    }
}

impl GenerationConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_max_new_tokens(mut self, tokens: u32) -> Self {
        self.max_new_tokens = tokens;
        self
    }

    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_repetition_penalty(mut self, penalty: f64) -> Self {
        self.repetition_penalty = penalty;
        self
    }

    /// Reject values no sampler accepts.
    pub fn validate(&self) -> Result<()> {
        if self.max_new_tokens == 0 {
            return Err(ComposeError::InvalidConfig(
                "max_new_tokens must be greater than 0".into(),
            ));
        }
        if !(self.temperature >= 0.0) {
            return Err(ComposeError::InvalidConfig(format!(
                "temperature must be non-negative, got {}",
                self.temperature
            )));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(ComposeError::InvalidConfig(format!(
                "top_p must be in (0, 1], got {}",
                self.top_p
            )));
        }
        if !(self.repetition_penalty > 0.0) {
            return Err(ComposeError::InvalidConfig(format!(
                "repetition_penalty must be positive, got {}",
                self.repetition_penalty
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_new_tokens, 512);
        assert_eq!(config.top_k, 40);
    }

    #[test]
    fn builder_chain() {
        let config = GenerationConfig::default()
            .with_model("tiny")
            .with_temperature(0.2)
            .with_top_p(0.5);
        assert_eq!(config.model, "tiny");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.top_p, 0.5);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(GenerationConfig::default().with_max_new_tokens(0).validate().is_err());
        assert!(GenerationConfig::default().with_temperature(-1.0).validate().is_err());
        assert!(GenerationConfig::default().with_temperature(f64::NAN).validate().is_err());
        assert!(GenerationConfig::default().with_top_p(0.0).validate().is_err());
        assert!(GenerationConfig::default().with_top_p(1.5).validate().is_err());
        assert!(GenerationConfig::default()
            .with_repetition_penalty(0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{"model": "local", "temperature": 0.5}"#).unwrap();
        assert_eq!(config.model, "local");
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.max_new_tokens, 512);
    }
}
