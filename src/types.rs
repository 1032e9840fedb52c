use serde::{Deserialize, Serialize};

/// Per-request policy inputs.
///
/// These influence fallback and defaulting, never the parsing itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    /// The caller wants a style prompt from the model.
    pub want_prompt: bool,

    /// The caller wants lyrics (as opposed to an instrumental track).
    pub want_lyrics: bool,

    /// High-level song concept. Used as the default prompt and title source.
    pub concept: String,

    /// Approximate track length in seconds. `0.0` means no hint.
    pub target_seconds: f64,

    /// Approximate number of lyric lines. `0` means no hint.
    pub target_lines: u32,
}

impl RequestContext {
    /// A context for `concept` that asks for both prompt and lyrics.
    pub fn new(concept: impl Into<String>) -> Self {
        Self {
            want_prompt: true,
            want_lyrics: true,
            concept: concept.into(),
            target_seconds: 0.0,
            target_lines: 0,
        }
    }

    pub fn with_prompt(mut self, enabled: bool) -> Self {
        self.want_prompt = enabled;
        self
    }

    pub fn with_lyrics(mut self, enabled: bool) -> Self {
        self.want_lyrics = enabled;
        self
    }

    pub fn with_target_seconds(mut self, seconds: f64) -> Self {
        self.target_seconds = seconds;
        self
    }

    pub fn with_target_lines(mut self, lines: u32) -> Self {
        self.target_lines = lines;
        self
    }
}

/// The engine's only output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Genre/style prompt for the audio model.
    pub prompt: String,

    /// Song lyrics with section tags, or `"[inst]"`.
    pub lyrics: String,

    /// Short song title.
    pub title: String,

    /// The text the fields were derived from. Diagnostic only.
    pub raw_text: String,
}
