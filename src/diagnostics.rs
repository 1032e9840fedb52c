//! Extraction diagnostics.
//!
//! [`ExtractDiagnostics`] records what happened during one extraction:
//! which strategy produced the fields, how many candidates were scanned,
//! and why the heuristic fallback ran, if it did.

use std::fmt;

/// Which stage ultimately produced the fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The whole cleaned text parsed as one object.
    WholeText,
    /// An object was selected from scanned candidates.
    Candidate,
    /// JSON was unusable; fields came from the regex heuristics.
    Heuristic,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::WholeText => "whole_text",
            Strategy::Candidate => "candidate",
            Strategy::Heuristic => "heuristic",
        }
    }
}

/// Why the heuristic fallback was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No object with a `prompt` key was found.
    NoCandidate,
    /// A prompt was wanted but the object's prompt is a placeholder.
    PlaceholderPrompt,
    /// Lyrics were wanted but the object's lyrics are a placeholder.
    PlaceholderLyrics,
    /// Lyrics were wanted but contain no `[section]` tag.
    MissingSectionTags,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FallbackReason::NoCandidate => "no valid prompt/lyrics JSON object found",
            FallbackReason::PlaceholderPrompt => "JSON prompt looks like a placeholder",
            FallbackReason::PlaceholderLyrics => "JSON lyrics look like a placeholder",
            FallbackReason::MissingSectionTags => "JSON lyrics have no section tags",
        };
        f.write_str(msg)
    }
}

/// Records what happened during one extraction.
///
/// # Example
///
/// ```
/// use prompt_lyrics::diagnostics::ExtractDiagnostics;
///
/// let diag = ExtractDiagnostics::default();
/// assert!(!diag.degraded());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractDiagnostics {
    /// Strategy that produced the fields. `None` only before extraction ran.
    pub strategy: Option<Strategy>,

    /// Number of parseable candidate objects the scan produced.
    pub candidates_scanned: usize,

    /// Byte span of the selected object in the cleaned text.
    pub selected_span: Option<(usize, usize)>,

    /// Every reason the fallback fired, in check order. Empty means the
    /// JSON path was used as-is.
    pub fallback_reasons: Vec<FallbackReason>,
}

impl ExtractDiagnostics {
    /// Whether the result came from the heuristic fallback.
    pub fn degraded(&self) -> bool {
        !self.fallback_reasons.is_empty()
    }
}
