//! Error types for candidate parsing.
//!
//! These never escape the engine: a candidate that fails to parse is skipped.

/// Why a brace-delimited snippet was rejected as a candidate.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The repaired snippet is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The snippet parsed, but not to an object.
    #[error("JSON value is not an object")]
    NotAnObject,
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Counts characters rather than bytes so previews never split a code point.
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_is_unchanged() {
        assert_eq!(truncate("abc", 5), "abc");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("🎵🎵🎵", 2), "🎵🎵...");
    }
}
