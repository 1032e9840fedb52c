//! Regex heuristics for when the model's JSON is missing or unusable.
//!
//! The extraction policy is JSON first, heuristics second: these rules only
//! run after [`find_object`](crate::output_parser::json::find_object) came
//! back empty or produced placeholder content. Each rule is its own function
//! so it can be tested in isolation.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::RequestContext;

fn re_section_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[^\]]+\]").unwrap())
}

fn re_from_section_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[[^\]]+\].*").unwrap())
}

fn re_lyrics_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)lyrics\s*:(.*)").unwrap())
}

/// Whether `lyrics` contains at least one `[section]` tag.
pub fn has_section_tag(lyrics: &str) -> bool {
    re_section_tag().is_match(lyrics)
}

/// Everything from the first `[section]` tag to the end of `text`, trimmed.
pub fn lyrics_from_section_tag(text: &str) -> Option<String> {
    re_from_section_tag()
        .find(text)
        .map(|m| m.as_str().trim().to_string())
}

/// Everything after the first case-insensitive `Lyrics:` label, trimmed.
pub fn lyrics_from_label(text: &str) -> Option<String> {
    re_lyrics_label()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Recover `(prompt, lyrics)` from raw text without JSON.
///
/// The prompt is always the trimmed concept. Lyrics are only looked for when
/// the caller wants them: first from a section tag, then from a `Lyrics:`
/// label. When neither matches, lyrics are left empty and the finalizer
/// turns them into the instrumental marker.
///
/// # Examples
///
/// ```
/// use prompt_lyrics::RequestContext;
/// use prompt_lyrics::output_parser::fallback_fields;
///
/// let ctx = RequestContext::new(" rainy city blues ");
/// let (prompt, lyrics) = fallback_fields("sorry! [verse]\nwet streets", &ctx);
/// assert_eq!(prompt, "rainy city blues");
/// assert_eq!(lyrics, "[verse]\nwet streets");
/// ```
pub fn fallback_fields(raw_text: &str, ctx: &RequestContext) -> (String, String) {
    let prompt = ctx.concept.trim().to_string();
    let text = raw_text.trim();

    if text.is_empty() || !ctx.want_lyrics {
        return (prompt, String::new());
    }

    let lyrics = lyrics_from_section_tag(text)
        .or_else(|| lyrics_from_label(text))
        .unwrap_or_default();
    (prompt, lyrics)
}
