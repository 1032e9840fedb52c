//! Placeholder guards, title salvage and cosmetic lyric cleanup.
//!
//! [`finalize`] is the last stage of every extraction, whether the fields
//! came from JSON or from the heuristic fallback. It is idempotent:
//! finalizing an already finalized value changes nothing.

use std::sync::OnceLock;

use regex::Regex;

use crate::output_parser::placeholder::is_placeholder;
use crate::types::{ExtractedFields, RequestContext};

/// Lyrics value meaning "no vocals".
pub const INSTRUMENTAL_MARKER: &str = "[inst]";

/// Emoji models scatter through lyrics. Removed wholesale.
const DECORATIVE_EMOJI: &[char] = &['🎵', '🎶', '✨', '⭐', '🌙', '💫'];

const TITLE_MAX_WORDS: usize = 6;

fn re_tag_colon() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\s*:").unwrap())
}

fn re_trailing_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+\n").unwrap())
}

/// Apply placeholder defaults and cosmetic cleanup.
///
/// 1. Placeholder prompt becomes the trimmed concept
/// 2. Placeholder lyrics become [`INSTRUMENTAL_MARKER`]
/// 3. Placeholder or empty title is derived from the concept
/// 4. Lyrics are tidied (see [`tidy_lyrics`])
///
/// # Examples
///
/// ```
/// use prompt_lyrics::{ExtractedFields, RequestContext};
/// use prompt_lyrics::output_parser::finalize;
///
/// let ctx = RequestContext::new("moonlit harbor waltz");
/// let fields = finalize(ExtractedFields::default(), &ctx);
/// assert_eq!(fields.prompt, "moonlit harbor waltz");
/// assert_eq!(fields.lyrics, "[inst]");
/// assert_eq!(fields.title, "Moonlit Harbor Waltz");
/// ```
pub fn finalize(mut fields: ExtractedFields, ctx: &RequestContext) -> ExtractedFields {
    if is_placeholder(&fields.prompt) {
        fields.prompt = ctx.concept.trim().to_string();
    }
    if is_placeholder(&fields.lyrics) {
        fields.lyrics = INSTRUMENTAL_MARKER.to_string();
    }
    if is_placeholder(&fields.title) {
        fields.title = title_from_concept(&ctx.concept);
    }
    fields.lyrics = tidy_lyrics(&fields.lyrics, ctx.want_lyrics);
    fields
}

/// Derive a title from the concept: strip brackets, braces, parentheses
/// and quotes, keep at most six words, title-case each.
///
/// Returns an empty string when the concept has no words.
pub fn title_from_concept(concept: &str) -> String {
    let plain: String = concept
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '{' | '}' | '(' | ')' | '"' | '\''))
        .collect();

    plain
        .split_whitespace()
        .take(TITLE_MAX_WORDS)
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Cosmetic cleanup, repeated until the text stops changing.
///
/// Each pass unescapes literal `\n`, drops the colon after section tags
/// (`[verse]:` becomes `[verse]`), removes decorative emoji, strips
/// trailing spaces before line breaks and trims. When lyrics were
/// requested, a leading instrumental marker followed by more lines is
/// dropped. Every pass only shortens the text, so the loop terminates.
///
/// Cleanup that leaves nothing behind, or only a placeholder such as
/// `...`, yields [`INSTRUMENTAL_MARKER`].
pub fn tidy_lyrics(lyrics: &str, want_lyrics: bool) -> String {
    let mut current = lyrics.to_string();
    loop {
        let next = tidy_pass(&current, want_lyrics);
        if next == current {
            break;
        }
        current = next;
    }

    if is_placeholder(&current) {
        INSTRUMENTAL_MARKER.to_string()
    } else {
        current
    }
}

fn tidy_pass(lyrics: &str, want_lyrics: bool) -> String {
    let unescaped = lyrics.replace("\\n", "\n");
    let untagged = re_tag_colon().replace_all(&unescaped, "[${1}]");
    let plain: String = untagged
        .chars()
        .filter(|c| !DECORATIVE_EMOJI.contains(c))
        .collect();
    let tidy = re_trailing_space().replace_all(&plain, "\n");
    let tidy = tidy.trim();

    if want_lyrics && starts_with_marker(tidy) {
        if let Some((_, rest)) = tidy.split_once('\n') {
            return rest.trim_start().to_string();
        }
    }
    tidy.to_string()
}

fn starts_with_marker(text: &str) -> bool {
    text.get(..INSTRUMENTAL_MARKER.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(INSTRUMENTAL_MARKER))
}
