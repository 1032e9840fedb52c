//! The extraction engine: raw model text in, [`ExtractedFields`] out.
//!
//! Policy, in order:
//!
//! 1. Strip code fences.
//! 2. Recover a `prompt`-bearing JSON object (whole text, then scanned
//!    candidates), normalizing its fields.
//! 3. If that failed, or a wanted field is a placeholder, or wanted lyrics
//!    have no section tag, replace prompt and lyrics with the regex
//!    heuristics over the raw text.
//! 4. Finalize: placeholder defaults, title salvage, lyric cleanup.
//!
//! Nothing here does I/O, holds state, or fails.

use tracing::{debug, warn};

use crate::diagnostics::{ExtractDiagnostics, FallbackReason, Strategy};
use crate::output_parser::heuristic::{fallback_fields, has_section_tag};
use crate::output_parser::json::{find_object, ObjectSource};
use crate::output_parser::normalize::NormalizedFields;
use crate::output_parser::{finalize, is_placeholder, strip_fences};
use crate::types::{ExtractedFields, RequestContext};

/// Extract `prompt`, `lyrics` and `title` from raw model output.
///
/// Never fails. With nothing usable in `raw_text` the result is the trimmed
/// concept as prompt, `"[inst]"` as lyrics and a title derived from the
/// concept.
///
/// # Examples
///
/// ```
/// use prompt_lyrics::{extract, RequestContext};
///
/// let raw = r#"{"prompt":"p","lyrics":"[verse]\nhi","title":"T"}"#;
/// let fields = extract(raw, &RequestContext::new("anything"));
/// assert_eq!(fields.prompt, "p");
/// assert_eq!(fields.lyrics, "[verse]\nhi");
/// assert_eq!(fields.title, "T");
/// ```
pub fn extract(raw_text: &str, ctx: &RequestContext) -> ExtractedFields {
    extract_with_diagnostics(raw_text, ctx).0
}

/// Like [`extract`], also reporting how the fields were obtained.
pub fn extract_with_diagnostics(
    raw_text: &str,
    ctx: &RequestContext,
) -> (ExtractedFields, ExtractDiagnostics) {
    let mut diag = ExtractDiagnostics::default();
    let cleaned = strip_fences(raw_text);

    let found = find_object(&cleaned);
    let normalized = match &found {
        Some(found) => {
            diag.strategy = Some(match found.source {
                ObjectSource::WholeText => Strategy::WholeText,
                ObjectSource::Scanned => Strategy::Candidate,
            });
            diag.candidates_scanned = found.scanned;
            diag.selected_span = Some((found.candidate.start, found.candidate.end));
            NormalizedFields::from_object(&found.candidate.object)
        }
        None => NormalizedFields::default(),
    };

    diag.fallback_reasons = fallback_reasons(found.is_some(), &normalized, ctx);

    let NormalizedFields {
        mut prompt,
        mut lyrics,
        title,
    } = normalized;

    if diag.degraded() {
        for reason in &diag.fallback_reasons {
            warn!(%reason, "attempting heuristic fallback");
        }
        (prompt, lyrics) = fallback_fields(raw_text, ctx);
        diag.strategy = Some(Strategy::Heuristic);
    }

    let fields = finalize(
        ExtractedFields {
            prompt,
            lyrics,
            title,
            raw_text: raw_text.to_string(),
        },
        ctx,
    );

    debug!(
        strategy = diag.strategy.map(|s| s.as_str()),
        candidates = diag.candidates_scanned,
        "extraction finished"
    );
    (fields, diag)
}

/// Every reason the JSON result is unusable for this request, in check order.
fn fallback_reasons(
    found: bool,
    fields: &NormalizedFields,
    ctx: &RequestContext,
) -> Vec<FallbackReason> {
    if !found {
        return vec![FallbackReason::NoCandidate];
    }

    let mut reasons = Vec::new();
    if ctx.want_prompt && is_placeholder(&fields.prompt) {
        reasons.push(FallbackReason::PlaceholderPrompt);
    }
    if ctx.want_lyrics && is_placeholder(&fields.lyrics) {
        reasons.push(FallbackReason::PlaceholderLyrics);
    }
    if ctx.want_lyrics && !has_section_tag(&fields.lyrics) {
        reasons.push(FallbackReason::MissingSectionTags);
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RequestContext {
        RequestContext::new("moonlit harbor waltz")
    }

    #[test]
    fn clean_json_round_trip() {
        let raw = r#"{"prompt":"p","lyrics":"[verse]\\nhi","title":"T"}"#;
        let (fields, diag) = extract_with_diagnostics(raw, &ctx());
        assert_eq!(fields.prompt, "p");
        assert_eq!(fields.lyrics, "[verse]\nhi");
        assert_eq!(fields.title, "T");
        assert_eq!(fields.raw_text, raw);
        assert_eq!(diag.strategy, Some(Strategy::WholeText));
        assert!(!diag.degraded());
    }

    #[test]
    fn cleanup_never_leaves_placeholder_lyrics() {
        let raw = r#"{"prompt":"jazz","lyrics":"[inst]\n...","title":"T"}"#;
        let fields = extract(raw, &ctx());
        assert_eq!(fields.prompt, "jazz");
        assert_eq!(fields.lyrics, "[inst]");
        assert_eq!(finalize(fields.clone(), &ctx()), fields);
    }

    #[test]
    fn fenced_json_with_commentary() {
        let raw = "```json\n{\"prompt\": \"folk, 80 bpm\", \"lyrics\": \"[verse]\\nroad\", \"title\": \"Road\"}\n```";
        let fields = extract(raw, &ctx());
        assert_eq!(fields.prompt, "folk, 80 bpm");
        assert_eq!(fields.lyrics, "[verse]\nroad");
    }

    #[test]
    fn longest_candidate_selected() {
        let small = r#"{"prompt": "tiny", "lyrics": "[a]\nb"}"#;
        let big = r#"{"prompt": "a long detailed prompt, 90 bpm, piano, strings", "lyrics": "[verse]\nthe real lyrics go here\n[chorus]\nsing it", "title": "Real Song"}"#;
        let raw = format!("Draft: {small}\nFinal answer: {big}\nThanks!");
        let (fields, diag) = extract_with_diagnostics(&raw, &ctx());
        assert_eq!(fields.title, "Real Song");
        assert_eq!(fields.prompt, "a long detailed prompt, 90 bpm, piano, strings");
        assert_eq!(diag.strategy, Some(Strategy::Candidate));
        assert_eq!(diag.candidates_scanned, 2);
    }

    #[test]
    fn schema_echo_falls_back() {
        let raw = r#"{"prompt":"string","lyrics":"string","title":"string"}"#;
        let (fields, diag) = extract_with_diagnostics(raw, &ctx());
        assert_eq!(fields.prompt, "moonlit harbor waltz");
        assert_eq!(fields.lyrics, "[inst]");
        assert_eq!(fields.title, "Moonlit Harbor Waltz");
        assert_eq!(diag.strategy, Some(Strategy::Heuristic));
        assert_eq!(
            diag.fallback_reasons,
            vec![
                FallbackReason::PlaceholderPrompt,
                FallbackReason::PlaceholderLyrics,
                FallbackReason::MissingSectionTags,
            ]
        );
    }

    #[test]
    fn braced_unicode_escape_becomes_emoji() {
        let raw = r#"{"prompt": "disco \u{1f57a}", "lyrics": "[verse]\nmove"}"#;
        let fields = extract(raw, &ctx());
        assert_eq!(fields.prompt, "disco \u{1f57a}");
    }

    #[test]
    fn brace_inside_lyrics_string() {
        let raw = r#"noise {"prompt": "jazz", "lyrics": "[verse]\nopen { curly", "title": "Curly"} tail"#;
        let (fields, diag) = extract_with_diagnostics(raw, &ctx());
        assert_eq!(fields.lyrics, "[verse]\nopen { curly");
        assert_eq!(diag.candidates_scanned, 1);
    }

    #[test]
    fn no_json_uses_section_tag() {
        let raw = "I could not format JSON, blah [verse]\nline one\nline two";
        let (fields, diag) = extract_with_diagnostics(raw, &ctx());
        assert!(fields.lyrics.starts_with("[verse]"));
        assert_eq!(fields.lyrics, "[verse]\nline one\nline two");
        assert_eq!(fields.prompt, "moonlit harbor waltz");
        assert_eq!(diag.fallback_reasons, vec![FallbackReason::NoCandidate]);
    }

    #[test]
    fn missing_tags_triggers_fallback_but_keeps_title() {
        let raw = r#"{"prompt": "ambient", "lyrics": "just prose", "title": "Drift"} Lyrics: [intro]\nhum"#;
        let (fields, diag) = extract_with_diagnostics(raw, &ctx());
        assert_eq!(fields.prompt, "moonlit harbor waltz");
        assert_eq!(fields.lyrics, "[intro]\nhum");
        assert_eq!(fields.title, "Drift");
        assert_eq!(diag.fallback_reasons, vec![FallbackReason::MissingSectionTags]);
    }

    #[test]
    fn instrumental_request_skips_tag_check() {
        let c = ctx().with_lyrics(false);
        let raw = r#"{"prompt": "ambient drone", "lyrics": "[inst]", "title": "Hum"}"#;
        let (fields, diag) = extract_with_diagnostics(raw, &c);
        assert!(!diag.degraded());
        assert_eq!(fields.prompt, "ambient drone");
        assert_eq!(fields.lyrics, "[inst]");
    }

    #[test]
    fn empty_input_degrades_gracefully() {
        for raw in ["", "   ", "```\n```", "{", "}{"] {
            let fields = extract(raw, &ctx());
            assert_eq!(fields.prompt, "moonlit harbor waltz");
            assert_eq!(fields.lyrics, "[inst]");
            assert_eq!(fields.title, "Moonlit Harbor Waltz");
        }
    }

    #[test]
    fn list_valued_fields() {
        let raw = r#"{"prompt": ["synthwave", "110 bpm"], "lyrics": ["[verse]", "neon"], "title": ["Night", "Drive"]}"#;
        let fields = extract(raw, &ctx());
        assert_eq!(fields.prompt, "synthwave 110 bpm");
        assert_eq!(fields.lyrics, "[verse]\nneon");
        assert_eq!(fields.title, "Night Drive");
    }

    #[test]
    fn fields_never_empty_for_adversarial_inputs() {
        let inputs = [
            r#"{"prompt": ""}"#,
            r#"{"prompt": null, "lyrics": null, "title": null}"#,
            r#"{"prompt": "...", "lyrics": "🎵🎵"}"#,
            "{{{{{{{{{{",
            "\\\\\\u{zz}\\u{}",
            "[inst]\n",
            r#"{"prompt": {"nested": true}, "lyrics": 7}"#,
        ];
        for raw in inputs {
            let fields = extract(raw, &ctx());
            assert!(!fields.prompt.is_empty(), "{raw:?}");
            assert!(!fields.lyrics.is_empty(), "{raw:?}");
            assert!(!fields.title.is_empty(), "{raw:?}");
        }
    }

    #[test]
    fn extraction_is_finalized_once_only() {
        let raw = r#"{"prompt": "p", "lyrics": "[verse]:\n✨ shine \nbright", "title": ""}"#;
        let c = ctx();
        let fields = extract(raw, &c);
        assert_eq!(finalize(fields.clone(), &c), fields);
    }
}
