//! JSON object recovery: the whole-text attempt and candidate selection.
//!
//! [`find_object`] tries the entire cleaned text first, then falls back to
//! [`scan_candidates`] and [`select_best`]. Both paths repair escapes before
//! parsing.

use serde_json::{Map, Value};
use tracing::debug;

use crate::output_parser::error::ParseError;
use crate::output_parser::extract::{scan_candidates, Candidate};
use crate::output_parser::normalize::NormalizedFields;
use crate::output_parser::placeholder::is_template_word;
use crate::output_parser::repair::repair_escapes;

/// The key every usable object must carry.
pub const REQUIRED_KEY: &str = "prompt";

/// Where a recovered object came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectSource {
    /// The whole cleaned text was one JSON object.
    WholeText,
    /// The object was selected from scanned candidates.
    Scanned,
}

/// Result of [`find_object`].
#[derive(Debug, Clone)]
pub struct FoundObject {
    pub candidate: Candidate,
    pub source: ObjectSource,
    /// How many parseable candidates the scan produced (0 for the whole-text path).
    pub scanned: usize,
}

/// Repair `snippet` and parse it as a JSON object.
pub fn parse_object(snippet: &str) -> Result<Map<String, Value>, ParseError> {
    match serde_json::from_str::<Value>(&repair_escapes(snippet))? {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::NotAnObject),
    }
}

/// Parse the entire cleaned text as one object containing `required_key`.
pub fn parse_whole_text(cleaned: &str, required_key: &str) -> Option<Candidate> {
    let object = parse_object(cleaned).ok()?;
    object.contains_key(required_key).then(|| Candidate {
        start: 0,
        end: cleaned.len(),
        object,
    })
}

/// Whether a candidate is just the instruction schema echoed back
/// (`prompt` and `lyrics` both the word "string").
fn is_schema_echo(object: &Map<String, Value>) -> bool {
    let fields = NormalizedFields::from_object(object);
    is_template_word(&fields.prompt) && is_template_word(&fields.lyrics)
}

/// Pick the best candidate: the longest span among objects that contain
/// `required_key` and are not a schema echo. Ties go to the earliest start.
///
/// # Examples
///
/// ```
/// use prompt_lyrics::output_parser::{scan_candidates, select_best};
///
/// let text = r#"{"prompt": "a"} and {"prompt": "longer one"}"#;
/// let candidates = scan_candidates(text);
/// let best = select_best(&candidates, "prompt").unwrap();
/// assert_eq!(best.object["prompt"], "longer one");
/// ```
pub fn select_best<'c>(candidates: &'c [Candidate], required_key: &str) -> Option<&'c Candidate> {
    candidates
        .iter()
        .filter(|c| c.object.contains_key(required_key))
        .filter(|c| !is_schema_echo(&c.object))
        .fold(None, |best: Option<&Candidate>, c| match best {
            Some(b) if b.len() >= c.len() => Some(b),
            _ => Some(c),
        })
}

/// Recover the most plausible `prompt`-bearing object from cleaned text.
pub fn find_object(cleaned: &str) -> Option<FoundObject> {
    if let Some(candidate) = parse_whole_text(cleaned, REQUIRED_KEY) {
        debug!("whole text parsed as a single object");
        return Some(FoundObject {
            candidate,
            source: ObjectSource::WholeText,
            scanned: 0,
        });
    }

    let candidates = scan_candidates(cleaned);
    let scanned = candidates.len();
    let best = select_best(&candidates, REQUIRED_KEY)?.clone();
    debug!(
        scanned,
        start = best.start,
        end = best.end,
        "selected candidate object"
    );
    Some(FoundObject {
        candidate: best,
        source: ObjectSource::Scanned,
        scanned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_rejects_arrays() {
        assert!(matches!(parse_object("[1, 2]"), Err(ParseError::NotAnObject)));
    }

    #[test]
    fn parse_object_reports_json_errors() {
        assert!(matches!(parse_object("{nope}"), Err(ParseError::Json(_))));
    }

    #[test]
    fn whole_text_requires_key() {
        assert!(parse_whole_text(r#"{"lyrics": "x"}"#, "prompt").is_none());
        let c = parse_whole_text(r#"{"prompt": "x"}"#, "prompt").unwrap();
        assert_eq!(c.start, 0);
        assert_eq!(c.end, 15);
    }

    #[test]
    fn whole_text_accepts_schema_echo() {
        // The placeholder guard downstream handles this case.
        let text = r#"{"prompt":"string","lyrics":"string","title":"string"}"#;
        assert!(parse_whole_text(text, "prompt").is_some());
    }

    #[test]
    fn longest_candidate_wins() {
        let short = r#"{"prompt": "short one", "lyrics": "[a]"}"#;
        let long = r#"{"prompt": "a much longer and more detailed prompt", "lyrics": "[verse]\nmore words here to make it long", "title": "Long"}"#;
        let text = format!("noise {short} more noise {long} end");
        let candidates = scan_candidates(&text);
        let best = select_best(&candidates, "prompt").unwrap();
        assert_eq!(best.len(), long.len());
        assert_eq!(best.object["title"], "Long");
    }

    #[test]
    fn ties_go_to_earliest() {
        let text = r#"{"prompt": "aaa"} {"prompt": "bbb"}"#;
        let candidates = scan_candidates(text);
        let best = select_best(&candidates, "prompt").unwrap();
        assert_eq!(best.object["prompt"], "aaa");
    }

    #[test]
    fn schema_echo_is_skipped() {
        let text = r#"{"prompt": "string", "lyrics": "STRING", "title": "padding padding"} {"prompt": "real"}"#;
        let candidates = scan_candidates(text);
        let best = select_best(&candidates, "prompt").unwrap();
        assert_eq!(best.object["prompt"], "real");
    }

    #[test]
    fn objects_without_key_are_ignored() {
        let text = r#"{"notes": "a very long object without the key at all"} {"prompt": "p"}"#;
        let candidates = scan_candidates(text);
        let best = select_best(&candidates, "prompt").unwrap();
        assert_eq!(best.object["prompt"], "p");
    }

    #[test]
    fn find_object_prefers_whole_text() {
        let found = find_object(r#"{"prompt": "x", "inner": {"prompt": "y"}}"#).unwrap();
        assert_eq!(found.source, ObjectSource::WholeText);
        assert_eq!(found.candidate.object["prompt"], "x");
    }

    #[test]
    fn find_object_scans_when_whole_text_fails() {
        let found = find_object(r#"Here you go: {"prompt": "x"} bye"#).unwrap();
        assert_eq!(found.source, ObjectSource::Scanned);
        assert_eq!(found.scanned, 1);
    }

    #[test]
    fn find_object_none_without_candidates() {
        assert!(find_object("no json here").is_none());
        assert!(find_object(r#"{"lyrics": "only"}"#).is_none());
    }
}
