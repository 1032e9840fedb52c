//! Fence stripping and candidate scanning.
//!
//! This is the load-bearing module: every extraction starts by cleaning the
//! text here and, when the whole text is not one JSON object, by scanning it
//! for brace-delimited candidates.

use serde_json::{Map, Value};
use tracing::trace;

use crate::output_parser::json::parse_object;

/// Remove a surrounding markdown code fence.
///
/// Trims the text, then, if it starts with `` ``` ``, drops the fence, an
/// optional language tag (`[A-Za-z0-9_+-]*`) and the whitespace after it.
/// A trailing `` ``` `` is dropped as well. Text that does not start with a
/// fence is returned trimmed.
///
/// # Examples
///
/// ```
/// use prompt_lyrics::output_parser::strip_fences;
///
/// assert_eq!(strip_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_fences("  plain text "), "plain text");
/// ```
pub fn strip_fences(text: &str) -> String {
    let cleaned = text.trim();

    let Some(rest) = cleaned.strip_prefix("```") else {
        return cleaned.to_string();
    };

    let rest = rest
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'))
        .trim_start();

    let rest = rest.trim_end();
    match rest.strip_suffix("```") {
        Some(body) => body.trim_end().to_string(),
        None => rest.to_string(),
    }
}

/// A brace-delimited span of the cleaned text that parsed to a JSON object.
///
/// `start..end` is a half-open byte range into the text that was scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub start: usize,
    pub end: usize,
    pub object: Map<String, Value>,
}

impl Candidate {
    /// Span length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Lazy scanner over every balanced `{...}` object in a text.
///
/// Scanning is string-aware: braces inside JSON string literals do not
/// count, and a backslash inside a string suppresses the next character.
/// After each opening brace (matched or not) the scan resumes one
/// character past that brace, so nested and overlapping objects that start
/// later are still visited.
///
/// Only ASCII bytes are structural here, so scanning bytes is UTF-8 safe.
pub struct CandidateScanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> CandidateScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// End (exclusive) of the balanced object opening at `start`, if any.
    fn matching_close(&self, start: usize) -> Option<usize> {
        let bytes = self.text.as_bytes();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escape_next = false;

        for (offset, &b) in bytes[start..].iter().enumerate() {
            if in_string {
                if escape_next {
                    escape_next = false;
                } else if b == b'\\' {
                    escape_next = true;
                } else if b == b'"' {
                    in_string = false;
                }
                continue;
            }

            match b {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(start + offset + 1);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

impl Iterator for CandidateScanner<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        while self.pos < self.text.len() {
            let start = self.pos + self.text[self.pos..].find('{')?;
            self.pos = start + 1;

            let Some(end) = self.matching_close(start) else {
                continue;
            };

            match parse_object(&self.text[start..end]) {
                Ok(object) => return Some(Candidate { start, end, object }),
                Err(err) => trace!(start, end, %err, "skipping candidate"),
            }
        }
        None
    }
}

/// Collect every candidate object in `text`, in order of opening brace.
pub fn scan_candidates(text: &str) -> Vec<Candidate> {
    CandidateScanner::new(text).collect()
}
