//! Deterministic escape repair for JSON snippets produced by LLMs.
//!
//! Models like to write emoji as `\u{1f3b5}` (a Rust/JS-style escape JSON
//! does not allow) and sprinkle stray backslashes through lyrics. Both break
//! `serde_json`. All repairs are manual character walks; no regex is used.
//!
//! Repair is applied only to a JSON candidate snippet, never to the raw text
//! the heuristic fallback reads.

/// Characters that may legally follow a backslash in a JSON string.
const JSON_ESCAPES: &[char] = &['"', '\\', '/', 'b', 'f', 'n', 'r', 't', 'u'];

/// Repair a JSON snippet so `serde_json` has a chance of parsing it.
///
/// Repairs applied (in order):
/// 1. Convert braced unicode escapes `\u{HEX}` into the literal character,
///    dropping escapes whose code point is invalid
/// 2. Remove every backslash not followed by a legal JSON escape character
///
/// # Examples
///
/// ```
/// use prompt_lyrics::output_parser::repair_escapes;
///
/// assert_eq!(repair_escapes(r#"{"a": "hi \u{1f600}"}"#), "{\"a\": \"hi 😀\"}");
/// assert_eq!(repair_escapes(r#"{"a": "don\'t"}"#), r#"{"a": "don't"}"#);
/// ```
pub fn repair_escapes(snippet: &str) -> String {
    let converted = convert_braced_unicode_escapes(snippet);
    remove_invalid_backslashes(&converted)
}

/// Replace `\u{HEX}` with the character at that code point.
///
/// An escape with an out-of-range or surrogate code point is removed entirely.
/// Anything that does not match the full `\u{` hex+ `}` shape is copied as-is.
fn convert_braced_unicode_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        if chars[i] == '\\' && i + 2 < len && chars[i + 1] == 'u' && chars[i + 2] == '{' {
            let hex_start = i + 3;
            let mut j = hex_start;
            while j < len && chars[j].is_ascii_hexdigit() {
                j += 1;
            }
            if j > hex_start && j < len && chars[j] == '}' {
                let hex: String = chars[hex_start..j].iter().collect();
                if let Some(ch) = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                {
                    result.push(ch);
                }
                i = j + 1;
                continue;
            }
        }

        result.push(chars[i]);
        i += 1;
    }
    result
}

/// Drop backslashes that do not start a legal JSON escape.
///
/// Each backslash is judged only by the character right after it, so `\\q`
/// keeps the first backslash and drops the second.
fn remove_invalid_backslashes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some(next) if JSON_ESCAPES.contains(next) => {}
                _ => continue,
            }
        }
        result.push(ch);
    }
    result
}
