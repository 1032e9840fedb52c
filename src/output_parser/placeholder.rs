//! Detection of template text echoed back by the model.

/// Values that mean the model copied the instruction schema instead of
/// writing content. Compared after trimming and lowercasing.
const PLACEHOLDERS: &[&str] = &[
    "",
    "string",
    "...",
    "<prompt text>",
    "<prompt>",
    "<prompt string>",
    "<lyrics text>",
    "<lyric text>",
    "<lyrics>",
    "<lyrics string>",
    "[prompt]",
    "[lyrics]",
    "prompt text",
    "lyric text",
    "example",
    "your prompt here",
    "your lyrics here",
];

/// The schema word models most often echo for every field.
pub(crate) const TEMPLATE_WORD: &str = "string";

/// Whether `value` is empty or a known placeholder.
///
/// # Examples
///
/// ```
/// use prompt_lyrics::output_parser::is_placeholder;
///
/// assert!(is_placeholder("  <Lyrics Text> "));
/// assert!(is_placeholder(""));
/// assert!(!is_placeholder("[verse]\nreal words"));
/// ```
pub fn is_placeholder(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    PLACEHOLDERS.contains(&v.as_str())
}

/// Whether `value` is exactly the schema word `"string"`.
pub(crate) fn is_template_word(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(TEMPLATE_WORD)
}
