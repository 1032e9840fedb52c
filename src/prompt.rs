//! Instruction text for the songwriting model.
//!
//! Building the instructions is plain templating: [`render`] fills `{key}`
//! placeholders and [`build_instructions`] supplies the keys from a
//! [`RequestContext`].

use std::collections::HashMap;

use crate::output_parser::INSTRUMENTAL_MARKER;
use crate::types::RequestContext;

/// Songwriting instructions. `{{`/`}}` are literal braces.
const INSTRUCTIONS: &str = r#"You write two things for a text-to-music model:
  1) a 'prompt': one line of comma-separated style tags describing the sound,
  2) optional 'lyrics' split into clear sections.

Reply ONLY with a single JSON object with exactly these keys:
  {{ "prompt": "...", "lyrics": "...", "title": "..." }}

PROMPT:
- Include genre, tempo in bpm, two to five instruments, mix texture and mood.

LYRICS:
- Use section tags such as [intro], [verse], [chorus], [bridge], [outro],
  each on its own line followed by three to six short lines.
- Most line endings in each section should rhyme (ABAB or AABB).
- Keep lines singable with a steady rhythm. Emoji are optional and rare.
- For a purely instrumental track set "lyrics" to exactly "[inst]".

TITLE:
- Two to six words in Title Case, no quotes, no trailing punctuation.

Never use placeholders such as 'string', '...', '<prompt text>' or
'<lyrics text>' as a whole field.
{focus}{length_hints}
EXAMPLE OF THE SHAPE (do not copy the words):
{{
  "prompt": "dusty americana, mid-tempo 96 bpm, slide guitar, upright bass, brushed drums, warm tape saturation, wistful",
  "lyrics": "[verse]\nHeadlights fading down the line\nOne more mile and one more sign\n\n[chorus]\n...",
  "title": "Mile Marker Nine"
}}

Song concept (do not copy it word for word):
{concept}

Reply now with ONLY the JSON object."#;

/// Render a template with `{key}` substitution.
///
/// Single pass, left to right: `{{` and `}}` become literal braces, `{key}`
/// is replaced when `key` is in `vars`, and any other brace is copied as-is.
/// Substituted values are never re-scanned.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use prompt_lyrics::prompt::render;
///
/// let vars = HashMap::from([("name".to_string(), "{Alice}".to_string())]);
/// let result = render("Hello {name}, JSON: {{\"key\": \"val\"}} {unknown}", &vars);
/// assert_eq!(result, r#"Hello {Alice}, JSON: {"key": "val"} {unknown}"#);
/// ```
pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(idx) = rest.find(['{', '}']) {
        rendered.push_str(&rest[..idx]);
        let tail = &rest[idx..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            rendered.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }

        if tail.starts_with('{') {
            if let Some(close) = tail.find('}') {
                if let Some(value) = vars.get(&tail[1..close]) {
                    rendered.push_str(value);
                    rest = &tail[close + 1..];
                    continue;
                }
            }
        }

        rendered.push_str(&tail[..1]);
        rest = &tail[1..];
    }
    rendered.push_str(rest);
    rendered
}

/// Length hints for the lyrics, one `- ...` line each. Empty when the
/// request sets no targets.
pub fn length_hints(ctx: &RequestContext) -> Vec<String> {
    let mut hints = Vec::new();
    if ctx.target_lines > 0 {
        hints.push(format!("- Aim for about {} lines of lyrics.", ctx.target_lines));
    }
    if ctx.target_seconds > 0.0 {
        hints.push(format!(
            "- Imagine a song of about {} seconds total.",
            ctx.target_seconds.trunc() as u64
        ));
    }
    hints
}

fn focus_rules(ctx: &RequestContext) -> String {
    let mut rules = String::new();
    if !ctx.want_lyrics {
        rules.push_str(&format!(
            "- For this request the \"prompt\" field matters most. Set \"lyrics\" to exactly \"{}\" and do not write any verses.\n",
            INSTRUMENTAL_MARKER
        ));
    }
    if !ctx.want_prompt {
        rules.push_str(
            "- For this request the lyrics matter more than the prompt, but you MUST still output all keys.\n",
        );
    }
    rules
}

/// The full instruction text for one request.
pub fn build_instructions(ctx: &RequestContext) -> String {
    let hints = length_hints(ctx);
    let length_hints = if hints.is_empty() {
        String::new()
    } else {
        format!("\nLength hints for the lyrics:\n{}\n", hints.join("\n"))
    };

    let vars = HashMap::from([
        ("concept".to_string(), ctx.concept.trim().to_string()),
        ("focus".to_string(), focus_rules(ctx)),
        ("length_hints".to_string(), length_hints),
    ]);
    render(INSTRUCTIONS, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_basic() {
        let result = render("Hello {name}, process {input}", &vars(&[("name", "Alice"), ("input", "data")]));
        assert_eq!(result, "Hello Alice, process data");
    }

    #[test]
    fn test_render_no_placeholders() {
        assert_eq!(render("static prompt", &HashMap::new()), "static prompt");
    }

    #[test]
    fn test_render_escaped_braces() {
        let result = render("Output format: {{\"result\": {{\"value\": 42}}}}", &HashMap::new());
        assert_eq!(result, r#"Output format: {"result": {"value": 42}}"#);
    }

    #[test]
    fn test_render_values_not_rescanned() {
        let result = render("{a}{b}", &vars(&[("a", "{b}"), ("b", "x")]));
        assert_eq!(result, "{b}x");
    }

    #[test]
    fn test_render_unclosed_brace() {
        assert_eq!(render("trailing {name", &vars(&[("name", "x")])), "trailing {name");
    }

    #[test]
    fn test_instructions_contain_concept_and_shape() {
        let text = build_instructions(&RequestContext::new("  rainy tokyo jazz  "));
        assert!(text.contains("\nrainy tokyo jazz\n"));
        assert!(text.contains(r#"{ "prompt": "...", "lyrics": "...", "title": "..." }"#));
        assert!(!text.contains("{concept}"));
        assert!(!text.contains("Length hints"));
    }

    #[test]
    fn test_length_hints_only_when_set() {
        let ctx = RequestContext::new("x")
            .with_target_lines(16)
            .with_target_seconds(95.7);
        assert_eq!(
            length_hints(&ctx),
            vec![
                "- Aim for about 16 lines of lyrics.".to_string(),
                "- Imagine a song of about 95 seconds total.".to_string(),
            ]
        );
        assert!(build_instructions(&ctx).contains("Length hints for the lyrics:"));
    }

    #[test]
    fn test_instrumental_focus() {
        let text = build_instructions(&RequestContext::new("x").with_lyrics(false));
        assert!(text.contains(r#"Set "lyrics" to exactly "[inst]""#));
    }

    #[test]
    fn test_example_keeps_escaped_newlines() {
        let text = build_instructions(&RequestContext::new("x"));
        assert!(text.contains(r"[verse]\nHeadlights"));
    }
}
