//! Coercion of loosely typed JSON field values into trimmed strings.
//!
//! Models return `"prompt": "a, b"` as often as `"prompt": ["a", "b"]`, and
//! lyrics come back as one string or as a list of lines. [`FieldValue`]
//! captures the two shapes so normalization is an exhaustive match.

use serde_json::{Map, Value};

/// A JSON field value reduced to the two shapes the engine cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    Sequence(Vec<String>),
}

impl FieldValue {
    /// Classify a JSON value.
    ///
    /// `null` and `false` become an empty scalar. Numbers, `true` and nested
    /// objects are stringified. Array elements are stringified the same way.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => FieldValue::Sequence(items.iter().map(scalar_text).collect()),
            other => FieldValue::Scalar(scalar_text(other)),
        }
    }

    /// Collapse to a trimmed string. Sequence elements that are blank are
    /// dropped; the rest are joined with `separator`.
    pub fn join(&self, separator: &str) -> String {
        match self {
            FieldValue::Scalar(s) => s.trim().to_string(),
            FieldValue::Sequence(items) => items
                .iter()
                .filter(|item| !item.trim().is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(separator)
                .trim()
                .to_string(),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The three output fields as read from a parsed object, before any
/// placeholder guard or fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFields {
    pub prompt: String,
    pub lyrics: String,
    pub title: String,
}

impl NormalizedFields {
    /// Read `prompt`, `lyrics` and `title` from `object`. Missing keys become
    /// empty strings. Lyrics lists are joined by line; the others by space.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let field = |key: &str, separator: &str| {
            object
                .get(key)
                .map(|v| FieldValue::from_json(v).join(separator))
                .unwrap_or_default()
        };

        Self {
            prompt: field("prompt", " "),
            lyrics: field("lyrics", "\n"),
            title: field("title", " "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_string_trimmed() {
        let v = FieldValue::from_json(&json!("  lofi hip hop \n"));
        assert_eq!(v.join(" "), "lofi hip hop");
    }

    #[test]
    fn sequence_skips_blank_items() {
        let v = FieldValue::from_json(&json!(["lofi", "  ", "", "70 bpm"]));
        assert_eq!(v, FieldValue::Sequence(vec![
            "lofi".into(),
            "  ".into(),
            "".into(),
            "70 bpm".into()
        ]));
        assert_eq!(v.join(" "), "lofi 70 bpm");
    }

    #[test]
    fn null_and_false_are_empty() {
        assert_eq!(FieldValue::from_json(&Value::Null).join(" "), "");
        assert_eq!(FieldValue::from_json(&json!(false)).join(" "), "");
    }

    #[test]
    fn numbers_stringify() {
        assert_eq!(FieldValue::from_json(&json!(42)).join(" "), "42");
        assert_eq!(FieldValue::from_json(&json!([1, null, 2])).join(" "), "1 2");
    }

    #[test]
    fn lyrics_list_joined_by_line() {
        let obj = json!({
            "prompt": ["folk", "lute"],
            "lyrics": ["[verse]", "line one", "line two"],
        });
        let fields = NormalizedFields::from_object(obj.as_object().unwrap());
        assert_eq!(fields.prompt, "folk lute");
        assert_eq!(fields.lyrics, "[verse]\nline one\nline two");
        assert_eq!(fields.title, "");
    }
}
