//! Cleanup and parsing of JSON answers from a language model

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Fence markers: "```json" or "```" opening a line, "```" closing one
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^```json|^```|```$").expect("fence pattern is valid"));

/// Result of turning model text into a JSON object
#[derive(Debug, Clone, PartialEq)]
pub enum RepairOutcome {
    Parsed(Map<String, Value>),
    Fallback(String),
}

impl RepairOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, RepairOutcome::Parsed(_))
    }

    /// The parsed object, or `fallback` when parsing failed
    pub fn into_value(self, fallback: Value) -> Value {
        match self {
            RepairOutcome::Parsed(object) => Value::Object(object),
            RepairOutcome::Fallback(reason) => {
                tracing::warn!("Using fallback answer: {}", reason);
                fallback
            }
        }
    }
}

/// Remove markdown code fences around a model answer
pub fn strip_code_fences(text: &str) -> String {
    FENCE.replace_all(text.trim(), "").trim().to_string()
}

/// Strip fences and parse the remainder as a JSON object
pub fn parse_json_object(text: &str) -> RepairOutcome {
    let cleaned = strip_code_fences(text);

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(object)) => RepairOutcome::Parsed(object),
        Ok(other) => RepairOutcome::Fallback(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        )),
        Err(e) => RepairOutcome::Fallback(e.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ANSWER: &str = r#"{"afeccion": "Acné", "descripcion": "Inflamación del folículo.", "recomendaciones": ["a", "b"]}"#;

    #[test]
    fn test_plain_json_untouched() {
        assert_eq!(strip_code_fences(ANSWER), ANSWER);
    }

    #[test]
    fn test_fenced_with_language_tag() {
        let fenced = format!("```json\n{ANSWER}\n```");
        assert_eq!(parse_json_object(&fenced), parse_json_object(ANSWER));
        assert!(parse_json_object(&fenced).is_parsed());
    }

    #[test]
    fn test_fenced_without_language_tag() {
        let fenced = format!("```\n{ANSWER}\n```");
        assert_eq!(parse_json_object(&fenced), parse_json_object(ANSWER));
    }

    #[test]
    fn test_surrounding_whitespace() {
        let fenced = format!("  \n```json\n{ANSWER}\n```\n\n");
        assert_eq!(strip_code_fences(&fenced), ANSWER);
    }

    #[test]
    fn test_multiline_body_keeps_inner_lines() {
        let fenced = "```json\n{\n  \"descripcion\": \"x\",\n  \"recomendaciones\": []\n}\n```";
        match parse_json_object(fenced) {
            RepairOutcome::Parsed(object) => {
                assert_eq!(object["descripcion"], json!("x"));
                assert_eq!(object["recomendaciones"], json!([]));
            }
            RepairOutcome::Fallback(reason) => panic!("unexpected fallback: {reason}"),
        }
    }

    #[test]
    fn test_prose_answer_falls_back() {
        let outcome = parse_json_object("Lo siento, no puedo analizar esta imagen.");
        assert!(matches!(outcome, RepairOutcome::Fallback(_)));
    }

    #[test]
    fn test_truncated_json_falls_back() {
        let outcome = parse_json_object("```json\n{\"afeccion\": \"Acné\", \"recomen");
        assert!(!outcome.is_parsed());
    }

    #[test]
    fn test_non_object_falls_back() {
        let outcome = parse_json_object("[1, 2, 3]");
        assert_eq!(
            outcome,
            RepairOutcome::Fallback("expected a JSON object, got an array".into())
        );
    }

    #[test]
    fn test_into_value() {
        let fallback = json!({"afeccion": "No se pudo analizar"});

        let parsed = parse_json_object(r#"{"afeccion": "Rosácea"}"#).into_value(fallback.clone());
        assert_eq!(parsed, json!({"afeccion": "Rosácea"}));

        let failed = parse_json_object("nope").into_value(fallback.clone());
        assert_eq!(failed, fallback);
    }
}
