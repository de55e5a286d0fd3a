//! Dialogue script model and validation of generated output

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::ComposeError;

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n").unwrap());
static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n```[ \t]*$").unwrap());

/// One utterance. `text` may carry bracketed directives like `[laughing]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
}

impl DialogueLine {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// Ordered dialogue, in playback order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueScript(Vec<DialogueLine>);

impl DialogueScript {
    pub fn new(lines: Vec<DialogueLine>) -> Self {
        Self(lines)
    }

    pub fn lines(&self) -> &[DialogueLine] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keep only the first `max_lines` lines
    pub fn truncate(mut self, max_lines: usize) -> Self {
        self.0.truncate(max_lines);
        self
    }

    /// Human-readable JSON array of `{speaker, text}`
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

impl From<Vec<DialogueLine>> for DialogueScript {
    fn from(lines: Vec<DialogueLine>) -> Self {
        Self(lines)
    }
}

/// Remove a surrounding markdown code fence, if any.
///
/// Clean text passes through unchanged (apart from outer whitespace).
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let mut inner = trimmed;
    if let Some(m) = FENCE_OPEN.find(inner) {
        inner = &inner[m.end()..];
    } else if let Some(rest) = inner.strip_prefix("```") {
        inner = rest;
    }
    if let Some(m) = FENCE_CLOSE.find(inner) {
        inner = &inner[..m.start()];
    } else if let Some(rest) = inner.strip_suffix("```") {
        inner = rest;
    }
    inner.trim()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse and validate model output against the two allowed speakers.
///
/// Checks run in order and the first failure is returned: JSON syntax,
/// top-level array, `speaker`/`text` presence (and `text` being a string),
/// speaker membership, and
/// finally non-empty text.
pub fn parse_script(raw: &str, speakers: [&str; 2]) -> Result<DialogueScript, ComposeError> {
    let cleaned = strip_code_fences(raw);

    let value: Value =
        serde_json::from_str(cleaned).map_err(|e| ComposeError::MalformedOutput {
            message: e.to_string(),
        })?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(ComposeError::NotAnArray {
                found: json_type_name(&other),
            });
        }
    };

    let mut pairs = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let speaker = entry.get("speaker");
        let text = entry.get("text");
        match (speaker, text) {
            (Some(_), Some(text)) if !text.is_string() => {
                return Err(ComposeError::InvalidField {
                    index,
                    field: "text",
                    found: json_type_name(text),
                });
            }
            (Some(speaker), Some(text)) => pairs.push((speaker, text)),
            (None, _) => {
                return Err(ComposeError::MissingField {
                    index,
                    field: "speaker",
                });
            }
            (_, None) => return Err(ComposeError::MissingField { index, field: "text" }),
        }
    }

    let mut lines = Vec::with_capacity(pairs.len());
    for (speaker, text) in &pairs {
        let speaker = match speaker {
            Value::String(s) if speakers.contains(&s.as_str()) => s.clone(),
            other => {
                return Err(ComposeError::UnknownSpeaker {
                    speaker: other.as_str().map_or_else(|| other.to_string(), String::from),
                    expected: [speakers[0].to_string(), speakers[1].to_string()],
                });
            }
        };
        let text = text.as_str().unwrap_or_default().to_string();
        lines.push(DialogueLine { speaker, text });
    }

    if let Some(index) = lines.iter().position(|l| l.text.trim().is_empty()) {
        return Err(ComposeError::EmptyText { index });
    }

    Ok(DialogueScript(lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEAKERS: [&str; 2] = ["Ravi", "Priya"];

    #[test]
    fn test_parse_valid_script() {
        let raw = r#"[
            {"speaker": "Ravi", "text": "[shouting] Arre Priya!"},
            {"speaker": "Priya", "text": "[interrupting] Bas kar bhai."}
        ]"#;
        let script = parse_script(raw, SPEAKERS).unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script.lines()[0], DialogueLine::new("Ravi", "[shouting] Arre Priya!"));
        assert_eq!(script.lines()[1].speaker, "Priya");
    }

    #[test]
    fn test_parse_fenced_script() {
        let raw = "```json\n[{\"speaker\": \"Ravi\", \"text\": \"Hi\"}]\n```";
        let script = parse_script(raw, SPEAKERS).unwrap();
        assert_eq!(script.lines(), &[DialogueLine::new("Ravi", "Hi")]);
    }

    #[test]
    fn test_parse_empty_array_is_valid() {
        let script = parse_script("[]", SPEAKERS).unwrap();
        assert!(script.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_script("{invalid json}", SPEAKERS).unwrap_err();
        assert!(matches!(err, ComposeError::MalformedOutput { .. }));
    }

    #[test]
    fn test_empty_output_is_malformed() {
        let err = parse_script("   ", SPEAKERS).unwrap_err();
        assert!(matches!(err, ComposeError::MalformedOutput { .. }));
    }

    #[test]
    fn test_not_an_array() {
        let err = parse_script(r#"{"speaker": "Ravi", "text": "Hi"}"#, SPEAKERS).unwrap_err();
        assert_eq!(err, ComposeError::NotAnArray { found: "object" });
    }

    #[test]
    fn test_missing_text_field() {
        let err = parse_script(r#"[{"speaker": "Ravi"}]"#, SPEAKERS).unwrap_err();
        assert_eq!(err, ComposeError::MissingField { index: 0, field: "text" });
    }

    #[test]
    fn test_missing_speaker_field() {
        let raw = r#"[{"speaker": "Ravi", "text": "ok"}, {"text": "Hello"}]"#;
        let err = parse_script(raw, SPEAKERS).unwrap_err();
        assert_eq!(
            err,
            ComposeError::MissingField {
                index: 1,
                field: "speaker"
            }
        );
    }

    #[test]
    fn test_non_object_entry_is_missing_field() {
        let err = parse_script(r#"["just a string"]"#, SPEAKERS).unwrap_err();
        assert!(matches!(err, ComposeError::MissingField { index: 0, .. }));
    }

    #[test]
    fn test_unknown_speaker() {
        let raw = r#"[{"speaker": "InvalidSpeaker", "text": "Hello"}]"#;
        let err = parse_script(raw, SPEAKERS).unwrap_err();
        match err {
            ComposeError::UnknownSpeaker { speaker, expected } => {
                assert_eq!(speaker, "InvalidSpeaker");
                assert_eq!(expected, ["Ravi".to_string(), "Priya".to_string()]);
            }
            other => panic!("expected UnknownSpeaker, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_field_wins_over_unknown_speaker() {
        // Field presence is checked for every entry before speaker names
        let raw = r#"[{"speaker": "Host", "text": "Hi"}, {"speaker": "Ravi"}]"#;
        let err = parse_script(raw, SPEAKERS).unwrap_err();
        assert!(matches!(err, ComposeError::MissingField { index: 1, .. }));
    }

    #[test]
    fn test_non_string_text_rejected() {
        for (text, found) in [("null", "null"), ("42", "number"), (r#"{"a": 1}"#, "object")] {
            let raw = format!(r#"[{{"speaker": "Ravi", "text": {text}}}]"#);
            assert_eq!(
                parse_script(&raw, SPEAKERS).unwrap_err(),
                ComposeError::InvalidField {
                    index: 0,
                    field: "text",
                    found
                }
            );
        }
    }

    #[test]
    fn test_non_string_text_reported_at_its_index() {
        let raw = r#"[{"speaker": "Ravi", "text": "Hi"}, {"speaker": "Priya", "text": ["Hello"]}]"#;
        let err = parse_script(raw, SPEAKERS).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidField { index: 1, field: "text", found: "array" }));
        assert!(err.to_string().contains("must be a string"));
    }

    #[test]
    fn test_empty_text_rejected_after_speaker_check() {
        let raw = r#"[{"speaker": "Ravi", "text": "  "}]"#;
        assert_eq!(
            parse_script(raw, SPEAKERS).unwrap_err(),
            ComposeError::EmptyText { index: 0 }
        );

        let raw = r#"[{"speaker": "Ravi", "text": ""}, {"speaker": "Host", "text": "x"}]"#;
        assert!(matches!(
            parse_script(raw, SPEAKERS).unwrap_err(),
            ComposeError::UnknownSpeaker { .. }
        ));
    }

    #[test]
    fn test_strip_fences_is_idempotent() {
        let clean = r#"[{"speaker": "Ravi", "text": "Hi"}]"#;
        assert_eq!(strip_code_fences(clean), clean);
        assert_eq!(strip_code_fences(strip_code_fences(clean)), clean);

        let fenced = format!("```json\n{clean}\n```");
        let once = strip_code_fences(&fenced);
        assert_eq!(once, clean);
        assert_eq!(strip_code_fences(once), once);
    }

    #[test]
    fn test_strip_fences_without_language_tag() {
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("  ```JSON\r\n[1]\r\n```  "), "[1]");
    }

    #[test]
    fn test_truncate_keeps_first_lines() {
        let script = DialogueScript::new(vec![
            DialogueLine::new("Ravi", "one"),
            DialogueLine::new("Priya", "two"),
            DialogueLine::new("Ravi", "three"),
            DialogueLine::new("Priya", "four"),
        ]);
        let short = script.clone().truncate(3);
        assert_eq!(short.len(), 3);
        assert_eq!(short.lines()[2].text, "three");
        assert_eq!(script.truncate(10).len(), 4);
    }

    #[test]
    fn test_pretty_json_preserves_non_ascii() {
        let script = DialogueScript::new(vec![DialogueLine::new("Priya", "नमस्ते yaar")]);
        let json = script.to_pretty_json();
        assert!(json.contains("नमस्ते yaar"));
        assert!(json.contains("\"speaker\": \"Priya\""));
    }
}
