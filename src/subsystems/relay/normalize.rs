//! Reply normalisation for the marking flow.
//!
//! Models asked for JSON often wrap it in a Markdown fence or prefix it with
//! a bare `json` tag. [`normalize`] strips those artifacts; [`parse_structured`]
//! then reads a [`MarkResult`], degrading to a zero-mark explanation instead
//! of failing when the reply is not the expected JSON.

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Structured grading outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkResult {
    pub final_marks: i64,
    pub feedback: String,
}

impl MarkResult {
    /// Zero-mark result explaining that the model did not return JSON.
    pub fn unstructured(raw: &str) -> Self {
        Self {
            final_marks: 0,
            feedback: format!("AI returned an unstructured response: {raw}"),
        }
    }
}

/// Strip backtick fences and a leading `json` tag from `raw`.
pub fn normalize(raw: &str) -> String {
    let text = raw.trim().trim_matches('`').trim();
    let text = strip_json_tag(text).unwrap_or(text).trim();
    text.trim_matches('`').trim().to_string()
}

/// `Some(rest)` when `text` starts with a standalone, case-insensitive `json` word.
fn strip_json_tag(text: &str) -> Option<&str> {
    let head = text.get(..4)?;
    if !head.eq_ignore_ascii_case("json") {
        return None;
    }
    let rest = &text[4..];
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}

/// Strict parse of an already-normalised reply.
pub fn try_parse_structured(cleaned: &str) -> Result<MarkResult, RelayError> {
    serde_json::from_str(cleaned).map_err(|e| RelayError::MalformedReply(e.to_string()))
}

/// Parse `cleaned` into a [`MarkResult`], never failing.
pub fn parse_structured(cleaned: &str) -> MarkResult {
    match try_parse_structured(cleaned) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "marking reply was not structured JSON, using fallback");
            MarkResult::unstructured(cleaned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(normalize("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(normalize("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn strips_uppercase_json_tag_with_whitespace() {
        assert_eq!(normalize("  JSON \n {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(normalize("```JSON{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(normalize("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(normalize("Great answer"), "Great answer");
    }

    #[test]
    fn does_not_eat_words_starting_with_json() {
        assert_eq!(normalize("jsonify the data"), "jsonify the data");
    }

    #[test]
    fn short_input_is_safe() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("```"), "");
        assert_eq!(normalize("js"), "js");
        assert_eq!(normalize("json"), "");
    }

    #[test]
    fn multibyte_prefix_does_not_panic() {
        assert_eq!(normalize("é✓ ok"), "é✓ ok");
    }

    #[test]
    fn parses_structured_reply() {
        let r = parse_structured("{\"final_marks\": 4, \"feedback\": \"good\"}");
        assert_eq!(r, MarkResult { final_marks: 4, feedback: "good".into() });
    }

    #[test]
    fn unstructured_reply_falls_back() {
        let r = parse_structured("not json");
        assert_eq!(
            r,
            MarkResult {
                final_marks: 0,
                feedback: "AI returned an unstructured response: not json".into()
            }
        );
    }

    #[test]
    fn wrong_shape_falls_back() {
        let r = parse_structured("{\"score\": 3}");
        assert_eq!(r.final_marks, 0);
        assert!(r.feedback.contains("{\"score\": 3}"));
    }

    #[test]
    fn try_parse_reports_malformed() {
        assert!(matches!(
            try_parse_structured("nope"),
            Err(RelayError::MalformedReply(_))
        ));
    }

    #[test]
    fn fenced_reply_parses_after_normalize() {
        let raw = "```json\n{\"final_marks\": 2, \"feedback\": \"missing units\"}\n```";
        let r = parse_structured(&normalize(raw));
        assert_eq!(r.final_marks, 2);
        assert_eq!(r.feedback, "missing units");
    }
}
