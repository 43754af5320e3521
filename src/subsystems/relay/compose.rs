//! Turn composition for the conversational flow.
//!
//! A [`ChatRequest`] is the loose wire shape; [`ChatInput`] is the validated
//! form the relay works with. Validation happens once, before anything
//! touches the transcript.

use serde::Deserialize;

use crate::error::RelayError;

/// Body of `POST /gemini`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub parent_context: Option<String>,
    #[serde(default)]
    pub sub_question: Option<String>,
}

/// A validated conversational turn, ready to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInput {
    pub session_id: String,
    pub user_text: String,
}

impl TryFrom<ChatRequest> for ChatInput {
    type Error = RelayError;

    fn try_from(req: ChatRequest) -> Result<Self, Self::Error> {
        let session_id = require_session_id(req.session_id)?;
        let user_text = compose_user_text(
            req.message.as_deref(),
            req.parent_context.as_deref(),
            req.sub_question.as_deref(),
        )?;
        Ok(Self { session_id, user_text })
    }
}

/// Build the text of a new user turn.
///
/// A context + sub-question pair wins over a plain message; empty strings
/// count as absent.
pub fn compose_user_text(
    message: Option<&str>,
    parent_context: Option<&str>,
    sub_question: Option<&str>,
) -> Result<String, RelayError> {
    fn present(s: Option<&str>) -> Option<&str> {
        s.filter(|v| !v.is_empty())
    }

    match (present(parent_context), present(sub_question), present(message)) {
        (Some(context), Some(part), _) => Ok(format!(
            "Context:\n{context}\n\nNow answer this part:\n{part}"
        )),
        (_, _, Some(message)) => Ok(message.to_string()),
        _ => Err(RelayError::MissingInput),
    }
}

/// Session ids are opaque, but must not be empty.
pub(crate) fn require_session_id(session_id: String) -> Result<String, RelayError> {
    if session_id.is_empty() {
        return Err(RelayError::InvalidRequest("session_id must not be empty".into()));
    }
    Ok(session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_pair_uses_template() {
        let text = compose_user_text(None, Some("Q1 was about X"), Some("part b")).unwrap();
        assert_eq!(text, "Context:\nQ1 was about X\n\nNow answer this part:\npart b");
    }

    #[test]
    fn context_pair_wins_over_message() {
        let text = compose_user_text(Some("ignored"), Some("ctx"), Some("sub")).unwrap();
        assert!(text.starts_with("Context:\nctx"));
        assert!(!text.contains("ignored"));
    }

    #[test]
    fn plain_message_is_verbatim() {
        let text = compose_user_text(Some("  Hello\n"), None, None).unwrap();
        assert_eq!(text, "  Hello\n");
    }

    #[test]
    fn half_pair_falls_back_to_message() {
        let text = compose_user_text(Some("msg"), Some("ctx"), None).unwrap();
        assert_eq!(text, "msg");
        let text = compose_user_text(Some("msg"), None, Some("sub")).unwrap();
        assert_eq!(text, "msg");
    }

    #[test]
    fn nothing_supplied_is_missing_input() {
        assert!(matches!(compose_user_text(None, None, None), Err(RelayError::MissingInput)));
        assert!(matches!(
            compose_user_text(None, Some("ctx"), None),
            Err(RelayError::MissingInput)
        ));
    }

    #[test]
    fn empty_strings_count_as_absent() {
        assert!(matches!(
            compose_user_text(Some(""), Some(""), Some("")),
            Err(RelayError::MissingInput)
        ));
        let text = compose_user_text(Some("m"), Some(""), Some("sub")).unwrap();
        assert_eq!(text, "m");
    }

    #[test]
    fn request_validates_into_input() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"session_id":"s1","message":"Hello"}"#).unwrap();
        let input = ChatInput::try_from(req).unwrap();
        assert_eq!(input, ChatInput { session_id: "s1".into(), user_text: "Hello".into() });
    }

    #[test]
    fn empty_session_id_rejected() {
        let req = ChatRequest { message: Some("hi".into()), ..Default::default() };
        assert!(matches!(ChatInput::try_from(req), Err(RelayError::InvalidRequest(_))));
    }
}
