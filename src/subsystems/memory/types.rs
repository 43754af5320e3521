//! Transcript value types.
//!
//! A [`Turn`] is one message in a session transcript. Turns are immutable
//! once appended; the only way to drop one is to reset the whole session.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
///
/// Serialised as `"user"` / `"model"`, matching the role names the Gemini
/// API uses for conversation contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }
}

/// Aggregate counts across all sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_sessions: usize,
    pub total_messages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_serialises_with_lowercase_role() {
        let json = serde_json::to_value(Turn::model("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "model", "text": "hi" }));
    }

    #[test]
    fn role_round_trips_from_wire_name() {
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
        assert_eq!(role.to_string(), "user");
    }
}
