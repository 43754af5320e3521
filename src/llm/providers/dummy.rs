//! Dummy LLM provider. Echoes the latest user text back prefixed with `[echo]`.
//! Used for running the relay end to end without a real API key.

use crate::llm::{ProviderError, ProviderRequest};
use crate::subsystems::memory::Role;

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn send(&self, request: ProviderRequest<'_>) -> Result<String, ProviderError> {
        let content = match request {
            ProviderRequest::Transcript(turns) => turns
                .iter()
                .rev()
                .find(|t| t.role == Role::User)
                .map(|t| t.text.as_str())
                .unwrap_or_default(),
            ProviderRequest::Prompt { user, .. } => user,
        };
        Ok(format!("[echo] {content}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsystems::memory::Turn;

    #[tokio::test]
    async fn echoes_prompt() {
        let p = DummyProvider;
        let out = p.send(ProviderRequest::Prompt { system: Some("sys"), user: "hello" }).await.unwrap();
        assert_eq!(out, "[echo] hello");
    }

    #[tokio::test]
    async fn echoes_latest_user_turn() {
        let p = DummyProvider;
        let turns = vec![Turn::user("first"), Turn::model("reply"), Turn::user("second")];
        let out = p.send(ProviderRequest::Transcript(&turns)).await.unwrap();
        assert_eq!(out, "[echo] second");
    }

    #[tokio::test]
    async fn empty_transcript() {
        let p = DummyProvider;
        assert_eq!(p.send(ProviderRequest::Transcript(&[])).await.unwrap(), "[echo] ");
    }
}
