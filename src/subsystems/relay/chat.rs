//! Conversational flow: one user turn in, one model turn out.

use tracing::{debug, info, warn};

use crate::error::RelayError;
use crate::llm::{ProviderKind, ProviderRequest};
use crate::subsystems::memory::Turn;

use super::compose::ChatInput;
use super::Relay;

impl Relay {
    /// Append the user turn, send the full transcript to the Gemini slot and
    /// append the reply.
    ///
    /// The session lock is held for the whole exchange. When the provider
    /// call fails the user turn stays in the transcript and no model turn is
    /// appended.
    pub async fn chat(&self, input: ChatInput) -> Result<String, RelayError> {
        let ChatInput { session_id, user_text } = input;
        let provider = self.provider(ProviderKind::Gemini);

        let session = self.memory().lock_session(&session_id).await;
        session.append(Turn::user(user_text));
        let transcript = session.transcript();

        debug!(%session_id, turns = transcript.len(), backend = provider.backend(), "relaying transcript");

        let reply = match provider.send(ProviderRequest::Transcript(&transcript)).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(%session_id, error = %e, "chat provider call failed, user turn kept");
                return Err(RelayError::from_provider(ProviderKind::Gemini.as_str(), e));
            }
        };

        session.append(Turn::model(reply.clone()));
        info!(%session_id, turns = transcript.len() + 1, "chat exchange complete");
        Ok(reply)
    }
}
