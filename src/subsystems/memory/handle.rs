//! [`SessionHandle`]: exclusive access to one session's transcript.
//!
//! Obtained from [`MemorySystem::lock_session`](super::MemorySystem::lock_session).
//! While a handle is alive no other request can read-modify-append the same
//! session through the memory system, so a user turn and the model turn that
//! answers it are always adjacent.

use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;

use super::store::TranscriptStore;
use super::types::Turn;

pub struct SessionHandle {
    session_id: String,
    store: Arc<dyn TranscriptStore>,
    _guard: OwnedMutexGuard<()>,
}

impl SessionHandle {
    pub(crate) fn new(
        session_id: String,
        store: Arc<dyn TranscriptStore>,
        guard: OwnedMutexGuard<()>,
    ) -> Self {
        Self { session_id, store, _guard: guard }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Full ordered transcript as of now.
    pub fn transcript(&self) -> Vec<Turn> {
        self.store.get(&self.session_id)
    }

    pub fn append(&self, turn: Turn) {
        self.store.append(&self.session_id, turn);
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("session_id", &self.session_id)
            .field("store", &self.store.store_type())
            .finish()
    }
}
