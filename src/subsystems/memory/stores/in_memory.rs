//! `in_memory` store: process-local transcripts.
//!
//! All data lives in process memory and is discarded when the process exits.
//! There is no expiry and no capacity bound: a session grows until it is
//! reset.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::super::store::TranscriptStore;
use super::super::types::{StoreStats, Turn};

/// Ephemeral transcript store keyed by session id.
#[derive(Default)]
pub struct InMemoryStore {
    /// session_id -> turns in insertion order
    sessions: RwLock<HashMap<String, Vec<Turn>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// A writer that panicked mid-operation leaves at worst one missing turn;
// the map itself stays usable, so poisoned locks are recovered.
impl TranscriptStore for InMemoryStore {
    fn store_type(&self) -> &str {
        "in_memory"
    }

    fn get(&self, session_id: &str) -> Vec<Turn> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.get(session_id).cloned().unwrap_or_default()
    }

    fn append(&self, session_id: &str, turn: Turn) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.entry(session_id.to_string()).or_default().push(turn);
    }

    fn ensure(&self, session_id: &str) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.entry(session_id.to_string()).or_default();
    }

    fn reset(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(session_id).is_some()
    }

    fn contains(&self, session_id: &str) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.contains_key(session_id)
    }

    fn session_ids(&self) -> Vec<String> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<String> = sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn stats(&self) -> StoreStats {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        StoreStats {
            total_sessions: sessions.len(),
            total_messages: sessions.values().map(Vec::len).sum(),
        }
    }
}
