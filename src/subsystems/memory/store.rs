//! Store trait: the data operations a transcript backend supports.
//!
//! Every operation is synchronous and infallible: unknown sessions read as
//! empty, appends create the session, and resets of unknown sessions are
//! no-ops. Call sites go through [`MemorySystem`](super::MemorySystem), so a
//! different backend can be slotted in without touching them.

use super::types::{StoreStats, Turn};

/// Pluggable transcript backend, shared process-wide.
pub trait TranscriptStore: Send + Sync {
    /// Unique type name for this store (e.g. `"in_memory"`).
    fn store_type(&self) -> &str;

    /// Full ordered transcript for `session_id`; empty when unknown.
    fn get(&self, session_id: &str) -> Vec<Turn>;

    /// Append `turn`, creating the session if absent.
    fn append(&self, session_id: &str, turn: Turn);

    /// Create an empty transcript if the session is absent.
    fn ensure(&self, session_id: &str);

    /// Remove the session entirely. Returns `true` if it existed.
    fn reset(&self, session_id: &str) -> bool;

    fn contains(&self, session_id: &str) -> bool;

    /// All known session ids, sorted.
    fn session_ids(&self) -> Vec<String>;

    fn stats(&self) -> StoreStats;
}
