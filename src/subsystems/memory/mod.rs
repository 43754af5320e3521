//! Memory subsystem: session transcripts and session lifecycle.
//!
//! A session is identified by an opaque string key and owns an ordered list
//! of [`Turn`]s. Its lifecycle has two states:
//!
//! ```text
//! Absent ──append / ensure──▶ Active ──reset──▶ Absent
//! ```
//!
//! There is no time-based transition and no capacity bound.
//!
//! [`MemorySystem`] is constructed once at startup and shared via `Arc`. It
//! pairs a pluggable [`TranscriptStore`] with a registry of per-session async
//! mutexes: flows that read the transcript, await a provider and then append
//! take a [`SessionHandle`] first, so concurrent requests for the same
//! session id are serialised while different sessions proceed in parallel.

pub mod handle;
pub mod store;
pub mod stores;
pub mod types;

pub use handle::SessionHandle;
pub use store::TranscriptStore;
pub use types::{Role, StoreStats, Turn};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

/// Central memory system.
pub struct MemorySystem {
    store: Arc<dyn TranscriptStore>,
    /// session_id -> per-session mutex
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl MemorySystem {
    /// Memory system backed by the process-local [`InMemoryStore`](stores::in_memory::InMemoryStore).
    pub fn new() -> Self {
        Self::with_store(Arc::new(stores::in_memory::InMemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn TranscriptStore>) -> Self {
        info!(store = store.store_type(), "memory system initialised");
        Self { store, locks: Mutex::new(HashMap::new()) }
    }

    // ── Transcript access ─────────────────────────────────────────────

    /// Full transcript for `session_id`; empty when the session is unknown.
    pub fn get(&self, session_id: &str) -> Vec<Turn> {
        self.store.get(session_id)
    }

    /// Transcript for `session_id`, or `None` when the session is absent.
    pub fn find(&self, session_id: &str) -> Option<Vec<Turn>> {
        self.store
            .contains(session_id)
            .then(|| self.store.get(session_id))
    }

    /// Append without taking the session lock. Single-step writers only;
    /// read-await-append flows go through [`lock_session`](Self::lock_session).
    pub fn append(&self, session_id: &str, turn: Turn) {
        self.store.append(session_id, turn);
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.store.session_ids()
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────

    /// Create an empty transcript if the session is absent. Idempotent.
    pub fn ensure(&self, session_id: &str) {
        self.store.ensure(session_id);
    }

    /// Wait for exclusive access to `session_id`.
    pub async fn lock_session(&self, session_id: &str) -> SessionHandle {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(session_id.to_string()).or_default().clone()
        };
        let guard = lock.lock_owned().await;
        debug!(%session_id, "session lock acquired");
        SessionHandle::new(session_id.to_string(), self.store.clone(), guard)
    }

    /// Remove the session's transcript. Idempotent.
    ///
    /// Waits for any in-flight exchange on the same session to finish, so a
    /// reply never lands in a transcript that was reset underneath it.
    pub async fn reset(&self, session_id: &str) {
        let handle = self.lock_session(session_id).await;
        let existed = self.store.reset(session_id);
        drop(handle);
        self.prune_lock(session_id);
        info!(%session_id, existed, "session reset");
    }

    /// Drop the registry entry when nobody else holds or awaits it.
    fn prune_lock(&self, session_id: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(session_id)
            .is_some_and(|l| Arc::strong_count(l) == 1)
        {
            locks.remove(session_id);
        }
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for MemorySystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn get_returns_appends_in_order() {
        let mem = MemorySystem::new();
        mem.append("s1", Turn::user("a"));
        mem.append("s1", Turn::model("b"));
        mem.append("s1", Turn::user("c"));
        assert_eq!(
            mem.get("s1"),
            vec![Turn::user("a"), Turn::model("b"), Turn::user("c")]
        );
    }

    #[test]
    fn find_distinguishes_absent_from_empty() {
        let mem = MemorySystem::new();
        assert!(mem.find("s").is_none());
        mem.ensure("s");
        assert_eq!(mem.find("s"), Some(vec![]));
    }

    #[tokio::test]
    async fn reset_clears_existing_and_unknown_sessions() {
        let mem = MemorySystem::new();
        mem.append("s1", Turn::user("hello"));
        mem.reset("s1").await;
        assert!(mem.get("s1").is_empty());
        assert!(mem.find("s1").is_none());

        mem.reset("never-seen").await;
        assert!(mem.get("never-seen").is_empty());
    }

    #[tokio::test]
    async fn handle_reads_and_appends() {
        let mem = MemorySystem::new();
        let handle = mem.lock_session("s").await;
        handle.append(Turn::user("q"));
        handle.append(Turn::model("a"));
        assert_eq!(handle.session_id(), "s");
        assert_eq!(handle.transcript().len(), 2);
        drop(handle);
        assert_eq!(mem.get("s"), vec![Turn::user("q"), Turn::model("a")]);
    }

    #[tokio::test]
    async fn same_session_is_serialised() {
        let mem = Arc::new(MemorySystem::new());
        let first = mem.lock_session("s").await;

        let mem2 = mem.clone();
        let waiter = tokio::spawn(async move {
            let h = mem2.lock_session("s").await;
            h.append(Turn::user("second"));
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished(), "second lock must wait for the first");

        first.append(Turn::user("first"));
        first.append(Turn::model("reply"));
        drop(first);

        waiter.await.unwrap();
        assert_eq!(
            mem.get("s"),
            vec![Turn::user("first"), Turn::model("reply"), Turn::user("second")]
        );
    }

    #[tokio::test]
    async fn different_sessions_do_not_block() {
        let mem = MemorySystem::new();
        let _a = mem.lock_session("a").await;
        let b = tokio::time::timeout(Duration::from_millis(100), mem.lock_session("b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn reset_waits_for_in_flight_exchange() {
        let mem = Arc::new(MemorySystem::new());
        let handle = mem.lock_session("s").await;
        handle.append(Turn::user("q"));

        let mem2 = mem.clone();
        let reset = tokio::spawn(async move { mem2.reset("s").await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!reset.is_finished());
        handle.append(Turn::model("a"));
        drop(handle);

        reset.await.unwrap();
        assert!(mem.get("s").is_empty());
    }

    #[tokio::test]
    async fn reset_prunes_idle_lock_entry() {
        let mem = MemorySystem::new();
        drop(mem.lock_session("s").await);
        assert_eq!(mem.lock_count(), 1);
        mem.reset("s").await;
        assert_eq!(mem.lock_count(), 0);
    }
}
