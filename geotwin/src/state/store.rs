//! Per-session state stores and the cross-session registry.

use super::SessionState;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Identifier of one user session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a fresh random session id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Holds one session's state and exposes safe read/replace operations.
///
/// `snapshot` returns an owned copy; callers mutate their copy freely and
/// nothing is reflected until `apply`. `apply` atomically replaces the whole
/// stored snapshot under the session mutex, so overlapping triggers for the
/// same session serialize on it and the last `apply` to complete wins in its
/// entirety. That last-writer-wins race across overlapping runs is a
/// documented limitation, not a merge guarantee.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: Mutex<SessionState>,
}

impl SessionStore {
    /// Creates a store holding an empty session state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given state.
    #[must_use]
    pub fn with_state(state: SessionState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Returns an owned copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.lock().clone()
    }

    /// Atomically replaces the stored snapshot.
    pub fn apply(&self, new_state: SessionState) {
        *self.state.lock() = new_state;
    }
}

/// Hands out independent per-session stores.
///
/// Sessions never share state: each id maps to its own [`SessionStore`] and
/// no key leaks across sessions. Independent sessions run fully in parallel.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<SessionStore>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the store for a session, creating it on first use.
    #[must_use]
    pub fn open(&self, id: SessionId) -> Arc<SessionStore> {
        self.sessions
            .entry(id)
            .or_insert_with(Arc::default)
            .value()
            .clone()
    }

    /// Discards a session's store. Returns true if the session existed.
    pub fn close(&self, id: SessionId) -> bool {
        self.sessions.remove(&id).is_some()
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no sessions are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_is_a_copy() {
        let store = SessionStore::new();
        let mut snapshot = store.snapshot();
        snapshot.insert("material_input", json!(150));

        // Nothing is reflected until apply.
        assert!(store.snapshot().is_empty());

        store.apply(snapshot);
        assert_eq!(store.snapshot().number("material_input"), Some(150.0));
    }

    #[test]
    fn test_apply_replaces_whole_snapshot() {
        let mut seeded = SessionState::new();
        seeded.insert("material_input", json!(150));
        seeded.insert("modal_result", json!([]));
        let store = SessionStore::with_state(seeded);

        let mut replacement = SessionState::new();
        replacement.insert("material_input", json!(200));
        store.apply(replacement);

        let current = store.snapshot();
        assert_eq!(current.number("material_input"), Some(200.0));
        // No field-level merge: the old modal_result is gone.
        assert!(!current.contains_key("modal_result"));
    }

    #[test]
    fn test_overlapping_applies_last_writer_wins() {
        let store = SessionStore::new();

        // Two triggers snapshot the same initial state.
        let mut run_one = store.snapshot();
        let mut run_two = store.snapshot();
        run_one.insert("simulation_result", json!("run one"));
        run_two.insert("simulation_result", json!("run two"));
        run_two.insert("modal_result", json!([1, 2]));

        // Run two finishes first; run one completes last and wins entirely.
        store.apply(run_two);
        store.apply(run_one);

        let current = store.snapshot();
        assert_eq!(current.get("simulation_result"), Some(&json!("run one")));
        assert!(!current.contains_key("modal_result"));
    }

    #[test]
    fn test_registry_isolates_sessions() {
        let registry = SessionRegistry::new();
        let first = SessionId::new();
        let second = SessionId::new();

        let mut state = registry.open(first).snapshot();
        state.insert("material_input", json!(150));
        registry.open(first).apply(state);

        assert!(registry.open(second).snapshot().is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registry_open_returns_same_store() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();

        let store = registry.open(id);
        let mut state = store.snapshot();
        state.insert("material_input", json!(1));
        store.apply(state);

        assert_eq!(
            registry.open(id).snapshot().number("material_input"),
            Some(1.0)
        );
    }

    #[test]
    fn test_registry_close_discards_state() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();

        let store = registry.open(id);
        let mut state = store.snapshot();
        state.insert("material_input", json!(1));
        store.apply(state);

        assert!(registry.close(id));
        assert!(!registry.close(id));
        // Reopening yields a fresh, empty session.
        assert!(registry.open(id).snapshot().is_empty());
    }
}
