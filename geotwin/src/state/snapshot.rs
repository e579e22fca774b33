//! The immutable-per-operation session state snapshot.

use super::keys;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One user session's accumulated results and errors.
///
/// A flat mapping from namespaced string keys to JSON-compatible values
/// (numbers, strings, nested mappings, tables as lists of row-mappings).
/// The store hands out owned copies and every orchestrator run merges into a
/// fresh clone, so a snapshot held by one reader is never mutated underneath
/// it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionState {
    entries: HashMap<String, serde_json::Value>,
}

impl SessionState {
    /// Creates an empty session state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session state from existing entries.
    #[must_use]
    pub fn from_entries(entries: HashMap<String, serde_json::Value>) -> Self {
        Self { entries }
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    /// Checks if a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a value, overwriting any previous entry for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.entries.insert(key.into(), value);
    }

    /// Merges stage output entries into this state, last writer wins per key.
    ///
    /// Merging is additive: keys are only inserted or overwritten, never
    /// removed.
    pub fn merge(&mut self, output: &HashMap<String, serde_json::Value>) {
        for (key, value) in output {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Returns a numeric value, accepting any JSON number representation.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.entries.get(key).and_then(serde_json::Value::as_f64)
    }

    /// Returns a table-valued entry as its list of row-mappings.
    #[must_use]
    pub fn records(&self, key: &str) -> Option<&Vec<serde_json::Value>> {
        self.entries.get(key).and_then(serde_json::Value::as_array)
    }

    /// Returns the most recent failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.entries
            .get(keys::ERROR)
            .and_then(serde_json::Value::as_str)
    }

    /// Records a failure message, replacing any previous one.
    ///
    /// The `error` key holds only the latest failure; it does not accumulate
    /// history.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.entries.insert(
            keys::ERROR.to_string(),
            serde_json::Value::String(message.into()),
        );
    }

    /// Returns all keys currently present.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the state holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a reference to the underlying entries.
    #[must_use]
    pub fn entries(&self) -> &HashMap<String, serde_json::Value> {
        &self.entries
    }
}
