//! Ordered conversation history
//!
//! Turns are only ever appended at the back or removed from the front
//! (eviction) or the back (rollback). Index 0 is always the oldest turn.

use crate::errors::{ConversationError, Result};
use crate::session::persistence::DurableStore;
use crate::types::Turn;
use std::collections::VecDeque;
use tracing::{info, warn};

/// Result of loading history from the durable store
#[derive(Debug)]
pub enum LoadOutcome {
    /// Record found and decoded
    Restored(usize),

    /// No record under the key; history starts empty
    Fresh,

    /// Record unusable; history starts empty
    Discarded(ConversationError),
}

/// Ordered sequence of conversation turns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    turns: VecDeque<Turn>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add turn at the back
    ///
    /// # Complexity
    /// O(1) amortized - VecDeque push_back
    pub fn append(&mut self, turn: Turn) {
        self.turns.push_back(turn);
    }

    /// Remove and return the oldest turn
    ///
    /// Callers check the length first; an empty history is a contract
    /// violation reported as [`ConversationError::EmptyHistory`].
    pub fn pop_oldest(&mut self) -> Result<Turn> {
        self.turns.pop_front().ok_or(ConversationError::EmptyHistory)
    }

    /// Remove the newest turn only if it equals `turn`
    ///
    /// Returns whether a turn was removed.
    pub fn remove_last_if_matches(&mut self, turn: &Turn) -> bool {
        if self.turns.back() == Some(turn) {
            self.turns.pop_back();
            true
        } else {
            false
        }
    }

    /// Get reference to all turns, oldest first
    pub fn turns(&self) -> &VecDeque<Turn> {
        &self.turns
    }

    /// Get the most recent turn
    pub fn last(&self) -> Option<&Turn> {
        self.turns.back()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Get turns as a vector (for serialization)
    pub fn to_vec(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    /// Replace history with the record stored under `key`
    ///
    /// Never fails: a missing record or an unusable one leaves the history
    /// empty, and the outcome says which case applied.
    pub fn load(&mut self, store: &dyn DurableStore, key: &str) -> LoadOutcome {
        self.turns.clear();

        let contents = match store.read(key) {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                info!("Starting new conversation history: '{}' (file not found)", key);
                return LoadOutcome::Fresh;
            }
            // Not valid UTF-8: the record exists but is malformed
            Err(ConversationError::IoError(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!(error = %e, "History record '{}' is not valid text. Starting with empty history.", key);
                return LoadOutcome::Discarded(ConversationError::CorruptHistory {
                    key: key.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn!(error = %e, "Could not load conversation history from '{}'", key);
                return LoadOutcome::Discarded(ConversationError::PersistenceFailure {
                    key: key.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        match serde_json::from_str::<Vec<Turn>>(&contents) {
            Ok(turns) => {
                let count = turns.len();
                self.turns.extend(turns);
                info!(turns = count, "Successfully loaded conversation history from '{}'", key);
                LoadOutcome::Restored(count)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "Error decoding '{}'. History could be corrupted. Starting with empty history.",
                    key
                );
                LoadOutcome::Discarded(ConversationError::CorruptHistory {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Write the full ordered history under `key`
    pub fn save(&self, store: &dyn DurableStore, key: &str) -> Result<()> {
        let to_failure = |reason: String| ConversationError::PersistenceFailure {
            key: key.to_string(),
            reason,
        };

        let json = serde_json::to_string_pretty(&self.turns).map_err(|e| to_failure(e.to_string()))?;
        store
            .write(key, &json)
            .map_err(|e| to_failure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::persistence::MemoryStore;
    use crate::types::Role;

    struct BrokenStore;

    impl DurableStore for BrokenStore {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }

        fn write(&self, _key: &str, _contents: &str) -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }
    }

    fn sample() -> HistoryStore {
        let mut history = HistoryStore::new();
        history.append(Turn::user("Please remember this random word: ZEBRA"));
        history.append(Turn::model("Got it,\nZEBRA."));
        history
    }

    #[test]
    fn test_append_keeps_order() {
        let history = sample();
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].role, Role::User);
        assert_eq!(history.last().unwrap().role, Role::Model);
    }

    #[test]
    fn test_pop_oldest() {
        let mut history = sample();
        let oldest = history.pop_oldest().unwrap();

        assert_eq!(oldest.role, Role::User);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_pop_oldest_on_empty() {
        let mut history = HistoryStore::new();
        assert!(matches!(history.pop_oldest(), Err(ConversationError::EmptyHistory)));
    }

    #[test]
    fn test_remove_last_if_matches() {
        let mut history = sample();
        let user = Turn::user("follow-up");
        history.append(user.clone());

        assert!(!history.remove_last_if_matches(&Turn::user("something else")));
        assert_eq!(history.len(), 3);

        assert!(history.remove_last_if_matches(&user));
        assert_eq!(history, sample());

        let mut empty = HistoryStore::new();
        assert!(!empty.remove_last_if_matches(&user));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = MemoryStore::new();
        let original = sample();
        original.save(&store, "history_test.json").unwrap();

        let mut loaded = HistoryStore::new();
        let outcome = loaded.load(&store, "history_test.json");

        assert!(matches!(outcome, LoadOutcome::Restored(2)));
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_saved_record_format() {
        let store = MemoryStore::new();
        sample().save(&store, "k").unwrap();

        let value: serde_json::Value = serde_json::from_str(&store.get("k").unwrap()).unwrap();
        assert_eq!(value[0]["role"], "user");
        assert_eq!(value[1]["parts"][0]["text"], "Got it,\nZEBRA.");
    }

    #[test]
    fn test_missing_record_starts_fresh() {
        let store = MemoryStore::new();
        let mut history = sample();

        assert!(matches!(history.load(&store, "nope"), LoadOutcome::Fresh));
        assert!(history.is_empty());
    }

    #[test]
    fn test_corrupt_record_discarded() {
        let store = MemoryStore::new();
        store.insert("bad", "[{\"role\": \"user\", \"parts\": [");
        let mut history = sample();

        let outcome = history.load(&store, "bad");
        assert!(matches!(
            outcome,
            LoadOutcome::Discarded(ConversationError::CorruptHistory { .. })
        ));
        assert!(history.is_empty());
    }

    #[test]
    fn test_structurally_invalid_record_discarded() {
        let store = MemoryStore::new();
        store.insert("obj", r#"{"role": "user"}"#);
        let mut history = HistoryStore::new();

        assert!(matches!(history.load(&store, "obj"), LoadOutcome::Discarded(_)));
        assert!(history.is_empty());
    }

    #[test]
    fn test_null_text_keeps_other_turns() {
        let store = MemoryStore::new();
        store.insert(
            "nulls",
            r#"[{"role":"user","parts":[{"text":"keep me"}]},{"role":"model","parts":[{"text":null}]}]"#,
        );
        let mut history = HistoryStore::new();

        assert!(matches!(history.load(&store, "nulls"), LoadOutcome::Restored(2)));
        assert_eq!(history.to_vec(), vec![Turn::user("keep me"), Turn::model("")]);
    }

    #[test]
    fn test_invalid_utf8_record_is_corrupt() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("binary.json"), [0xff, 0xfe, 0x5b, 0x5d]).unwrap();
        let store = crate::session::persistence::JsonFileStore::new(temp.path());
        let mut history = sample();

        let outcome = history.load(&store, "binary.json");
        assert!(matches!(
            outcome,
            LoadOutcome::Discarded(ConversationError::CorruptHistory { .. })
        ));
        assert!(history.is_empty());
    }

    #[test]
    fn test_unreadable_store_discarded() {
        let mut history = sample();
        let outcome = history.load(&BrokenStore, "any");

        assert!(matches!(
            outcome,
            LoadOutcome::Discarded(ConversationError::PersistenceFailure { .. })
        ));
        assert!(history.is_empty());
    }

    #[test]
    fn test_save_failure_reported() {
        let history = sample();
        let err = history.save(&BrokenStore, "any").unwrap_err();

        assert!(matches!(err, ConversationError::PersistenceFailure { .. }));
        assert_eq!(history.len(), 2);
    }
}
