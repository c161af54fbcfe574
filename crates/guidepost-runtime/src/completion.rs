#![forbid(unsafe_code)]

//! Durable set of completed tutorial ids.
//!
//! # Invariants
//!
//! 1. The set only grows; there is no removal operation.
//! 2. Loading never fails: a missing, unreadable, or corrupt blob yields an
//!    empty set.
//! 3. [`mark_complete`](CompletionStore::mark_complete) writes through
//!    before returning, and only when the id is new.
//!
//! The blob is a JSON array of ids in the order they were completed.

use crate::storage::{KeyValueStore, StorageError};

/// Key the completion blob is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "completedTutorials";

/// Completed tutorials, backed by a [`KeyValueStore`].
#[derive(Debug)]
pub struct CompletionStore<S> {
    store: S,
    key: String,
    completed: Vec<String>,
}

impl<S: KeyValueStore> CompletionStore<S> {
    /// Load under [`DEFAULT_STORAGE_KEY`].
    pub fn load(store: S) -> Self {
        Self::load_with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Load under a custom key.
    pub fn load_with_key(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let completed = match store.get(&key) {
            Ok(Some(blob)) => decode(&key, &blob),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "completion data unreadable, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(key = %key, count = completed.len(), "loaded completion set");
        Self {
            store,
            key,
            completed,
        }
    }

    #[inline]
    pub fn is_complete(&self, id: &str) -> bool {
        self.completed.iter().any(|c| c == id)
    }

    /// Record `id` as completed.
    ///
    /// Returns `Ok(false)` without touching storage when `id` is already
    /// recorded. On a write failure the id stays recorded in memory and the
    /// error is returned; retries are the store's business.
    pub fn mark_complete(&mut self, id: &str) -> Result<bool, StorageError> {
        if self.is_complete(id) {
            return Ok(false);
        }
        self.completed.push(id.to_owned());
        let blob = serde_json::to_string(&self.completed)?;
        self.store.set(&self.key, &blob)?;
        tracing::debug!(tutorial = id, count = self.completed.len(), "tutorial completed");
        Ok(true)
    }

    /// Completed ids, oldest first.
    pub fn completed(&self) -> impl Iterator<Item = &str> + '_ {
        self.completed.iter().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

fn decode(key: &str, blob: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(blob) {
        Ok(ids) => {
            let mut out: Vec<String> = Vec::with_capacity(ids.len());
            for id in ids {
                if !out.contains(&id) {
                    out.push(id);
                }
            }
            out
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "completion data corrupt, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn empty_store_loads_empty() {
        let set = CompletionStore::load(MemoryStore::new());
        assert!(set.is_empty());
        assert!(!set.is_complete("anything"));
    }

    #[test]
    fn loads_existing_blob() {
        let store = MemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, r#"["a","b"]"#);
        let set = CompletionStore::load(store);
        assert!(set.is_complete("a"));
        assert!(set.is_complete("b"));
        assert_eq!(set.completed().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        for blob in ["{not json", r#"{"a":1}"#, "[1,2,3]", "null", ""] {
            let store = MemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, blob);
            let set = CompletionStore::load(store);
            assert!(set.is_empty(), "blob {blob:?} should load empty");
        }
    }

    #[test]
    fn duplicate_ids_in_blob_collapse() {
        let store = MemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, r#"["a","a","b"]"#);
        let set = CompletionStore::load(store);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn mark_complete_writes_through() {
        let mut set = CompletionStore::load(MemoryStore::new());
        assert!(set.mark_complete("intro").unwrap());
        assert!(set.is_complete("intro"));
        assert_eq!(set.store().peek(DEFAULT_STORAGE_KEY), Some(r#"["intro"]"#));
        assert_eq!(set.store().writes(), 1);
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let mut set = CompletionStore::load(MemoryStore::new());
        assert!(set.mark_complete("intro").unwrap());
        assert!(!set.mark_complete("intro").unwrap());
        assert_eq!(set.len(), 1);
        assert_eq!(set.store().writes(), 1);
    }

    #[test]
    fn preserves_completion_order() {
        let mut set = CompletionStore::load(MemoryStore::new());
        set.mark_complete("b").unwrap();
        set.mark_complete("a").unwrap();
        assert_eq!(set.store().peek(DEFAULT_STORAGE_KEY), Some(r#"["b","a"]"#));
    }

    #[test]
    fn write_failure_keeps_memory_copy() {
        let mut store = MemoryStore::new();
        store.set_read_only(true);
        let mut set = CompletionStore::load(store);
        assert!(matches!(set.mark_complete("x"), Err(StorageError::ReadOnly)));
        assert!(set.is_complete("x"));
    }

    #[test]
    fn custom_key() {
        let mut set = CompletionStore::load_with_key(MemoryStore::new(), "tours");
        set.mark_complete("a").unwrap();
        assert_eq!(set.key(), "tours");
        assert_eq!(set.store().peek("tours"), Some(r#"["a"]"#));
        assert_eq!(set.store().peek(DEFAULT_STORAGE_KEY), None);
    }

    #[test]
    fn reload_round_trips() {
        let mut set = CompletionStore::load(MemoryStore::new());
        set.mark_complete("one").unwrap();
        set.mark_complete("two").unwrap();
        let reloaded = CompletionStore::load(set.store().clone());
        assert_eq!(reloaded.completed().collect::<Vec<_>>(), ["one", "two"]);
    }
}
