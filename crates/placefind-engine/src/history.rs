//! Bounded, deduplicated search history.
//!
//! Loaded once from a [`KeyValueStore`] and written back on every mutation.
//! All mutations run under one lock, so an append observes and persists a
//! consistent list even when several search cycles finish together.

use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Key the history is persisted under.
pub const HISTORY_KEY: &str = "searchHistory";

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

pub struct HistoryStore {
    store: Box<dyn KeyValueStore>,
    capacity: usize,
    entries: Mutex<Vec<String>>,
}

impl HistoryStore {
    /// Reads the persisted history. A missing, unreadable or corrupt value
    /// starts an empty history; the latter two are logged.
    ///
    /// A `capacity` of zero is treated as one.
    #[must_use]
    pub fn load(store: Box<dyn KeyValueStore>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                tracing::warn!(key = HISTORY_KEY, error = %e, "discarding unreadable search history");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = HISTORY_KEY, error = %e, "failed to load search history");
                Vec::new()
            }
        };
        truncate_front(&mut entries, capacity);
        tracing::debug!(count = entries.len(), capacity, "search history loaded");

        Self {
            store,
            capacity,
            entries: Mutex::new(entries),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Appends `text` unless it is blank or already present, dropping the
    /// oldest entries beyond capacity. Returns whether the list changed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the updated list cannot be persisted. The
    /// in-memory list keeps the change.
    pub fn append(&self, text: &str) -> Result<bool, StoreError> {
        if text.trim().is_empty() {
            return Ok(false);
        }
        let mut entries = self.lock();
        if entries.iter().any(|e| e == text) {
            return Ok(false);
        }
        entries.push(text.to_owned());
        truncate_front(&mut entries, self.capacity);
        self.persist(&entries)?;
        Ok(true)
    }

    /// Removes the entry at `index`. Out-of-range indexes are a no-op and
    /// return `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the updated list cannot be persisted.
    pub fn delete_at(&self, index: usize) -> Result<Option<String>, StoreError> {
        let mut entries = self.lock();
        if index >= entries.len() {
            return Ok(None);
        }
        let removed = entries.remove(index);
        self.persist(&entries)?;
        Ok(Some(removed))
    }

    fn persist(&self, entries: &[String]) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(entries).map_err(|e| StoreError::Encode {
            context: HISTORY_KEY.to_owned(),
            source: e,
        })?;
        self.store.set(HISTORY_KEY, &encoded)
    }

    // A poisoned lock still guards a well-formed Vec; keep using it.
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("capacity", &self.capacity)
            .field("entries", &*self.lock())
            .finish_non_exhaustive()
    }
}

fn truncate_front(entries: &mut Vec<String>, capacity: usize) {
    if entries.len() > capacity {
        let excess = entries.len() - capacity;
        entries.drain(..excess);
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
