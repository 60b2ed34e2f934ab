//! In-memory shared store used by tests and single-process embeddings.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use crate::error::Result;

use super::{SharedStore, StoreValue};

/// In-memory implementation of [`SharedStore`].
///
/// Not durable across processes; exists so tests and callers without a real
/// shared container can inject a store with identical semantics.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, StoreValue>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, StoreValue>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SharedStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<StoreValue>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: StoreValue) -> Result<()> {
        self.entries().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_key_reads_as_absent() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn absence_is_distinct_from_empty() {
        let store = MemoryStore::new();
        store.set("empty", StoreValue::Text(String::new())).unwrap();

        assert_eq!(
            store.get("empty").unwrap(),
            Some(StoreValue::Text(String::new()))
        );
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn set_overwrites_and_remove_clears() {
        let store = MemoryStore::new();
        store.set("k", StoreValue::Text("a".to_string())).unwrap();
        store.set("k", StoreValue::Text("b".to_string())).unwrap();
        assert_eq!(store.get_text("k").unwrap().as_deref(), Some("b"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        // Removing again is a no-op, not an error.
        store.remove("k").unwrap();
    }
}
