//! Process-local store adapter.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::ports::{KeyValueStore, KeyValueStoreError};

/// [`KeyValueStore`] kept in memory for tests and embedded use.
///
/// Values are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryKeyValueStore {
    /// Create a store pre-populated with `key` holding `value`.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::default();
        store.lock_slots().insert(key.into(), value.into());
        store
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KeyValueStoreError> {
        Ok(self.lock_slots().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KeyValueStoreError> {
        self.lock_slots().insert(key.to_owned(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let store = InMemoryKeyValueStore::default();
        assert_eq!(store.get("coins").expect("get succeeds"), None);
    }

    #[test]
    fn set_replaces_previous_value() {
        let store = InMemoryKeyValueStore::with_entry("coins", b"old".to_vec());
        store.set("coins", b"new").expect("set succeeds");
        assert_eq!(
            store.get("coins").expect("get succeeds").as_deref(),
            Some(b"new".as_slice())
        );
    }
}
