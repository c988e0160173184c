//! In-memory state store.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use rangewatch_sdk::{StateStore, StoreError};
use rangewatch_types::PersistedState;

/// A [`StateStore`] that keeps records in a map.
///
/// Useful in tests and on hosts without durable storage; one store can be
/// shared by many monitors through an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, PersistedState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of namespaces with a record.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Put a record directly, bypassing any monitor.
    pub fn insert(&self, namespace: impl Into<String>, record: PersistedState) {
        self.records.write().insert(namespace.into(), record);
    }

    /// Remove a namespace. Returns `true` if it existed.
    pub fn remove(&self, namespace: &str) -> bool {
        self.records.write().remove(namespace).is_some()
    }
}

impl StateStore for MemoryStore {
    fn store(&self, namespace: &str, record: &PersistedState) -> Result<(), StoreError> {
        self.records.write().insert(namespace.to_string(), *record);
        Ok(())
    }

    fn load(&self, namespace: &str) -> Result<Option<PersistedState>, StoreError> {
        Ok(self.records.read().get(namespace).copied())
    }
}
