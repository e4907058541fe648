//! Storage backend trait and the in-memory implementation.
//!
//! A backend is the raw persistent map the store sits on. It performs no
//! validation; [`KvStore`](crate::KvStore) does that before calling in.

use std::collections::BTreeMap;

use crate::error::StoreResult;
use crate::value::StoreValue;

/// Trait for key-value storage backends.
///
/// Implementations don't need to be Sync - `KvStore` serializes access
/// through a Mutex.
pub trait StorageBackend: Send {
    /// Write a value, replacing any existing entry.
    fn set_item(&mut self, key: &str, value: &StoreValue) -> StoreResult<()>;

    /// Read a value. Returns `None` if the key doesn't exist.
    fn get_item(&self, key: &str) -> StoreResult<Option<StoreValue>>;

    /// Remove an entry. No-op if the key doesn't exist.
    fn remove_item(&mut self, key: &str) -> StoreResult<()>;

    /// Number of entries in the whole namespace.
    fn len(&self) -> StoreResult<usize>;

    /// Remove every entry in the namespace.
    fn clear(&mut self) -> StoreResult<()>;

    /// All keys, in ascending order.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Write several entries.
    ///
    /// Backends with transactions override this so that either every entry
    /// lands or none does.
    fn set_items(&mut self, entries: &[(String, StoreValue)]) -> StoreResult<()> {
        for (key, value) in entries {
            self.set_item(key, value)?;
        }
        Ok(())
    }

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Volatile backend backed by a `BTreeMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: BTreeMap<String, StoreValue>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn set_item(&mut self, key: &str, value: &StoreValue) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn get_item(&self, key: &str) -> StoreResult<Option<StoreValue>> {
        Ok(self.entries.get(key).cloned())
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.entries.len())
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.entries.clear();
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
