//! The key-value store used throughout the application.
//!
//! `KvStore` validates arguments and forwards to its backend. Every mutation
//! reaches the backend before the call returns; there is no batching, no
//! notification, and no async boundary.

use std::path::Path;

use parking_lot::Mutex;

use crate::backend::{MemoryBackend, StorageBackend};
use crate::error::{StoreError, StoreResult};
use crate::sqlite::SqliteBackend;
use crate::value::{IntoStoreValue, StoreValue};

/// Synchronous, process-wide key-value store.
///
/// Construct one at startup and share it behind an `Arc`.
pub struct KvStore {
    backend: Mutex<Box<dyn StorageBackend>>,
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore").finish_non_exhaustive()
    }
}

impl KvStore {
    pub fn new<B: StorageBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Mutex::new(Box::new(backend)),
        }
    }

    /// Open a SQLite-backed store at `path`.
    ///
    /// # Errors
    /// Returns `StoreError::Storage` if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        let backend = SqliteBackend::open(path)?;
        tracing::debug!("Opened key-value store at {}", path.display());
        Ok(Self::new(backend))
    }

    /// Create a volatile store.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Store `value` under `key`, overwriting any existing entry.
    ///
    /// # Errors
    /// Returns `StoreError::InvalidArgument` if the key is empty or the value
    /// is absent; nothing is written in that case.
    pub fn create<V: IntoStoreValue>(&self, key: &str, value: V) -> StoreResult<()> {
        let value = validate_entry(key, value)?;
        self.backend.lock().set_item(key, &value)?;
        tracing::debug!("Stored key: {}", key);
        Ok(())
    }

    /// Identical to [`create`](Self::create).
    ///
    /// # Errors
    /// Same as `create`.
    pub fn update<V: IntoStoreValue>(&self, key: &str, value: V) -> StoreResult<()> {
        self.create(key, value)
    }

    /// Read the string form of the value stored under `key`.
    ///
    /// A missing key is `Ok(None)`, never an error.
    ///
    /// # Errors
    /// Returns an error only if the backend fails.
    pub fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.get_value(key)?.map(|v| v.to_text()))
    }

    /// Read the typed value stored under `key`.
    ///
    /// # Errors
    /// Returns an error only if the backend fails.
    pub fn get_value(&self, key: &str) -> StoreResult<Option<StoreValue>> {
        self.backend.lock().get_item(key)
    }

    /// # Errors
    /// Returns an error only if the backend fails.
    pub fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get_value(key)?.is_some())
    }

    /// Remove `key` if present.
    ///
    /// # Errors
    /// Returns `StoreError::InvalidArgument` if the key is empty.
    pub fn delete(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;
        self.backend.lock().remove_item(key)?;
        tracing::debug!("Deleted key: {}", key);
        Ok(())
    }

    /// Number of entries in the entire namespace, not only Nimbus keys.
    ///
    /// # Errors
    /// Returns an error only if the backend fails.
    pub fn count_items(&self) -> StoreResult<usize> {
        self.backend.lock().len()
    }

    /// Remove every entry in the namespace.
    ///
    /// # Errors
    /// Returns an error only if the backend fails.
    pub fn destroy(&self) -> StoreResult<()> {
        self.backend.lock().clear()?;
        tracing::info!("Cleared key-value store");
        Ok(())
    }

    /// # Errors
    /// Returns an error only if the backend fails.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        self.backend.lock().keys()
    }

    /// Apply every entry of `batch` together.
    ///
    /// All entries are validated before storage is touched. On a
    /// transactional backend either all of them land or none do.
    ///
    /// # Errors
    /// Returns `StoreError::InvalidArgument` if any entry is invalid.
    pub fn write_batch(&self, batch: WriteBatch) -> StoreResult<()> {
        let entries = batch
            .entries
            .into_iter()
            .map(|(key, value)| {
                validate_key(&key)?;
                let value = value.ok_or_else(|| {
                    StoreError::invalid_argument(format!("value for '{}' must be declared", key))
                })?;
                Ok((key, value))
            })
            .collect::<StoreResult<Vec<_>>>()?;

        self.backend.lock().set_items(&entries)?;
        tracing::debug!("Stored batch of {} keys", entries.len());
        Ok(())
    }
}

/// A set of writes applied together by [`KvStore::write_batch`].
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    entries: Vec<(String, Option<StoreValue>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn put<V: IntoStoreValue>(mut self, key: &str, value: V) -> Self {
        self.entries
            .push((key.to_string(), value.into_store_value()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::invalid_argument("key must be declared"));
    }
    Ok(())
}

fn validate_entry<V: IntoStoreValue>(key: &str, value: V) -> StoreResult<StoreValue> {
    validate_key(key)?;
    value.into_store_value().ok_or_else(|| {
        StoreError::invalid_argument(format!("value for '{}' must be declared", key))
    })
}
