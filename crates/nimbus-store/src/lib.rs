//! Persistent key-value store for Nimbus.
//!
//! A single flat namespace of string keys holding primitive values. The
//! store validates writes, persists them immediately through a
//! [`StorageBackend`], and never performs structured serialization itself.

pub mod backend;
pub mod error;
pub mod keys;
pub mod sqlite;
pub mod store;
pub mod value;

pub use backend::{MemoryBackend, StorageBackend};
pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteBackend;
pub use store::{KvStore, WriteBatch};
pub use value::{IntoStoreValue, StoreValue, ValueKind};
