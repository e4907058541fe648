//! SQLite-based storage backend.
//!
//! One table holds the whole namespace. Each row keeps the canonical string
//! form of the value and its kind tag.

use rusqlite::{params, Connection};
use std::path::Path;

use crate::backend::StorageBackend;
use crate::error::StoreResult;
use crate::value::StoreValue;

/// SQLite-based key-value storage.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open a store at the given path.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let backend = Self { conn };
        backend.init_schema()?;
        Ok(backend)
    }

    /// Open an in-memory store. Nothing survives the connection.
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let backend = Self { conn };
        backend.init_schema()?;
        Ok(backend)
    }

    fn init_schema(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                kind TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

impl StorageBackend for SqliteBackend {
    fn set_item(&mut self, key: &str, value: &StoreValue) -> StoreResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, kind) VALUES (?1, ?2, ?3)",
            params![key, value.to_text(), value.kind().as_str()],
        )?;
        Ok(())
    }

    fn get_item(&self, key: &str) -> StoreResult<Option<StoreValue>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value, kind FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;

        match rows.next()? {
            Some(row) => {
                let raw: String = row.get(0)?;
                let kind: String = row.get(1)?;
                Ok(Some(StoreValue::decode(key, &kind, &raw)?))
            }
            None => Ok(None),
        }
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn len(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn set_items(&mut self, entries: &[(String, StoreValue)]) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value, kind) VALUES (?1, ?2, ?3)",
                params![key, value.to_text(), value.kind().as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
