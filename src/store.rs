// src/store.rs
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const STORE_FILE_NAME: &str = "fitness.sqlite";
const APP_DATA_DIR: &str = "fitness-tracker-cli";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing store file")]
    Io(#[from] std::io::Error),
    #[error("Store read failed for key '{0}': {1}")]
    ReadFailed(String, rusqlite::Error),
    #[error("Store write failed for key '{0}': {1}")]
    WriteFailed(String, rusqlite::Error),
    #[error("Store is unavailable: {0}")]
    Unavailable(String),
}

/// Durable string-keyed, string-valued store.
pub trait KvStore {
    /// # Errors
    /// Returns `StoreError` if the underlying store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// # Errors
    /// Returns `StoreError` if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// # Errors
    /// Returns `StoreError` if the key cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Gets the path to the store file within the app's data directory.
/// Creates the directory if it doesn't exist.
pub fn get_store_path() -> Result<PathBuf, StoreError> {
    let data_dir = dirs::data_dir().ok_or(StoreError::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(STORE_FILE_NAME))
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the store file and its table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL           -- JSON document
            )",
            [],
        )?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::ReadFailed(key.to_string(), e))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map(|_| ())
            .map_err(|e| StoreError::WriteFailed(key.to_string(), e))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map(|_| ())
            .map_err(|e| StoreError::WriteFailed(key.to_string(), e))
    }
}

/// Volatile store, handy for tests and throwaway sessions.
#[derive(Default, Debug)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_store_set_overwrites_and_remove_clears() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("@weight_log").unwrap(), None);

        store.set("@weight_log", "[]").unwrap();
        store.set("@weight_log", "[{\"date\":\"2024-01-01\",\"weight\":70.0}]").unwrap();
        assert_eq!(
            store.get("@weight_log").unwrap().as_deref(),
            Some("[{\"date\":\"2024-01-01\",\"weight\":70.0}]")
        );

        store.remove("@weight_log").unwrap();
        assert_eq!(store.get("@weight_log").unwrap(), None);
        // Removing a missing key is not an error
        store.remove("@weight_log").unwrap();
    }

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        store.set("@user_profile", "{}").unwrap();
        assert_eq!(store.get("@user_profile").unwrap().as_deref(), Some("{}"));
        store.remove("@user_profile").unwrap();
        assert!(store.get("@user_profile").unwrap().is_none());
    }
}
