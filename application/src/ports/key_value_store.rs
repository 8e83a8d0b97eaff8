//! Key-value store port
//!
//! Persistence capability for credentials. The core never assumes a storage
//! medium; it only calls `get` and `set`.

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised by a key-value store implementation
#[derive(Error, Debug)]
pub enum KeyValueError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt store: {0}")]
    Corrupt(String),
}

/// Minimal persistent string map.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError>;

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError>;
}

/// Process-local store (tests, `--no-persist`).
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
