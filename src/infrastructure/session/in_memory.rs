//! In-memory session storage

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::error::SessionStorageError;
use crate::domain::session::SessionStorage;

/// Process-local session storage
///
/// Useful for testing. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with entries
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let entries = entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        Self {
            entries: RwLock::new(entries),
        }
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> SessionStorageError {
    SessionStorageError::Lock(e.to_string())
}

impl SessionStorage for InMemorySessionStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SessionStorageError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, entries: &[(&str, &str)]) -> Result<(), SessionStorageError> {
        let mut stored = self.entries.write().map_err(poisoned)?;

        for (key, value) in entries {
            stored.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn clear(&self, keys: &[&str]) -> Result<(), SessionStorageError> {
        let mut stored = self.entries.write().map_err(poisoned)?;

        for key in keys {
            stored.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_clear() {
        let storage = InMemorySessionStorage::new();

        storage.write(&[("a", "1"), ("b", "2")]).unwrap();
        assert_eq!(storage.read("a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.read("b").unwrap().as_deref(), Some("2"));

        storage.clear(&["a", "missing"]).unwrap();
        assert!(storage.read("a").unwrap().is_none());
        assert_eq!(storage.read("b").unwrap().as_deref(), Some("2"));
    }
}
