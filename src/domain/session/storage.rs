//! Durable client storage for the session

use crate::domain::error::SessionStorageError;

/// Key/value storage that survives process restarts
pub trait SessionStorage: Send + Sync + std::fmt::Debug {
    /// Read a single key
    fn read(&self, key: &str) -> Result<Option<String>, SessionStorageError>;

    /// Write several keys in one durable step
    fn write(&self, entries: &[(&str, &str)]) -> Result<(), SessionStorageError>;

    /// Remove keys; missing keys are not an error
    fn clear(&self, keys: &[&str]) -> Result<(), SessionStorageError>;
}
