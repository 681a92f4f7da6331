//! File-backed session storage
//!
//! Entries live in one JSON object. Every write replaces the file through a
//! uniquely named, owner-only sibling temp file and a rename, so readers never
//! observe a partial write and the stored credential is not world readable.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::error::SessionStorageError;
use crate::domain::session::SessionStorage;

type Entries = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    // serialises read-modify-write cycles within this process
    guard: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Entries, SessionStorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&raw).map_err(|e| SessionStorageError::Corrupt(e.to_string()))
    }

    /// Current entries for a read-modify-write cycle. A corrupt file is
    /// replaced rather than merged; any other read failure aborts the cycle.
    fn load_for_update(&self) -> Result<Entries, SessionStorageError> {
        match self.load() {
            Err(SessionStorageError::Corrupt(reason)) => {
                debug!(path = %self.path.display(), %reason, "Replacing corrupt session file");
                Ok(Entries::new())
            }
            other => other,
        }
    }

    fn store(&self, entries: &Entries) -> Result<(), SessionStorageError> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| SessionStorageError::Corrupt(e.to_string()))?;
        // created with mode 0600 on unix; the name is unique per writer
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&body)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), keys = entries.len(), "Session file written");
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, SessionStorageError> {
        self.guard
            .lock()
            .map_err(|e| SessionStorageError::Lock(e.to_string()))
    }
}

impl SessionStorage for FileSessionStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SessionStorageError> {
        let _guard = self.lock()?;
        Ok(self.load()?.remove(key))
    }

    fn write(&self, entries: &[(&str, &str)]) -> Result<(), SessionStorageError> {
        let _guard = self.lock()?;
        let mut stored = self.load_for_update()?;

        for (key, value) in entries {
            stored.insert(key.to_string(), value.to_string());
        }
        self.store(&stored)
    }

    fn clear(&self, keys: &[&str]) -> Result<(), SessionStorageError> {
        let _guard = self.lock()?;
        let mut stored = self.load_for_update()?;

        for key in keys {
            stored.remove(*key);
        }
        self.store(&stored)
    }
}
