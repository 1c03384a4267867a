//! JSON file cart storage.
//!
//! The file holds one JSON object mapping storage keys to their raw string
//! values, the same shape browser storage would show:
//!
//! ```json
//! { "gototechCart": "[{\"id\":\"1\", ...}]" }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use gototech_core::{CartStorage, StorageError};

/// [`CartStorage`] persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every entry in the file. A missing or unreadable file is empty.
    fn entries(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read cart file");
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "cart file is not a JSON object");
            BTreeMap::new()
        })
    }

    /// Replace the file contents atomically.
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(backend)?;
        file.write_all(json.as_bytes()).map_err(backend)?;
        file.write_all(b"\n").map_err(backend)?;
        file.persist(&self.path).map_err(|e| backend(e.error))?;
        Ok(())
    }
}

fn backend(e: std::io::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries().remove(key)
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries();
        entries.insert(key.to_owned(), value);
        self.persist(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
