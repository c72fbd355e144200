//! Key/value storage
//!
//! Preferences live in a flat key/value store split into a `local` and a
//! `sync` area. The [`KeyValueStore`] trait is the only thing the preference
//! cache depends on, so it can run against the in-memory [`MemoryStore`] in
//! tests or the file-backed [`JsonFileStore`] from the command line.
//!
//! # File format
//!
//! ```text
//! {
//!   "local": { "qualities": { "30": 1080, "60": 720 } },
//!   "sync": {}
//! }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Storage area a key lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageArea {
    Local,
    Sync,
}

impl fmt::Display for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageArea::Local => write!(f, "local"),
            StorageArea::Sync => write!(f, "sync"),
        }
    }
}

/// Capability to read and write JSON values by key
pub trait KeyValueStore {
    /// Value stored under `key`, or `None` if the key is absent
    fn get(&self, area: StorageArea, key: &str) -> Result<Option<Value>>;

    /// Every key/value pair in `area`
    fn get_all(&self, area: StorageArea) -> Result<Map<String, Value>>;

    fn set(&mut self, area: StorageArea, key: &str, value: Value) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&mut self, area: StorageArea, key: &str) -> Result<()>;
}

/// Both storage areas as held in memory and on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    local: Map<String, Value>,
    #[serde(default)]
    sync: Map<String, Value>,
}

impl StoreDocument {
    fn area(&self, area: StorageArea) -> &Map<String, Value> {
        match area {
            StorageArea::Local => &self.local,
            StorageArea::Sync => &self.sync,
        }
    }

    fn area_mut(&mut self, area: StorageArea) -> &mut Map<String, Value> {
        match area {
            StorageArea::Local => &mut self.local,
            StorageArea::Sync => &mut self.sync,
        }
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document: StoreDocument,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, area: StorageArea, key: &str) -> Result<Option<Value>> {
        Ok(self.document.area(area).get(key).cloned())
    }

    fn get_all(&self, area: StorageArea) -> Result<Map<String, Value>> {
        Ok(self.document.area(area).clone())
    }

    fn set(&mut self, area: StorageArea, key: &str, value: Value) -> Result<()> {
        self.document.area_mut(area).insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, area: StorageArea, key: &str) -> Result<()> {
        self.document.area_mut(area).remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON file
///
/// The file is re-read on every access so that changes made by another
/// process are picked up. A missing file reads as an empty store.
///
/// Writes go to a temporary file in the same directory which then replaces
/// the store, so readers never observe a partially written file. A store
/// that cannot be parsed fails reads but is replaced by the next write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by the file at `path`; nothing is read until first access
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreDocument> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store {} does not exist yet", self.path.display());
                return Ok(StoreDocument::default());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(StoreDocument::default());
        }

        let value: Value = serde_json::from_str(&content).map_err(|e| self.storage_error(e))?;
        if !value.is_object() {
            return Err(self.storage_error("top level must be a JSON object"));
        }
        serde_json::from_value(value).map_err(|e| self.storage_error(e))
    }

    /// Load the document a write will be applied to
    ///
    /// An unparseable document is discarded so that it can be repaired by
    /// writing over it. The flag reports whether that happened.
    fn load_for_write(&self) -> Result<(StoreDocument, bool)> {
        match self.load() {
            Ok(document) => Ok((document, false)),
            Err(Error::Storage { message, .. }) => {
                warn!(
                    "Replacing unreadable store {}: {}",
                    self.path.display(),
                    message
                );
                Ok((StoreDocument::default(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, document: &StoreDocument) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let json = serde_json::to_string_pretty(document)?;
        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.as_file().sync_all()?;
        // On failure the temporary file is dropped and removed
        temp_file.persist(&self.path).map_err(|e| e.error)?;

        debug!("Wrote store {}", self.path.display());
        Ok(())
    }

    fn storage_error(&self, message: impl fmt::Display) -> Error {
        Error::Storage {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, area: StorageArea, key: &str) -> Result<Option<Value>> {
        debug!("Reading {}.{} from {}", area, key, self.path.display());
        Ok(self.load()?.area(area).get(key).cloned())
    }

    fn get_all(&self, area: StorageArea) -> Result<Map<String, Value>> {
        Ok(self.load()?.area(area).clone())
    }

    fn set(&mut self, area: StorageArea, key: &str, value: Value) -> Result<()> {
        let (mut document, _) = self.load_for_write()?;
        document.area_mut(area).insert(key.to_string(), value);
        self.save(&document)
    }

    fn remove(&mut self, area: StorageArea, key: &str) -> Result<()> {
        let (mut document, discarded) = self.load_for_write()?;
        if document.area_mut(area).remove(key).is_some() || discarded {
            self.save(&document)?;
        }
        Ok(())
    }
}
