//! Persisted key/value storage
//!
//! A small JSON object of string keys to string values, kept in the user
//! data directory. The display name lives under [`USER_NAME_KEY`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const USER_NAME_KEY: &str = "terminalUserName";

/// Where the display name is remembered between runs
pub trait NameStore: Send {
    fn load_name(&self) -> Option<String>;
    fn store_name(&mut self, name: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Open the storage file. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| StorageError::Parse(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Io(format!("{}: {}", path.display(), e))),
        };
        Ok(Self { path, entries })
    }

    /// Open, or start empty (with a warning) if the file is unreadable
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::open(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable local storage: {}", e);
            Self {
                path,
                entries: BTreeMap::new(),
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set a key and write the whole store back to disk
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn save(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Io(format!("{}: {}", parent.display(), e)))?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, contents)
            .map_err(|e| StorageError::Io(format!("{}: {}", self.path.display(), e)))
    }
}

impl NameStore for LocalStorage {
    fn load_name(&self) -> Option<String> {
        self.get(USER_NAME_KEY)
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
    }

    fn store_name(&mut self, name: &str) -> Result<(), StorageError> {
        self.set(USER_NAME_KEY, name)
    }
}

/// Name store that keeps the name in memory only. Clones share the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryNameStore {
    name: Arc<Mutex<Option<String>>>,
}

impl MemoryNameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: &str) -> Self {
        let store = Self::new();
        store.set(name);
        store
    }

    fn set(&self, name: &str) {
        if let Ok(mut slot) = self.name.lock() {
            *slot = Some(name.to_string());
        }
    }
}

impl NameStore for MemoryNameStore {
    fn load_name(&self) -> Option<String> {
        self.name.lock().ok().and_then(|slot| slot.clone())
    }

    fn store_name(&mut self, name: &str) -> Result<(), StorageError> {
        self.set(name);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "IO error: {msg}"),
            StorageError::Parse(msg) => write!(f, "Parse error: {msg}"),
            StorageError::Serialize(msg) => write!(f, "Serialize error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}
