//! Key-value storage areas

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A flat string key-value store with a fixed persistence scope.
///
/// Readers tolerate absence (`get` returns `None`); `remove` on a
/// missing key is not an error.
pub trait StorageArea: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Remove `key` if present.
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Durable storage area backed by one file per key under a base
/// directory. Survives process restarts.
#[derive(Debug, Clone)]
pub struct FileArea {
    base: PathBuf,
}

impl FileArea {
    /// Create a file area rooted at `base`. The directory is created
    /// lazily on first write.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }

    /// The base directory of this area.
    pub fn path(&self) -> &Path {
        &self.base
    }
}

impl StorageArea for FileArea {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }
        fs::read_to_string(&path).ok()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.base)?;
        fs::write(self.entry_path(key), value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// Session-scoped storage area held in memory; its contents disappear
/// when the process exits.
#[derive(Debug, Default)]
pub struct MemoryArea {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryArea {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageArea for MemoryArea {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
