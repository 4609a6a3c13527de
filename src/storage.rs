// src/storage.rs

use crate::errors::{ChatError, ChatResult};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A string key-value slot store, shaped like browser local storage.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> ChatResult<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> ChatResult<()>;
}

/// Keeps everything in memory. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> ChatResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> ChatResult<()> {
        self.slots.insert(key.to_string(), value);
        Ok(())
    }
}

/// Stores all slots as one JSON object file.
///
/// Every `set` rewrites the whole file through a temp file in the same
/// directory and renames it into place, so readers never see a torn write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    slots: BTreeMap<String, String>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> ChatResult<Self> {
        let path = path.into();
        let slots: BTreeMap<String, String> = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            match serde_json::from_str(&raw) {
                Ok(slots) => slots,
                Err(e) => {
                    log::warn!(
                        "Ignoring unreadable storage file {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        log::debug!("Opened storage {} ({} slots)", path.display(), slots.len());
        Ok(Self { path, slots })
    }

    fn flush(&self) -> ChatResult<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let serialized = serde_json::to_string_pretty(&self.slots)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(serialized.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| {
            ChatError::storage_error(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e.error
            ))
        })?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> ChatResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> ChatResult<()> {
        let previous = self.slots.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            // Keep memory and disk in agreement when the write fails.
            match previous {
                Some(old) => self.slots.insert(key.to_string(), old),
                None => self.slots.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}
