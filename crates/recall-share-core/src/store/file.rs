//! Durable JSON-file shared store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};

use super::{SharedStore, StoreValue};

/// File-backed implementation of [`SharedStore`].
///
/// Stands in for the platform shared container: two handles on the same path
/// (one per process) see each other's writes. Reads reload the file every
/// time and writes go through a temp-file rename, so a value is durable
/// before `set` returns and a torn write never replaces the store file.
///
/// The mutex only serializes read-modify-write within one process. The two
/// real writers are separate processes that do not overlap in practice; the
/// documented duplicate-on-crash window of the drain is the only cross-process
/// hazard this store does not rule out.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store at `path`, creating parent directories as needed. The
    /// file itself is created lazily on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<BTreeMap<String, StoreValue>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(error) => return Err(error.into()),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|error| Error::Store(format!("corrupt store file: {error}")))
    }

    fn persist(&self, entries: &BTreeMap<String, StoreValue>) -> Result<()> {
        let rendered = serde_json::to_string_pretty(entries)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, rendered)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl SharedStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<StoreValue>> {
        let _guard = self.guard();
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: StoreValue) -> Result<()> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
