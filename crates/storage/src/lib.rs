//! Durable named records and the persisted question history built on them.

use anyhow::{bail, Context, Result};
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use shared::domain::{History, HistoryEntry};

/// Record name holding the serialized history list.
pub const HISTORY_RECORD_KEY: &str = "curionest_history";

/// Minimal key/value surface: one string value per named record.
pub trait RecordStore: Send {
    fn get_string(&self, key: &str) -> Result<Option<String>>;
    fn set_string(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Stores each record as `<dir>/<key>.json`, replaced atomically on write.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    dir: PathBuf,
}

impl FileRecordStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create record directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        bail!("invalid record key {key:?}");
    }
    Ok(())
}

impl RecordStore for FileRecordStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("failed to read record '{}'", path.display()))
            }
        }
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        let final_path = self.record_path(key)?;
        let tmp_path = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp_path, value)
            .with_context(|| format!("failed to write record '{}'", tmp_path.display()))?;
        if let Err(rename_err) = fs::rename(&tmp_path, &final_path) {
            if !final_path.exists() {
                return Err(rename_err).with_context(|| {
                    format!("failed to move record into '{}'", final_path.display())
                });
            }
            fs::remove_file(&final_path)?;
            fs::rename(&tmp_path, &final_path)?;
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.record_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to remove record '{}'", path.display()))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: HashMap<String, String>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.records.remove(key);
        Ok(())
    }
}

/// Persists the history list under a single named record.
pub struct HistoryStore {
    records: Box<dyn RecordStore>,
    key: String,
}

impl HistoryStore {
    pub fn new(records: impl RecordStore + 'static) -> Self {
        Self::with_key(records, HISTORY_RECORD_KEY)
    }

    pub fn with_key(records: impl RecordStore + 'static, key: impl Into<String>) -> Self {
        Self {
            records: Box::new(records),
            key: key.into(),
        }
    }

    /// Reads the persisted history. Unparsable content is discarded and the
    /// record removed; read failures yield an empty history.
    pub fn load(&mut self) -> History {
        let raw = match self.records.get_string(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return History::default(),
            Err(err) => {
                tracing::warn!(key = %self.key, "failed to read persisted history: {err:#}");
                return History::default();
            }
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => History::from_entries(entries),
            Err(err) => {
                tracing::warn!(key = %self.key, "discarding corrupt persisted history: {err}");
                if let Err(err) = self.records.remove(&self.key) {
                    tracing::warn!(key = %self.key, "failed to remove corrupt history: {err:#}");
                }
                History::default()
            }
        }
    }

    pub fn save(&mut self, history: &History) -> Result<()> {
        let serialized =
            serde_json::to_string(history).context("failed to serialize history")?;
        self.records.set_string(&self.key, &serialized)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.records.remove(&self.key)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
