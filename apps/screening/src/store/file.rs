//! File-backed state store: the whole session lives in one JSON document,
//! rewritten on every mutation. Small state, single active session — the
//! simplicity is the point.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tracing::info;

use super::{StateStore, StoreError};

pub struct JsonFileStore {
    path: PathBuf,
    slots: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, loading existing slots if the file is
    /// present. A missing file is an empty session, not an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let slots = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), "state store opened");
        Ok(Self {
            path,
            slots: Mutex::new(slots),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, slots: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(slots)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.slots.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().unwrap();
        slots.insert(key.to_string(), value);
        self.flush(&slots)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().unwrap();
        slots.remove(key);
        self.flush(&slots)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().unwrap();
        slots.clear();
        self.flush(&slots)
    }

    fn entries(&self) -> Vec<(String, Value)> {
        self.slots
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::keys;
    use serde_json::json;

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("state.json")).unwrap();
        assert!(store.entries().is_empty());
    }

    #[test]
    fn test_writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        {
            let store = JsonFileStore::open(&path).unwrap();
            store
                .set(keys::JOB_DESCRIPTION_TEXT, json!("stored text"))
                .unwrap();
        }
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(keys::JOB_DESCRIPTION_TEXT),
            Some(json!("stored text"))
        );
    }

    #[test]
    fn test_clear_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        {
            let store = JsonFileStore::open(&path).unwrap();
            store.set("slot", json!(1)).unwrap();
            store.clear().unwrap();
        }
        let reopened = JsonFileStore::open(&path).unwrap();
        assert!(reopened.entries().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Json(_))
        ));
    }
}
