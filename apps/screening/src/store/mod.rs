//! State Store — the session's only persistence.
//!
//! The store is a flat, string-keyed map of JSON values, written
//! last-writer-wins and read once at pipeline entry. It is injected as a
//! narrow port so tests run on [`MemoryStore`] and the CLI on
//! [`file::JsonFileStore`].

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;
use thiserror::Error;

pub mod file;

/// Slot names, kept byte-for-byte compatible with previously saved sessions.
pub mod keys {
    /// Free job description text fed to the job analysis.
    pub const JOB_DESCRIPTION_TEXT: &str = "jobDescriptionTextForAI";
    /// Uploaded candidate CVs (`[{fileName, text}]`).
    pub const CANDIDATE_CVS: &str = "candidatesCVs";
    /// AI-generated job description object from the questionnaire flow.
    pub const GENERATED_JOB_DESCRIPTION: &str = "jobDescriptionGeneratedByAI";
    /// Validated job analysis object.
    pub const JOB_ANALYSIS: &str = "jobAnalysisDoneByAI";
    /// Scored candidate records for the whole batch.
    pub const CANDIDATE_ANALYSES: &str = "candidatesInformation&AnalysisDoneByAI";
    /// Every generated interview, appended in order.
    pub const GENERATED_INTERVIEWS: &str = "generatedInterviews";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state store holds malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Narrow persistence port. `get` answers absence with `None`; only writes
/// can fail.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
    /// Snapshot of every slot, sorted by key. Used by the state export.
    fn entries(&self) -> Vec<(String, Value)>;
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.slots.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.slots.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.slots.lock().unwrap().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.slots.lock().unwrap().clear();
        Ok(())
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

/// Renders every slot in the readable form the "copy session state" action
/// produces: one captioned block per key.
pub fn render_entries(store: &dyn StateStore) -> String {
    let mut out = String::new();
    for (key, value) in store.entries() {
        let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
        out.push_str(&format!("=== {} ===\n{pretty}\n\n", key.to_uppercase()));
    }
    out
}
