//! Per-record outcomes of bulk save and load.

use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::error::SnipError;

/// A record that was written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct SavedRecord {
    pub name: String,
    pub path: PathBuf,
    pub bytes: usize,
}

/// A record that could not be saved or loaded.
#[derive(Debug, Serialize)]
pub struct RecordFailure {
    pub name: String,
    pub path: PathBuf,
    #[serde(serialize_with = "serialize_error")]
    pub error: SnipError,
}

fn serialize_error<S: Serializer>(error: &SnipError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of [`SnippetStore::save`](super::SnippetStore::save).
#[derive(Debug, Default, Serialize)]
pub struct SaveReport {
    pub written: Vec<SavedRecord>,
    /// Files of removed snippets deleted during this save.
    pub removed: Vec<PathBuf>,
    pub failures: Vec<RecordFailure>,
}

impl SaveReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.written.iter().map(|r| r.bytes).sum()
    }
}

/// Outcome of [`SnippetStore::load`](super::SnippetStore::load).
#[derive(Debug, Default, Serialize)]
pub struct LoadReport {
    /// Names of the loaded snippets, in load order.
    pub loaded: Vec<String>,
    /// Files with no salvageable content.
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<RecordFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
