//! JSON file session store.
//!
//! The file holds one document mapping each scope key to its intervals in
//! insertion order:
//!
//! ```json
//! { "laptop": [ { "id": "...", "date": "...", "type": "work", ... } ] }
//! ```
//!
//! Every mutation rewrites the file through a temporary sibling and a rename,
//! so a crash never leaves a half-written log behind.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::interval::FocusInterval;
use super::store::{in_range, SessionStore};
use crate::error::StudyFocusError;

type Document = BTreeMap<String, Vec<FocusInterval>>;

/// Session store persisted as a JSON document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    scope: String,
    document: Document,
    ids: HashSet<String>,
}

impl JsonFileStore {
    /// Open (or start) the document at `path` for intervals of `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: &Path, scope: &str) -> Result<Self, StudyFocusError> {
        let document: Document = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                StudyFocusError::Persistence(format!("Failed to read {}: {e}", path.display()))
            })?;
            if contents.trim().is_empty() {
                Document::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| {
                    StudyFocusError::Persistence(format!("Failed to parse {}: {e}", path.display()))
                })?
            }
        } else {
            Document::new()
        };

        let ids: HashSet<String> = document
            .get(scope)
            .map(|intervals| intervals.iter().map(|i| i.id.clone()).collect())
            .unwrap_or_default();

        debug!(path = %path.display(), scope, "opened json session store");

        Ok(Self {
            path: path.to_path_buf(),
            scope: scope.to_string(),
            document,
            ids,
        })
    }

    fn intervals(&self) -> &[FocusInterval] {
        self.document.get(&self.scope).map(Vec::as_slice).unwrap_or(&[])
    }

    fn persist(&self) -> Result<(), StudyFocusError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.document)?;
        let tmp = self.path.with_extension("json.tmp");

        std::fs::write(&tmp, contents).map_err(|e| {
            StudyFocusError::Persistence(format!("Failed to write {}: {e}", tmp.display()))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            StudyFocusError::Persistence(format!("Failed to replace {}: {e}", self.path.display()))
        })
    }
}

impl SessionStore for JsonFileStore {
    fn append(&mut self, interval: &FocusInterval) -> Result<(), StudyFocusError> {
        if self.ids.contains(&interval.id) {
            debug!(id = %interval.id, "interval already stored");
            return Ok(());
        }

        let mut record = interval.clone();
        record.scope.clone_from(&self.scope);
        self.document
            .entry(self.scope.clone())
            .or_default()
            .push(record);

        if let Err(e) = self.persist() {
            // Keep memory consistent with what is on disk
            if let Some(intervals) = self.document.get_mut(&self.scope) {
                intervals.pop();
            }
            return Err(e);
        }

        self.ids.insert(interval.id.clone());
        Ok(())
    }

    fn query_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FocusInterval>, StudyFocusError> {
        Ok(in_range(self.intervals().iter().cloned(), start, end))
    }

    fn all(&self) -> Result<Vec<FocusInterval>, StudyFocusError> {
        Ok(self.intervals().to_vec())
    }

    fn clear(&mut self) -> Result<usize, StudyFocusError> {
        let Some(removed) = self.document.remove(&self.scope) else {
            return Ok(0);
        };

        if let Err(e) = self.persist() {
            self.document.insert(self.scope.clone(), removed);
            return Err(e);
        }

        self.ids.clear();
        Ok(removed.len())
    }
}
