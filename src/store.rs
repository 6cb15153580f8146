//! Persistent record of processed artifact identifiers
//!
//! The record is a single JSON file holding an array of artifact identifiers
//! as decimal strings, e.g. `["412163","415790"]`. It is read once at the
//! start of a run and rewritten once at the end; nothing else touches it.
//!
//! A missing file is the first-run bootstrap case and loads as the empty
//! set. A present-but-unreadable or present-but-malformed file is fatal:
//! silently treating a corrupt record as empty would re-download and
//! re-extract every artifact on the next run.

use crate::error::{Result, StoreError};
use crate::types::ArtifactId;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed store of already-processed artifact identifiers
///
/// Holds only the record's path; every `load`/`save` goes to disk. The
/// in-memory working set lives with the caller for the duration of a run.
#[derive(Clone, Debug)]
pub struct ProcessedStore {
    path: PathBuf,
}

impl ProcessedStore {
    /// Create a store backed by the given record path
    ///
    /// Does not touch the filesystem; the record may not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying record file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the processed set from disk
    ///
    /// A missing record yields an empty set. The identifiers are sorted and
    /// de-duplicated by the returned `BTreeSet` regardless of file order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] when the record exists but cannot be
    /// read, and [`StoreError::Malformed`] when its contents are not a JSON
    /// array of decimal identifier strings.
    pub async fn load(&self) -> Result<BTreeSet<ArtifactId>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no processed-artifact record, starting empty");
                return Ok(BTreeSet::new());
            }
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                }
                .into());
            }
        };

        let raw: Vec<String> =
            serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        let mut ids = BTreeSet::new();
        for entry in raw {
            let id: ArtifactId = entry.parse().map_err(|e| StoreError::Malformed {
                path: self.path.clone(),
                reason: format!("identifier '{entry}' is not a decimal number: {e}"),
            })?;
            ids.insert(id);
        }

        debug!(path = ?self.path, count = ids.len(), "loaded processed-artifact record");
        Ok(ids)
    }

    /// Write the processed set to disk, replacing any previous record
    ///
    /// Identifiers are written as decimal strings in ascending order. The
    /// write replaces the whole file; partial updates are never performed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] when serialization fails and
    /// [`StoreError::Write`] when the file cannot be written.
    pub async fn save(&self, ids: &BTreeSet<ArtifactId>) -> Result<()> {
        let entries: Vec<String> = ids.iter().map(ArtifactId::to_string).collect();
        let json = serde_json::to_string(&entries).map_err(|e| StoreError::Encode { source: e })?;

        tokio::fs::write(&self.path, json.as_bytes())
            .await
            .map_err(|e| StoreError::Write {
                path: self.path.clone(),
                source: e,
            })?;

        info!(path = ?self.path, count = ids.len(), "saved processed-artifact record");
        Ok(())
    }
}
