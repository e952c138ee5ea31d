//! Backup directory helpers
//!
//! The archive store is a flat directory holding two kinds of files:
//! transient `.sql` dumps and the durable `.7z` archives produced from
//! them. Both names derive from a second-precision timestamp label. Two
//! runs inside the same second would collide on the label; accepted, since
//! schedules are minute-granular at their finest.

use crate::errors::PipelineError;
use chrono::{DateTime, TimeZone};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::warn;

pub const DUMP_EXT: &str = "sql";
pub const ARCHIVE_EXT: &str = "7z";

/// One file in the backup directory
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub size: u64,
}

/// Handle on the backup directory
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    root: PathBuf,
}

impl ArchiveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Timestamp label naming both artifacts of one backup run
    pub fn timestamp_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("backup_{}", now.format("%Y%m%d_%H%M%S"))
    }

    pub fn dump_path(&self, label: &str) -> PathBuf {
        self.root.join(format!("{}.{}", label, DUMP_EXT))
    }

    pub fn archive_path(&self, label: &str) -> PathBuf {
        self.root.join(format!("{}.{}", label, ARCHIVE_EXT))
    }

    /// Create the directory if absent; no error when it already exists
    pub async fn ensure(&self) -> Result<(), PipelineError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| PipelineError::DirectoryAccessFailed {
                path: self.root.clone(),
                source,
            })
    }

    /// Non-recursive listing of regular files
    ///
    /// An entry whose metadata cannot be read is logged and skipped; it
    /// never aborts the listing of the remaining entries.
    pub async fn entries(&self) -> Result<Vec<ArchiveEntry>, PipelineError> {
        let mut dir = fs::read_dir(&self.root).await.map_err(|source| {
            PipelineError::DirectoryAccessFailed {
                path: self.root.clone(),
                source,
            }
        })?;

        let mut entries = Vec::new();
        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => {
                    return Err(PipelineError::DirectoryAccessFailed {
                        path: self.root.clone(),
                        source,
                    })
                }
            };

            match entry.metadata().await {
                Ok(meta) if meta.is_file() => {
                    let modified = match meta.modified() {
                        Ok(modified) => modified,
                        Err(e) => {
                            warn!(
                                "Skipping {:?}: cannot read modified time: {}",
                                entry.path(),
                                e
                            );
                            continue;
                        }
                    };
                    entries.push(ArchiveEntry {
                        path: entry.path(),
                        modified,
                        size: meta.len(),
                    });
                }
                // Subdirectories are not backup artifacts
                Ok(_) => {}
                Err(e) => warn!("Skipping {:?}: cannot stat: {}", entry.path(), e),
            }
        }

        Ok(entries)
    }

    /// Delete one entry
    pub async fn remove(&self, path: &Path) -> Result<(), PipelineError> {
        fs::remove_file(path)
            .await
            .map_err(|source| PipelineError::DeleteFailed {
                path: path.to_path_buf(),
                source,
            })
    }
}
