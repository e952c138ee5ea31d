//! Retention sweeper - bounds disk usage by deleting stale backup files

use crate::errors::PipelineError;
use crate::utils::archive::ArchiveStore;
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of one sweep pass
#[derive(Debug, Default)]
pub struct SweepReport {
    pub examined: usize,
    pub deleted: Vec<PathBuf>,
    pub failed: usize,
}

/// Deletes archive entries older than the retention window
pub struct RetentionSweeper {
    store: ArchiveStore,
    max_age: Duration,
}

impl RetentionSweeper {
    pub fn new(store: ArchiveStore, max_age_days: u32) -> Self {
        Self {
            store,
            max_age: Duration::days(i64::from(max_age_days)),
        }
    }

    pub fn store(&self) -> &ArchiveStore {
        &self.store
    }

    /// Delete every entry modified before `now - max_age`
    ///
    /// Age is the sole criterion; file names are never consulted. One
    /// entry's failure to stat or delete does not abort the remaining
    /// entries, and a second pass with no new files deletes nothing more.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, PipelineError> {
        let cutoff = now - self.max_age;
        let entries = self.store.entries().await?;

        let mut report = SweepReport {
            examined: entries.len(),
            ..Default::default()
        };

        for entry in entries {
            let modified: DateTime<Utc> = entry.modified.into();
            if modified >= cutoff {
                continue;
            }

            match self.store.remove(&entry.path).await {
                Ok(()) => {
                    info!("Deleted old backup file: {:?}", entry.path);
                    report.deleted.push(entry.path);
                }
                Err(e) => {
                    warn!("{}", e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Sweep complete: {} deleted, {} failed, {} examined",
            report.deleted.len(),
            report.failed,
            report.examined
        );
        Ok(report)
    }
}
