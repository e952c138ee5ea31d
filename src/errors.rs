//! Error taxonomy for backup pipeline and sweep operations
//!
//! Every variant carries enough context (operation, path, underlying
//! message) to diagnose a failed run from the log alone. None of these
//! errors are allowed to escape a scheduled run and take the scheduler
//! down; they are logged at the boundary of the operation that produced
//! them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The external dump process exited non-zero or could not be started.
    #[error("database dump failed: {reason}")]
    DumpFailed { reason: String },

    /// The external archiver exited non-zero or could not be started.
    /// The uncompressed source is preserved when this is raised.
    #[error("compression of {path:?} failed: {reason}")]
    CompressionFailed { path: PathBuf, reason: String },

    /// Creating, listing, or stat-ing the backup directory failed.
    #[error("cannot access backup directory {path:?}: {source}")]
    DirectoryAccessFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A single file could not be deleted, either during a retention
    /// sweep or when cleaning up the uncompressed dump.
    #[error("failed to delete {path:?}: {source}")]
    DeleteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}
