//! MySQL Backup Manager Library
//!
//! This library provides unattended dump-and-compress backup orchestration
//! for a MySQL database, with an in-process cron scheduler and age-based
//! retention of the resulting archives.

pub mod config;
pub mod errors;
pub mod managers;
pub mod utils;

// Re-export commonly used types
pub use config::{load_config, Config};
pub use errors::PipelineError;
pub use managers::backup::{ArtifactState, BackupArtifact, BackupManager};
pub use managers::logging::{init_console_logging, init_logging, LogGuard, LoggingConfig};
pub use managers::retention::{RetentionSweeper, SweepReport};
pub use managers::scheduler::{Action, Scheduler};

// Re-export commonly used types and traits (used by test crate)
#[allow(unused_imports)]
pub use utils::executor::{CommandExecutor, RealExecutor};
