//! Test utilities for mysql-backup-manager
//!
//! This crate provides shared test utilities, fake external tools, and
//! helper functions for testing the mysql-backup-manager application.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_utils::{ConfigBuilder, FakeDumpTools, TestContext};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let builder = ConfigBuilder::new();
//!     let tools = FakeDumpTools::new();
//!     // ... test code
//! }
//! ```

pub mod config_builder;
pub mod fixtures;
pub mod test_context;

// Re-export commonly used items
pub use config_builder::ConfigBuilder;
pub use fixtures::*;
pub use test_context::TestContext;

// Re-export types from the main crate for convenience
pub use mysql_backup_manager::config::{
    BackupConfig, Config, DatabaseConfig, DumpOptions, LoggingSettings, RetentionConfig,
    SchedulerConfig,
};
pub use mysql_backup_manager::errors::PipelineError;
pub use mysql_backup_manager::managers::backup::{ArtifactState, BackupManager};
pub use mysql_backup_manager::managers::retention::RetentionSweeper;
pub use mysql_backup_manager::utils::archive::ArchiveStore;

// Re-export mock implementations from the main crate
pub use mysql_backup_manager::utils::executor::mock::{MockExecutor, MockResponse};
pub use mysql_backup_manager::utils::executor::CommandExecutor;

/// Common test result type
pub type TestResult<T = ()> = anyhow::Result<T>;
