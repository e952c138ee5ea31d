//! Configuration module for mysql-backup-manager
//!
//! Handles loading and validating configuration from a TOML file. Database
//! credentials and the backup directory can additionally be supplied through
//! environment variables (`MYSQL_HOST`, `MYSQL_PORT`, `MYSQL_USER`,
//! `MYSQL_PASSWORD`, `DATABASE_NAME`, `BACKUP_DIR`), which take precedence
//! over file values.
//!
//! ## Example Usage
//!
//! ```no_run
//! use mysql_backup_manager::config;
//!
//! # fn run() -> config::Result<()> {
//! let config = config::load_config("backup-config.toml")?;
//! println!("Backing up to {:?}", config.backup.directory);
//! # Ok(())
//! # }
//! ```

mod loader;
mod types;

pub use loader::{load_config, ConfigError, Result};
pub use types::*;
