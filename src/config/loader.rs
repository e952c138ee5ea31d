use super::types::*;
use crate::utils::cron;
use chrono_tz::Tz;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Load configuration from a TOML file, apply environment overrides,
/// and validate
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&contents)?;
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

impl Config {
    /// Resolved fixed timezone for artifact timestamps and schedule
    /// evaluation
    pub fn timezone(&self) -> Result<Tz> {
        self.backup.timezone.parse::<Tz>().map_err(|_| {
            ConfigError::ValidationError(format!(
                "Unknown timezone identifier: {}",
                self.backup.timezone
            ))
        })
    }
}

/// Environment variables take precedence over file values for database
/// credentials and the backup directory
fn apply_env_overrides(config: &mut Config) {
    if let Ok(host) = env::var("MYSQL_HOST") {
        config.database.host = host;
    }
    if let Ok(port) = env::var("MYSQL_PORT") {
        if let Ok(port) = port.parse() {
            config.database.port = port;
        }
    }
    if let Ok(user) = env::var("MYSQL_USER") {
        config.database.user = user;
    }
    if let Ok(password) = env::var("MYSQL_PASSWORD") {
        config.database.password = password;
    }
    if let Ok(name) = env::var("DATABASE_NAME") {
        config.database.name = name;
    }
    if let Ok(dir) = env::var("BACKUP_DIR") {
        config.backup.directory = PathBuf::from(dir);
    }
}

/// Validate the configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.database.user.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database user must not be empty".to_string(),
        ));
    }

    if config.database.name.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database name must not be empty".to_string(),
        ));
    }

    if config.backup.directory.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Backup directory must not be empty".to_string(),
        ));
    }

    if !cron::validate_expression(&config.backup.schedule) {
        return Err(ConfigError::ValidationError(format!(
            "Invalid backup cron schedule: {}",
            config.backup.schedule
        )));
    }

    if !cron::validate_expression(&config.retention.schedule) {
        return Err(ConfigError::ValidationError(format!(
            "Invalid sweep cron schedule: {}",
            config.retention.schedule
        )));
    }

    if config.retention.max_age_days == 0 {
        return Err(ConfigError::ValidationError(
            "Retention max_age_days must be at least 1".to_string(),
        ));
    }

    if config.backup.timeout_seconds == 0 {
        return Err(ConfigError::ValidationError(
            "Backup timeout_seconds must be at least 1".to_string(),
        ));
    }

    config.timezone()?;

    Ok(())
}
