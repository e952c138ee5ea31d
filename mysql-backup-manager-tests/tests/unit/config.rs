//! Unit tests for configuration loading and validation

use mysql_backup_manager::config::{load_config, ConfigError};
use test_utils::ConfigBuilder;

#[test]
fn test_round_trip_through_loader() {
    let builder = ConfigBuilder::new();
    let path = builder.write_toml();

    let config = load_config(&path).expect("config should load");
    assert_eq!(config.retention.max_age_days, 3);
    assert_eq!(config.backup.schedule, "0 2 * * *");
    assert!(config.scheduler.run_on_startup);
    assert!(!config.scheduler.serialize_actions);
}

#[test]
fn test_invalid_backup_schedule_rejected() {
    let builder = ConfigBuilder::new().with_backup_schedule("not a cron");
    let path = builder.write_toml();

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn test_invalid_sweep_schedule_rejected() {
    let builder = ConfigBuilder::new().with_sweep_schedule("0 3 * *");
    let path = builder.write_toml();

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn test_unknown_timezone_rejected() {
    let builder = ConfigBuilder::new().with_timezone("Mars/Olympus");
    let path = builder.write_toml();

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn test_zero_retention_rejected() {
    let builder = ConfigBuilder::new().with_max_age_days(0);
    let path = builder.write_toml();

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn test_missing_database_section_rejected() {
    let builder = ConfigBuilder::new();
    let path = builder.temp_path().join("broken.toml");
    std::fs::write(
        &path,
        r#"
[backup]
directory = "/var/backups/db"
"#,
    )
    .unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn test_defaults_fill_optional_sections() {
    let builder = ConfigBuilder::new();
    let path = builder.temp_path().join("minimal.toml");
    std::fs::write(
        &path,
        r#"
[database]
user = "backup"
password = "secret"
name = "appdb"

[backup]
directory = "/var/backups/db"
"#,
    )
    .unwrap();

    let config = load_config(&path).expect("minimal config should load");
    assert_eq!(config.backup.timezone, "Asia/Kolkata");
    assert_eq!(config.backup.schedule, "0 2 * * *");
    assert_eq!(config.retention.max_age_days, 3);
    assert_eq!(config.retention.schedule, "0 3 * * *");
    assert!(config.database.dump_options.single_transaction);
    assert_eq!(config.database.dump_options.charset, "utf8mb4");
}

#[test]
fn test_env_overrides_take_precedence() {
    let builder = ConfigBuilder::new();
    let path = builder.write_toml();

    std::env::set_var("MYSQL_HOST", "db9.example.com");
    std::env::set_var("DATABASE_NAME", "overridden");

    let config = load_config(&path).expect("config should load");

    std::env::remove_var("MYSQL_HOST");
    std::env::remove_var("DATABASE_NAME");

    assert_eq!(config.database.host, "db9.example.com");
    assert_eq!(config.database.name, "overridden");
}
