//! Cron schedule evaluation in a fixed timezone

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};

/// Compute the next fire time strictly after `after`
///
/// Evaluation happens in whatever timezone `after` carries, so a schedule
/// registered with an IST instant fires on IST wall-clock times.
pub fn next_fire<Tz: TimeZone>(expression: &str, after: &DateTime<Tz>) -> Result<DateTime<Tz>> {
    cron_parser::parse(expression, after)
        .with_context(|| format!("Invalid cron expression: {}", expression))
}

/// Check that an expression parses as a 5-field cron schedule
pub fn validate_expression(expression: &str) -> bool {
    cron_parser::parse(expression, &Utc::now()).is_ok()
}
