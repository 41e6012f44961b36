//! Persistence layer modules.

pub mod db;
pub mod reflection_repo;
pub mod retention;
pub mod schema;
pub mod task_repo;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{AppError, Result};

/// Re-export the database pool type for convenience.
pub use sqlx::SqlitePool;

/// Fixed-width RFC 3339 form used for every stored timestamp, so that
/// string comparison in SQL matches chronological order.
pub(crate) fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(column: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Db(format!("invalid {column}: {e}")))
}
