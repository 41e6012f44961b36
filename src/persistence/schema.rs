//! `SQLite` schema bootstrap logic.
//!
//! All table definitions use `CREATE TABLE IF NOT EXISTS`, so this is
//! safe to re-run on every server startup.

use sqlx::SqlitePool;

use crate::Result;

/// Apply all table definitions to the connected `SQLite` database.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS task (
    id                TEXT PRIMARY KEY NOT NULL,
    title             TEXT NOT NULL,
    description       TEXT,
    deadline          TEXT,
    priority          TEXT NOT NULL DEFAULT 'medium',
    category          TEXT NOT NULL DEFAULT 'task' CHECK(category IN ('task','assignment','habit')),
    completed         INTEGER NOT NULL DEFAULT 0,
    estimated_minutes INTEGER,
    created_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reflection (
    id                  TEXT PRIMARY KEY NOT NULL,
    transcribed_query   TEXT NOT NULL,
    created_at          TEXT NOT NULL,
    used_in_suggestions INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_task_deadline ON task(completed, deadline);
CREATE INDEX IF NOT EXISTS idx_reflection_pending ON reflection(used_in_suggestions, created_at);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
