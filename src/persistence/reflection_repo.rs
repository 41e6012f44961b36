//! Reflection repository for `SQLite` persistence.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::engine::insight::ReflectionSource;
use crate::models::reflection::Reflection;
use crate::Result;

use super::db::Database;
use super::{fmt_ts, parse_ts};

/// Repository for reflection records.
#[derive(Clone)]
pub struct ReflectionRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct ReflectionRow {
    id: String,
    transcribed_query: String,
    created_at: String,
    used_in_suggestions: i64,
}

impl ReflectionRow {
    fn into_reflection(self) -> Result<Reflection> {
        Ok(Reflection {
            id: self.id,
            transcribed_query: self.transcribed_query,
            created_at: parse_ts("created_at", &self.created_at)?,
            used_in_suggestions: self.used_in_suggestions != 0,
        })
    }
}

impl ReflectionRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a new reflection record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the database insert fails.
    pub async fn insert(&self, reflection: &Reflection) -> Result<Reflection> {
        sqlx::query(
            "INSERT INTO reflection (id, transcribed_query, created_at, used_in_suggestions)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&reflection.id)
        .bind(&reflection.transcribed_query)
        .bind(fmt_ts(reflection.created_at))
        .bind(i64::from(reflection.used_in_suggestions))
        .execute(self.db.as_ref())
        .await?;

        Ok(reflection.clone())
    }

    /// Retrieve a reflection by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Reflection>> {
        let row: Option<ReflectionRow> = sqlx::query_as(
            "SELECT id, transcribed_query, created_at, used_in_suggestions
             FROM reflection WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.db.as_ref())
        .await?;

        row.map(ReflectionRow::into_reflection).transpose()
    }

    /// Fetch the most recent unconsumed reflection, if any.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn latest_unconsumed(&self) -> Result<Option<Reflection>> {
        let row: Option<ReflectionRow> = sqlx::query_as(
            "SELECT id, transcribed_query, created_at, used_in_suggestions
             FROM reflection
             WHERE used_in_suggestions = 0
             ORDER BY created_at DESC, rowid DESC
             LIMIT 1",
        )
        .fetch_optional(self.db.as_ref())
        .await?;

        row.map(ReflectionRow::into_reflection).transpose()
    }

    /// Mark a reflection consumed if nobody else has.
    ///
    /// Returns `true` only for the caller whose update flipped the flag.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    pub async fn mark_consumed(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE reflection SET used_in_suggestions = 1
             WHERE id = ?1 AND used_in_suggestions = 0",
        )
        .bind(id)
        .execute(self.db.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Purge consumed reflections created before `before`.
    ///
    /// Returns the number of rows deleted.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn purge_consumed(&self, before: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM reflection WHERE used_in_suggestions = 1 AND created_at < ?1",
        )
        .bind(fmt_ts(before))
        .execute(self.db.as_ref())
        .await?;
        Ok(result.rows_affected())
    }
}

impl ReflectionSource for ReflectionRepo {
    fn latest_unconsumed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Reflection>>> + Send + '_>> {
        Box::pin(ReflectionRepo::latest_unconsumed(self))
    }

    fn mark_consumed(&self, id: &str) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>> {
        let id = id.to_owned();
        Box::pin(async move { ReflectionRepo::mark_consumed(self, &id).await })
    }
}
