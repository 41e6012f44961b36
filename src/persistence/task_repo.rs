//! Task repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::task::{Category, Priority, Task, TaskUpdate};
use crate::{AppError, Result};

use super::db::Database;
use super::{fmt_ts, parse_ts};

/// Repository wrapper around `SQLite` for task records.
#[derive(Clone)]
pub struct TaskRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    deadline: Option<String>,
    priority: String,
    category: String,
    completed: i64,
    estimated_minutes: Option<i64>,
    created_at: String,
}

impl TaskRow {
    /// Convert a database row into the domain model.
    fn into_task(self) -> Result<Task> {
        let deadline = self
            .deadline
            .as_deref()
            .map(|raw| parse_ts("deadline", raw))
            .transpose()?;
        let category = Category::parse(&self.category)
            .ok_or_else(|| AppError::Db(format!("invalid category: {}", self.category)))?;
        let created_at = parse_ts("created_at", &self.created_at)?;

        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            deadline,
            priority: Priority::parse(&self.priority),
            category,
            completed: self.completed != 0,
            estimated_minutes: self.estimated_minutes,
            created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, title, description, deadline, priority, category, \
     completed, estimated_minutes, created_at FROM task";

impl TaskRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a new task record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the database insert fails.
    pub async fn create(&self, task: &Task) -> Result<Task> {
        sqlx::query(
            "INSERT INTO task (id, title, description, deadline, priority, category,
             completed, estimated_minutes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.deadline.map(fmt_ts))
        .bind(task.priority.as_str())
        .bind(task.category.as_str())
        .bind(i64::from(task.completed))
        .bind(task.estimated_minutes)
        .bind(fmt_ts(task.created_at))
        .execute(self.db.as_ref())
        .await?;

        Ok(task.clone())
    }

    /// Retrieve a task by identifier.
    ///
    /// Returns `Ok(None)` if the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(self.db.as_ref())
            .await?;

        row.map(TaskRow::into_task).transpose()
    }

    /// List every task, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(TaskRow::into_task).collect()
    }

    /// List incomplete tasks whose deadline falls within `[from, to]`,
    /// in insertion order.
    ///
    /// Unscheduled tasks never match.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_window(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE completed = 0 AND deadline IS NOT NULL \
             AND deadline >= ?1 AND deadline <= ?2 ORDER BY rowid ASC"
        ))
        .bind(fmt_ts(from))
        .bind(fmt_ts(to))
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(TaskRow::into_task).collect()
    }

    /// Apply a partial update and return the stored result.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the task does not exist.
    /// Returns `AppError::Db` if the update fails.
    pub async fn update(&self, id: &str, update: TaskUpdate) -> Result<Task> {
        let mut task = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("task {id} not found")))?;

        task.apply(update);

        sqlx::query(
            "UPDATE task SET title = ?1, description = ?2, deadline = ?3, priority = ?4,
             category = ?5, completed = ?6 WHERE id = ?7",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.deadline.map(fmt_ts))
        .bind(task.priority.as_str())
        .bind(task.category.as_str())
        .bind(i64::from(task.completed))
        .bind(id)
        .execute(self.db.as_ref())
        .await?;

        Ok(task)
    }
}
