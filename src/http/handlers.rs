//! Request handlers for the HTTP API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::capture::capture_text;
use crate::models::plan::DailyPlan;
use crate::models::reflection::Reflection;
use crate::models::task::{Task, TaskDraft, TaskUpdate};
use crate::persistence::reflection_repo::ReflectionRepo;
use crate::persistence::task_repo::TaskRepo;
use crate::{AppError, Result};

use super::AppState;

/// Body carrying a single free-text field.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    /// Raw user text.
    pub text: String,
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

/// `POST /api/tasks`
///
/// # Errors
///
/// Returns `AppError::Validation` for a blank title, `AppError::Db` on insert failure.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>)> {
    if draft.title.trim().is_empty() {
        return Err(AppError::Validation("task title must not be empty".into()));
    }
    let task = TaskRepo::new(Arc::clone(&state.db))
        .create(&draft.into_task())
        .await?;
    info!(task_id = %task.id, priority = %task.priority, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /api/tasks`
///
/// # Errors
///
/// Returns `AppError::Db` if the query fails.
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Task>>> {
    let tasks = TaskRepo::new(Arc::clone(&state.db)).list_all().await?;
    Ok(Json(tasks))
}

/// `PATCH /api/tasks/{id}`
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id, `AppError::Db` on failure.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<TaskUpdate>,
) -> Result<Json<Task>> {
    let task = TaskRepo::new(Arc::clone(&state.db))
        .update(&id, update)
        .await?;
    info!(task_id = %task.id, "task updated");
    Ok(Json(task))
}

/// `POST /api/capture`
///
/// # Errors
///
/// Returns `AppError::Validation` for blank text.
pub async fn capture(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<TaskDraft>> {
    let draft = capture_text(
        &req.text,
        Utc::now(),
        state.client.as_ref(),
        state.config.generative.timeout(),
    )
    .await?;
    Ok(Json(draft))
}

/// `POST /api/reflections`
///
/// # Errors
///
/// Returns `AppError::Validation` for blank text, `AppError::Db` on insert failure.
pub async fn create_reflection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<(StatusCode, Json<Reflection>)> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("reflection text must not be empty".into()));
    }
    let reflection = ReflectionRepo::new(Arc::clone(&state.db))
        .insert(&Reflection::new(text.to_owned()))
        .await?;
    info!(reflection_id = %reflection.id, "reflection captured");
    Ok((StatusCode::CREATED, Json(reflection)))
}

/// `GET /api/planner/daily`
///
/// # Errors
///
/// Returns `AppError::Db` if the task query fails.
pub async fn daily_plan(State(state): State<Arc<AppState>>) -> Result<Json<DailyPlan>> {
    let plan = state.planner.daily_plan(Utc::now()).await?;
    Ok(Json(plan))
}
