//! Smart capture: free text to a structured task draft.
//!
//! The generative client does the extraction; whenever it is unavailable
//! or returns something unusable a keyword-based fallback produces the
//! draft instead, so capture only fails on empty input.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::generative::GenerativeTextClient;
use crate::models::task::{Category, Priority, TaskDraft};
use crate::{AppError, Result};

/// Deadline offset used when nothing better is known.
pub const DEFAULT_DEADLINE_DAYS: i64 = 3;

#[derive(Debug, Deserialize)]
struct ExtractedTask {
    title: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    deadline: Option<String>,
}

fn extraction_prompt(text: &str, now: DateTime<Utc>) -> String {
    format!(
        "Extract task details from the user input below.\n\
         Current date and time: {now}\n\
         Return ONLY a JSON object with these exact keys:\n\
         - \"title\": a clean, actionable title (string)\n\
         - \"category\": one of [\"task\", \"assignment\", \"habit\"]\n\
         - \"priority\": one of [\"high\", \"medium\", \"low\"]\n\
         - \"deadline\": ISO 8601 datetime. If no time is given use 23:59:59 of the target date; \
         if no date is implied use {DEFAULT_DEADLINE_DAYS} days from now.\n\n\
         User input: {text}",
        now = now.to_rfc3339(),
    )
}

/// Parse an ISO 8601 deadline; naive timestamps are taken as UTC.
fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn into_draft(extracted: ExtractedTask, now: DateTime<Utc>) -> Result<TaskDraft> {
    let title = extracted.title.trim();
    if title.is_empty() {
        return Err(AppError::Capture("extracted title is empty".into()));
    }

    let deadline = match extracted.deadline.as_deref() {
        Some(raw) => parse_deadline(raw)
            .ok_or_else(|| AppError::Capture(format!("unparsable deadline: {raw}")))?,
        None => now + chrono::Duration::days(DEFAULT_DEADLINE_DAYS),
    };

    Ok(TaskDraft {
        title: title.to_owned(),
        description: None,
        deadline: Some(deadline),
        priority: extracted
            .priority
            .as_deref()
            .map(Priority::parse)
            .unwrap_or_default(),
        category: extracted
            .category
            .as_deref()
            .and_then(Category::parse)
            .unwrap_or_default(),
        completed: false,
        estimated_minutes: Some(30),
    })
}

/// Keyword-based draft used when extraction is unavailable.
///
/// The input text becomes the title unchanged.
#[must_use]
pub fn fallback_draft(text: &str, now: DateTime<Utc>) -> TaskDraft {
    let lower = text.to_lowercase();
    TaskDraft {
        title: text.to_owned(),
        description: None,
        deadline: Some(now + chrono::Duration::days(DEFAULT_DEADLINE_DAYS)),
        priority: if lower.contains("urgent") {
            Priority::High
        } else {
            Priority::Medium
        },
        category: if lower.contains("exam") {
            Category::Assignment
        } else {
            Category::Task
        },
        completed: false,
        estimated_minutes: Some(30),
    }
}

/// Turn `text` into a task draft. Does not persist anything.
///
/// # Errors
///
/// Returns `AppError::Validation` if `text` is blank.
pub async fn capture_text(
    text: &str,
    now: DateTime<Utc>,
    client: &dyn GenerativeTextClient,
    timeout: Duration,
) -> Result<TaskDraft> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("capture text must not be empty".into()));
    }

    let prompt = extraction_prompt(text, now);
    let extracted = match tokio::time::timeout(timeout, client.complete(&prompt)).await {
        Err(_) => Err(AppError::Generative("capture timed out".into())),
        Ok(result) => result.and_then(|value| {
            serde_json::from_value::<ExtractedTask>(value)
                .map_err(|e| AppError::Capture(format!("unexpected shape: {e}")))
        }),
    }
    .and_then(|extracted| into_draft(extracted, now));

    match extracted {
        Ok(draft) => Ok(draft),
        Err(err) => {
            warn!(%err, "smart capture extraction failed; using keyword fallback");
            Ok(fallback_draft(text, now))
        }
    }
}
