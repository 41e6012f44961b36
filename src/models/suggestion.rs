//! Suggestion value objects returned with each daily plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::Priority;

/// Kind of suggestion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    /// Push a task's deadline out.
    Reschedule,
    /// Narrow focus by demoting a competing high-priority task.
    Prioritize,
    /// Free-form insight derived from a user reflection.
    VoiceInsight,
}

/// Proposed field updates the caller may apply to the target task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestionChanges {
    /// Proposed new deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    /// Proposed new priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl SuggestionChanges {
    /// True when no field change is proposed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deadline.is_none() && self.priority.is_none()
    }
}

/// A non-committal proposal for the user to accept or ignore.
///
/// Built fresh per planning cycle and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Fresh identifier.
    pub id: String,
    /// Suggestion kind.
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    /// Short headline.
    pub title: String,
    /// Human-readable explanation.
    pub description: String,
    /// Targeted task, if any.
    pub task_id: Option<String>,
    /// Proposed updates to the targeted task.
    pub changes: SuggestionChanges,
}

impl Suggestion {
    /// Construct a suggestion with a generated identifier.
    #[must_use]
    pub fn new(
        kind: SuggestionType,
        title: String,
        description: String,
        task_id: Option<String>,
        changes: SuggestionChanges,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            title,
            description,
            task_id,
            changes,
        }
    }
}
