//! Task model and its priority/category vocabularies.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority tier of a task.
///
/// Anything other than `high`, `medium` or `low` is kept verbatim as
/// [`Priority::Unrecognized`] so it round-trips through storage; the
/// engines give it their documented fallback treatment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    /// Must be done soon.
    High,
    /// Default tier.
    #[default]
    Medium,
    /// Can slip without consequence.
    Low,
    /// Raw value that matched no known tier.
    Unrecognized(String),
}

impl Priority {
    /// Parse a priority string. Never fails.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            other => Self::Unrecognized(other.to_owned()),
        }
    }

    /// Storage and wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_owned()
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work a task represents.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Generic to-do item.
    #[default]
    Task,
    /// Coursework or graded deliverable.
    Assignment,
    /// Recurring routine.
    Habit,
}

impl Category {
    /// Parse a category string, returning `None` for unknown values.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "task" => Some(Self::Task),
            "assignment" => Some(Self::Assignment),
            "habit" => Some(Self::Habit),
            _ => None,
        }
    }

    /// Storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Assignment => "assignment",
            Self::Habit => "habit",
        }
    }
}

fn default_estimated_minutes() -> Option<i64> {
    Some(30)
}

/// A persisted unit of work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Unique record identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Optional free-form notes.
    pub description: Option<String>,
    /// Due point in time; `None` means unscheduled.
    pub deadline: Option<DateTime<Utc>>,
    /// Priority tier.
    pub priority: Priority,
    /// Kind of work.
    pub category: Category,
    /// Whether the task is done.
    pub completed: bool,
    /// Rough effort estimate.
    pub estimated_minutes: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Construct a new incomplete task with a generated identifier.
    #[must_use]
    pub fn new(title: String, deadline: Option<DateTime<Utc>>, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description: None,
            deadline,
            priority,
            category: Category::Task,
            completed: false,
            estimated_minutes: default_estimated_minutes(),
            created_at: Utc::now(),
        }
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(deadline) = update.deadline {
            self.deadline = Some(deadline);
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
    }
}

/// Caller-supplied fields for a new task; also the output of smart capture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskDraft {
    /// Display title.
    pub title: String,
    /// Optional free-form notes.
    #[serde(default)]
    pub description: Option<String>,
    /// Due point in time.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Priority tier.
    #[serde(default)]
    pub priority: Priority,
    /// Kind of work.
    #[serde(default)]
    pub category: Category,
    /// Whether the task starts out done.
    #[serde(default)]
    pub completed: bool,
    /// Rough effort estimate.
    #[serde(default = "default_estimated_minutes")]
    pub estimated_minutes: Option<i64>,
}

impl TaskDraft {
    /// Materialize the draft into a task with a fresh identifier.
    #[must_use]
    pub fn into_task(self) -> Task {
        Task {
            description: self.description,
            category: self.category,
            completed: self.completed,
            estimated_minutes: self.estimated_minutes,
            ..Task::new(self.title, self.deadline, self.priority)
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskUpdate {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New notes.
    #[serde(default)]
    pub description: Option<String>,
    /// New deadline.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// New priority tier.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// New category.
    #[serde(default)]
    pub category: Option<Category>,
    /// New completion flag.
    #[serde(default)]
    pub completed: Option<bool>,
}

/// A task annotated with its priority score for one planning cycle.
///
/// The score is relative to the cycle's `now` and is never persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredTask {
    /// Underlying task.
    #[serde(flatten)]
    pub task: Task,
    /// Blended urgency/importance score.
    pub priority_score: f64,
}
