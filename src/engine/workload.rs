//! Workload analyzer: additive load score, burnout flag, and rule-based
//! suggestions.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::suggestion::{Suggestion, SuggestionChanges, SuggestionType};
use crate::models::task::{Priority, Task};

/// Workload strictly above this raises the burnout warning.
pub const BURNOUT_THRESHOLD: u32 = 50;

/// How far a reschedule suggestion pushes the deadline.
pub const RESCHEDULE_DAYS: i64 = 7;

/// Load contributed by one incomplete task of the given tier.
///
/// Unrecognized tiers contribute nothing.
#[must_use]
pub fn workload_weight(priority: &Priority) -> u32 {
    match priority {
        Priority::High => 15,
        Priority::Medium => 10,
        Priority::Low => 5,
        Priority::Unrecognized(_) => 0,
    }
}

/// Result of analyzing a task list.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadReport {
    /// Sum of [`workload_weight`] over incomplete tasks.
    pub score: u32,
    /// `score > BURNOUT_THRESHOLD`.
    pub burnout_warning: bool,
    /// Suggestions in render order.
    pub suggestions: Vec<Suggestion>,
}

/// Analyze `tasks` (already in plan order) against `now`.
///
/// Completed tasks are ignored. When the burnout warning is raised, emits
/// at most one `reschedule` suggestion (first low-priority task, deadline
/// pushed a week past `now`) followed by at most one `prioritize`
/// suggestion (describes the first high-priority task, demotes the second).
#[must_use]
pub fn analyze_workload<'a, I>(tasks: I, now: DateTime<Utc>) -> WorkloadReport
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut score = 0u32;
    let mut high: Vec<&Task> = Vec::new();
    let mut low: Vec<&Task> = Vec::new();

    for task in tasks.into_iter().filter(|t| !t.completed) {
        score = score.saturating_add(workload_weight(&task.priority));
        match task.priority {
            Priority::High => high.push(task),
            Priority::Low => low.push(task),
            Priority::Medium | Priority::Unrecognized(_) => {}
        }
    }

    let burnout_warning = score > BURNOUT_THRESHOLD;
    let mut suggestions = Vec::new();

    if burnout_warning {
        if let Some(target) = low.first() {
            suggestions.push(reschedule(target, now));
        }
        if let [focus, demote, ..] = high.as_slice() {
            suggestions.push(prioritize(focus, demote, high.len()));
        }
    }

    debug!(
        score,
        burnout_warning,
        high = high.len(),
        low = low.len(),
        suggestions = suggestions.len(),
        "workload analyzed"
    );

    WorkloadReport {
        score,
        burnout_warning,
        suggestions,
    }
}

fn reschedule(target: &Task, now: DateTime<Utc>) -> Suggestion {
    Suggestion::new(
        SuggestionType::Reschedule,
        "Reschedule Low Priority Task".into(),
        format!(
            "Move '{}' to next week to reduce current workload.",
            target.title
        ),
        Some(target.id.clone()),
        SuggestionChanges {
            deadline: Some(now + Duration::days(RESCHEDULE_DAYS)),
            priority: None,
        },
    )
}

fn prioritize(focus: &Task, demote: &Task, high_count: usize) -> Suggestion {
    Suggestion::new(
        SuggestionType::Prioritize,
        "Focus on One Priority".into(),
        format!(
            "You have {high_count} high-priority items. Focus strictly on '{}' first.",
            focus.title
        ),
        Some(demote.id.clone()),
        SuggestionChanges {
            deadline: None,
            priority: Some(Priority::Medium),
        },
    )
}
