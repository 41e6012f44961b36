//! Priority scorer: blends deadline urgency with priority importance.

use chrono::{DateTime, Utc};

use crate::models::task::{Priority, ScoredTask, Task};

/// Score given to tasks without a deadline.
pub const UNSCHEDULED_SCORE: f64 = 0.1;

/// Weight of the urgency term.
pub const URGENCY_WEIGHT: f64 = 0.6;

/// Weight of the importance term.
pub const IMPORTANCE_WEIGHT: f64 = 0.4;

/// Importance of a priority tier; unrecognized tiers count as medium.
#[must_use]
pub fn importance(priority: &Priority) -> f64 {
    match priority {
        Priority::High => 1.0,
        Priority::Low => 0.2,
        Priority::Medium | Priority::Unrecognized(_) => 0.5,
    }
}

/// Whole calendar days from `now` to `deadline`, clamped to at least one.
///
/// Due-today and overdue tasks both land on 1.
fn days_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (deadline.date_naive() - now.date_naive()).num_days();
    u32::try_from(days.max(1)).unwrap_or(u32::MAX)
}

/// Compute the priority score of `task` relative to `now`.
///
/// `0.6 * (1 / days_until) + 0.4 * importance`, or
/// [`UNSCHEDULED_SCORE`] when the task has no deadline. Pure and total.
#[must_use]
pub fn calculate_priority_score(task: &Task, now: DateTime<Utc>) -> f64 {
    let Some(deadline) = task.deadline else {
        return UNSCHEDULED_SCORE;
    };

    let urgency = 1.0 / f64::from(days_until(deadline, now));
    URGENCY_WEIGHT * urgency + IMPORTANCE_WEIGHT * importance(&task.priority)
}

/// Score every task and sort highest first.
///
/// The sort is stable, so equal scores keep their input order.
#[must_use]
pub fn rank_tasks(tasks: Vec<Task>, now: DateTime<Utc>) -> Vec<ScoredTask> {
    let mut scored: Vec<ScoredTask> = tasks
        .into_iter()
        .map(|task| {
            let priority_score = calculate_priority_score(&task, now);
            ScoredTask {
                task,
                priority_score,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
    scored
}
