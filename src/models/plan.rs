//! Daily plan response model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::suggestion::Suggestion;
use super::task::ScoredTask;

/// Output of one planning cycle.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyPlan {
    /// The `now` the plan was computed against.
    pub date: DateTime<Utc>,
    /// Additive workload score over incomplete tasks.
    pub workload_score: u32,
    /// Whether the workload exceeds the burnout threshold.
    pub burnout_warning: bool,
    /// Tasks in the look-ahead window, highest score first.
    pub tasks: Vec<ScoredTask>,
    /// Rule-based and reflection-derived suggestions, in render order.
    pub ai_suggestions: Vec<Suggestion>,
}
