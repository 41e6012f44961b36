//! Planning engines: per-task priority scoring, workload analysis, and
//! reflection-derived insights.
//!
//! [`priority`] and [`workload`] are pure and total over well-formed
//! input. [`insight`] is the only step that suspends, and its failures
//! never escape to the caller.

pub mod insight;
pub mod priority;
pub mod workload;

pub use insight::{integrate_reflection, ReflectionSource};
pub use priority::{calculate_priority_score, rank_tasks};
pub use workload::{analyze_workload, WorkloadReport};
