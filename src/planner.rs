//! Daily planning pipeline.
//!
//! Fetches tasks in the look-ahead window, ranks them, analyzes the
//! workload, and folds in at most one reflection-derived insight.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, Instrument};

use crate::config::GlobalConfig;
use crate::engine::{
    analyze_workload, integrate_reflection, rank_tasks, ReflectionSource, WorkloadReport,
};
use crate::generative::GenerativeTextClient;
use crate::models::plan::DailyPlan;
use crate::models::task::ScoredTask;
use crate::persistence::db::Database;
use crate::persistence::reflection_repo::ReflectionRepo;
use crate::persistence::task_repo::TaskRepo;
use crate::Result;

/// Run the workload analyzer over ranked tasks, then the reflection step.
///
/// Never fails: the reflection step degrades to a no-op.
pub async fn analyze(
    ranked: &[ScoredTask],
    now: DateTime<Utc>,
    reflections: &dyn ReflectionSource,
    client: &dyn GenerativeTextClient,
    insight_timeout: Duration,
) -> WorkloadReport {
    let mut report = analyze_workload(ranked.iter().map(|s| &s.task), now);
    integrate_reflection(&mut report, reflections, client, insight_timeout).await;
    report
}

/// Builds daily plans from persisted tasks and reflections.
#[derive(Clone)]
pub struct Planner {
    tasks: TaskRepo,
    reflections: Arc<dyn ReflectionSource>,
    client: Arc<dyn GenerativeTextClient>,
    lookahead_days: u32,
    insight_timeout: Duration,
}

impl Planner {
    /// Create a planner backed by `db`.
    #[must_use]
    pub fn new(
        db: Arc<Database>,
        client: Arc<dyn GenerativeTextClient>,
        config: &GlobalConfig,
    ) -> Self {
        Self {
            tasks: TaskRepo::new(Arc::clone(&db)),
            reflections: Arc::new(ReflectionRepo::new(db)),
            client,
            lookahead_days: config.planner.lookahead_days,
            insight_timeout: config.generative.timeout(),
        }
    }

    /// Replace the reflection collaborator.
    #[must_use]
    pub fn with_reflection_source(mut self, source: Arc<dyn ReflectionSource>) -> Self {
        self.reflections = source;
        self
    }

    /// Compute the plan for `now`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the task query fails. Generative failures
    /// never surface here.
    pub async fn daily_plan(&self, now: DateTime<Utc>) -> Result<DailyPlan> {
        let span = tracing::info_span!("daily_plan", %now);
        async {
            let window_end = now + chrono::Duration::days(i64::from(self.lookahead_days));
            let tasks = self.tasks.list_window(now, window_end).await?;
            let ranked = rank_tasks(tasks, now);

            let report = analyze(
                &ranked,
                now,
                self.reflections.as_ref(),
                self.client.as_ref(),
                self.insight_timeout,
            )
            .await;

            info!(
                tasks = ranked.len(),
                workload_score = report.score,
                burnout_warning = report.burnout_warning,
                suggestions = report.suggestions.len(),
                "daily plan built"
            );

            Ok(DailyPlan {
                date: now,
                workload_score: report.score,
                burnout_warning: report.burnout_warning,
                tasks: ranked,
                ai_suggestions: report.suggestions,
            })
        }
        .instrument(span)
        .await
    }
}
