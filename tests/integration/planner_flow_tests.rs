//! End-to-end planning cycles over an in-memory database.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use focusflow::engine::ReflectionSource;
use focusflow::models::reflection::Reflection;
use focusflow::models::suggestion::SuggestionType;
use focusflow::models::task::{Priority, Task};
use focusflow::persistence::db::Database;
use focusflow::persistence::reflection_repo::ReflectionRepo;
use focusflow::persistence::task_repo::TaskRepo;
use focusflow::planner::Planner;
use focusflow::{AppError, Result};
use serde_json::json;

use super::test_helpers::{memory_db, test_config, ScriptedClient};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

async fn seed(db: &Arc<Database>, tasks: &[(&str, Priority, i64)]) -> Vec<Task> {
    let repo = TaskRepo::new(Arc::clone(db));
    let mut out = Vec::new();
    for (title, priority, days) in tasks {
        let task = Task::new(
            (*title).to_owned(),
            Some(now() + Duration::days(*days) + Duration::hours(1)),
            priority.clone(),
        );
        out.push(repo.create(&task).await.expect("seed"));
    }
    out
}

/// Reflection store whose every call fails.
struct BrokenReflections;

impl ReflectionSource for BrokenReflections {
    fn latest_unconsumed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Reflection>>> + Send + '_>> {
        Box::pin(async { Err(AppError::Db("reflection table locked".into())) })
    }

    fn mark_consumed(&self, _id: &str) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>> {
        Box::pin(async { Err(AppError::Db("reflection table locked".into())) })
    }
}

fn planner(db: &Arc<Database>, client: ScriptedClient) -> Planner {
    Planner::new(Arc::clone(db), Arc::new(client), &test_config())
}

#[tokio::test]
async fn empty_store_with_service_down_reports_nothing() {
    let db = memory_db().await;
    let plan = planner(&db, ScriptedClient::failing("down"))
        .daily_plan(now())
        .await
        .expect("plan");

    assert_eq!(plan.workload_score, 0);
    assert!(!plan.burnout_warning);
    assert!(plan.tasks.is_empty());
    assert!(plan.ai_suggestions.is_empty());
    assert_eq!(plan.date, now());
}

#[tokio::test]
async fn tasks_are_ranked_by_score_descending() {
    let db = memory_db().await;
    seed(
        &db,
        &[
            ("far high", Priority::High, 6),
            ("today low", Priority::Low, 0),
            ("mid medium", Priority::Medium, 3),
        ],
    )
    .await;

    let plan = planner(&db, ScriptedClient::failing("down"))
        .daily_plan(now())
        .await
        .expect("plan");

    let titles: Vec<&str> = plan.tasks.iter().map(|t| t.task.title.as_str()).collect();
    assert_eq!(titles, ["today low", "far high", "mid medium"]);
    assert!(plan
        .tasks
        .windows(2)
        .all(|w| w[0].priority_score >= w[1].priority_score));
    // 0.6 * 1 + 0.4 * 0.2
    assert!((plan.tasks[0].priority_score - 0.68).abs() < 1e-9);
    assert_eq!(plan.workload_score, 30);
}

#[tokio::test]
async fn tasks_outside_lookahead_are_ignored() {
    let db = memory_db().await;
    seed(
        &db,
        &[("inside", Priority::High, 3), ("outside", Priority::High, 8)],
    )
    .await;

    let plan = planner(&db, ScriptedClient::failing("down"))
        .daily_plan(now())
        .await
        .expect("plan");

    assert_eq!(plan.tasks.len(), 1);
    assert_eq!(plan.tasks[0].task.title, "inside");
    assert_eq!(plan.workload_score, 15);
}

#[tokio::test]
async fn overloaded_day_with_reflection_yields_all_three_suggestions() {
    let db = memory_db().await;
    let seeded = seed(
        &db,
        &[
            ("A", Priority::High, 0),
            ("B", Priority::High, 1),
            ("C", Priority::High, 2),
            ("L", Priority::Low, 3),
            ("M", Priority::Medium, 4),
        ],
    )
    .await;
    let reflections = ReflectionRepo::new(Arc::clone(&db));
    let reflection = reflections
        .insert(&Reflection::new("I need tomorrow afternoon free".into()))
        .await
        .expect("reflection");

    let client = ScriptedClient::ok(json!({
        "title": "Clear the afternoon",
        "description": "Move C."
    }));
    let plan = planner(&db, client).daily_plan(now()).await.expect("plan");

    assert_eq!(plan.workload_score, 60);
    assert!(plan.burnout_warning);

    let kinds: Vec<SuggestionType> = plan.ai_suggestions.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        [
            SuggestionType::Reschedule,
            SuggestionType::Prioritize,
            SuggestionType::VoiceInsight
        ]
    );

    let reschedule = &plan.ai_suggestions[0];
    assert_eq!(reschedule.task_id.as_deref(), Some(seeded[3].id.as_str()));
    assert_eq!(reschedule.changes.deadline, Some(now() + Duration::days(7)));

    // Plan order is by score: A (today) then B (tomorrow).
    let prioritize = &plan.ai_suggestions[1];
    assert!(prioritize.description.contains("'A'"));
    assert_eq!(prioritize.task_id.as_deref(), Some(seeded[1].id.as_str()));

    let insight = &plan.ai_suggestions[2];
    assert_eq!(insight.title, "Clear the afternoon");
    assert!(insight.task_id.is_none());

    let stored = reflections
        .get_by_id(&reflection.id)
        .await
        .expect("get")
        .expect("exists");
    assert!(stored.used_in_suggestions);
}

#[tokio::test]
async fn failed_insight_is_retried_on_next_cycle() {
    let db = memory_db().await;
    seed(&db, &[("only", Priority::Medium, 1)]).await;
    let reflections = ReflectionRepo::new(Arc::clone(&db));
    let reflection = reflections
        .insert(&Reflection::new("remind me about taxes".into()))
        .await
        .expect("reflection");

    let first = planner(&db, ScriptedClient::failing("503"))
        .daily_plan(now())
        .await
        .expect("plan despite failure");
    assert!(first.ai_suggestions.is_empty());
    assert_eq!(first.workload_score, 10);
    let stored = reflections.get_by_id(&reflection.id).await.unwrap().unwrap();
    assert!(!stored.used_in_suggestions);

    let retry = ScriptedClient::ok(json!({"title": "Taxes", "description": "Block an hour."}));
    let second = planner(&db, retry)
        .daily_plan(now())
        .await
        .expect("plan");
    assert_eq!(second.ai_suggestions.len(), 1);
    assert_eq!(second.ai_suggestions[0].kind, SuggestionType::VoiceInsight);
    let stored = reflections.get_by_id(&reflection.id).await.unwrap().unwrap();
    assert!(stored.used_in_suggestions);
}

#[tokio::test]
async fn consumed_reflection_does_not_repeat() {
    let db = memory_db().await;
    ReflectionRepo::new(Arc::clone(&db))
        .insert(&Reflection::new("note".into()))
        .await
        .expect("reflection");

    let reply = json!({"title": "T", "description": "D"});
    let p = planner(&db, ScriptedClient::ok(reply));

    let first = p.daily_plan(now()).await.expect("plan");
    let second = p.daily_plan(now()).await.expect("plan");
    assert_eq!(first.ai_suggestions.len(), 1);
    assert!(second.ai_suggestions.is_empty());
}

#[tokio::test]
async fn plan_serializes_with_expected_keys() {
    let db = memory_db().await;
    seed(&db, &[("x", Priority::High, 1)]).await;
    let plan = planner(&db, ScriptedClient::failing("down"))
        .daily_plan(now())
        .await
        .expect("plan");

    let value = serde_json::to_value(&plan).expect("serialize");
    assert_eq!(value["workload_score"], 15);
    assert_eq!(value["burnout_warning"], false);
    assert!(value["ai_suggestions"].as_array().unwrap().is_empty());
    let task = &value["tasks"][0];
    assert_eq!(task["title"], "x");
    assert_eq!(task["priority"], "high");
    assert!(task["priority_score"].is_f64());
}

#[tokio::test]
async fn reflection_lookup_failure_still_returns_plan() {
    let db = memory_db().await;
    seed(
        &db,
        &[
            ("A", Priority::High, 0),
            ("B", Priority::High, 1),
            ("C", Priority::High, 2),
            ("L", Priority::Low, 3),
        ],
    )
    .await;

    let client = Arc::new(ScriptedClient::ok(json!({"title": "T", "description": "D"})));
    let plan = Planner::new(Arc::clone(&db), Arc::<ScriptedClient>::clone(&client), &test_config())
        .with_reflection_source(Arc::new(BrokenReflections))
        .daily_plan(now())
        .await
        .expect("plan despite reflection store failure");

    assert_eq!(plan.tasks.len(), 4);
    assert_eq!(plan.workload_score, 50);
    assert!(!plan.burnout_warning);
    assert!(plan.ai_suggestions.is_empty());
    assert_eq!(client.call_count(), 0);
}
