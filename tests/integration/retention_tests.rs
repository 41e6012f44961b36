//! Retention purge of consumed reflections.

use std::sync::Arc;

use chrono::{Duration, Utc};
use focusflow::models::reflection::Reflection;
use focusflow::persistence::reflection_repo::ReflectionRepo;
use focusflow::persistence::retention;

use super::test_helpers::memory_db;

fn reflection(text: &str, age_days: i64, consumed: bool) -> Reflection {
    Reflection {
        created_at: Utc::now() - Duration::days(age_days),
        used_in_suggestions: consumed,
        ..Reflection::new(text.into())
    }
}

#[tokio::test]
async fn purge_removes_only_old_consumed_reflections() {
    let db = memory_db().await;
    let repo = ReflectionRepo::new(Arc::clone(&db));

    let old_consumed = repo.insert(&reflection("old used", 45, true)).await.unwrap();
    let old_pending = repo.insert(&reflection("old pending", 45, false)).await.unwrap();
    let new_consumed = repo.insert(&reflection("new used", 2, true)).await.unwrap();

    let deleted = retention::purge(&repo, 30).await.expect("purge");
    assert_eq!(deleted, 1);

    assert!(repo.get_by_id(&old_consumed.id).await.unwrap().is_none());
    assert!(repo.get_by_id(&old_pending.id).await.unwrap().is_some());
    assert!(repo.get_by_id(&new_consumed.id).await.unwrap().is_some());
}

#[tokio::test]
async fn purge_on_empty_store_deletes_nothing() {
    let db = memory_db().await;
    let repo = ReflectionRepo::new(db);
    assert_eq!(retention::purge(&repo, 30).await.expect("purge"), 0);
}

#[tokio::test]
async fn retention_task_stops_on_cancel() {
    let db = memory_db().await;
    let repo = ReflectionRepo::new(Arc::clone(&db));
    let old = repo.insert(&reflection("old used", 60, true)).await.unwrap();

    let cancel = tokio_util::sync::CancellationToken::new();
    let handle = retention::spawn_retention_task(Arc::clone(&db), 30, cancel.clone());

    // The first tick fires immediately.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(repo.get_by_id(&old.id).await.unwrap().is_none());

    cancel.cancel();
    tokio::time::timeout(std::time::Duration::from_secs(2), handle)
        .await
        .expect("task exits")
        .expect("no panic");
}
