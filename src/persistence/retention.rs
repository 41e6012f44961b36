//! Retention service for time-based data purge.
//!
//! Runs as a background task deleting reflections that have already
//! produced a voice insight and are older than `retention_days`.
//! Unconsumed reflections are never purged.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::db::Database;
use super::reflection_repo::ReflectionRepo;
use crate::Result;

const PURGE_INTERVAL: Duration = Duration::from_secs(3600);

/// Spawn the retention purge background task.
///
/// The first purge runs immediately, then hourly until `cancel` fires.
#[must_use]
pub fn spawn_retention_task(
    db: Arc<Database>,
    retention_days: u32,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let repo = ReflectionRepo::new(db);
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("retention task shutting down");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(err) = purge(&repo, retention_days).await {
                        error!(?err, "retention purge failed");
                    }
                }
            }
        }
    })
}

/// Run one purge pass.
///
/// Returns the number of reflections deleted.
///
/// # Errors
///
/// Returns `AppError::Db` if the delete fails.
pub async fn purge(repo: &ReflectionRepo, retention_days: u32) -> Result<u64> {
    let cutoff = Utc::now() - chrono::Duration::days(i64::from(retention_days));
    let deleted = repo.purge_consumed(cutoff).await?;
    info!(retention_days, deleted, "retention purge completed");
    Ok(deleted)
}
