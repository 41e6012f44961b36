//! Reflection integration: turns the latest unconsumed user reflection
//! into one `voice_insight` suggestion.
//!
//! Best-effort. Any failure (lookup, timeout, service error, malformed
//! payload, lost consume race) is logged and leaves the report untouched.
//! The reflection is marked consumed only after a usable insight exists,
//! and only if this caller wins the conditional write.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn, Instrument};

use crate::generative::GenerativeTextClient;
use crate::models::reflection::Reflection;
use crate::models::suggestion::{Suggestion, SuggestionChanges, SuggestionType};
use crate::{AppError, Result};

use super::workload::WorkloadReport;

/// Storage collaborator for reflections.
///
/// Consumption is two-phase: read the latest unconsumed reflection, then
/// compare-and-set its consumed flag once the insight is ready.
pub trait ReflectionSource: Send + Sync {
    /// Most recent reflection with `used_in_suggestions = false`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the lookup fails.
    fn latest_unconsumed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Reflection>>> + Send + '_>>;

    /// Flip `used_in_suggestions` from false to true.
    ///
    /// Returns `Ok(false)` when the reflection was already consumed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    fn mark_consumed(&self, id: &str) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>>;
}

#[derive(Debug, Deserialize)]
struct VoiceInsight {
    title: String,
    description: String,
}

/// Prompt asking for a single `{title, description}` object.
#[must_use]
pub fn insight_prompt(transcribed_query: &str, workload_score: u32) -> String {
    format!(
        "The user left this note for their daily plan: \"{transcribed_query}\".\n\
         Their current workload score is {workload_score} (above 50 means overloaded).\n\
         Suggest one concrete adjustment that addresses the request in light of that workload.\n\
         Return exactly one JSON object with string keys \"title\" (under 60 characters) \
         and \"description\" (one or two sentences)."
    )
}

fn parse_insight(value: serde_json::Value) -> Result<VoiceInsight> {
    let insight: VoiceInsight = serde_json::from_value(value)?;
    if insight.title.trim().is_empty() {
        return Err(AppError::Generative("insight title is empty".into()));
    }
    Ok(insight)
}

/// Append a `voice_insight` suggestion built from the latest unconsumed
/// reflection, independent of the burnout flag.
///
/// Returns `true` when a suggestion was added and the reflection consumed.
pub async fn integrate_reflection(
    report: &mut WorkloadReport,
    source: &dyn ReflectionSource,
    client: &dyn GenerativeTextClient,
    timeout: Duration,
) -> bool {
    let reflection = match source.latest_unconsumed().await {
        Ok(Some(reflection)) => reflection,
        Ok(None) => return false,
        Err(err) => {
            warn!(%err, "reflection lookup failed; skipping voice insight");
            return false;
        }
    };

    let span = tracing::info_span!("reflection_insight", reflection_id = %reflection.id);
    async {
        let prompt = insight_prompt(&reflection.transcribed_query, report.score);

        let insight = match tokio::time::timeout(timeout, client.complete(&prompt)).await {
            Err(_) => Err(AppError::Generative(format!(
                "timed out after {}ms",
                timeout.as_millis()
            ))),
            Ok(result) => result.and_then(parse_insight),
        };

        let insight = match insight {
            Ok(insight) => insight,
            Err(err) => {
                warn!(%err, "voice insight generation failed; reflection left unconsumed");
                return false;
            }
        };

        match source.mark_consumed(&reflection.id).await {
            Ok(true) => {}
            Ok(false) => {
                info!("reflection consumed by a concurrent cycle; dropping insight");
                return false;
            }
            Err(err) => {
                warn!(%err, "failed to mark reflection consumed; dropping insight");
                return false;
            }
        }

        report.suggestions.push(Suggestion::new(
            SuggestionType::VoiceInsight,
            insight.title,
            insight.description,
            None,
            SuggestionChanges::default(),
        ));
        info!("voice insight added");
        true
    }
    .instrument(span)
    .await
}
