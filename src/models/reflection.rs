//! Reflection model: a captured free-text note awaiting the next plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user note (typically a voice transcript) to fold into planning.
///
/// Once it has produced a voice insight it is marked consumed and never
/// surfaced again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    /// Unique record identifier.
    pub id: String,
    /// Free text captured from the user.
    pub transcribed_query: String,
    /// Capture timestamp; the most recent unconsumed reflection wins.
    pub created_at: DateTime<Utc>,
    /// Whether a suggestion has already been generated from this note.
    pub used_in_suggestions: bool,
}

impl Reflection {
    /// Construct a new unconsumed reflection.
    #[must_use]
    pub fn new(transcribed_query: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            transcribed_query,
            created_at: Utc::now(),
            used_in_suggestions: false,
        }
    }
}
