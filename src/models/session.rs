use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::observation::{ModeDurations, ObservationEntry};

/// Immutable copy of a finished session, produced exactly once at stop and
/// handed to the aggregation/report layer. Nothing mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub subject: String,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
    pub entries: Vec<ObservationEntry>,
    pub mode_durations: ModeDurations,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
