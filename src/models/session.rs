use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

use crate::models::{ActivityId, ConnId};

/// Lifecycle status of a session object.
///
/// The initial "waiting" state of an activity is the absence of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Active => "active",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// A participant's latest submission.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResult {
    #[schema(value_type = Object)]
    pub response: Value,
    pub submitted_at: DateTime<Utc>,
}

/// One live run of an activity. Serialized as-is for every session broadcast.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[schema(value_type = String)]
    pub activity_id: ActivityId,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[schema(value_type = Vec<String>)]
    pub participants: Vec<ConnId>,
    #[schema(value_type = Object)]
    pub results: BTreeMap<ConnId, ParticipantResult>,
}

impl Session {
    pub fn total_responses(&self) -> usize {
        self.results.len()
    }
}
