use thiserror::Error;

use crate::models::{ActivityId, ConnId, SessionStatus};

/// Reasons a command from a connection is rejected.
///
/// A rejected command never mutates room or session state; the error is reported to the acting
/// connection only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("no live session for activity {0}")]
    NoSession(ActivityId),

    #[error("cannot {action} session for activity {activity} while it is {status}")]
    InvalidTransition {
        activity: ActivityId,
        action: &'static str,
        status: SessionStatus,
    },

    #[error("session for activity {0} is not accepting responses")]
    NotAccepting(ActivityId),

    #[error("a session for activity {0} is already live")]
    AlreadyLive(ActivityId),

    #[error("connection {0} is not registered")]
    UnknownConnection(ConnId),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl HubError {
    /// Stable code carried by the `error` event.
    pub fn code(&self) -> &'static str {
        match self {
            HubError::NoSession(_)
            | HubError::InvalidTransition { .. }
            | HubError::NotAccepting(_)
            | HubError::AlreadyLive(_) => "invalid-transition",
            HubError::UnknownConnection(_) => "unknown-connection",
            HubError::MalformedPayload(_) => "malformed-payload",
        }
    }
}
