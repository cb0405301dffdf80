use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::{ConnId, ParticipantResult, ResponseReceivedMessage, Session, SessionStatus};
use crate::ws::error::HubError;

/// Record a participant's submission on an active session.
///
/// The latest submission per participant wins, so the reported total is the number of distinct
/// participants that have answered, never the number of submissions.
pub fn record(
    session: &mut Session,
    participant_id: ConnId,
    response: Value,
    now: DateTime<Utc>,
) -> Result<ResponseReceivedMessage, HubError> {
    if session.status != SessionStatus::Active {
        return Err(HubError::NotAccepting(session.activity_id.clone()));
    }

    session.results.insert(
        participant_id,
        ParticipantResult { response: response.clone(), submitted_at: now },
    );

    Ok(ResponseReceivedMessage {
        participant_id,
        response,
        total_responses: session.total_responses(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityId;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn session(status: SessionStatus) -> Session {
        Session {
            id: "session-42-0-0".to_string(),
            activity_id: ActivityId::parse("42").unwrap(),
            status,
            started_at: Utc::now(),
            ended_at: None,
            participants: vec![],
            results: BTreeMap::new(),
        }
    }

    #[test]
    fn latest_submission_wins_and_total_counts_participants() {
        let mut session = session(SessionStatus::Active);
        let alice = ConnId::new();
        let bob = ConnId::new();

        let first = record(&mut session, alice, json!({"choice": "A"}), Utc::now()).unwrap();
        assert_eq!(first.total_responses, 1);

        let again = record(&mut session, alice, json!({"choice": "C"}), Utc::now()).unwrap();
        assert_eq!(again.total_responses, 1);
        assert_eq!(session.results[&alice].response, json!({"choice": "C"}));

        let other = record(&mut session, bob, json!({"choice": "B"}), Utc::now()).unwrap();
        assert_eq!(other.participant_id, bob);
        assert_eq!(other.total_responses, 2);
        assert_eq!(session.results.len(), 2);
    }

    #[test]
    fn rejects_submissions_unless_active() {
        for status in [SessionStatus::Paused, SessionStatus::Completed] {
            let mut session = session(status);
            let before = session.clone();
            let err = record(&mut session, ConnId::new(), json!(1), Utc::now()).unwrap_err();
            assert_eq!(err, HubError::NotAccepting(ActivityId::parse("42").unwrap()));
            assert_eq!(session, before);
        }
    }
}
