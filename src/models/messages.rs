use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{ActivityId, ConnId, Session};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseMessage {
    pub activity_id: ActivityId,
    pub response: Value,
}

/// Events a client sends over its socket, framed as `{"event": ..., "data": ...}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ReceivedMessage {
    #[serde(alias = "join-activity")]
    JoinRoom(ActivityId),
    #[serde(alias = "leave-activity")]
    LeaveRoom(ActivityId),
    StartSession(ActivityId),
    PauseSession(ActivityId),
    ResumeSession(ActivityId),
    EndSession(ActivityId),
    SubmitResponse(SubmitResponseMessage),
    GetSessionStatus(ActivityId),
    Ping,
}

impl ReceivedMessage {
    pub fn event_name(&self) -> &'static str {
        match self {
            ReceivedMessage::JoinRoom(_) => "join-room",
            ReceivedMessage::LeaveRoom(_) => "leave-room",
            ReceivedMessage::StartSession(_) => "start-session",
            ReceivedMessage::PauseSession(_) => "pause-session",
            ReceivedMessage::ResumeSession(_) => "resume-session",
            ReceivedMessage::EndSession(_) => "end-session",
            ReceivedMessage::SubmitResponse(_) => "submit-response",
            ReceivedMessage::GetSessionStatus(_) => "get-session-status",
            ReceivedMessage::Ping => "ping",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub connection_id: ConnId,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceivedMessage {
    pub participant_id: ConnId,
    pub response: Value,
    pub total_responses: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PongMessage {
    pub date: String,
}

/// Events the server sends, either to a whole room or to a single connection.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum SendMessage {
    Connected(ConnectedMessage),
    ParticipantCount(usize),
    SessionStarted(Session),
    SessionUpdated(Session),
    SessionEnded(Session),
    SessionStatus(Option<Session>),
    ResponseReceived(ResponseReceivedMessage),
    Error(ErrorMessage),
    Pong(PongMessage),
}
