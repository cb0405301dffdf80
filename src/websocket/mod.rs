pub mod handler;
pub mod msg_ping_handler;
pub mod msg_response_handler;
pub mod msg_room_handler;
pub mod msg_session_handler;

use tracing::warn;

use crate::models::{ConnId, ErrorMessage, SendMessage};
use crate::ws::{Hub, HubError};

/// Tell the acting connection why its command was rejected. Nobody else hears about it.
pub(crate) async fn report_error(hub: &Hub, conn_id: ConnId, event: Option<&str>, err: &HubError) {
    warn!("Rejected {} from connection {}: {}", event.unwrap_or("frame"), conn_id, err);
    let reply = SendMessage::Error(ErrorMessage {
        code: err.code().to_string(),
        message: err.to_string(),
        event: event.map(str::to_string),
    });
    hub.send_to(conn_id, &reply).await;
}
