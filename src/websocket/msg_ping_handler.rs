use chrono::Utc;
use tracing::{debug, error};

use crate::models::{ConnId, PongMessage, SendMessage};
use crate::ws::Hub;

/// Handle a ping - reply with a pong carrying the server time.
pub async fn handle_ping_message(hub: &Hub, conn_id: ConnId) {
    debug!("Ping received from connection {}", conn_id);

    let pong = SendMessage::Pong(PongMessage { date: Utc::now().to_rfc3339() });
    if !hub.send_to(conn_id, &pong).await {
        error!("Failed to queue pong for connection {}", conn_id);
    }
}
