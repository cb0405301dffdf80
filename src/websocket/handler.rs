use std::sync::Arc;
use axum::{
    extract::{State, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::AppState;
use crate::models::{ConnId, ReceivedMessage};
use crate::websocket::msg_ping_handler::handle_ping_message;
use crate::websocket::msg_response_handler::handle_submit_message;
use crate::websocket::msg_room_handler::{handle_join_message, handle_leave_message};
use crate::websocket::msg_session_handler::{handle_lifecycle_message, handle_status_message, LifecycleCommand};
use crate::websocket::report_error;
use crate::ws::{Hub, HubError};

/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    let hub = app_state.hub.clone();
    let (conn_id, mut outbound) = hub.connect().await;
    info!("WebSocket connection established with connection_id: {}", conn_id);

    let (mut sender, mut receiver) = socket.split();

    // Forward queued frames to the socket. Ends when the hub drops the connection
    // or the peer stops accepting writes.
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if sender.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });

    // Read frames one at a time; each is fully handled before the next is read.
    let reader_hub = hub.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => handle_frame(&reader_hub, conn_id, &text).await,
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => handle_frame(&reader_hub, conn_id, &text).await,
                    Err(_) => {
                        let err = HubError::MalformedPayload("binary frame is not UTF-8".to_string());
                        report_error(&reader_hub, conn_id, None, &err).await;
                    }
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("WebSocket error on connection {}: {}", conn_id, e);
                    break;
                }
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    hub.disconnect(conn_id).await;
    info!("WebSocket connection {} terminated", conn_id);
}

/// Parse one inbound frame and route it to its message handler.
///
/// Frames that are not JSON, name an unknown event or lack required fields are rejected back
/// to the sender with `malformed-payload`.
pub async fn handle_frame(hub: &Hub, conn_id: ConnId, text: &str) {
    let raw: Value = match serde_json::from_str(text) {
        Ok(raw) => raw,
        Err(e) => {
            report_error(hub, conn_id, None, &HubError::MalformedPayload(e.to_string())).await;
            return;
        }
    };

    let msg = match ReceivedMessage::deserialize(&raw) {
        Ok(msg) => msg,
        Err(e) => {
            let event = raw.get("event").and_then(Value::as_str);
            report_error(hub, conn_id, event, &HubError::MalformedPayload(e.to_string())).await;
            return;
        }
    };

    info!("Received {} from connection {}", msg.event_name(), conn_id);

    match msg {
        ReceivedMessage::JoinRoom(activity) => handle_join_message(hub, conn_id, &activity).await,
        ReceivedMessage::LeaveRoom(activity) => handle_leave_message(hub, conn_id, &activity).await,
        ReceivedMessage::StartSession(activity) => {
            handle_lifecycle_message(hub, conn_id, &activity, LifecycleCommand::Start).await
        }
        ReceivedMessage::PauseSession(activity) => {
            handle_lifecycle_message(hub, conn_id, &activity, LifecycleCommand::Pause).await
        }
        ReceivedMessage::ResumeSession(activity) => {
            handle_lifecycle_message(hub, conn_id, &activity, LifecycleCommand::Resume).await
        }
        ReceivedMessage::EndSession(activity) => {
            handle_lifecycle_message(hub, conn_id, &activity, LifecycleCommand::End).await
        }
        ReceivedMessage::SubmitResponse(submit) => handle_submit_message(hub, conn_id, submit).await,
        ReceivedMessage::GetSessionStatus(activity) => handle_status_message(hub, conn_id, &activity).await,
        ReceivedMessage::Ping => handle_ping_message(hub, conn_id).await,
    }
}
