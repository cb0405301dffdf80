use crate::models::{ActivityId, ConnId};
use crate::websocket::report_error;
use crate::ws::Hub;

/// Handle join-room
pub async fn handle_join_message(hub: &Hub, conn_id: ConnId, activity: &ActivityId) {
    if let Err(e) = hub.join(conn_id, activity).await {
        report_error(hub, conn_id, Some("join-room"), &e).await;
    }
}

/// Handle leave-room
pub async fn handle_leave_message(hub: &Hub, conn_id: ConnId, activity: &ActivityId) {
    hub.leave(conn_id, activity).await;
}
