use crate::models::{ConnId, SubmitResponseMessage};
use crate::websocket::report_error;
use crate::ws::Hub;

/// Handle submit-response. The sender's connection id is the participant id.
pub async fn handle_submit_message(hub: &Hub, conn_id: ConnId, submit: SubmitResponseMessage) {
    let SubmitResponseMessage { activity_id, response } = submit;
    if let Err(e) = hub.submit(conn_id, &activity_id, response).await {
        report_error(hub, conn_id, Some("submit-response"), &e).await;
    }
}
