use crate::models::{ActivityId, ConnId};
use crate::websocket::report_error;
use crate::ws::Hub;

/// Lifecycle commands an instructor can issue for an activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleCommand {
    Start,
    Pause,
    Resume,
    End,
}

impl LifecycleCommand {
    fn event_name(self) -> &'static str {
        match self {
            LifecycleCommand::Start => "start-session",
            LifecycleCommand::Pause => "pause-session",
            LifecycleCommand::Resume => "resume-session",
            LifecycleCommand::End => "end-session",
        }
    }
}

/// Handle start/pause/resume/end. Broadcasting happens inside the hub on success.
pub async fn handle_lifecycle_message(
    hub: &Hub,
    conn_id: ConnId,
    activity: &ActivityId,
    command: LifecycleCommand,
) {
    let result = match command {
        LifecycleCommand::Start => hub.start(activity).await,
        LifecycleCommand::Pause => hub.pause(activity).await,
        LifecycleCommand::Resume => hub.resume(activity).await,
        LifecycleCommand::End => hub.end(activity).await,
    };
    if let Err(e) = result {
        report_error(hub, conn_id, Some(command.event_name()), &e).await;
    }
}

/// Handle get-session-status - unicast reply to the requester.
pub async fn handle_status_message(hub: &Hub, conn_id: ConnId, activity: &ActivityId) {
    hub.send_status(conn_id, activity).await;
}
