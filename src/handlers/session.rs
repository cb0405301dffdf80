use crate::{
    models::{ActivityId, ErrorResponse, ParticipantCountResponse, Session},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn activity_from_path(raw: &str) -> Result<ActivityId, ErrorReply> {
    ActivityId::parse(raw)
        .ok_or_else(|| ErrorResponse::reply(StatusCode::BAD_REQUEST, "Activity id must not be empty"))
}

/// Current session of an activity: the live one, or the last completed one still retained
pub async fn session_status(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<String>,
) -> Result<Json<Session>, ErrorReply> {
    let activity = activity_from_path(&activity_id)?;
    debug!("Session status requested for activity {}", activity);
    match state.hub.status(&activity).await {
        Some(session) => Ok(Json(session)),
        None => Err(ErrorResponse::reply(
            StatusCode::NOT_FOUND,
            format!("No session for activity {}", activity),
        )),
    }
}

/// Number of connections currently in an activity's room
pub async fn participant_count(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<String>,
) -> Result<Json<ParticipantCountResponse>, ErrorReply> {
    let activity = activity_from_path(&activity_id)?;
    let count = state.hub.count(&activity).await;
    Ok(Json(ParticipantCountResponse { activity_id: activity.to_string(), count }))
}
