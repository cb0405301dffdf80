use utoipa::OpenApi;
use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Readiness check endpoint
#[utoipa::path(
    get,
    path = "/api/ready",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn ready_check_doc() {}

/// Connection, room and session counts plus process resource usage
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics",
    responses(
        (status = 200, description = "Diagnostics snapshot", body = DiagnosticsResponse)
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

/// Live session of an activity, or its last completed session while retained
#[utoipa::path(
    get,
    path = "/api/v1/activities/{activity_id}/session",
    params(("activity_id" = String, Path, description = "Activity identifier")),
    responses(
        (status = 200, description = "Session snapshot", body = Session),
        (status = 400, description = "Blank activity id", body = ErrorResponse),
        (status = 404, description = "No session for this activity", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn session_status_doc() {}

/// Current participant count of an activity's room
#[utoipa::path(
    get,
    path = "/api/v1/activities/{activity_id}/participants",
    params(("activity_id" = String, Path, description = "Activity identifier")),
    responses(
        (status = 200, description = "Participant count", body = ParticipantCountResponse),
        (status = 400, description = "Blank activity id", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn participant_count_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        ready_check_doc,
        diagnostics_doc,
        session_status_doc,
        participant_count_doc,
    ),
    components(
        schemas(
            HealthResponse,
            DiagnosticsResponse,
            Session,
            SessionStatus,
            ParticipantResult,
            ParticipantCountResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "api", description = "Live session coordination endpoints")
    )
)]
pub struct ApiDoc;
