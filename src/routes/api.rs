use crate::{handlers::{diagnostics, health_check, participant_count, ready_check, session_status}, AppState};
use axum::{routing::get, Router};
use std::sync::Arc;

/// Create API routes
pub fn create_api_routes() -> Router<Arc<AppState>> {
    Router::<Arc<AppState>>::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/v1/diagnostics", get(diagnostics))
        .route("/v1/activities/:activity_id/session", get(session_status))
        .route("/v1/activities/:activity_id/participants", get(participant_count))
}
