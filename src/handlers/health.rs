use std::sync::Arc;
use axum::{extract::State, Json};
use crate::{models::HealthResponse, AppState};
use tracing::debug;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.config.service_name.clone(),
        message: "Server is running".to_string(),
    })
}

/// Readiness check endpoint
///
/// The coordination state is in memory, so the service is ready as soon as the hub answers.
pub async fn ready_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Readiness check requested");
    let stats = state.hub.stats().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.config.service_name.clone(),
        message: format!("Service is ready ({} connections)", stats.connections),
    })
}
