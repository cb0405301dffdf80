use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness and readiness check body
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub message: String,
}
