use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Current number of connections joined to an activity's room
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantCountResponse {
    pub activity_id: String,
    pub count: usize,
}
