use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::health::HealthStatus;

/// One system event log entry, attributed to the host it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub severity: HealthStatus,
    pub message: String,
    #[serde(default)]
    pub node_name: String,
}
