use serde::{Deserialize, Serialize};

/// Gateway health report from `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: Option<String>,
    pub timestamp: Option<String>,
}
