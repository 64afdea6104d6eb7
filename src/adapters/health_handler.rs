use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::adapters::api_handler::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub request_log: String,
}

/// Basic health check: returns 200 whenever the server is running.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        request_log: if state.request_log.is_some() {
            "enabled".to_string()
        } else {
            "disabled".to_string()
        },
    })
}
