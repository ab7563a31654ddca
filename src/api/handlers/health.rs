use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::bridge::{Capability, Readiness};

use super::super::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime_secs: u64,
    pub capabilities: CapabilityStatus,
}

/// Readiness of each capability at the time of the request
#[derive(Debug, Serialize)]
pub struct CapabilityStatus {
    pub tree: bool,
    pub input: bool,
    pub capture: bool,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let gate = state.dispatcher.readiness();
    let ready = |c: Capability| gate.check(c) == Readiness::Ready;

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        capabilities: CapabilityStatus {
            tree: ready(Capability::Tree),
            input: ready(Capability::Input),
            capture: ready(Capability::Capture),
        },
    })
}
