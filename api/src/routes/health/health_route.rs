//! GET /health: best-effort provider checks.

use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::core::app_state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    /// `ok` when every check succeeded, `degraded` otherwise.
    pub status: String,
    pub providers: Vec<HealthStatus>,
}

impl HealthReport {
    pub fn from_statuses(providers: Vec<HealthStatus>) -> Self {
        let status = if providers.iter().all(|p| p.ok) {
            "ok"
        } else {
            "degraded"
        };
        Self {
            status: status.to_string(),
            providers,
        }
    }
}

/// Handler: GET /health. Always 200; failing checks only flip the status.
#[instrument(name = "health_route", skip_all)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    let report = HealthReport::from_statuses(state.llm.health_all().await);
    for p in report.providers.iter().filter(|p| !p.ok) {
        warn!(provider = %p.provider, endpoint = %p.endpoint, message = %p.message, "provider unhealthy");
    }
    Json(report)
}
