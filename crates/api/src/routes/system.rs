//! System Management Routes

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::AppState;

/// Counts removed by a reset
#[derive(Debug, Serialize)]
pub struct DeletedCounts {
    pub datasets: usize,
    pub logs: usize,
}

/// Response for the reset endpoint
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
    pub deleted: DeletedCounts,
}

/// Wipe all stored records and the audit trail
pub async fn reset_system(State(state): State<Arc<AppState>>) -> Json<ResetResponse> {
    info!("system reset requested");

    let datasets = state.repository.clear();
    let logs = state.audit.clear();

    Json(ResetResponse {
        success: true,
        message: "System reset successful".to_string(),
        deleted: DeletedCounts { datasets, logs },
    })
}
