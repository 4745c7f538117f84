//! Access Request Routes
//!
//! Policy-gated record release. Every policy evaluation is written to
//! the audit trail, whether or not access was granted.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{ApiError, AppState};
use audit_log::AuditEntry;

/// Access request body
#[derive(Debug, Deserialize)]
pub struct AccessRequest {
    pub category: Option<String>,
    pub role: Option<String>,
    pub attribute: Option<String>,
}

/// One released record
#[derive(Debug, Serialize)]
pub struct GrantedRecord {
    pub hash: String,
    pub data: serde_json::Value,
}

/// Response when at least one record was released
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub category: String,
    pub count: usize,
    pub records: Vec<GrantedRecord>,
}

/// Evaluate policies for every record in a category and release the
/// payloads the caller may see
pub async fn request_access(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AccessRequest>,
) -> Result<Json<AccessResponse>, ApiError> {
    let (Some(category), Some(role), Some(attribute)) =
        (body.category, body.role, body.attribute)
    else {
        return Err(ApiError::MissingFields(
            "category, role, and attribute are required".to_string(),
        ));
    };

    let records = state.repository.by_category(&category)?;
    if records.is_empty() {
        return Err(ApiError::UnknownCategory(category));
    }

    let mut granted_records = Vec::new();

    for record in &records {
        let granted = policy_engine::evaluate(&record.policy, &role, &attribute);

        state
            .audit
            .record_access(&record.hash, &role, &attribute, &record.policy, granted)?;

        if granted {
            // A payload that fails to open is skipped, not fatal; the
            // grant is already on the trail
            match data_vault::decrypt_value(&state.vault_key, &record.payload) {
                Ok(data) => granted_records.push(GrantedRecord {
                    hash: record.hash.clone(),
                    data,
                }),
                Err(e) => warn!(hash = %record.hash, error = %e, "failed to decrypt granted record"),
            }
        }
    }

    if granted_records.is_empty() {
        return Err(ApiError::AccessDenied);
    }

    info!(
        %category,
        %role,
        granted = granted_records.len(),
        evaluated = records.len(),
        "access request served"
    );

    Ok(Json(AccessResponse {
        category,
        count: granted_records.len(),
        records: granted_records,
    }))
}

/// Full audit trail, newest first
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AuditEntry>>, ApiError> {
    Ok(Json(state.audit.entries()?))
}
