//! Dataset Routes
//!
//! Upload and CSV exchange. Every accepted record is validated, sealed,
//! hashed, stored, and registered on the audit trail.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{csv, ApiError, AppState};
use audit_log::record_hash;
use sensor_data::{parse_metric, SensorReadings, ValidationError};
use storage::{DatasetRecord, DatasetSummary, RecordMetadata};

/// Upload request body; metric fields are nullable, identity fields are
/// checked by hand so a useful 400 lists everything that is missing
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    #[serde(rename = "ownerRole")]
    pub owner_role: Option<String>,
    #[serde(rename = "Sector")]
    pub sector: Option<String>,
    #[serde(rename = "Data_Provider_Type")]
    pub provider_type: Option<String>,
    #[serde(rename = "Data_Category")]
    pub category: Option<String>,
    pub policy: Option<String>,
    #[serde(rename = "Data_Owner")]
    pub owner: Option<String>,
    #[serde(rename = "Temperature_C")]
    pub temperature_c: Option<f64>,
    #[serde(rename = "Air_Quality_Index")]
    pub air_quality_index: Option<f64>,
    #[serde(rename = "Traffic_Density")]
    pub traffic_density: Option<f64>,
    #[serde(rename = "Energy_Consumption_kWh")]
    pub energy_consumption_kwh: Option<f64>,
    #[serde(rename = "Blockchain_Tx_Cost_Gas")]
    pub tx_cost_gas: Option<u64>,
    #[serde(rename = "Authorization_Latency_sec")]
    pub authorization_latency_sec: Option<f64>,
}

/// Response for a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub hash: String,
}

/// Response for a CSV import
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: String,
    pub imported: usize,
    pub errors: usize,
    pub total: usize,
}

/// Register one upload
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let missing: Vec<&str> = [
        ("ownerRole", body.owner_role.is_none()),
        ("Sector", body.sector.is_none()),
        ("Data_Provider_Type", body.provider_type.is_none()),
        ("Data_Category", body.category.is_none()),
        ("policy", body.policy.is_none()),
    ]
    .iter()
    .filter(|(_, absent)| *absent)
    .map(|(name, _)| *name)
    .collect();

    let (Some(owner_role), Some(sector), Some(provider_type), Some(category), Some(policy)) = (
        body.owner_role,
        body.sector,
        body.provider_type,
        body.category,
        body.policy,
    ) else {
        return Err(ApiError::MissingFields(missing.join(", ")));
    };

    let metadata = RecordMetadata {
        sector: sector.parse()?,
        provider_type,
        category,
        owner: body.owner,
        readings: SensorReadings {
            temperature_c: body.temperature_c,
            air_quality_index: body.air_quality_index,
            traffic_density: body.traffic_density,
            energy_consumption_kwh: body.energy_consumption_kwh,
        },
        tx_cost_gas: body.tx_cost_gas,
        authorization_latency_sec: body.authorization_latency_sec,
    };

    let hash = register_record(&state, metadata, policy, owner_role)?;

    Ok(Json(UploadResponse {
        message: "Upload successful".to_string(),
        hash,
    }))
}

/// Import a CSV body; bad rows are counted, never fatal
pub async fn import_csv(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<ImportResponse>, ApiError> {
    let rows = csv::parse(&body);
    let total = rows.len();
    let mut imported = 0;
    let mut errors = 0;

    for row in &rows {
        match import_row(&state, row) {
            Ok(()) => imported += 1,
            Err(e) => {
                warn!(error = %e, "skipping CSV row");
                errors += 1;
            }
        }
    }

    info!(imported, errors, total, "CSV import completed");

    Ok(Json(ImportResponse {
        message: "CSV import completed".to_string(),
        imported,
        errors,
        total,
    }))
}

/// Export every record as CSV
pub async fn export_csv(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let records = state.repository.all_records()?;
    let body = csv::export(&records);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"citytrust_dataset.csv\"",
            ),
        ],
        body,
    ))
}

/// Payload-free listing of all records
pub async fn get_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DatasetSummary>>, ApiError> {
    Ok(Json(state.repository.all_summaries()?))
}

fn import_row(state: &AppState, row: &csv::CsvRow) -> Result<(), ApiError> {
    let sector = row
        .get("Sector")
        .ok_or(ValidationError::MissingField("Sector"))?
        .parse()?;

    let readings = SensorReadings {
        temperature_c: parse_metric("temperature_c", row.get("Temperature_C").unwrap_or(""))?,
        air_quality_index: parse_metric(
            "air_quality_index",
            row.get("Air_Quality_Index").unwrap_or(""),
        )?,
        traffic_density: parse_metric("traffic_density", row.get("Traffic_Density").unwrap_or(""))?,
        energy_consumption_kwh: parse_metric(
            "energy_consumption_kwh",
            row.get("Energy_Consumption_kWh").unwrap_or(""),
        )?,
    };

    let owner = row.get("Data_Owner").map(|o| o.to_string());
    let owner_role = owner.clone().unwrap_or_else(|| "System".to_string());
    let policy = row
        .get("Access_Policy")
        .unwrap_or("role:CityAuthority")
        .to_string();

    let metadata = RecordMetadata {
        sector,
        provider_type: row.get("Data_Provider_Type").unwrap_or_default().to_string(),
        category: row.get("Data_Category").unwrap_or_default().to_string(),
        owner,
        readings,
        tx_cost_gas: row.get("Blockchain_Tx_Cost_Gas").and_then(|v| v.parse().ok()),
        authorization_latency_sec: row
            .get("Authorization_Latency_sec")
            .and_then(|v| v.parse().ok()),
    };

    register_record(state, metadata, policy, owner_role)?;
    Ok(())
}

/// Validate, seal, hash, store, and audit one record; returns its hash
fn register_record(
    state: &AppState,
    mut metadata: RecordMetadata,
    policy: String,
    owner_role: String,
) -> Result<String, ApiError> {
    let result = state.validator.validate_readings(&metadata.readings);
    if let Some(error) = result.errors.into_iter().next() {
        return Err(error.into());
    }

    let (gas, latency) = synth_ledger_metrics();
    metadata.tx_cost_gas = metadata.tx_cost_gas.or(Some(gas));
    metadata.authorization_latency_sec = metadata.authorization_latency_sec.or(Some(latency));

    let created_at = Utc::now();
    let plaintext = serde_json::to_vec(&metadata)
        .map_err(|e| data_vault::VaultError::Serialization(e.to_string()))?;
    let hash = record_hash(&plaintext, &created_at.timestamp_millis().to_string());
    let payload = data_vault::encrypt(&state.vault_key, &plaintext)?;

    state.repository.insert(DatasetRecord {
        id: Uuid::new_v4(),
        metadata,
        payload,
        hash: hash.clone(),
        policy: policy.clone(),
        owner_role: owner_role.clone(),
        created_at,
    })?;

    state
        .audit
        .record_registration(&hash, &owner_role, &policy)?;

    Ok(hash)
}

/// Plausible ledger figures for registrations that arrive without them:
/// 50k-80k gas, 1-5 s authorization latency.
fn synth_ledger_metrics() -> (u64, f64) {
    let mut rng = rand::thread_rng();
    let gas = rng.gen_range(50_000..80_000);
    let latency = (rng.gen_range(1.0..5.0) * 100.0_f64).round() / 100.0;
    (gas, latency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synth_ledger_metrics_ranges() {
        for _ in 0..100 {
            let (gas, latency) = synth_ledger_metrics();
            assert!((50_000..80_000).contains(&gas));
            assert!((1.0..=5.0).contains(&latency));
        }
    }
}
