//! Disaster Alert Routes

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{ApiError, AppState, RECENT_WINDOW};
use alert_engine::{Alert, SectorStats, SectorSummary, Severity, Thresholds};
use sensor_data::{Sector, SensorRecord};

/// Response for the all-sectors alerts endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisasterAlertsResponse {
    pub success: bool,
    pub total_alerts: usize,
    pub critical_alerts: usize,
    pub warning_alerts: usize,
    pub caution_alerts: usize,
    pub alerts: Vec<Alert>,
    pub sector_stats: BTreeMap<Sector, SectorStats>,
    pub data_analyzed: usize,
    pub timestamp: DateTime<Utc>,
}

/// Response for the single-sector alerts endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorAlertsResponse {
    pub success: bool,
    pub sector: Sector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_alerts: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_alerts: Option<usize>,
    pub alerts: Vec<Alert>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_analyzed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for the sector stats endpoint
#[derive(Debug, Serialize)]
pub struct SectorStatsResponse {
    pub success: bool,
    pub sectors: BTreeMap<Sector, SectorSummary>,
    pub timestamp: DateTime<Utc>,
}

/// Response for the thresholds endpoint
#[derive(Debug, Serialize)]
pub struct ThresholdsResponse {
    pub success: bool,
    pub thresholds: Thresholds,
}

/// Alerts across all sectors, from each sector's most recent records
pub async fn get_disaster_alerts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DisasterAlertsResponse>, ApiError> {
    let mut batch: Vec<SensorRecord> = Vec::new();
    for sector in Sector::ALL {
        batch.extend(state.repository.recent_by_sector(sector, RECENT_WINDOW)?);
    }

    let outcome = state.aggregator.aggregate(&batch);

    // Stats cover all five sectors even when a sector raised nothing
    let mut sector_stats: BTreeMap<Sector, SectorStats> = Sector::ALL
        .iter()
        .map(|s| (*s, SectorStats::default()))
        .collect();
    sector_stats.extend(outcome.sector_stats);

    let count_of = |severity: Severity| {
        outcome
            .alerts
            .iter()
            .filter(|a| a.severity == severity)
            .count()
    };

    Ok(Json(DisasterAlertsResponse {
        success: true,
        total_alerts: outcome.alerts.len(),
        critical_alerts: count_of(Severity::Critical),
        warning_alerts: count_of(Severity::Warning),
        caution_alerts: count_of(Severity::Caution),
        alerts: outcome.alerts,
        sector_stats,
        data_analyzed: batch.len(),
        timestamp: Utc::now(),
    }))
}

/// Alerts for one sector
pub async fn get_sector_alerts(
    State(state): State<Arc<AppState>>,
    Path(sector): Path<String>,
) -> Result<Json<SectorAlertsResponse>, ApiError> {
    let sector: Sector = sector.parse().map_err(|_| ApiError::InvalidSector)?;

    let batch = state.repository.recent_by_sector(sector, RECENT_WINDOW)?;
    if batch.is_empty() {
        return Ok(Json(SectorAlertsResponse {
            success: true,
            sector,
            total_alerts: None,
            critical_alerts: None,
            alerts: Vec::new(),
            data_analyzed: None,
            message: Some("No data available for this sector".to_string()),
        }));
    }

    let outcome = state.aggregator.aggregate(&batch);
    let critical = outcome
        .alerts
        .iter()
        .filter(|a| a.severity == Severity::Critical)
        .count();

    Ok(Json(SectorAlertsResponse {
        success: true,
        sector,
        total_alerts: Some(outcome.alerts.len()),
        critical_alerts: Some(critical),
        alerts: outcome.alerts,
        data_analyzed: Some(batch.len()),
        message: None,
    }))
}

/// Current status summary for every sector
pub async fn get_sector_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SectorStatsResponse>, ApiError> {
    let mut sectors = BTreeMap::new();
    for sector in Sector::ALL {
        let batch = state.repository.recent_by_sector(sector, RECENT_WINDOW)?;
        sectors.insert(sector, SectorSummary::compute(&batch, &state.thresholds));
    }

    Ok(Json(SectorStatsResponse {
        success: true,
        sectors,
        timestamp: Utc::now(),
    }))
}

/// The threshold table, read-only
pub async fn get_thresholds(
    State(state): State<Arc<AppState>>,
) -> Json<ThresholdsResponse> {
    Json(ThresholdsResponse {
        success: true,
        thresholds: state.thresholds,
    })
}
