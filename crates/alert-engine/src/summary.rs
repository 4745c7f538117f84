//! Sector Status Summaries
//!
//! Condenses a sector's recent records into latest readings, running
//! averages, and an overall status for the dashboard.

use crate::thresholds::Thresholds;
use chrono::{DateTime, Utc};
use sensor_data::SensorRecord;
use serde::{Deserialize, Serialize};

/// Average temperature that already warrants caution; below every band
/// in the threshold table, so it lives here rather than there.
const CAUTION_TEMP_C: f64 = 32.0;

/// Overall condition of a sector derived from recent averages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectorStatus {
    Critical,
    Warning,
    Caution,
    Normal,
    NoData,
}

/// Most recent readings for a sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestReadings {
    pub temperature: Option<f64>,
    pub aqi: Option<f64>,
    pub traffic: Option<f64>,
    pub energy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Per-metric averages over the summarized window, rounded to 2 decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAverages {
    pub temperature: Option<f64>,
    pub aqi: Option<f64>,
    pub traffic: Option<f64>,
    pub energy: Option<f64>,
}

/// Dashboard summary for one sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorSummary {
    pub status: SectorStatus,
    pub record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<LatestReadings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub averages: Option<MetricAverages>,
}

impl SectorSummary {
    /// Summarize one sector's recent records, newest first.
    ///
    /// Averages skip absent readings; a metric nobody reported averages
    /// to nothing.
    pub fn compute(records: &[SensorRecord], thresholds: &Thresholds) -> Self {
        let Some(newest) = records.first() else {
            return Self {
                status: SectorStatus::NoData,
                record_count: 0,
                latest: None,
                averages: None,
            };
        };

        let avg_temp = average(records.iter().filter_map(|r| r.readings.temperature_c));
        let avg_aqi = average(records.iter().filter_map(|r| r.readings.air_quality_index));
        let avg_traffic = average(records.iter().filter_map(|r| r.readings.traffic_density));
        let avg_energy = average(
            records
                .iter()
                .filter_map(|r| r.readings.energy_consumption_kwh),
        );

        let status = classify(
            avg_temp,
            avg_aqi,
            avg_traffic,
            avg_energy,
            thresholds,
        );

        Self {
            status,
            record_count: records.len(),
            latest: Some(LatestReadings {
                temperature: newest.readings.temperature_c,
                aqi: newest.readings.air_quality_index,
                traffic: newest.readings.traffic_density,
                energy: newest.readings.energy_consumption_kwh,
                timestamp: newest.created_at,
            }),
            averages: Some(MetricAverages {
                temperature: avg_temp.map(round2),
                aqi: avg_aqi.map(round2),
                traffic: avg_traffic.map(round2),
                energy: avg_energy.map(round2),
            }),
        }
    }
}

fn classify(
    temp: Option<f64>,
    aqi: Option<f64>,
    traffic: Option<f64>,
    energy: Option<f64>,
    thresholds: &Thresholds,
) -> SectorStatus {
    let hits = |t: f64, a: f64, tr: f64, e: f64| {
        at_least(temp, t) || at_least(aqi, a) || at_least(traffic, tr) || at_least(energy, e)
    };

    if hits(
        thresholds.temperature.critical_high,
        thresholds.aqi.very_unhealthy,
        thresholds.traffic.critical,
        thresholds.energy.emergency,
    ) {
        SectorStatus::Critical
    } else if hits(
        thresholds.temperature.warning_high,
        thresholds.aqi.unhealthy,
        thresholds.traffic.heavy,
        thresholds.energy.critical,
    ) {
        SectorStatus::Warning
    } else if hits(
        CAUTION_TEMP_C,
        thresholds.aqi.unhealthy_sensitive,
        thresholds.traffic.moderate,
        thresholds.energy.high,
    ) {
        SectorStatus::Caution
    } else {
        SectorStatus::Normal
    }
}

fn at_least(value: Option<f64>, cutoff: f64) -> bool {
    value.is_some_and(|v| v >= cutoff)
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
