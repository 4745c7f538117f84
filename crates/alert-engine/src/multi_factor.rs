//! Multi-Factor Disaster Detection
//!
//! Fixed two-metric conjunctions that indicate compound emergencies.
//! These run on every record regardless of what the single-metric bands
//! produced; overlapping alerts are intentional and disambiguated by tag.

use crate::alert::{Alert, Severity};
use sensor_data::SensorRecord;
use serde::{Deserialize, Serialize};

/// Cutoffs for the combined checks
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MultiFactorCutoffs {
    /// Heat emergency: temperature at or above this (°C)
    pub heat_temp: f64,
    /// Cold emergency: temperature at or below this (°C)
    pub cold_temp: f64,
    /// Grid strain operand for heat/cold emergencies (kWh)
    pub energy_strain: f64,
    /// Pollution crisis AQI operand
    pub pollution_aqi: f64,
    /// Pollution crisis traffic operand
    pub pollution_traffic: f64,
}

impl Default for MultiFactorCutoffs {
    fn default() -> Self {
        Self {
            heat_temp: 35.0,
            cold_temp: 5.0,
            energy_strain: 400.0,
            pollution_aqi: 200.0,
            pollution_traffic: 70.0,
        }
    }
}

/// Detects compound emergencies across metric pairs
#[derive(Debug, Clone)]
pub struct MultiFactorDetector {
    cutoffs: MultiFactorCutoffs,
}

impl Default for MultiFactorDetector {
    fn default() -> Self {
        Self::new(MultiFactorCutoffs::default())
    }
}

impl MultiFactorDetector {
    /// Create a detector with the given cutoffs
    pub fn new(cutoffs: MultiFactorCutoffs) -> Self {
        Self { cutoffs }
    }

    /// Run all combined checks against one record.
    ///
    /// Returns 0-3 CRITICAL alerts. An absent metric makes its
    /// comparison false; nothing here ever fails.
    pub fn detect(&self, record: &SensorRecord) -> Vec<Alert> {
        let mut alerts = Vec::new();
        let readings = &record.readings;
        let sector = record.sector;

        let temp = readings.temperature_c;
        let energy = readings.energy_consumption_kwh;
        let aqi = readings.air_quality_index;
        let traffic = readings.traffic_density;

        // Heat wave + high energy = cooling emergency
        if at_least(temp, self.cutoffs.heat_temp) && at_least(energy, self.cutoffs.energy_strain) {
            alerts.push(combined_alert(
                "HEAT_EMERGENCY",
                sector,
                format!("🔥 CRITICAL: Heat emergency in {sector} - Grid at risk"),
                "Cooling centers at capacity, power grid stressed",
                &[
                    "Prioritize power to critical cooling facilities",
                    "Expand cooling center capacity",
                    "Deploy emergency medical teams",
                ],
            ));
        }

        // High AQI + high traffic = pollution crisis
        if at_least(aqi, self.cutoffs.pollution_aqi)
            && at_least(traffic, self.cutoffs.pollution_traffic)
        {
            alerts.push(combined_alert(
                "POLLUTION_CRISIS",
                sector,
                format!("☠️ CRITICAL: Pollution crisis in {sector} - Traffic contributing to hazard"),
                "Immediate traffic restrictions needed",
                &[
                    "Implement odd-even vehicle restrictions",
                    "Close non-essential industries",
                    "Issue public health emergency",
                ],
            ));
        }

        // Low temp + high energy = heating emergency
        if at_most(temp, self.cutoffs.cold_temp) && at_least(energy, self.cutoffs.energy_strain) {
            alerts.push(combined_alert(
                "COLD_EMERGENCY",
                sector,
                format!("❄️ CRITICAL: Cold emergency in {sector} - Heating strain"),
                "Power grid strained by heating demand",
                &[
                    "Prioritize power to heating",
                    "Open emergency warming centers",
                    "Check vulnerable populations",
                ],
            ));
        }

        alerts
    }
}

fn at_least(value: Option<f64>, cutoff: f64) -> bool {
    value.is_some_and(|v| v >= cutoff)
}

fn at_most(value: Option<f64>, cutoff: f64) -> bool {
    value.is_some_and(|v| v <= cutoff)
}

fn combined_alert(
    kind: &str,
    sector: sensor_data::Sector,
    message: String,
    recommendation: &str,
    actions: &[&str],
) -> Alert {
    Alert {
        kind: kind.to_string(),
        severity: Severity::Critical,
        sector,
        metric: "Multiple".to_string(),
        value: None,
        message,
        recommendation: recommendation.to_string(),
        actions: actions.iter().map(|a| a.to_string()).collect(),
        timestamp: None,
        record_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sensor_data::{Sector, SensorReadings};

    fn record(readings: SensorReadings) -> SensorRecord {
        SensorRecord {
            id: "r1".to_string(),
            sector: Sector::Sector2,
            readings,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_heat_emergency_requires_both_operands() {
        let detector = MultiFactorDetector::default();

        let alerts = detector.detect(&record(SensorReadings {
            temperature_c: Some(36.0),
            energy_consumption_kwh: Some(420.0),
            ..Default::default()
        }));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, "HEAT_EMERGENCY");
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[0].metric, "Multiple");
        assert_eq!(alerts[0].value, None);

        // Temperature alone is not enough
        let alerts = detector.detect(&record(SensorReadings {
            temperature_c: Some(36.0),
            energy_consumption_kwh: Some(399.0),
            ..Default::default()
        }));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_absent_operand_never_fires() {
        let detector = MultiFactorDetector::default();
        let alerts = detector.detect(&record(SensorReadings {
            temperature_c: Some(40.0),
            energy_consumption_kwh: None,
            ..Default::default()
        }));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_pollution_crisis() {
        let detector = MultiFactorDetector::default();
        let alerts = detector.detect(&record(SensorReadings {
            air_quality_index: Some(200.0),
            traffic_density: Some(70.0),
            ..Default::default()
        }));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, "POLLUTION_CRISIS");
    }

    #[test]
    fn test_cold_emergency_boundary() {
        let detector = MultiFactorDetector::default();
        let alerts = detector.detect(&record(SensorReadings {
            temperature_c: Some(5.0),
            energy_consumption_kwh: Some(400.0),
            ..Default::default()
        }));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, "COLD_EMERGENCY");
    }

    #[test]
    fn test_multiple_emergencies_can_stack() {
        // Cold snap plus smog with gridlock
        let detector = MultiFactorDetector::default();
        let alerts = detector.detect(&record(SensorReadings {
            temperature_c: Some(-2.0),
            air_quality_index: Some(260.0),
            traffic_density: Some(88.0),
            energy_consumption_kwh: Some(510.0),
        }));
        let kinds: Vec<_> = alerts.iter().map(|a| a.kind.as_str()).collect();
        assert_eq!(kinds, vec!["POLLUTION_CRISIS", "COLD_EMERGENCY"]);
    }
}
