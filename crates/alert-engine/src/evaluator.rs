//! Single-Metric Threshold Evaluation
//!
//! Each metric is checked against its band table in decreasing severity
//! order, so the first match is the most severe applicable band and a
//! record yields at most one alert per metric.

use crate::alert::{Alert, Severity};
use crate::thresholds::Thresholds;
use sensor_data::{Sector, SensorReadings};
use serde::{Deserialize, Serialize};

/// The four monitored metrics, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Temperature,
    AirQuality,
    Traffic,
    Energy,
}

impl Metric {
    /// Emission order used by the aggregator
    pub const ALL: [Metric; 4] = [
        Metric::Temperature,
        Metric::AirQuality,
        Metric::Traffic,
        Metric::Energy,
    ];

    /// Human-readable label carried on alerts
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::AirQuality => "Air Quality Index",
            Metric::Traffic => "Traffic Density",
            Metric::Energy => "Energy Consumption",
        }
    }

    /// Pull this metric's value out of a set of readings
    pub fn reading(&self, readings: &SensorReadings) -> Option<f64> {
        match self {
            Metric::Temperature => readings.temperature_c,
            Metric::AirQuality => readings.air_quality_index,
            Metric::Traffic => readings.traffic_density,
            Metric::Energy => readings.energy_consumption_kwh,
        }
    }
}

/// Evaluates one metric value against the configured band table
#[derive(Debug, Clone)]
pub struct ThresholdEvaluator {
    thresholds: Thresholds,
}

impl ThresholdEvaluator {
    /// Create an evaluator over an immutable threshold table
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// The threshold table this evaluator was built with
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Evaluate a single metric reading.
    ///
    /// An absent value is a routine sensor gap, not an error: it simply
    /// produces no alert.
    pub fn evaluate(&self, metric: Metric, value: Option<f64>, sector: Sector) -> Option<Alert> {
        let value = value?;
        match metric {
            Metric::Temperature => self.analyze_temperature(value, sector),
            Metric::AirQuality => self.analyze_aqi(value, sector),
            Metric::Traffic => self.analyze_traffic(value, sector),
            Metric::Energy => self.analyze_energy(value, sector),
        }
    }

    /// Heat waves and cold waves; bands are inclusive at the boundary
    fn analyze_temperature(&self, temp: f64, sector: Sector) -> Option<Alert> {
        let bands = &self.thresholds.temperature;

        if temp >= bands.critical_high {
            return Some(band_alert(
                "HEAT_WAVE",
                Severity::Critical,
                sector,
                Metric::Temperature,
                temp,
                format!("🔥 CRITICAL: Extreme heat detected in {sector}"),
                "Stay indoors, hydrate frequently, check on elderly neighbors",
                &[
                    "Open cooling centers",
                    "Issue public health advisory",
                    "Deploy emergency medical teams",
                ],
            ));
        }

        if temp >= bands.warning_high {
            return Some(band_alert(
                "HIGH_TEMPERATURE",
                Severity::Warning,
                sector,
                Metric::Temperature,
                temp,
                format!("⚠️ WARNING: High temperature in {sector}"),
                "Limit outdoor activities, stay hydrated",
                &["Monitor vulnerable populations", "Prepare cooling centers"],
            ));
        }

        if temp <= bands.critical_low {
            return Some(band_alert(
                "EXTREME_COLD",
                Severity::Critical,
                sector,
                Metric::Temperature,
                temp,
                format!("❄️ CRITICAL: Extreme cold detected in {sector}"),
                "Stay indoors, avoid exposure, check heating systems",
                &[
                    "Open warming centers",
                    "Check on homeless population",
                    "Deploy emergency heating units",
                ],
            ));
        }

        if temp <= bands.warning_low {
            return Some(band_alert(
                "COLD_WAVE",
                Severity::Warning,
                sector,
                Metric::Temperature,
                temp,
                format!("🌡️ WARNING: Cold wave in {sector}"),
                "Dress warmly, limit outdoor exposure",
                &["Prepare warming centers", "Monitor heating systems"],
            ));
        }

        None
    }

    /// Pollution bands; both top bands are CRITICAL with distinct tags,
    /// so the hazardous check must run first
    fn analyze_aqi(&self, aqi: f64, sector: Sector) -> Option<Alert> {
        let bands = &self.thresholds.aqi;

        if aqi >= bands.hazardous {
            return Some(band_alert(
                "AIR_POLLUTION_HAZARDOUS",
                Severity::Critical,
                sector,
                Metric::AirQuality,
                aqi,
                format!("☠️ CRITICAL: Hazardous air quality in {sector}"),
                "Stay indoors, seal windows, use air purifiers, wear N95 masks if going outside",
                &[
                    "Issue emergency air quality alert",
                    "Close schools and public facilities",
                    "Restrict vehicle movement",
                    "Deploy medical teams for respiratory emergencies",
                ],
            ));
        }

        if aqi >= bands.very_unhealthy {
            return Some(band_alert(
                "AIR_POLLUTION_SEVERE",
                Severity::Critical,
                sector,
                Metric::AirQuality,
                aqi,
                format!("🚨 CRITICAL: Very unhealthy air quality in {sector}"),
                "Avoid all outdoor activities, vulnerable groups stay indoors",
                &[
                    "Issue health advisory",
                    "Restrict industrial emissions",
                    "Recommend work-from-home",
                ],
            ));
        }

        if aqi >= bands.unhealthy {
            return Some(band_alert(
                "AIR_POLLUTION_UNHEALTHY",
                Severity::Warning,
                sector,
                Metric::AirQuality,
                aqi,
                format!("⚠️ WARNING: Unhealthy air quality in {sector}"),
                "Limit outdoor activities, sensitive groups stay indoors",
                &["Monitor air quality", "Advise vulnerable populations"],
            ));
        }

        if aqi >= bands.unhealthy_sensitive {
            return Some(band_alert(
                "AIR_POLLUTION_MODERATE",
                Severity::Caution,
                sector,
                Metric::AirQuality,
                aqi,
                format!("⚡ CAUTION: Air quality unhealthy for sensitive groups in {sector}"),
                "Sensitive groups limit prolonged outdoor activities",
                &["Monitor sensitive populations"],
            ));
        }

        None
    }

    /// Congestion bands pointing at emergencies or evacuations
    fn analyze_traffic(&self, traffic: f64, sector: Sector) -> Option<Alert> {
        let bands = &self.thresholds.traffic;

        if traffic >= bands.critical {
            return Some(band_alert(
                "TRAFFIC_EMERGENCY",
                Severity::Critical,
                sector,
                Metric::Traffic,
                traffic,
                format!("🚦 CRITICAL: Emergency traffic situation in {sector}"),
                "Avoid area, possible emergency or evacuation in progress",
                &[
                    "Deploy traffic police",
                    "Activate emergency routes",
                    "Coordinate with emergency services",
                    "Check for accidents or disasters",
                ],
            ));
        }

        if traffic >= bands.heavy {
            return Some(band_alert(
                "TRAFFIC_HEAVY",
                Severity::Warning,
                sector,
                Metric::Traffic,
                traffic,
                format!("⚠️ WARNING: Heavy traffic congestion in {sector}"),
                "Use alternate routes, expect delays",
                &["Monitor traffic flow", "Consider traffic management measures"],
            ));
        }

        None
    }

    /// Grid load bands
    fn analyze_energy(&self, energy: f64, sector: Sector) -> Option<Alert> {
        let bands = &self.thresholds.energy;

        if energy >= bands.emergency {
            return Some(band_alert(
                "POWER_GRID_EMERGENCY",
                Severity::Critical,
                sector,
                Metric::Energy,
                energy,
                format!("⚡ CRITICAL: Grid overload emergency in {sector}"),
                "Reduce non-essential power usage immediately, blackout imminent",
                &[
                    "Implement emergency load shedding",
                    "Alert hospitals and critical infrastructure",
                    "Deploy backup generators",
                    "Prepare for potential blackout",
                ],
            ));
        }

        if energy >= bands.critical {
            return Some(band_alert(
                "POWER_GRID_CRITICAL",
                Severity::Warning,
                sector,
                Metric::Energy,
                energy,
                format!("⚠️ WARNING: Critical energy consumption in {sector}"),
                "Reduce power usage, grid strain detected",
                &["Monitor grid stability", "Prepare load management"],
            ));
        }

        if energy >= bands.high {
            return Some(band_alert(
                "POWER_HIGH_USAGE",
                Severity::Caution,
                sector,
                Metric::Energy,
                energy,
                format!("⚡ CAUTION: High energy consumption in {sector}"),
                "Consider reducing non-essential power usage",
                &["Monitor grid load"],
            ));
        }

        None
    }
}

impl Default for ThresholdEvaluator {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

#[allow(clippy::too_many_arguments)]
fn band_alert(
    kind: &str,
    severity: Severity,
    sector: Sector,
    metric: Metric,
    value: f64,
    message: String,
    recommendation: &str,
    actions: &[&str],
) -> Alert {
    Alert {
        kind: kind.to_string(),
        severity,
        sector,
        metric: metric.label().to_string(),
        value: Some(value),
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
    use proptest::prelude::*;

    fn eval(metric: Metric, value: f64) -> Option<Alert> {
        ThresholdEvaluator::default().evaluate(metric, Some(value), Sector::Sector1)
    }

    #[test]
    fn test_absent_value_produces_nothing() {
        let evaluator = ThresholdEvaluator::default();
        for metric in Metric::ALL {
            assert!(evaluator.evaluate(metric, None, Sector::Sector2).is_none());
        }
    }

    #[test]
    fn test_table_is_readable_back() {
        let evaluator = ThresholdEvaluator::default();
        assert_eq!(evaluator.thresholds().temperature.critical_high, 38.0);
        assert_eq!(evaluator.thresholds().energy.emergency, 500.0);
    }

    #[test]
    fn test_temperature_boundary_is_inclusive() {
        let alert = eval(Metric::Temperature, 38.0).unwrap();
        assert_eq!(alert.kind, "HEAT_WAVE");
        assert_eq!(alert.severity, Severity::Critical);

        let alert = eval(Metric::Temperature, 35.0).unwrap();
        assert_eq!(alert.kind, "HIGH_TEMPERATURE");
        assert_eq!(alert.severity, Severity::Warning);
    }

    #[test]
    fn test_temperature_cold_bands() {
        let alert = eval(Metric::Temperature, 0.0).unwrap();
        assert_eq!(alert.kind, "EXTREME_COLD");
        assert_eq!(alert.severity, Severity::Critical);

        let alert = eval(Metric::Temperature, 5.0).unwrap();
        assert_eq!(alert.kind, "COLD_WAVE");
        assert_eq!(alert.severity, Severity::Warning);

        let alert = eval(Metric::Temperature, -12.0).unwrap();
        assert_eq!(alert.kind, "EXTREME_COLD");
    }

    #[test]
    fn test_temperate_range_is_quiet() {
        assert!(eval(Metric::Temperature, 20.0).is_none());
        assert!(eval(Metric::Temperature, 5.1).is_none());
        assert!(eval(Metric::Temperature, 34.9).is_none());
    }

    #[test]
    fn test_aqi_hazardous_wins_over_severe() {
        // 300 satisfies both CRITICAL bands; the higher one must win
        let alert = eval(Metric::AirQuality, 300.0).unwrap();
        assert_eq!(alert.kind, "AIR_POLLUTION_HAZARDOUS");

        let alert = eval(Metric::AirQuality, 299.9).unwrap();
        assert_eq!(alert.kind, "AIR_POLLUTION_SEVERE");
        assert_eq!(alert.severity, Severity::Critical);
    }

    #[test]
    fn test_aqi_lower_bands() {
        let alert = eval(Metric::AirQuality, 200.0).unwrap();
        assert_eq!(alert.kind, "AIR_POLLUTION_UNHEALTHY");
        assert_eq!(alert.severity, Severity::Warning);

        let alert = eval(Metric::AirQuality, 150.0).unwrap();
        assert_eq!(alert.kind, "AIR_POLLUTION_MODERATE");
        assert_eq!(alert.severity, Severity::Caution);

        assert!(eval(Metric::AirQuality, 149.9).is_none());
    }

    #[test]
    fn test_traffic_bands() {
        assert_eq!(eval(Metric::Traffic, 85.0).unwrap().kind, "TRAFFIC_EMERGENCY");
        assert_eq!(eval(Metric::Traffic, 70.0).unwrap().kind, "TRAFFIC_HEAVY");
        assert!(eval(Metric::Traffic, 69.9).is_none());
    }

    #[test]
    fn test_energy_bands() {
        assert_eq!(eval(Metric::Energy, 500.0).unwrap().kind, "POWER_GRID_EMERGENCY");
        assert_eq!(eval(Metric::Energy, 450.0).unwrap().kind, "POWER_GRID_CRITICAL");
        assert_eq!(eval(Metric::Energy, 350.0).unwrap().kind, "POWER_HIGH_USAGE");
        assert!(eval(Metric::Energy, 349.9).is_none());
    }

    #[test]
    fn test_alert_carries_sector_and_value() {
        let evaluator = ThresholdEvaluator::default();
        let alert = evaluator
            .evaluate(Metric::Traffic, Some(90.0), Sector::Sector4)
            .unwrap();
        assert_eq!(alert.sector, Sector::Sector4);
        assert_eq!(alert.value, Some(90.0));
        assert_eq!(alert.metric, "Traffic Density");
        assert!(alert.message.contains("sector4"));
    }

    proptest! {
        #[test]
        fn temperature_bands_cover_severity_monotonically(temp in -50.0f64..60.0) {
            let evaluator = ThresholdEvaluator::default();
            if let Some(alert) = evaluator.evaluate(Metric::Temperature, Some(temp), Sector::Sector1) {
                match alert.severity {
                    Severity::Critical => prop_assert!(temp >= 38.0 || temp <= 0.0),
                    Severity::Warning => prop_assert!((35.0..38.0).contains(&temp) || (0.0..=5.0).contains(&temp)),
                    Severity::Caution => prop_assert!(false, "temperature has no caution band"),
                }
            } else {
                prop_assert!(temp > 5.0 && temp < 35.0);
            }
        }
    }
}
