//! Disaster Threshold Configuration
//!
//! One band table per metric, based on smart city standards. Built once,
//! injected into the evaluators, and exposed read-only to API clients.

use serde::{Deserialize, Serialize};

/// Temperature bands (°C); the only bidirectional metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TemperatureThresholds {
    /// Heat wave warning
    pub critical_high: f64,
    /// High heat alert
    pub warning_high: f64,
    /// Cold wave alert
    pub warning_low: f64,
    /// Extreme cold warning
    pub critical_low: f64,
}

/// Air Quality Index bands
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AqiThresholds {
    /// Good air quality
    pub good: f64,
    /// Moderate
    pub moderate: f64,
    /// Unhealthy for sensitive groups
    pub unhealthy_sensitive: f64,
    /// Unhealthy
    pub unhealthy: f64,
    /// Very unhealthy
    pub very_unhealthy: f64,
    /// Hazardous, disaster level
    pub hazardous: f64,
}

/// Traffic density bands
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrafficThresholds {
    /// Normal traffic
    pub normal: f64,
    /// Moderate congestion
    pub moderate: f64,
    /// Heavy traffic
    pub heavy: f64,
    /// Critical, possible emergency or evacuation
    pub critical: f64,
}

/// Energy consumption bands (kWh)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnergyThresholds {
    /// Normal consumption
    pub normal: f64,
    /// High consumption
    pub high: f64,
    /// Critical, possible grid overload
    pub critical: f64,
    /// Emergency, blackout risk
    pub emergency: f64,
}

/// Full threshold table for all four metrics.
///
/// Immutable after construction; clone freely across workers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    pub temperature: TemperatureThresholds,
    pub aqi: AqiThresholds,
    pub traffic: TrafficThresholds,
    pub energy: EnergyThresholds,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temperature: TemperatureThresholds {
                critical_high: 38.0,
                warning_high: 35.0,
                warning_low: 5.0,
                critical_low: 0.0,
            },
            aqi: AqiThresholds {
                good: 50.0,
                moderate: 100.0,
                unhealthy_sensitive: 150.0,
                unhealthy: 200.0,
                very_unhealthy: 250.0,
                hazardous: 300.0,
            },
            traffic: TrafficThresholds {
                normal: 30.0,
                moderate: 50.0,
                heavy: 70.0,
                critical: 85.0,
            },
            energy: EnergyThresholds {
                normal: 200.0,
                high: 350.0,
                critical: 450.0,
                emergency: 500.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_values() {
        let t = Thresholds::default();
        assert_eq!(t.temperature.critical_high, 38.0);
        assert_eq!(t.temperature.critical_low, 0.0);
        assert_eq!(t.aqi.hazardous, 300.0);
        assert_eq!(t.traffic.critical, 85.0);
        assert_eq!(t.energy.emergency, 500.0);
    }

    #[test]
    fn test_serializes_per_metric_groups() {
        let json = serde_json::to_value(Thresholds::default()).unwrap();
        assert_eq!(json["temperature"]["warning_high"], 35.0);
        assert_eq!(json["aqi"]["very_unhealthy"], 250.0);
        assert_eq!(json["energy"]["critical"], 450.0);
    }
}
