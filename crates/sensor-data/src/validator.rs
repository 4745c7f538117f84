//! Boundary Validation for Sensor Readings
//!
//! The rule engines assume numeric-or-absent metric values; everything
//! arriving from CSV or JSON is coerced and range-checked here first.

use crate::error::ValidationError;
use crate::record::SensorReadings;
use serde::{Deserialize, Serialize};

/// Plausibility ranges per metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Temperature valid range (°C)
    pub temperature_range: (f64, f64),
    /// AQI valid range
    pub aqi_range: (f64, f64),
    /// Traffic density valid range
    pub traffic_range: (f64, f64),
    /// Energy consumption valid range (kWh)
    pub energy_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            temperature_range: (-90.0, 60.0),
            aqi_range: (0.0, 1000.0),
            traffic_range: (0.0, 200.0),
            energy_range: (0.0, 10_000.0),
        }
    }
}

/// Result of validating one set of readings
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all present values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of present metrics that were checked
    pub fields_checked: usize,
}

/// Validator for city sensor readings
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() || value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate temperature
    pub fn validate_temperature(&self, temp: f64) -> Result<(), ValidationError> {
        self.validate_range("temperature_c", temp, self.config.temperature_range)
    }

    /// Validate air quality index
    pub fn validate_aqi(&self, aqi: f64) -> Result<(), ValidationError> {
        self.validate_range("air_quality_index", aqi, self.config.aqi_range)
    }

    /// Validate traffic density
    pub fn validate_traffic(&self, traffic: f64) -> Result<(), ValidationError> {
        self.validate_range("traffic_density", traffic, self.config.traffic_range)
    }

    /// Validate energy consumption
    pub fn validate_energy(&self, energy: f64) -> Result<(), ValidationError> {
        self.validate_range("energy_consumption_kwh", energy, self.config.energy_range)
    }

    /// Validate every present metric in a set of readings.
    ///
    /// Absent metrics are skipped; a record with no readings at all is valid.
    pub fn validate_readings(&self, readings: &SensorReadings) -> ValidationResult {
        let mut errors = Vec::new();
        let mut checked = 0;

        if let Some(temp) = readings.temperature_c {
            checked += 1;
            if let Err(e) = self.validate_temperature(temp) {
                errors.push(e);
            }
        }
        if let Some(aqi) = readings.air_quality_index {
            checked += 1;
            if let Err(e) = self.validate_aqi(aqi) {
                errors.push(e);
            }
        }
        if let Some(traffic) = readings.traffic_density {
            checked += 1;
            if let Err(e) = self.validate_traffic(traffic) {
                errors.push(e);
            }
        }
        if let Some(energy) = readings.energy_consumption_kwh {
            checked += 1;
            if let Err(e) = self.validate_energy(energy) {
                errors.push(e);
            }
        }

        ValidationResult {
            valid: errors.is_empty(),
            errors,
            fields_checked: checked,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

/// Coerce a raw metric cell into a numeric-or-absent value.
///
/// Empty text and the `-` placeholder mean the sensor reported nothing;
/// anything else must parse as a float.
pub fn parse_metric(field: &'static str, raw: &str) -> Result<Option<f64>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ValidationError::NotNumeric {
            field,
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_temperature() {
        let validator = Validator::default();
        assert!(validator.validate_temperature(-90.0).is_ok());
        assert!(validator.validate_temperature(21.5).is_ok());
        assert!(validator.validate_temperature(60.0).is_ok());
    }

    #[test]
    fn test_invalid_temperature() {
        let validator = Validator::default();
        assert!(validator.validate_temperature(-120.0).is_err());
        assert!(validator.validate_temperature(85.0).is_err());
        assert!(validator.validate_temperature(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_readings_skips_absent() {
        let validator = Validator::default();
        let readings = SensorReadings {
            temperature_c: Some(20.0),
            air_quality_index: None,
            traffic_density: None,
            energy_consumption_kwh: Some(300.0),
        };
        let result = validator.validate_readings(&readings);
        assert!(result.valid);
        assert_eq!(result.fields_checked, 2);
    }

    #[test]
    fn test_validate_readings_collects_all_errors() {
        let validator = Validator::default();
        let readings = SensorReadings {
            temperature_c: Some(-300.0),
            air_quality_index: Some(5000.0),
            traffic_density: Some(50.0),
            energy_consumption_kwh: None,
        };
        let result = validator.validate_readings(&readings);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.fields_checked, 3);
    }

    #[test]
    fn test_parse_metric_absent_markers() {
        assert_eq!(parse_metric("temperature_c", "").unwrap(), None);
        assert_eq!(parse_metric("temperature_c", "-").unwrap(), None);
        assert_eq!(parse_metric("temperature_c", "  ").unwrap(), None);
    }

    #[test]
    fn test_parse_metric_numeric() {
        assert_eq!(parse_metric("aqi", "152.4").unwrap(), Some(152.4));
        assert_eq!(parse_metric("aqi", " 37 ").unwrap(), Some(37.0));
    }

    #[test]
    fn test_parse_metric_rejects_text() {
        assert!(parse_metric("aqi", "high").is_err());
        assert!(parse_metric("aqi", "12,5").is_err());
    }

    proptest! {
        #[test]
        fn parse_metric_never_panics(raw in "\\PC*") {
            let _ = parse_metric("temperature_c", &raw);
        }

        #[test]
        fn in_range_values_always_pass(v in -90.0f64..=60.0) {
            let validator = Validator::default();
            prop_assert!(validator.validate_temperature(v).is_ok());
        }
    }
}
