//! Alert Types

use chrono::{DateTime, Utc};
use sensor_data::Sector;
use serde::{Deserialize, Serialize};

/// Alert severity; the rank drives final list ordering only and never
/// suppresses lower-severity alerts on other metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    Warning,
    Caution,
}

impl Severity {
    /// Sort rank: CRITICAL=0, WARNING=1, CAUTION=2
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Caution => 2,
        }
    }
}

/// A single disaster alert.
///
/// Created by the evaluators with sector-specific text; the aggregator
/// stamps `timestamp` and `record_id` before the alert leaves the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Stable tag consumed downstream (e.g. HEAT_WAVE, POLLUTION_CRISIS)
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub sector: Sector,
    /// Metric label, or "Multiple" for multi-factor alerts
    pub metric: String,
    /// Triggering value; multi-factor alerts carry none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub message: String,
    pub recommendation: String,
    /// Recommended response actions, most urgent first
    pub actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::Critical.rank() < Severity::Warning.rank());
        assert!(Severity::Warning.rank() < Severity::Caution.rank());
    }

    #[test]
    fn test_severity_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"CRITICAL\"");
        assert_eq!(serde_json::to_string(&Severity::Caution).unwrap(), "\"CAUTION\"");
    }

    #[test]
    fn test_alert_wire_field_names() {
        let alert = Alert {
            kind: "HEAT_WAVE".to_string(),
            severity: Severity::Critical,
            sector: Sector::Sector1,
            metric: "Temperature".to_string(),
            value: Some(39.0),
            message: "msg".to_string(),
            recommendation: "rec".to_string(),
            actions: vec!["act".to_string()],
            timestamp: None,
            record_id: Some("abc".to_string()),
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "HEAT_WAVE");
        assert_eq!(json["severity"], "CRITICAL");
        assert_eq!(json["sector"], "sector1");
        assert_eq!(json["recordId"], "abc");
        assert!(json.get("timestamp").is_none());
    }
}
