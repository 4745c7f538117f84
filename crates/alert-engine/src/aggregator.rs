//! Batch Aggregation
//!
//! Runs both evaluators over a record batch, stamps record identity onto
//! every alert, accumulates per-sector counters, and orders the final
//! list by severity.

use crate::alert::{Alert, Severity};
use crate::evaluator::{Metric, ThresholdEvaluator};
use crate::multi_factor::MultiFactorDetector;
use crate::thresholds::Thresholds;
use sensor_data::{Sector, SensorRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Alert counters for one sector, rebuilt fresh on every aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorStats {
    /// Total alerts raised for the sector
    #[serde(rename = "alerts")]
    pub alert_count: u32,
    /// CRITICAL subset of the above
    #[serde(rename = "critical")]
    pub critical_count: u32,
}

/// Result of one aggregation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// All alerts, sorted by severity; equal severities keep emission order
    pub alerts: Vec<Alert>,
    /// Counters for every sector that appeared in the batch.
    ///
    /// Sectors absent from the input are absent here; callers wanting all
    /// five present pre-seed the map themselves.
    pub sector_stats: BTreeMap<Sector, SectorStats>,
}

/// Stateless batch analyzer over the threshold and multi-factor rules
#[derive(Debug, Clone)]
pub struct AlertAggregator {
    evaluator: ThresholdEvaluator,
    detector: MultiFactorDetector,
}

impl AlertAggregator {
    /// Build an aggregator over a threshold table
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            evaluator: ThresholdEvaluator::new(thresholds),
            detector: MultiFactorDetector::default(),
        }
    }

    /// Analyze a batch of records in input order.
    ///
    /// Emission order per record is temperature, aqi, traffic, energy,
    /// then the multi-factor checks; the final severity sort is stable,
    /// so that order is the tie-break within each severity.
    pub fn aggregate(&self, records: &[SensorRecord]) -> AnalysisOutcome {
        let mut alerts: Vec<Alert> = Vec::new();
        let mut sector_stats: BTreeMap<Sector, SectorStats> = BTreeMap::new();

        for record in records {
            let mut emitted: Vec<Alert> = Metric::ALL
                .iter()
                .filter_map(|&metric| {
                    self.evaluator
                        .evaluate(metric, metric.reading(&record.readings), record.sector)
                })
                .collect();
            emitted.extend(self.detector.detect(record));

            for mut alert in emitted {
                alert.timestamp = Some(record.created_at);
                alert.record_id = Some(record.id.clone());

                let stats = sector_stats.entry(record.sector).or_default();
                stats.alert_count += 1;
                if alert.severity == Severity::Critical {
                    stats.critical_count += 1;
                }

                alerts.push(alert);
            }
        }

        // Stable: ties keep per-record emission order
        alerts.sort_by_key(|a| a.severity.rank());

        debug!(
            records = records.len(),
            alerts = alerts.len(),
            "aggregation pass complete"
        );

        AnalysisOutcome {
            alerts,
            sector_stats,
        }
    }
}

impl Default for AlertAggregator {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sensor_data::SensorReadings;

    fn record(id: &str, sector: Sector, readings: SensorReadings) -> SensorRecord {
        SensorRecord {
            id: id.to_string(),
            sector,
            readings,
            created_at: Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_alerts_are_stamped_with_record_identity() {
        let aggregator = AlertAggregator::default();
        let records = vec![record(
            "rec-9",
            Sector::Sector3,
            SensorReadings {
                traffic_density: Some(90.0),
                ..Default::default()
            },
        )];

        let outcome = aggregator.aggregate(&records);
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].record_id.as_deref(), Some("rec-9"));
        assert_eq!(
            outcome.alerts[0].timestamp.unwrap(),
            records[0].created_at
        );
    }

    #[test]
    fn test_single_and_multi_factor_coexist() {
        // WARNING band hit plus a compound CRITICAL from the same metrics
        let aggregator = AlertAggregator::default();
        let outcome = aggregator.aggregate(&[record(
            "r1",
            Sector::Sector1,
            SensorReadings {
                temperature_c: Some(36.0),
                energy_consumption_kwh: Some(420.0),
                ..Default::default()
            },
        )]);

        let kinds: Vec<_> = outcome.alerts.iter().map(|a| a.kind.as_str()).collect();
        // CRITICAL multi-factor sorts ahead of the WARNING band alerts
        assert_eq!(
            kinds,
            vec!["HEAT_EMERGENCY", "HIGH_TEMPERATURE", "POWER_HIGH_USAGE"]
        );
        let stats = outcome.sector_stats[&Sector::Sector1];
        assert_eq!(stats.alert_count, 3);
        assert_eq!(stats.critical_count, 1);
    }

    #[test]
    fn test_stable_sort_preserves_emission_order() {
        let aggregator = AlertAggregator::default();
        let records = vec![
            // Record 1: WARNING traffic, then CRITICAL energy
            record(
                "r1",
                Sector::Sector1,
                SensorReadings {
                    traffic_density: Some(75.0),
                    energy_consumption_kwh: Some(520.0),
                    ..Default::default()
                },
            ),
            // Record 2: CRITICAL temperature, then WARNING aqi
            record(
                "r2",
                Sector::Sector2,
                SensorReadings {
                    temperature_c: Some(39.0),
                    air_quality_index: Some(210.0),
                    ..Default::default()
                },
            ),
        ];

        let outcome = aggregator.aggregate(&records);
        let order: Vec<(&str, &str)> = outcome
            .alerts
            .iter()
            .map(|a| (a.kind.as_str(), a.record_id.as_deref().unwrap()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("POWER_GRID_EMERGENCY", "r1"),
                ("HEAT_WAVE", "r2"),
                ("TRAFFIC_HEAVY", "r1"),
                ("AIR_POLLUTION_UNHEALTHY", "r2"),
            ]
        );
    }

    #[test]
    fn test_only_seen_sectors_appear_in_stats() {
        let aggregator = AlertAggregator::default();
        let outcome = aggregator.aggregate(&[record(
            "r1",
            Sector::Sector5,
            SensorReadings {
                air_quality_index: Some(160.0),
                ..Default::default()
            },
        )]);
        assert_eq!(outcome.sector_stats.len(), 1);
        assert!(outcome.sector_stats.contains_key(&Sector::Sector5));
    }

    #[test]
    fn test_quiet_records_count_toward_no_stats() {
        let aggregator = AlertAggregator::default();
        let outcome = aggregator.aggregate(&[record(
            "r1",
            Sector::Sector1,
            SensorReadings {
                temperature_c: Some(21.0),
                air_quality_index: Some(40.0),
                traffic_density: Some(20.0),
                energy_consumption_kwh: Some(150.0),
            },
        )]);
        assert!(outcome.alerts.is_empty());
        // A record that raises nothing leaves its sector untouched
        assert!(outcome.sector_stats.is_empty());
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let aggregator = AlertAggregator::default();
        let records = vec![
            record(
                "r1",
                Sector::Sector1,
                SensorReadings {
                    temperature_c: Some(39.0),
                    energy_consumption_kwh: Some(430.0),
                    ..Default::default()
                },
            ),
            record(
                "r2",
                Sector::Sector2,
                SensorReadings {
                    air_quality_index: Some(310.0),
                    traffic_density: Some(72.0),
                    ..Default::default()
                },
            ),
        ];

        let first = aggregator.aggregate(&records);
        let second = aggregator.aggregate(&records);
        assert_eq!(first.alerts, second.alerts);
        assert_eq!(first.sector_stats, second.sector_stats);
    }

    #[test]
    fn test_empty_batch() {
        let outcome = AlertAggregator::default().aggregate(&[]);
        assert!(outcome.alerts.is_empty());
        assert!(outcome.sector_stats.is_empty());
    }
}
