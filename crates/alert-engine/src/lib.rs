//! Disaster Alert Engine
//!
//! Evaluates city sensor records against threshold bands and multi-factor
//! rules, and aggregates the results into a severity-ordered alert feed
//! with per-sector counters.

mod aggregator;
mod alert;
mod evaluator;
mod multi_factor;
mod summary;
mod thresholds;

pub use aggregator::{AlertAggregator, AnalysisOutcome, SectorStats};
pub use alert::{Alert, Severity};
pub use evaluator::{Metric, ThresholdEvaluator};
pub use multi_factor::{MultiFactorCutoffs, MultiFactorDetector};
pub use summary::{MetricAverages, LatestReadings, SectorStatus, SectorSummary};
pub use thresholds::{AqiThresholds, EnergyThresholds, Thresholds, TrafficThresholds, TemperatureThresholds};
