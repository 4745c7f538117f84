//! Typed Sensor Records

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// City sector a reading is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "sector1")]
    Sector1,
    #[serde(rename = "sector2")]
    Sector2,
    #[serde(rename = "sector3")]
    Sector3,
    #[serde(rename = "sector4")]
    Sector4,
    #[serde(rename = "sector5")]
    Sector5,
}

impl Sector {
    /// All five sectors, in order
    pub const ALL: [Sector; 5] = [
        Sector::Sector1,
        Sector::Sector2,
        Sector::Sector3,
        Sector::Sector4,
        Sector::Sector5,
    ];

    /// Canonical lowercase name ("sector1".."sector5")
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Sector1 => "sector1",
            Sector::Sector2 => "sector2",
            Sector::Sector3 => "sector3",
            Sector::Sector4 => "sector4",
            Sector::Sector5 => "sector5",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sector {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sector1" => Ok(Sector::Sector1),
            "sector2" => Ok(Sector::Sector2),
            "sector3" => Ok(Sector::Sector3),
            "sector4" => Ok(Sector::Sector4),
            "sector5" => Ok(Sector::Sector5),
            other => Err(ValidationError::UnknownSector(other.to_string())),
        }
    }
}

/// One round of metric readings; a missing sensor yields `None`, never an error
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReadings {
    /// Temperature in °C
    pub temperature_c: Option<f64>,
    /// Air Quality Index
    pub air_quality_index: Option<f64>,
    /// Traffic density (vehicles per unit capacity, 0-100+)
    pub traffic_density: Option<f64>,
    /// Energy consumption in kWh
    pub energy_consumption_kwh: Option<f64>,
}

impl SensorReadings {
    /// Number of metrics actually present
    pub fn present_count(&self) -> usize {
        [
            self.temperature_c,
            self.air_quality_index,
            self.traffic_density,
            self.energy_consumption_kwh,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

/// A stored sensor record as seen by the rule engines.
///
/// Produced by the storage layer; the engines treat it as immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Opaque record identifier
    pub id: String,
    /// Sector the reading belongs to
    pub sector: Sector,
    /// Metric readings, each nullable
    pub readings: SensorReadings,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}
