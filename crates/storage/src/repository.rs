//! Repository Implementation

use crate::StorageError;
use chrono::{DateTime, Utc};
use data_vault::EncryptedEnvelope;
use sensor_data::{Sector, SensorReadings, SensorRecord};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Typed record metadata, validated once at the storage boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub sector: Sector,
    pub provider_type: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(flatten)]
    pub readings: SensorReadings,
    /// Synthesized ledger cost of the registration transaction (gas)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_cost_gas: Option<u64>,
    /// Synthesized authorization latency (seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_latency_sec: Option<f64>,
}

/// A stored dataset record with its sealed payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: Uuid,
    pub metadata: RecordMetadata,
    pub payload: EncryptedEnvelope,
    pub hash: String,
    pub policy: String,
    pub owner_role: String,
    pub created_at: DateTime<Utc>,
}

impl DatasetRecord {
    /// View for the alert engine: identity, sector, readings, timestamp
    pub fn sensor_record(&self) -> SensorRecord {
        SensorRecord {
            id: self.id.to_string(),
            sector: self.metadata.sector,
            readings: self.metadata.readings.clone(),
            created_at: self.created_at,
        }
    }
}

/// Payload-free projection for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub id: Uuid,
    pub metadata: RecordMetadata,
    pub hash: String,
    pub policy: String,
    pub owner_role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&DatasetRecord> for DatasetSummary {
    fn from(record: &DatasetRecord) -> Self {
        Self {
            id: record.id,
            metadata: record.metadata.clone(),
            hash: record.hash.clone(),
            policy: record.policy.clone(),
            owner_role: record.owner_role.clone(),
            created_at: record.created_at,
        }
    }
}

/// Repository for dataset records (in-memory implementation)
pub struct Repository {
    records: Mutex<Vec<DatasetRecord>>,
}

impl Repository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        info!("Creating in-memory repository");
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Insert a record
    pub fn insert(&self, record: DatasetRecord) -> Result<(), StorageError> {
        let mut records = self.records.lock().map_err(|_| StorageError::LockPoisoned)?;
        debug!(id = %record.id, sector = %record.metadata.sector, "inserted dataset record");
        records.push(record);
        Ok(())
    }

    /// Most recent sensor views for one sector, newest first.
    ///
    /// The window bound (10 in the alert endpoints) belongs to the
    /// caller, not the repository.
    pub fn recent_by_sector(
        &self,
        sector: Sector,
        limit: usize,
    ) -> Result<Vec<SensorRecord>, StorageError> {
        let records = self.records.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut matching: Vec<&DatasetRecord> = records
            .iter()
            .filter(|r| r.metadata.sector == sector)
            .collect();
        matching.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        Ok(matching
            .into_iter()
            .take(limit)
            .map(|r| r.sensor_record())
            .collect())
    }

    /// Full records for one data category, insertion order
    pub fn by_category(&self, category: &str) -> Result<Vec<DatasetRecord>, StorageError> {
        let records = self.records.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.metadata.category == category)
            .cloned()
            .collect())
    }

    /// Payload-free listing of every record, insertion order
    pub fn all_summaries(&self) -> Result<Vec<DatasetSummary>, StorageError> {
        let records = self.records.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records.iter().map(DatasetSummary::from).collect())
    }

    /// Full records in insertion order (the export surface)
    pub fn all_records(&self) -> Result<Vec<DatasetRecord>, StorageError> {
        let records = self.records.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records.clone())
    }

    /// Number of stored records
    pub fn record_count(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Delete everything; returns how many records were removed
    pub fn clear(&self) -> usize {
        match self.records.lock() {
            Ok(mut records) => {
                let removed = records.len();
                records.clear();
                info!(removed, "repository cleared");
                removed
            }
            Err(_) => 0,
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(sector: Sector, category: &str, minute: u32) -> DatasetRecord {
        DatasetRecord {
            id: Uuid::new_v4(),
            metadata: RecordMetadata {
                sector,
                provider_type: "IoT Sensor".to_string(),
                category: category.to_string(),
                owner: Some("CityAuthority".to_string()),
                readings: SensorReadings {
                    temperature_c: Some(20.0 + minute as f64),
                    ..Default::default()
                },
                tx_cost_gas: Some(60_000),
                authorization_latency_sec: Some(2.5),
            },
            payload: EncryptedEnvelope {
                nonce: [0u8; 12],
                ciphertext: vec![1, 2, 3],
            },
            hash: format!("hash-{minute}"),
            policy: "role:CityAuthority".to_string(),
            owner_role: "CityAuthority".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 7, 15, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_recent_by_sector_orders_and_limits() {
        let repo = Repository::new();
        for minute in [5, 1, 9, 3] {
            repo.insert(record(Sector::Sector1, "environment", minute))
                .unwrap();
        }
        repo.insert(record(Sector::Sector2, "environment", 30))
            .unwrap();

        let recent = repo.recent_by_sector(Sector::Sector1, 3).unwrap();
        assert_eq!(recent.len(), 3);
        let temps: Vec<_> = recent
            .iter()
            .map(|r| r.readings.temperature_c.unwrap())
            .collect();
        // Newest first: minutes 9, 5, 3
        assert_eq!(temps, vec![29.0, 25.0, 23.0]);
        assert!(recent.iter().all(|r| r.sector == Sector::Sector1));
    }

    #[test]
    fn test_by_category_filters() {
        let repo = Repository::new();
        repo.insert(record(Sector::Sector1, "environment", 1)).unwrap();
        repo.insert(record(Sector::Sector1, "traffic", 2)).unwrap();
        repo.insert(record(Sector::Sector3, "environment", 3)).unwrap();

        let env = repo.by_category("environment").unwrap();
        assert_eq!(env.len(), 2);
        assert!(repo.by_category("missing").unwrap().is_empty());
    }

    #[test]
    fn test_summaries_omit_payload() {
        let repo = Repository::new();
        repo.insert(record(Sector::Sector4, "energy", 7)).unwrap();

        let summaries = repo.all_summaries().unwrap();
        assert_eq!(summaries.len(), 1);
        let json = serde_json::to_value(&summaries[0]).unwrap();
        assert!(json.get("payload").is_none());
        assert_eq!(json["hash"], "hash-7");
    }

    #[test]
    fn test_clear_empties_repository() {
        let repo = Repository::new();
        repo.insert(record(Sector::Sector1, "environment", 1)).unwrap();
        repo.insert(record(Sector::Sector2, "environment", 2)).unwrap();
        assert_eq!(repo.clear(), 2);
        assert_eq!(repo.record_count(), 0);
    }

    #[test]
    fn test_sensor_record_view() {
        let stored = record(Sector::Sector5, "environment", 4);
        let view = stored.sensor_record();
        assert_eq!(view.id, stored.id.to_string());
        assert_eq!(view.sector, Sector::Sector5);
        assert_eq!(view.created_at, stored.created_at);
        assert_eq!(view.readings.temperature_c, Some(24.0));
    }
}
