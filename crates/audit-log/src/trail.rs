//! Append-Only Trail Implementation

use crate::entry::{AuditEntry, EntryType};
use crate::AuditError;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Mutex;
use tracing::info;

/// Thread-safe in-memory audit trail.
///
/// Entries are only ever appended; `clear` exists for the system reset
/// surface and tests.
pub struct AuditTrail {
    entries: Mutex<Vec<AuditEntry>>,
}

impl AuditTrail {
    /// Create an empty trail
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Record a DATA_REGISTER entry for a newly stored record
    pub fn record_registration(
        &self,
        hash: &str,
        owner: &str,
        policy: &str,
    ) -> Result<(), AuditError> {
        self.append(AuditEntry {
            entry_type: EntryType::DataRegister,
            hash: hash.to_string(),
            role: None,
            owner: Some(owner.to_string()),
            attribute: None,
            policy: policy.to_string(),
            granted: None,
            timestamp: Utc::now(),
        })
    }

    /// Record one ACCESS_REQUEST entry per evaluated record
    pub fn record_access(
        &self,
        hash: &str,
        role: &str,
        attribute: &str,
        policy: &str,
        granted: bool,
    ) -> Result<(), AuditError> {
        self.append(AuditEntry {
            entry_type: EntryType::AccessRequest,
            hash: hash.to_string(),
            role: Some(role.to_string()),
            owner: None,
            attribute: Some(attribute.to_string()),
            policy: policy.to_string(),
            granted: Some(granted),
            timestamp: Utc::now(),
        })
    }

    fn append(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let mut entries = self.entries.lock().map_err(|_| AuditError::LockPoisoned)?;
        entries.push(entry);
        Ok(())
    }

    /// All entries, newest first
    pub fn entries(&self) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = self.entries.lock().map_err(|_| AuditError::LockPoisoned)?;
        Ok(entries.iter().rev().cloned().collect())
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the trail is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries; returns how many were removed
    pub fn clear(&self) -> usize {
        match self.entries.lock() {
            Ok(mut entries) => {
                let removed = entries.len();
                entries.clear();
                info!(removed, "audit trail cleared");
                removed
            }
            Err(_) => 0,
        }
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}

/// Content hash for a stored record: SHA-256 over the payload plus a
/// caller-supplied salt (registration time), hex-encoded.
pub fn record_hash(payload: &[u8], salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}
