//! Audit Entry Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of event an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    /// A dataset record was registered
    DataRegister,
    /// A policy evaluation ran for an access request
    AccessRequest,
}

/// One audit trail entry.
///
/// Registration entries carry `owner`; access entries carry `role`,
/// `attribute`, and the decision in `granted`. Both reference the
/// record by content hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&EntryType::DataRegister).unwrap(),
            "\"DATA_REGISTER\""
        );
        assert_eq!(
            serde_json::to_string(&EntryType::AccessRequest).unwrap(),
            "\"ACCESS_REQUEST\""
        );
    }

    #[test]
    fn test_access_entry_serializes_decision_fields() {
        let entry = AuditEntry {
            entry_type: EntryType::AccessRequest,
            hash: "abc123".to_string(),
            role: Some("Researcher".to_string()),
            owner: None,
            attribute: Some("sensitivity=private".to_string()),
            policy: "role:Researcher AND attribute:sensitivity=private".to_string(),
            granted: Some(true),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "ACCESS_REQUEST");
        assert_eq!(json["granted"], true);
        assert_eq!(json["role"], "Researcher");
        assert!(json.get("owner").is_none());
    }
}
