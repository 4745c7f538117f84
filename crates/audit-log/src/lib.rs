//! Audit Trail
//!
//! Every data registration and every access-policy evaluation leaves an
//! append-only entry. This is a plain audit record, not a ledger: there
//! is no consensus and no chain verification, just an ordered trail.

mod entry;
mod trail;

pub use entry::{AuditEntry, EntryType};
pub use trail::{record_hash, AuditTrail};

use thiserror::Error;

/// Audit errors
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Audit trail lock poisoned")]
    LockPoisoned,
}
