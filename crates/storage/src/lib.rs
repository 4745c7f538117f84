//! Storage Layer
//!
//! In-memory repository for encrypted dataset records, queried by sector
//! recency and by data category. Durable persistence lives behind the
//! same surface and is not a concern of the rule engines.

mod repository;

pub use repository::{DatasetRecord, DatasetSummary, RecordMetadata, Repository};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Repository lock poisoned")]
    LockPoisoned,
}
