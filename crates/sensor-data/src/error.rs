//! Validation Error Types

use thiserror::Error;

/// Errors during boundary validation of sensor input
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// Value outside the physically plausible range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Text that should have been a number (or an absent marker)
    #[error("{field} value {raw:?} is not numeric")]
    NotNumeric { field: &'static str, raw: String },

    /// Sector name outside sector1..sector5
    #[error("Unknown sector: {0}")]
    UnknownSector(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
