//! Sensor Data Model and Validation
//!
//! Provides the typed sensor record shared by the rule engines, plus
//! boundary validation and coercion for imported readings.

mod error;
mod record;
mod validator;

pub use error::ValidationError;
pub use record::{Sector, SensorReadings, SensorRecord};
pub use validator::{parse_metric, ValidationConfig, ValidationResult, Validator};
