//! Access Policy Engine
//!
//! Parses policy expressions of the form
//! `role:CityAuthority OR role:Citizen AND attribute:sensitivity=public`
//! (OR of AND-clauses over role/attribute equality conditions) and
//! decides grant/deny for a caller's role and attribute.

mod expression;

pub use expression::{evaluate, Clause, Condition, PolicyExpression};
