//! Engagement aggregation and posting-velocity bucketing.
//!
//! Everything here is a pure function over fully loaded records. Results
//! never depend on record order.

pub mod aggregate;
pub mod types;
pub mod utility;
pub mod velocity;
