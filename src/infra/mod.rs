//! Process bootstrap: telemetry and binary-level errors.

pub mod error;
pub mod telemetry;
