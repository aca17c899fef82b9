//! Telemetry publisher
//!
//! Read-only views of a brew session for display and test assertions.

pub mod snapshot;

pub use snapshot::{BrewStatus, Telemetry, RECORD_CAPACITY};
