//! Configuration types
//!
//! Simulation tuning and UI adjustment limits. With the `serde` feature the
//! host simulator loads these from its TOML file.

pub mod types;

pub use types::*;
