//! Configuration loading
//!
//! Loads the simulator configuration from a TOML file. Every section is
//! optional; missing keys keep their defaults and unknown keys are rejected.

pub mod loader;

pub use loader::{load, parse, BrewSection, SimConfig, DEFAULT_CONFIG_FILE};
