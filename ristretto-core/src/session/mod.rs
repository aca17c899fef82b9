//! Brew session
//!
//! One session per shot: a phase sequencer paired with a process
//! integrator, plus the global stop conditions that end the shot.

pub mod brew;

pub use brew::{BrewOptions, BrewSession, SessionEvent, StopReason, FIRST_DRIP_G};
