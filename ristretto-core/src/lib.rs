//! Board-agnostic brew process simulator for the espresso machine UI
//!
//! This crate contains the logic that stands in for the machine's
//! temperature/pressure/flow control loop when the UI runs without hardware:
//!
//! - Built-in extraction profiles and profile documents
//! - Phase sequencer for multi-phase profiles
//! - Process integrator (weight, pressure, temperature)
//! - Brew session with timed, volumetric and manual stops
//! - Telemetry snapshots for display and test assertions
//! - Command controller standing in for the hardware controller
//! - Post-shot feedback

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod feedback;
pub mod process;
pub mod profile;
pub mod sequencer;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod traits;

pub(crate) mod math;
