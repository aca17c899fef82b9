//! Process integrator
//!
//! Simulated hydraulics and thermals: weight, pressure and temperature
//! advanced toward the active phase targets each tick.

pub mod integrator;

pub use integrator::{Integrator, IntegratorState};
