//! Brew controller
//!
//! The simulated stand-in for the machine's hardware controller. It owns
//! the profile selection and brew adjustments, builds a session when a
//! shot starts and drops it when the shot ends.

pub mod brew;
pub mod commands;

pub use brew::{Adjustments, BrewController};
pub use commands::Command;
