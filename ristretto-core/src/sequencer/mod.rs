//! Phase sequencer
//!
//! Walks a profile's phase list, tracking the active phase and elapsed
//! time, and advances on timed completion.

pub mod executor;

pub use executor::{PhaseSequencer, PhaseTransition, SequencerStatus};
