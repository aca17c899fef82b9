//! Controller state machine
//!
//! The brew controller's externally visible mode is an explicit, finite
//! and deterministic function of its previous mode and an event.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
