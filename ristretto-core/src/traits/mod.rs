//! Machine abstraction traits
//!
//! These traits define the interface between the UI-facing brew logic and
//! whatever stands behind it: the simulator here, the real controller on
//! hardware.

pub mod controller;
pub mod documents;

pub use controller::EspressoController;
pub use documents::{NoProfileDocuments, ProfileSource};
