//! Ristretto host simulator
//!
//! Runs the brew controller from `ristretto-core` on the desktop: loads the
//! simulator configuration and profile documents from disk, drives the
//! periodic tick and renders the brew screen to the terminal.

pub mod catalog;
pub mod config;
pub mod display;
pub mod documents;
pub mod error;
pub mod runner;

pub use error::SimError;
