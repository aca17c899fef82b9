//! Shot runner
//!
//! Drives a brew controller through one shot: starts the session, ticks
//! it until it ends and publishes telemetry along the way. Ticks come
//! either from a tight loop (`run`) or from an embassy `Ticker` at the
//! configured period (`run_realtime`).

pub mod shot;
pub mod tick;

pub use shot::{RunOptions, ShotReport, ShotRunner};
pub use tick::run_realtime;
