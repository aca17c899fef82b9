//! Telemetry records

use core::fmt::{self, Write};

use heapless::String;

use crate::profile::PhaseKind;
use crate::session::StopReason;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Capacity of a compact telemetry record
pub const RECORD_CAPACITY: usize = 256;

/// Live readings of a brew
///
/// `Display` renders the compact record
/// `{"pressure":P,"temp":T,"weight":W,"elapsed":E}` with shortest
/// round-trip float formatting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Telemetry {
    /// Pump pressure (bar)
    #[cfg_attr(feature = "serde", serde(rename = "pressure"))]
    pub pressure_bar: f32,
    /// Brew temperature (°C)
    #[cfg_attr(feature = "serde", serde(rename = "temp"))]
    pub temp_c: f32,
    /// Cup weight (g)
    #[cfg_attr(feature = "serde", serde(rename = "weight"))]
    pub weight_g: f32,
    /// Time since the session began (s)
    #[cfg_attr(feature = "serde", serde(rename = "elapsed"))]
    pub elapsed_s: f32,
}

impl Telemetry {
    /// Compact record in a fixed-capacity buffer
    pub fn to_record(&self) -> String<RECORD_CAPACITY> {
        let mut out = String::new();
        // Four f32 values always fit
        let _ = write!(out, "{}", self);
        out
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"pressure\":{},\"temp\":{},\"weight\":{},\"elapsed\":{}}}",
            self.pressure_bar, self.temp_c, self.weight_g, self.elapsed_s
        )
    }
}

/// Phase progress and targets for the brew screen
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BrewStatus {
    /// 1-based number of the active phase, 0 when none is active
    pub phase_number: usize,
    /// Phases in the profile
    pub phase_count: usize,
    /// Kind of the active phase
    pub phase_kind: Option<PhaseKind>,
    /// Time left in the active phase (s)
    pub phase_remaining_s: f32,
    /// Current pressure target (bar)
    pub target_pressure_bar: f32,
    /// Current temperature target (°C)
    pub target_temp_c: f32,
    /// Current flow rate (g/s)
    pub flow_rate_gps: f32,
    /// Set once the session has ended
    pub stop_reason: Option<StopReason>,
    /// Shot is frozen
    pub paused: bool,
}

impl BrewStatus {
    /// Session has ended
    pub fn is_finished(&self) -> bool {
        self.stop_reason.is_some()
    }
}
