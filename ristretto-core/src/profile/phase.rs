//! A single stage of an extraction profile

use crate::math::{micros, non_negative};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Phase kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PhaseKind {
    /// Low-pressure wetting of the puck
    Preinfusion,
    /// Main extraction
    Brew,
}

impl PhaseKind {
    /// Display label
    pub const fn label(&self) -> &'static str {
        match self {
            PhaseKind::Preinfusion => "Preinfusion",
            PhaseKind::Brew => "Brew",
        }
    }
}

/// One stage of extraction
///
/// Zero means "not set" for every target: the previous target stays in
/// force. A zero duration has no timed limit and must be paired with a
/// volumetric stop unless it is the final phase.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BrewPhase {
    /// Phase kind
    pub kind: PhaseKind,
    /// Timed limit (s), 0 = none
    pub duration_s: f32,
    /// Pump pressure target (bar), 0 = hold previous
    pub target_pressure_bar: f32,
    /// Flow target (g/s), 0 = keep current flow
    pub target_flow_gps: f32,
    /// Brew temperature target (°C), 0 = unchanged
    pub target_temp_c: f32,
    /// Stop once the cup weighs this much (g), 0 = none
    pub stop_volumetric_g: f32,
}

impl BrewPhase {
    /// Create a phase
    pub const fn new(
        kind: PhaseKind,
        duration_s: f32,
        target_pressure_bar: f32,
        target_flow_gps: f32,
        target_temp_c: f32,
        stop_volumetric_g: f32,
    ) -> Self {
        Self {
            kind,
            duration_s,
            target_pressure_bar,
            target_flow_gps,
            target_temp_c,
            stop_volumetric_g,
        }
    }

    /// Copy with every field clamped to zero or above
    pub fn sanitized(self) -> Self {
        Self {
            kind: self.kind,
            duration_s: non_negative(self.duration_s),
            target_pressure_bar: non_negative(self.target_pressure_bar),
            target_flow_gps: non_negative(self.target_flow_gps),
            target_temp_c: non_negative(self.target_temp_c),
            stop_volumetric_g: non_negative(self.stop_volumetric_g),
        }
    }

    /// Phase has a timed limit
    pub fn is_timed(&self) -> bool {
        self.duration_s > 0.0
    }

    /// Phase has a volumetric stop
    pub fn has_volumetric_stop(&self) -> bool {
        self.stop_volumetric_g > 0.0
    }

    /// Timed limit in whole microseconds
    pub fn duration_us(&self) -> u64 {
        micros(self.duration_s)
    }

    /// Timed limit reached after `elapsed_us` in this phase
    pub fn timed_out(&self, elapsed_us: u64) -> bool {
        self.is_timed() && elapsed_us >= self.duration_us()
    }

    /// Volumetric stop reached at `weight_g`
    pub fn volumetric_reached(&self, weight_g: f32) -> bool {
        self.has_volumetric_stop() && weight_g >= self.stop_volumetric_g
    }

    /// Phase can end on its own
    pub fn terminates(&self) -> bool {
        self.is_timed() || self.has_volumetric_stop()
    }
}
