//! Configuration type definitions
//!
//! These types tune the simulation and bound the brew adjustments the UI
//! can make. Every struct has working defaults so a missing config file
//! still produces a plausible shot.

use crate::feedback::RoastLevel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default scheduler period in milliseconds
pub const DEFAULT_TICK_MS: u32 = 100;

/// Flow rate used when a profile defines no timed volumetric target (g/s)
pub const DEFAULT_FLOW_GPS: f32 = 1.2;

/// Pressure used for substitute single-phase profiles (bar)
pub const DEFAULT_PRESSURE_BAR: f32 = 9.0;

/// Boiler temperature at power-on (°C)
pub const DEFAULT_BOILER_TEMP_C: f32 = 93.0;

/// How live pressure follows its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PressureModel {
    /// First-order approach: `p += (target - p) * gain` each tick
    #[default]
    Exponential,
    /// Linear ramp to target over `ramp_time_s` from the start of each phase
    Ramp,
}

/// Simulation tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SimulationConfig {
    /// Nominal scheduler period (ms). Gains are specified per tick of this length.
    pub tick_ms: u32,
    /// Pressure gain per nominal tick (0..=1)
    pub pressure_gain: f32,
    /// Temperature gain per nominal tick (0..=1), smaller than `pressure_gain`
    pub temp_gain: f32,
    /// Pressure model
    pub pressure_model: PressureModel,
    /// Time to reach target pressure for the ramp model (s)
    pub ramp_time_s: f32,
    /// Fallback flow rate (g/s)
    pub default_flow_gps: f32,
    /// Pressure for substitute profiles (bar)
    pub default_pressure_bar: f32,
    /// Boiler temperature at power-on (°C)
    pub boiler_temp_c: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            pressure_gain: 0.05,
            temp_gain: 0.02,
            pressure_model: PressureModel::Exponential,
            ramp_time_s: 2.0,
            default_flow_gps: DEFAULT_FLOW_GPS,
            default_pressure_bar: DEFAULT_PRESSURE_BAR,
            boiler_temp_c: DEFAULT_BOILER_TEMP_C,
        }
    }
}

impl SimulationConfig {
    /// Nominal tick length in seconds
    pub fn nominal_tick_s(&self) -> f32 {
        self.tick_ms.max(1) as f32 / 1000.0
    }

    /// Scale a per-nominal-tick gain to a tick of `dt_s` seconds
    ///
    /// A 1 s tick with a 100 ms nominal period applies ten times the gain,
    /// clamped to 1 so the value never overshoots its target.
    pub fn scaled_gain(&self, gain: f32, dt_s: f32) -> f32 {
        let scaled = gain * (dt_s / self.nominal_tick_s());
        if scaled > 1.0 {
            1.0
        } else if scaled > 0.0 {
            scaled
        } else {
            0.0
        }
    }
}

/// Limits and steps for the brew adjustment buttons
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct AdjustmentLimits {
    /// Brew temperature step (°C)
    pub temp_step_c: f32,
    /// Lowest brew temperature (°C)
    pub temp_min_c: f32,
    /// Highest brew temperature (°C)
    pub temp_max_c: f32,
    /// Brew time step (s)
    pub time_step_s: f32,
    /// Shortest brew time (s)
    pub time_min_s: f32,
    /// Longest brew time (s)
    pub time_max_s: f32,
    /// Steam temperature step (°C)
    pub steam_step_c: f32,
    /// Lowest steam temperature (°C)
    pub steam_min_c: f32,
    /// Highest steam temperature (°C)
    pub steam_max_c: f32,
    /// Grind time step (s)
    pub grind_step_s: f32,
    /// Shortest grind time (s)
    pub grind_min_s: f32,
    /// Longest grind time (s)
    pub grind_max_s: f32,
}

impl Default for AdjustmentLimits {
    fn default() -> Self {
        Self {
            temp_step_c: 0.5,
            temp_min_c: 85.0,
            temp_max_c: 100.0,
            time_step_s: 1.0,
            time_min_s: 10.0,
            time_max_s: 60.0,
            steam_step_c: 1.0,
            steam_min_c: 100.0,
            steam_max_c: 140.0,
            grind_step_s: 0.5,
            grind_min_s: 5.0,
            grind_max_s: 30.0,
        }
    }
}

impl AdjustmentLimits {
    /// Clamp a brew temperature into range
    pub fn clamp_temp(&self, temp_c: f32) -> f32 {
        temp_c.max(self.temp_min_c).min(self.temp_max_c)
    }

    /// Clamp a brew time into range
    pub fn clamp_time(&self, time_s: f32) -> f32 {
        time_s.max(self.time_min_s).min(self.time_max_s)
    }

    /// Clamp a steam temperature into range
    pub fn clamp_steam(&self, temp_c: f32) -> f32 {
        temp_c.max(self.steam_min_c).min(self.steam_max_c)
    }

    /// Clamp a grind time into range
    pub fn clamp_grind(&self, time_s: f32) -> f32 {
        time_s.max(self.grind_min_s).min(self.grind_max_s)
    }
}

/// Shot defaults used by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct BrewConfig {
    /// Brew temperature before any profile is applied (°C)
    pub target_temp_c: f32,
    /// Brew time before any profile is applied (s)
    pub brew_time_s: f32,
    /// Target yield for volumetric mode (g)
    pub target_weight_g: f32,
    /// Start in volumetric mode
    pub volumetric: bool,
    /// Dry dose in the basket (g), used for shot feedback
    pub dose_g: f32,
    /// Roast level of the beans, if known
    pub roast: Option<RoastLevel>,
    /// Include roast-specific tips in shot feedback
    pub roast_tips: bool,
    /// Steam temperature (°C)
    pub steam_temp_c: f32,
    /// Grinder run time (s)
    pub grind_time_s: f32,
}

impl Default for BrewConfig {
    fn default() -> Self {
        Self {
            target_temp_c: DEFAULT_BOILER_TEMP_C,
            brew_time_s: 25.0,
            target_weight_g: 36.0,
            volumetric: false,
            dose_g: 18.0,
            roast: None,
            roast_tips: false,
            steam_temp_c: 125.0,
            grind_time_s: 18.0,
        }
    }
}
