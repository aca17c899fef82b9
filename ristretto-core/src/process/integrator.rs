//! Process integration
//!
//! Models the machine's hydraulic and thermal lag: pressure and temperature
//! approach their targets over several ticks instead of snapping, while
//! weight integrates the controlled flow rate exactly.

use crate::config::{PressureModel, SimulationConfig};
use crate::math::non_negative;
use crate::profile::BrewPhase;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Live physical state of a brew
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegratorState {
    /// Weight in the cup (g), never decreases within a session
    pub weight_g: f32,
    /// Pump pressure (bar)
    pub pressure_bar: f32,
    /// Brew water temperature (°C)
    pub temp_c: f32,
    /// Pressure target of the active phase (bar)
    pub target_pressure_bar: f32,
    /// Temperature target (°C)
    pub target_temp_c: f32,
    /// Flow into the cup (g/s)
    pub flow_rate_gps: f32,
}

/// Process integrator
#[derive(Debug, Clone)]
pub struct Integrator {
    /// Simulation tuning
    config: SimulationConfig,
    /// Live state
    state: IntegratorState,
    /// Time since the current targets were applied (ramp model)
    ramp_elapsed_s: f32,
}

impl Integrator {
    /// Create an integrator at rest
    ///
    /// # Arguments
    /// - `temp_c`: Starting brew temperature (the boiler temperature)
    /// - `flow_rate_gps`: Flow used until a phase sets its own
    pub fn new(config: SimulationConfig, temp_c: f32, flow_rate_gps: f32) -> Self {
        let temp_c = non_negative(temp_c);
        let flow_rate_gps = if flow_rate_gps > 0.0 {
            flow_rate_gps
        } else {
            config.default_flow_gps
        };

        Self {
            config,
            state: IntegratorState {
                weight_g: 0.0,
                pressure_bar: 0.0,
                temp_c,
                target_pressure_bar: non_negative(config.default_pressure_bar),
                target_temp_c: temp_c,
                flow_rate_gps: non_negative(flow_rate_gps),
            },
            ramp_elapsed_s: 0.0,
        }
    }

    /// Apply a phase's nonzero targets
    ///
    /// Zero fields keep the previous target, so flow never drops to zero
    /// and stalls the shot.
    pub fn apply_phase(&mut self, phase: &BrewPhase) {
        let phase = phase.sanitized();

        if phase.target_pressure_bar > 0.0 {
            self.state.target_pressure_bar = phase.target_pressure_bar;
        }
        if phase.target_flow_gps > 0.0 {
            self.state.flow_rate_gps = phase.target_flow_gps;
        }
        if phase.target_temp_c > 0.0 {
            self.state.target_temp_c = phase.target_temp_c;
        }

        self.ramp_elapsed_s = 0.0;
    }

    /// Retarget the brew temperature
    pub fn set_target_temp(&mut self, temp_c: f32) {
        if temp_c > 0.0 {
            self.state.target_temp_c = temp_c;
        }
    }

    /// Advance the simulation by `dt_s` seconds
    pub fn tick(&mut self, dt_s: f32) {
        let dt_s = non_negative(dt_s);
        let state = &mut self.state;

        state.weight_g += state.flow_rate_gps * dt_s;

        state.pressure_bar = match self.config.pressure_model {
            PressureModel::Exponential => {
                let gain = self.config.scaled_gain(self.config.pressure_gain, dt_s);
                state.pressure_bar + (state.target_pressure_bar - state.pressure_bar) * gain
            }
            PressureModel::Ramp => {
                self.ramp_elapsed_s += dt_s;
                let fraction = if self.config.ramp_time_s > 0.0 {
                    (self.ramp_elapsed_s / self.config.ramp_time_s).min(1.0)
                } else {
                    1.0
                };
                state.target_pressure_bar * fraction
            }
        };
        state.pressure_bar = non_negative(state.pressure_bar);

        let gain = self.config.scaled_gain(self.config.temp_gain, dt_s);
        state.temp_c = non_negative(state.temp_c + (state.target_temp_c - state.temp_c) * gain);
    }

    /// Zero weight and pressure for a fresh shot; temperature carries over
    pub fn reset(&mut self) {
        self.state.weight_g = 0.0;
        self.state.pressure_bar = 0.0;
        self.ramp_elapsed_s = 0.0;
    }

    /// Live state
    pub fn state(&self) -> &IntegratorState {
        &self.state
    }

    /// Simulation tuning in use
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
