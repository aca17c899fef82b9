//! Configuration file loader

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use ristretto_core::config::{AdjustmentLimits, BrewConfig, SimulationConfig};
use ristretto_core::feedback::RoastLevel;

use crate::error::{Result, SimError};

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sim.toml";

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Physics tuning and tick period
    pub simulation: SimulationConfig,
    /// Brew adjustment steps and limits
    pub adjustments: AdjustmentLimits,
    /// Shot defaults
    pub brew: BrewSection,
}

/// `[brew]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrewSection {
    /// Profile selected at startup
    pub profile: String,
    /// Brew temperature before a profile document is applied (°C)
    pub target_temp_c: f32,
    /// Brew time before a profile document is applied (s)
    pub brew_time_s: f32,
    /// Target yield in volumetric mode (g)
    pub target_weight_g: f32,
    /// Start in volumetric mode
    pub volumetric: bool,
    /// Dry dose (g)
    pub dose_g: f32,
    /// Roast level of the beans
    pub roast: Option<RoastLevel>,
    /// Roast-specific shot feedback
    pub roast_tips: bool,
    /// Steam temperature (°C)
    pub steam_temp_c: f32,
    /// Grinder run time (s)
    pub grind_time_s: f32,
}

impl Default for BrewSection {
    fn default() -> Self {
        let brew = BrewConfig::default();
        Self {
            profile: "Classic".into(),
            target_temp_c: brew.target_temp_c,
            brew_time_s: brew.brew_time_s,
            target_weight_g: brew.target_weight_g,
            volumetric: brew.volumetric,
            dose_g: brew.dose_g,
            roast: brew.roast,
            roast_tips: brew.roast_tips,
            steam_temp_c: brew.steam_temp_c,
            grind_time_s: brew.grind_time_s,
        }
    }
}

impl BrewSection {
    /// Shot defaults for the controller
    pub fn brew_config(&self) -> BrewConfig {
        BrewConfig {
            target_temp_c: self.target_temp_c,
            brew_time_s: self.brew_time_s,
            target_weight_g: self.target_weight_g,
            volumetric: self.volumetric,
            dose_g: self.dose_g,
            roast: self.roast,
            roast_tips: self.roast_tips,
            steam_temp_c: self.steam_temp_c,
            grind_time_s: self.grind_time_s,
        }
    }
}

/// Parse configuration text
///
/// `path` is only used for error reporting.
pub fn parse(text: &str, path: &Path) -> Result<SimConfig> {
    toml::from_str(text).map_err(|source| SimError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the configuration
///
/// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
/// read from the working directory if present, otherwise defaults are used.
pub fn load(path: Option<&Path>) -> Result<SimConfig> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound && !required => {
            debug!("No {} found, using defaults", path.display());
            return Ok(SimConfig::default());
        }
        Err(source) => return Err(SimError::Io { path, source }),
    };

    let config = parse(&text, &path)?;
    info!("Loaded configuration from {}", path.display());
    log_config_summary(&config);
    Ok(config)
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &SimConfig) {
    let sim = &config.simulation;
    debug!(
        "  tick {} ms, {:?} pressure, gains p={} t={}",
        sim.tick_ms, sim.pressure_model, sim.pressure_gain, sim.temp_gain
    );
    debug!(
        "  profile {:?}, dose {} g, volumetric {}",
        config.brew.profile, config.brew.dose_g, config.brew.volumetric
    );
}
