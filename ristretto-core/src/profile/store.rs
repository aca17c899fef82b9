//! Profile store
//!
//! Resolves profile names to immutable phase lists and derives the values
//! a session needs from them.

use core::fmt;

use heapless::{String, Vec};

use super::builtin::ProfileKey;
use super::document::ProfileTargets;
use super::phase::{BrewPhase, PhaseKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 32;

/// Maximum phases per profile
pub const MAX_PHASES: usize = 8;

/// Profile validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileError {
    /// A phase before the last has neither a duration nor a volumetric stop
    UnboundedPhase { index: usize },
    /// No phase has a duration and the last has no volumetric stop
    NeverTerminates,
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundedPhase { index } => {
                write!(f, "phase {} has no duration and no volumetric stop", index + 1)
            }
            Self::NeverTerminates => f.write_str("no phase ever ends the shot"),
        }
    }
}

/// A named, ordered sequence of phases
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Profile {
    /// Display label
    pub label: String<MAX_LABEL_LEN>,
    /// Built-in key, if the name resolved
    pub key: Option<ProfileKey>,
    /// Phases in execution order
    pub phases: Vec<BrewPhase, MAX_PHASES>,
}

impl Profile {
    /// Build a profile from a phase slice
    ///
    /// Phases are sanitized; anything past `MAX_PHASES` is dropped.
    pub fn from_phases(label: &str, key: Option<ProfileKey>, phases: &[BrewPhase]) -> Self {
        let mut list = Vec::new();
        for phase in phases.iter().take(MAX_PHASES) {
            let _ = list.push(phase.sanitized());
        }
        Self {
            label: truncated_label(label),
            key,
            phases: list,
        }
    }

    /// Single-phase stand-in for a profile without stored phases
    ///
    /// Uses the brew targets on screen, the given pressure, and the
    /// volumetric target when volumetric mode is on.
    pub fn substitute(
        label: &str,
        key: Option<ProfileKey>,
        targets: ProfileTargets,
        pressure_bar: f32,
        volumetric_g: Option<f32>,
    ) -> Self {
        let phase = BrewPhase::new(
            PhaseKind::Brew,
            targets.duration_s,
            pressure_bar,
            0.0,
            targets.temp_c,
            volumetric_g.unwrap_or(0.0),
        );
        Self::from_phases(label, key, &[phase])
    }

    /// No stored phases
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Path of the backing profile document
    pub fn data_file(&self) -> Option<&'static str> {
        self.key.map(|key| key.data_file())
    }

    /// Sum of all timed phase durations (s)
    pub fn total_duration_s(&self) -> f32 {
        self.phases.iter().map(|p| p.duration_s).sum()
    }

    /// Sum of all volumetric stops (g)
    pub fn total_volumetric_g(&self) -> f32 {
        self.phases.iter().map(|p| p.stop_volumetric_g).sum()
    }

    /// Flow rate implied by the profile (g/s)
    ///
    /// Total volumetric target over total duration, or `default_gps` when
    /// the profile has no timed volumetric target.
    pub fn derived_flow_gps(&self, default_gps: f32) -> f32 {
        let volume = self.total_volumetric_g();
        let duration = self.total_duration_s();
        if volume > 0.0 && duration > 0.0 {
            volume / duration
        } else {
            default_gps
        }
    }

    /// Check that a session on this profile can end without a cancel
    pub fn validate(&self) -> Result<(), ProfileError> {
        let Some((last, rest)) = self.phases.split_last() else {
            return Ok(());
        };

        if let Some(index) = rest.iter().position(|p| !p.terminates()) {
            return Err(ProfileError::UnboundedPhase { index });
        }

        if self.total_duration_s() <= 0.0 && !last.has_volumetric_stop() {
            return Err(ProfileError::NeverTerminates);
        }

        Ok(())
    }
}

/// Load a profile by exact name
///
/// Unknown names yield an empty profile; the caller substitutes a single
/// default phase.
pub fn load(name: &str) -> Profile {
    match ProfileKey::from_name(name) {
        Some(key) => Profile::from_phases(name, Some(key), key.phases()),
        None => Profile::from_phases(name, None, &[]),
    }
}

/// Load a built-in profile
pub fn load_key(key: ProfileKey) -> Profile {
    Profile::from_phases(key.name(), Some(key), key.phases())
}

fn truncated_label(label: &str) -> String<MAX_LABEL_LEN> {
    let mut out = String::new();
    for c in label.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
