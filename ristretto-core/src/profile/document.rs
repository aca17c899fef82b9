//! Profile documents
//!
//! A profile document is a small mapping of named numeric fields that
//! overrides the brew targets of a profile. Each field is read on its own:
//! a field that is absent or fails to parse keeps the previous value.

use super::builtin::ProfileKey;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Field names accepted for the target temperature
pub const TEMP_FIELDS: [&str; 2] = ["targetTemp", "target_temp"];

/// Field names accepted for the target duration
pub const DURATION_FIELDS: [&str; 2] = ["targetDuration", "target_time"];

/// Brew targets shown on the brew screen and used for substitute phases
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProfileTargets {
    /// Brew temperature (°C)
    pub temp_c: f32,
    /// Brew time (s)
    pub duration_s: f32,
}

impl ProfileTargets {
    /// Targets applied when a profile has no document
    pub fn defaults_for(key: Option<ProfileKey>) -> Self {
        let (temp_c, duration_s) = match key {
            Some(ProfileKey::LmLeva) => (90.0, 25.0),
            Some(ProfileKey::NineBar) => (93.0, 30.0),
            Some(ProfileKey::Classic) => (92.0, 35.0),
            _ => (93.0, 30.0),
        };
        Self { temp_c, duration_s }
    }
}

/// Values read from a profile document
///
/// `None` means the field was missing or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProfileOverride {
    /// Target temperature (°C)
    pub target_temp_c: Option<f32>,
    /// Target duration (whole seconds)
    pub target_duration_s: Option<f32>,
}

impl ProfileOverride {
    /// Build from raw field text, parsing each field independently
    pub fn from_fields(temp: Option<&str>, duration: Option<&str>) -> Self {
        Self::from_values(temp.and_then(parse_numeric), duration.and_then(parse_numeric))
    }

    /// Build from already-decoded numbers
    ///
    /// Negative or non-finite values are dropped; the duration is truncated
    /// to whole seconds.
    pub fn from_values(temp_c: Option<f32>, duration_s: Option<f32>) -> Self {
        let valid = |value: &f32| value.is_finite() && *value >= 0.0;
        Self {
            target_temp_c: temp_c.filter(valid),
            target_duration_s: duration_s
                .filter(valid)
                .map(|seconds| seconds as u32 as f32),
        }
    }

    /// Apply parsed fields over `targets`, keeping the rest
    pub fn apply(&self, targets: ProfileTargets) -> ProfileTargets {
        ProfileTargets {
            temp_c: self.target_temp_c.unwrap_or(targets.temp_c),
            duration_s: self.target_duration_s.unwrap_or(targets.duration_s),
        }
    }

    /// No field parsed
    pub fn is_empty(&self) -> bool {
        self.target_temp_c.is_none() && self.target_duration_s.is_none()
    }
}

/// Parse a non-negative, finite number from field text
pub fn parse_numeric(text: &str) -> Option<f32> {
    let value: f32 = text.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("93"), Some(93.0));
        assert_eq!(parse_numeric(" 92.5 "), Some(92.5));
        assert_eq!(parse_numeric("hot"), None);
        assert_eq!(parse_numeric("-4"), None);
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric(""), None);
    }

    #[test]
    fn test_malformed_field_keeps_previous() {
        let prior = ProfileTargets {
            temp_c: 91.0,
            duration_s: 27.0,
        };

        let doc = ProfileOverride::from_fields(Some("94.5"), Some("soon"));
        let applied = doc.apply(prior);
        assert_eq!(applied.temp_c, 94.5);
        assert_eq!(applied.duration_s, 27.0);

        let doc = ProfileOverride::from_fields(None, Some("32"));
        let applied = doc.apply(prior);
        assert_eq!(applied.temp_c, 91.0);
        assert_eq!(applied.duration_s, 32.0);
    }

    #[test]
    fn test_duration_is_whole_seconds() {
        let doc = ProfileOverride::from_fields(None, Some("28.7"));
        assert_eq!(doc.target_duration_s, Some(28.0));
    }

    #[test]
    fn test_from_values_drops_invalid() {
        let doc = ProfileOverride::from_values(Some(-1.0), Some(f32::INFINITY));
        assert!(doc.is_empty());

        let doc = ProfileOverride::from_values(Some(92.0), Some(30.9));
        assert_eq!(doc.target_temp_c, Some(92.0));
        assert_eq!(doc.target_duration_s, Some(30.0));
    }

    #[test]
    fn test_defaults_per_profile() {
        let leva = ProfileTargets::defaults_for(Some(ProfileKey::LmLeva));
        assert_eq!((leva.temp_c, leva.duration_s), (90.0, 25.0));

        let classic = ProfileTargets::defaults_for(Some(ProfileKey::Classic));
        assert_eq!((classic.temp_c, classic.duration_s), (92.0, 35.0));

        let unknown = ProfileTargets::defaults_for(None);
        assert_eq!((unknown.temp_c, unknown.duration_s), (93.0, 30.0));
    }
}
