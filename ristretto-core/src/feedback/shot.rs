//! Shot grading

use crate::math::abs;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closing line attached to every piece of feedback
pub const TASTE_NOTE: &str = "Ultimately, it's down to taste \u{2013} enjoy \u{2615}\u{fe0f}";

/// Default relative tolerance on time and ratio
const DEFAULT_TOLERANCE: f32 = 0.10;

/// Peak pressure above which a long shot is treated as choking (bar)
const CHOKE_PRESSURE_BAR: f32 = 10.0;

/// First drips before this fraction of the target time count as early
const EARLY_DRIP_FRACTION: f32 = 0.1;

/// Roast level of the beans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RoastLevel {
    Light,
    Medium,
    Dark,
}

impl RoastLevel {
    /// Relative tolerance on time and ratio
    pub const fn tolerance(&self) -> f32 {
        match self {
            RoastLevel::Light => 0.15,
            RoastLevel::Medium => DEFAULT_TOLERANCE,
            RoastLevel::Dark => 0.08,
        }
    }

    /// Roast-specific tip
    pub const fn note(&self) -> &'static str {
        match self {
            RoastLevel::Light => "Light roasts often benefit from slightly longer ratios or finer grinds to tame sharp acidity.",
            RoastLevel::Medium => "Medium roasts are versatile; small grind or yield tweaks usually go a long way.",
            RoastLevel::Dark => "Dark roasts can over-extract quickly; shorter shots or coarser grinds often taste better.",
        }
    }
}

/// Recipe and result of a finished shot
///
/// Missing or zero values are treated as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShotSummary {
    /// Dry dose (g)
    pub dose_g: Option<f32>,
    /// Target yield (g)
    pub target_yield_g: Option<f32>,
    /// Measured yield (g)
    pub actual_yield_g: Option<f32>,
    /// Target shot time (s)
    pub target_time_s: Option<f32>,
    /// Measured shot time (s)
    pub actual_time_s: Option<f32>,
    /// Target brew ratio, overrides `target_yield_g / dose_g`
    pub target_ratio: Option<f32>,
    /// Yield was measured by a scale
    pub has_scale: bool,
    /// Roast level set for this shot
    pub roast: Option<RoastLevel>,
}

/// Extra measurements used to explain a deviation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdvancedShotMetrics {
    /// Highest pressure during the shot (bar)
    pub peak_pressure_bar: Option<f32>,
    /// Time until the first drops reached the cup (s)
    pub time_to_first_drip_s: Option<f32>,
    /// Flow pattern suggested channeling
    pub suspected_channeling: bool,
}

/// Feedback options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeedbackOptions {
    /// Use roast-specific tolerances and tips
    pub roast_tips: bool,
}

/// How the shot should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Success,
    Info,
    Warning,
}

/// Feedback for one shot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ShotFeedback {
    /// Main suggestion
    pub message: &'static str,
    /// Extraction assessment
    pub extraction: &'static str,
    /// Strength assessment
    pub strength: &'static str,
    /// Extra nuance from advanced metrics
    pub detail: Option<&'static str>,
    /// Roast-specific tip
    pub roast_note: Option<&'static str>,
    /// Presentation
    pub severity: Severity,
    /// Always [`TASTE_NOTE`]
    pub taste_note: &'static str,
}

/// Deviation from target on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Low,
    Ok,
    High,
}

fn known(value: Option<f32>) -> Option<f32> {
    value.filter(|v| *v > 0.0)
}

/// Grade a shot
///
/// Returns `None` without a scale, a measured yield or a dose.
pub fn shot_feedback(
    shot: &ShotSummary,
    advanced: Option<&AdvancedShotMetrics>,
    options: FeedbackOptions,
) -> Option<ShotFeedback> {
    if !shot.has_scale {
        return None;
    }
    let actual_yield = known(shot.actual_yield_g)?;
    let dose = known(shot.dose_g)?;

    let roast = shot.roast.filter(|_| options.roast_tips);
    let tolerance = roast.map(|r| r.tolerance()).unwrap_or(DEFAULT_TOLERANCE);
    let roast_note = roast.map(|r| r.note());

    let actual_ratio = actual_yield / dose;
    let target_ratio =
        known(shot.target_ratio).or_else(|| known(shot.target_yield_g).map(|y| y / dose));
    let target_time = known(shot.target_time_s);

    let time_diff = match (target_time, known(shot.actual_time_s)) {
        (Some(target), Some(actual)) => (actual - target) / target,
        _ => 0.0,
    };
    let ratio_diff = match target_ratio {
        Some(target) => (actual_ratio - target) / target,
        None => 0.0,
    };

    let within_time = target_time.is_none() || abs(time_diff) <= tolerance;
    let within_ratio = target_ratio.is_none() || abs(ratio_diff) <= tolerance;

    let feedback = |message, extraction, strength, severity| ShotFeedback {
        message,
        extraction,
        strength,
        detail: None,
        roast_note,
        severity,
        taste_note: TASTE_NOTE,
    };

    if within_time && within_ratio {
        return Some(feedback(
            "Shot matched the target recipe. Nice pull!",
            "Balanced extraction.",
            "Balanced strength.",
            Severity::Success,
        ));
    }

    let extraction = if within_time {
        Level::Ok
    } else if time_diff < 0.0 {
        Level::Low
    } else {
        Level::High
    };

    // A higher ratio than planned is a weaker shot
    let strength = if within_ratio {
        Level::Ok
    } else if ratio_diff > 0.0 {
        Level::Low
    } else {
        Level::High
    };

    let extraction_text = match extraction {
        Level::Low => "Likely under-extracted (fast shot).",
        Level::High => "Likely over-extracted (long shot).",
        Level::Ok => "Extraction is close to target.",
    };

    let result = match (extraction, strength) {
        (Level::Low, Level::Low) => feedback(
            "Shot ran fast and high-yield (weak). Try grinding finer and stopping a bit earlier.",
            "Often perceived as sour / sharp.",
            "On the watery side.",
            Severity::Warning,
        ),
        (Level::Low, Level::High) => feedback(
            "Shot ran fast but quite strong. Try grinding slightly finer or allowing a bit more yield.",
            "Likely under-extracted.",
            "Quite intense.",
            Severity::Info,
        ),
        (Level::High, Level::High) => feedback(
            "Shot ran slow and low-yield (very strong). Try grinding coarser and letting it run a bit longer.",
            "Often perceived as bitter / harsh.",
            "Very concentrated.",
            Severity::Warning,
        ),
        (Level::High, Level::Low) => feedback(
            "Shot ran slow but still ended up fairly high-yield. Try grinding a touch coarser and aiming for a slightly lower yield.",
            "Leaning over-extracted.",
            "A bit thin for the shot time.",
            Severity::Info,
        ),
        (_, Level::Low) => feedback(
            "Shot strength is on the weaker side. Try reducing yield slightly or grinding a bit finer.",
            extraction_text,
            "Watery / low strength.",
            Severity::Info,
        ),
        (_, Level::High) => feedback(
            "Shot is quite strong. Try increasing yield a little or grinding a touch coarser.",
            extraction_text,
            "High strength / muddy.",
            Severity::Info,
        ),
        (_, Level::Ok) => ShotFeedback {
            detail: advanced.and_then(|metrics| advanced_detail(metrics, shot, tolerance)),
            ..feedback(
                "Shot deviated from the target. Adjust grind or ratio and try again.",
                extraction_text,
                "Strength is close to target.",
                Severity::Info,
            )
        },
    };

    Some(result)
}

fn advanced_detail(
    metrics: &AdvancedShotMetrics,
    shot: &ShotSummary,
    tolerance: f32,
) -> Option<&'static str> {
    let target_time = known(shot.target_time_s);

    if let (Some(peak), Some(target), Some(actual)) = (
        known(metrics.peak_pressure_bar),
        target_time,
        known(shot.actual_time_s),
    ) {
        if peak > CHOKE_PRESSURE_BAR && actual > target * (1.0 + tolerance) {
            return Some("High pressure and long shot time suggest the puck may be choking. Try a coarser grind or slightly lower dose.");
        }
    }

    if let (Some(drip), Some(target)) = (known(metrics.time_to_first_drip_s), target_time) {
        if drip < target * EARLY_DRIP_FRACTION {
            return Some("Very early first drips can point to a coarse grind or uneven puck prep.");
        }
    }

    if metrics.suspected_channeling {
        return Some(
            "Channeling suspected. Focus on distribution and tamping before changing grind.",
        );
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(actual_yield: f32, target_time: f32, actual_time: f32) -> ShotSummary {
        ShotSummary {
            dose_g: Some(18.0),
            target_yield_g: Some(36.0),
            actual_yield_g: Some(actual_yield),
            target_time_s: Some(target_time),
            actual_time_s: Some(actual_time),
            target_ratio: None,
            has_scale: true,
            roast: None,
        }
    }

    fn grade(shot: &ShotSummary) -> ShotFeedback {
        shot_feedback(shot, None, FeedbackOptions::default()).unwrap()
    }

    #[test]
    fn test_balanced_shot() {
        let feedback = grade(&shot(36.5, 30.0, 29.0));
        assert_eq!(feedback.severity, Severity::Success);
        assert!(feedback.message.contains("matched the target"));
        assert_eq!(feedback.taste_note, TASTE_NOTE);
        assert_eq!(feedback.roast_note, None);
    }

    #[test]
    fn test_fast_and_watery() {
        let feedback = grade(&shot(45.0, 30.0, 22.0));
        assert_eq!(feedback.severity, Severity::Warning);
        assert!(feedback.message.contains("fast and high-yield"));
    }

    #[test]
    fn test_slow_and_strong() {
        let feedback = grade(&shot(28.0, 30.0, 40.0));
        assert_eq!(feedback.severity, Severity::Warning);
        assert!(feedback.message.contains("slow and low-yield"));
    }

    #[test]
    fn test_strength_only() {
        let watery = grade(&shot(42.0, 30.0, 30.0));
        assert_eq!(watery.severity, Severity::Info);
        assert!(watery.message.contains("weaker side"));
        assert_eq!(watery.extraction, "Extraction is close to target.");

        let strong = grade(&shot(30.0, 30.0, 30.0));
        assert_eq!(strong.severity, Severity::Info);
        assert!(strong.message.contains("quite strong"));
    }

    #[test]
    fn test_requires_scale_yield_and_dose() {
        let mut no_scale = shot(36.0, 30.0, 30.0);
        no_scale.has_scale = false;
        assert_eq!(shot_feedback(&no_scale, None, FeedbackOptions::default()), None);

        let mut no_yield = shot(36.0, 30.0, 30.0);
        no_yield.actual_yield_g = None;
        assert_eq!(shot_feedback(&no_yield, None, FeedbackOptions::default()), None);

        let mut no_dose = shot(36.0, 30.0, 30.0);
        no_dose.dose_g = Some(0.0);
        assert_eq!(shot_feedback(&no_dose, None, FeedbackOptions::default()), None);
    }

    #[test]
    fn test_light_roast_widens_tolerance() {
        let mut light = shot(38.0, 30.0, 26.0);
        light.roast = Some(RoastLevel::Light);

        // 13% fast: outside the default tolerance
        let plain = grade(&light);
        assert_ne!(plain.severity, Severity::Success);

        let options = FeedbackOptions { roast_tips: true };
        let aware = shot_feedback(&light, None, options).unwrap();
        assert_eq!(aware.severity, Severity::Success);
        assert!(aware.roast_note.unwrap().starts_with("Light roasts often benefit"));
    }

    #[test]
    fn test_dark_roast_note() {
        let mut dark = shot(36.0, 25.0, 28.0);
        dark.roast = Some(RoastLevel::Dark);
        let feedback = shot_feedback(&dark, None, FeedbackOptions { roast_tips: true }).unwrap();
        assert!(feedback.roast_note.unwrap().starts_with("Dark roasts can over-extract"));
        assert_eq!(feedback.extraction, "Likely over-extracted (long shot).");
    }

    #[test]
    fn test_target_ratio_overrides_yield() {
        let mut summary = shot(45.0, 30.0, 30.0);
        summary.target_ratio = Some(2.5);
        assert_eq!(grade(&summary).severity, Severity::Success);
    }

    #[test]
    fn test_advanced_detail_on_time_deviation() {
        let summary = shot(36.0, 30.0, 40.0);

        let choking = AdvancedShotMetrics {
            peak_pressure_bar: Some(11.0),
            ..Default::default()
        };
        let feedback = shot_feedback(&summary, Some(&choking), FeedbackOptions::default()).unwrap();
        assert!(feedback.message.contains("deviated from the target"));
        assert!(feedback.detail.unwrap().contains("choking"));

        let channeling = AdvancedShotMetrics {
            suspected_channeling: true,
            ..Default::default()
        };
        let feedback =
            shot_feedback(&summary, Some(&channeling), FeedbackOptions::default()).unwrap();
        assert!(feedback.detail.unwrap().starts_with("Channeling suspected"));

        let early = shot(36.0, 30.0, 20.0);
        let drip = AdvancedShotMetrics {
            time_to_first_drip_s: Some(2.0),
            ..Default::default()
        };
        let feedback = shot_feedback(&early, Some(&drip), FeedbackOptions::default()).unwrap();
        assert!(feedback.detail.unwrap().contains("early first drips"));

        let none = shot_feedback(&summary, None, FeedbackOptions::default()).unwrap();
        assert_eq!(none.detail, None);
    }
}
