//! Built-in profile table
//!
//! Profiles are a closed set. Each key owns its phase list, the names the
//! UI uses for it, and the path of its optional profile document.

use super::phase::{BrewPhase, PhaseKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use PhaseKind::{Brew, Preinfusion};

const NINE_BAR: &[BrewPhase] = &[BrewPhase::new(Brew, 28.0, 9.0, 0.0, 93.0, 36.0)];

const NINE_BAR_PREINFUSION: &[BrewPhase] = &[
    BrewPhase::new(Preinfusion, 6.0, 2.0, 0.0, 93.0, 0.0),
    BrewPhase::new(Preinfusion, 6.0, 9.0, 0.0, 93.0, 0.0),
    BrewPhase::new(Brew, 20.0, 9.0, 0.0, 93.0, 36.0),
];

const SEVEN_BAR: &[BrewPhase] = &[
    BrewPhase::new(Preinfusion, 8.0, 2.0, 0.0, 93.0, 0.0),
    BrewPhase::new(Preinfusion, 5.0, 7.0, 0.0, 93.0, 0.0),
    BrewPhase::new(Brew, 20.0, 7.0, 0.0, 93.0, 36.0),
];

const LM_LEVA: &[BrewPhase] = &[
    BrewPhase::new(Preinfusion, 2.0, 1.8, 0.0, 89.0, 0.0),
    BrewPhase::new(Preinfusion, 20.0, 1.8, 0.0, 89.0, 0.0),
    BrewPhase::new(Preinfusion, 10.0, 2.2, 0.0, 88.5, 0.0),
    BrewPhase::new(Brew, 5.0, 8.0, 0.0, 88.0, 0.0),
    BrewPhase::new(Brew, 5.0, 8.0, 0.0, 88.0, 0.0),
    BrewPhase::new(Brew, 58.0, 2.2, 0.0, 88.0, 36.0),
];

const CLASSIC: &[BrewPhase] = &[BrewPhase::new(Brew, 30.0, 9.0, 0.0, 93.0, 36.0)];

/// Built-in profile keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProfileKey {
    /// Single 9 bar phase
    NineBar,
    /// Two-step preinfusion into 9 bar
    NineBarPreinfusion,
    /// Two-step preinfusion into 7 bar
    SevenBar,
    /// Long lever-style preinfusion with declining pressure
    LmLeva,
    /// Manual lever; no stored phases
    CreminaLever,
    /// Single 30 s phase at 9 bar
    Classic,
}

impl ProfileKey {
    /// Selection order used by the next/previous profile buttons
    pub const CAROUSEL: [ProfileKey; 6] = [
        ProfileKey::CreminaLever,
        ProfileKey::NineBar,
        ProfileKey::LmLeva,
        ProfileKey::Classic,
        ProfileKey::NineBarPreinfusion,
        ProfileKey::SevenBar,
    ];

    /// Resolve a profile name by exact match
    pub fn from_name(name: &str) -> Option<Self> {
        Self::CAROUSEL
            .iter()
            .copied()
            .find(|key| key.aliases().contains(&name))
    }

    /// Profile at a carousel position, wrapping out-of-range indices
    pub fn from_index(index: usize) -> Self {
        Self::CAROUSEL[index % Self::CAROUSEL.len()]
    }

    /// Carousel position of this profile
    pub fn index(&self) -> usize {
        Self::CAROUSEL
            .iter()
            .position(|key| key == self)
            .unwrap_or(0)
    }

    /// Display name
    pub const fn name(&self) -> &'static str {
        match self {
            ProfileKey::NineBar => "9Bar",
            ProfileKey::NineBarPreinfusion => "9 bar pre infusion",
            ProfileKey::SevenBar => "7 bar profile",
            ProfileKey::LmLeva => "LM Leva",
            ProfileKey::CreminaLever => "Cremina Lever",
            ProfileKey::Classic => "Classic",
        }
    }

    /// Every name that resolves to this profile
    pub const fn aliases(&self) -> &'static [&'static str] {
        match self {
            ProfileKey::NineBar => &["9 Bar Espresso", "9Bar", "9 bar profile"],
            ProfileKey::NineBarPreinfusion => &["9 bar pre infusion", "9 bar pre infusion "],
            ProfileKey::SevenBar => &["7 bar profile"],
            ProfileKey::LmLeva => &["Damian's LM Leva", "LM Leva"],
            ProfileKey::CreminaLever => &["Cremina Lever"],
            ProfileKey::Classic => &["Classic"],
        }
    }

    /// Path of the profile document, relative to the data root
    pub const fn data_file(&self) -> &'static str {
        match self {
            ProfileKey::NineBar => "data/p/9bar.json",
            ProfileKey::NineBarPreinfusion => "data/p/9barpi.json",
            ProfileKey::SevenBar => "data/p/7bar.json",
            ProfileKey::LmLeva => "data/p/lmleva.json",
            ProfileKey::CreminaLever => "data/p/lever.json",
            ProfileKey::Classic => "data/p/adapt.json",
        }
    }

    /// Stored phases (empty for profiles brewed from their document)
    pub const fn phases(&self) -> &'static [BrewPhase] {
        match self {
            ProfileKey::NineBar => NINE_BAR,
            ProfileKey::NineBarPreinfusion => NINE_BAR_PREINFUSION,
            ProfileKey::SevenBar => SEVEN_BAR,
            ProfileKey::LmLeva => LM_LEVA,
            ProfileKey::CreminaLever => &[],
            ProfileKey::Classic => CLASSIC,
        }
    }
}
