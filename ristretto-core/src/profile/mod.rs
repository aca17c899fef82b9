//! Extraction profiles
//!
//! Built-in phase tables keyed by a closed set of profile keys, plus the
//! optional per-profile documents that override brew targets.

pub mod builtin;
pub mod document;
pub mod phase;
pub mod store;

pub use builtin::ProfileKey;
pub use document::{
    parse_numeric, ProfileOverride, ProfileTargets, DURATION_FIELDS, TEMP_FIELDS,
};
pub use phase::{BrewPhase, PhaseKind};
pub use store::{load, load_key, Profile, ProfileError, MAX_LABEL_LEN, MAX_PHASES};
