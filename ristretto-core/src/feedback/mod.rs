//! Shot feedback
//!
//! Grades a finished shot against its recipe on two axes, extraction
//! (time) and strength (brew ratio), and suggests a correction.

pub mod shot;

pub use shot::{
    shot_feedback, AdvancedShotMetrics, FeedbackOptions, RoastLevel, Severity, ShotFeedback,
    ShotSummary, TASTE_NOTE,
};
