//! Phase execution
//!
//! Tracks the active phase of a brew session and its elapsed time.
//! Elapsed time is counted in whole microseconds so that many short ticks
//! add up to a phase duration exactly. Volumetric completion depends on
//! live weight and is evaluated by the session, not here.

use heapless::Vec;

use crate::math::{micros, seconds};
use crate::profile::{BrewPhase, MAX_PHASES};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sequencer status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SequencerStatus {
    /// No phase list loaded
    Idle,
    /// Executing the phase at this index
    InPhase(usize),
    /// Every phase consumed
    Done,
}

/// Result of leaving a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseTransition {
    /// Entered the phase at this index
    Entered(usize),
    /// No phases left
    Done,
}

/// Phase sequencer
///
/// One instance per brew session. The phase list is copied in at
/// [`begin`](Self::begin) and discarded on [`cancel`](Self::cancel).
#[derive(Debug, Clone)]
pub struct PhaseSequencer {
    /// Phases of the active profile
    phases: Vec<BrewPhase, MAX_PHASES>,
    /// Current status
    status: SequencerStatus,
    /// Time spent in the current phase (µs)
    phase_elapsed_us: u64,
    /// Time since the session began (µs)
    total_elapsed_us: u64,
}

impl Default for PhaseSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseSequencer {
    /// Create an idle sequencer
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            status: SequencerStatus::Idle,
            phase_elapsed_us: 0,
            total_elapsed_us: 0,
        }
    }

    /// Load a phase list and enter its first phase
    ///
    /// An empty list goes straight to `Done`.
    pub fn begin(&mut self, phases: &[BrewPhase]) -> PhaseTransition {
        self.cancel();
        for phase in phases.iter().take(MAX_PHASES) {
            let _ = self.phases.push(*phase);
        }
        self.advance()
    }

    /// Move to the next phase
    pub fn advance(&mut self) -> PhaseTransition {
        let next = match self.status {
            SequencerStatus::Idle => 0,
            SequencerStatus::InPhase(index) => index + 1,
            SequencerStatus::Done => return PhaseTransition::Done,
        };

        self.phase_elapsed_us = 0;

        if next < self.phases.len() {
            self.status = SequencerStatus::InPhase(next);
            PhaseTransition::Entered(next)
        } else {
            self.status = SequencerStatus::Done;
            PhaseTransition::Done
        }
    }

    /// Accumulate elapsed time without checking the timed limit
    pub fn accumulate(&mut self, dt_s: f32) {
        if let SequencerStatus::InPhase(_) = self.status {
            let dt_us = micros(dt_s);
            self.phase_elapsed_us = self.phase_elapsed_us.saturating_add(dt_us);
            self.total_elapsed_us = self.total_elapsed_us.saturating_add(dt_us);
        }
    }

    /// Accumulate elapsed time and advance if the phase has timed out
    ///
    /// Returns the transition when one occurred.
    pub fn tick(&mut self, dt_s: f32) -> Option<PhaseTransition> {
        self.accumulate(dt_s);

        let phase = self.current_phase()?;
        if phase.timed_out(self.phase_elapsed_us) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Return to idle, discarding the phase list and counters
    pub fn cancel(&mut self) {
        self.phases.clear();
        self.status = SequencerStatus::Idle;
        self.phase_elapsed_us = 0;
        self.total_elapsed_us = 0;
    }

    /// Current status
    pub fn status(&self) -> SequencerStatus {
        self.status
    }

    /// All phases consumed
    pub fn is_done(&self) -> bool {
        self.status == SequencerStatus::Done
    }

    /// Index of the active phase
    pub fn phase_index(&self) -> Option<usize> {
        match self.status {
            SequencerStatus::InPhase(index) => Some(index),
            _ => None,
        }
    }

    /// Active phase
    pub fn current_phase(&self) -> Option<&BrewPhase> {
        self.phases.get(self.phase_index()?)
    }

    /// Loaded phases
    pub fn phases(&self) -> &[BrewPhase] {
        &self.phases
    }

    /// Time spent in the current phase (s)
    pub fn phase_elapsed_s(&self) -> f32 {
        seconds(self.phase_elapsed_us)
    }

    /// Time since the session began (s)
    pub fn total_elapsed_s(&self) -> f32 {
        seconds(self.total_elapsed_us)
    }

    /// Time left in the current phase (s), zero for untimed phases
    pub fn phase_remaining_s(&self) -> f32 {
        match self.current_phase() {
            Some(phase) if phase.is_timed() => {
                seconds(phase.duration_us().saturating_sub(self.phase_elapsed_us))
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::PhaseKind;

    fn timed(duration_s: f32) -> BrewPhase {
        BrewPhase::new(PhaseKind::Brew, duration_s, 9.0, 0.0, 93.0, 0.0)
    }

    #[test]
    fn test_sequencer_creation() {
        let seq = PhaseSequencer::new();
        assert_eq!(seq.status(), SequencerStatus::Idle);
        assert!(seq.current_phase().is_none());
        assert_eq!(seq.total_elapsed_s(), 0.0);
    }

    #[test]
    fn test_begin_enters_first_phase() {
        let mut seq = PhaseSequencer::new();
        let transition = seq.begin(&[timed(2.0), timed(3.0)]);

        assert_eq!(transition, PhaseTransition::Entered(0));
        assert_eq!(seq.status(), SequencerStatus::InPhase(0));
        assert_eq!(seq.current_phase(), Some(&timed(2.0)));
    }

    #[test]
    fn test_begin_empty_is_done() {
        let mut seq = PhaseSequencer::new();
        assert_eq!(seq.begin(&[]), PhaseTransition::Done);
        assert!(seq.is_done());
    }

    #[test]
    fn test_phase_progression() {
        let mut seq = PhaseSequencer::new();
        seq.begin(&[timed(2.0), timed(3.0)]);

        assert_eq!(seq.tick(1.0), None);
        assert_eq!(seq.tick(1.0), Some(PhaseTransition::Entered(1)));
        assert_eq!(seq.phase_elapsed_s(), 0.0);
        assert_eq!(seq.total_elapsed_s(), 2.0);

        assert_eq!(seq.tick(1.0), None);
        assert_eq!(seq.tick(1.0), None);
        assert_eq!(seq.tick(1.0), Some(PhaseTransition::Done));
        assert!(seq.is_done());
        assert_eq!(seq.total_elapsed_s(), 5.0);
    }

    #[test]
    fn test_phase_progression_short_ticks() {
        let mut seq = PhaseSequencer::new();
        seq.begin(&[timed(2.0), timed(3.0)]);

        let mut transitions = [None; 2];
        let mut found = 0;
        for tick in 1..=60 {
            if seq.tick(0.1).is_some() {
                transitions[found] = Some(tick);
                found += 1;
                if seq.is_done() {
                    break;
                }
            }
        }

        assert_eq!(transitions, [Some(20), Some(50)]);
        assert_eq!(seq.total_elapsed_s(), 5.0);
    }

    #[test]
    fn test_untimed_phase_never_times_out() {
        let mut seq = PhaseSequencer::new();
        seq.begin(&[timed(0.0)]);

        for _ in 0..1000 {
            assert_eq!(seq.tick(1.0), None);
        }
        assert_eq!(seq.status(), SequencerStatus::InPhase(0));
        assert_eq!(seq.phase_remaining_s(), 0.0);
    }

    #[test]
    fn test_tick_when_done_is_noop() {
        let mut seq = PhaseSequencer::new();
        seq.begin(&[timed(1.0)]);
        assert_eq!(seq.tick(1.0), Some(PhaseTransition::Done));

        assert_eq!(seq.tick(1.0), None);
        assert_eq!(seq.total_elapsed_s(), 1.0);
        assert_eq!(seq.advance(), PhaseTransition::Done);
    }

    #[test]
    fn test_negative_dt_ignored() {
        let mut seq = PhaseSequencer::new();
        seq.begin(&[timed(5.0)]);
        seq.tick(-3.0);
        assert_eq!(seq.total_elapsed_s(), 0.0);
    }

    #[test]
    fn test_cancel_idempotent() {
        let mut seq = PhaseSequencer::new();
        seq.begin(&[timed(5.0)]);
        seq.tick(2.0);

        seq.cancel();
        assert_eq!(seq.status(), SequencerStatus::Idle);
        assert!(seq.phases().is_empty());
        assert_eq!(seq.phase_elapsed_s(), 0.0);
        assert_eq!(seq.total_elapsed_s(), 0.0);

        seq.cancel();
        assert_eq!(seq.status(), SequencerStatus::Idle);
        assert_eq!(seq.total_elapsed_s(), 0.0);
    }

    #[test]
    fn test_phase_remaining() {
        let mut seq = PhaseSequencer::new();
        seq.begin(&[timed(5.0)]);
        seq.tick(1.5);
        assert_eq!(seq.phase_remaining_s(), 3.5);
    }
}
