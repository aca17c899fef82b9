//! Brew session execution
//!
//! Each tick integrates the physics against the targets of the phase that
//! was active when the tick began, then evaluates the stop conditions:
//!
//! 1. Volumetric stop of the active phase, or the global target weight.
//!    Either ends the session; the sequencer does not advance.
//! 2. Timed completion of the active phase. Advancing past the last phase
//!    ends the session.
//!
//! A finished session ignores further ticks, and so does a paused one
//! until it is resumed. Halting the periodic tick is the scheduler's job.

use heapless::String;

use crate::config::SimulationConfig;
use crate::process::{Integrator, IntegratorState};
use crate::profile::{BrewPhase, PhaseKind, Profile, MAX_LABEL_LEN};
use crate::sequencer::{PhaseSequencer, PhaseTransition};
use crate::telemetry::{BrewStatus, Telemetry};

/// Cup weight that counts as the first drips (g)
pub const FIRST_DRIP_G: f32 = 0.1;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StopReason {
    /// Every phase ran to its timed limit
    PhasesComplete,
    /// The active phase's volumetric stop was reached
    VolumetricStop,
    /// The global target weight (volumetric mode) was reached
    TargetWeight,
    /// Manual cancel
    Cancelled,
}

impl StopReason {
    /// Display label
    pub const fn label(&self) -> &'static str {
        match self {
            StopReason::PhasesComplete => "Shot complete",
            StopReason::VolumetricStop => "Volumetric stop",
            StopReason::TargetWeight => "Target weight reached",
            StopReason::Cancelled => "Shot stopped",
        }
    }
}

/// Session-level options
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BrewOptions {
    /// Stop at this cup weight regardless of phase (g)
    pub target_weight_g: Option<f32>,
}

/// Events produced while a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionEvent {
    /// A new phase began
    PhaseEntered { index: usize, kind: PhaseKind },
    /// The session ended
    Finished(StopReason),
}

/// A single brew
#[derive(Debug, Clone)]
pub struct BrewSession {
    /// Profile label
    label: String<MAX_LABEL_LEN>,
    /// Phase sequencer
    sequencer: PhaseSequencer,
    /// Process integrator
    integrator: Integrator,
    /// Session options
    options: BrewOptions,
    /// Set once the session has ended
    finished: Option<StopReason>,
    /// Highest pressure seen (bar)
    peak_pressure_bar: f32,
    /// Elapsed time when the cup first registered weight (s)
    first_drip_s: Option<f32>,
    /// Ticks are ignored while set
    paused: bool,
}

impl BrewSession {
    /// Start a session on `profile`
    ///
    /// The integrator starts at `boiler_temp_c` with an empty cup. The flow
    /// rate is derived from the profile; phases with their own flow target
    /// override it. A profile without phases finishes immediately.
    pub fn start(
        profile: &Profile,
        config: SimulationConfig,
        boiler_temp_c: f32,
        options: BrewOptions,
    ) -> Self {
        let flow = profile.derived_flow_gps(config.default_flow_gps);

        let mut session = Self {
            label: profile.label.clone(),
            sequencer: PhaseSequencer::new(),
            integrator: Integrator::new(config, boiler_temp_c, flow),
            options,
            finished: None,
            peak_pressure_bar: 0.0,
            first_drip_s: None,
            paused: false,
        };

        match session.sequencer.begin(&profile.phases) {
            PhaseTransition::Entered(index) => session.enter_phase(index),
            PhaseTransition::Done => session.finished = Some(StopReason::PhasesComplete),
        }

        session
    }

    /// Advance the session by `dt_s` seconds
    ///
    /// Returns the phase change or the end of the session, if either
    /// happened on this tick.
    pub fn tick(&mut self, dt_s: f32) -> Option<SessionEvent> {
        if self.finished.is_some() || self.paused {
            return None;
        }

        let active = *self.sequencer.current_phase()?;

        self.integrator.tick(dt_s);
        let state = *self.integrator.state();
        if state.pressure_bar > self.peak_pressure_bar {
            self.peak_pressure_bar = state.pressure_bar;
        }

        let event = self.evaluate(&active, state.weight_g, dt_s);

        if self.first_drip_s.is_none() && state.weight_g >= FIRST_DRIP_G {
            self.first_drip_s = Some(self.sequencer.total_elapsed_s());
        }

        event
    }

    /// Stop conditions, then timed completion of the active phase
    fn evaluate(
        &mut self,
        active: &BrewPhase,
        weight_g: f32,
        dt_s: f32,
    ) -> Option<SessionEvent> {
        let weight_stop = if active.volumetric_reached(weight_g) {
            Some(StopReason::VolumetricStop)
        } else if self.target_weight_reached(weight_g) {
            Some(StopReason::TargetWeight)
        } else {
            None
        };

        if let Some(reason) = weight_stop {
            self.sequencer.accumulate(dt_s);
            return Some(self.finish(reason));
        }

        match self.sequencer.tick(dt_s)? {
            PhaseTransition::Entered(index) => {
                self.enter_phase(index);
                Some(SessionEvent::PhaseEntered {
                    index,
                    kind: self.sequencer.phases()[index].kind,
                })
            }
            PhaseTransition::Done => Some(self.finish(StopReason::PhasesComplete)),
        }
    }

    /// End the session by hand
    ///
    /// Discards the phase list and elapsed counters. Physical readings are
    /// left as they were. Returns `None` if the session already ended.
    pub fn cancel(&mut self) -> Option<SessionEvent> {
        if self.finished.is_some() {
            return None;
        }
        self.sequencer.cancel();
        Some(self.finish(StopReason::Cancelled))
    }

    /// Freeze or resume the shot
    ///
    /// A finished session cannot be paused.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused && self.finished.is_none();
    }

    /// Shot is frozen
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Retarget the brew temperature mid-shot
    pub fn set_target_temp(&mut self, temp_c: f32) {
        self.integrator.set_target_temp(temp_c);
    }

    /// Session has ended
    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    /// Why the session ended
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.finished
    }

    /// Profile label
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Phase sequencer
    pub fn sequencer(&self) -> &PhaseSequencer {
        &self.sequencer
    }

    /// Live physical state
    pub fn process(&self) -> &IntegratorState {
        self.integrator.state()
    }

    /// Highest pressure seen during the shot (bar)
    pub fn peak_pressure_bar(&self) -> f32 {
        self.peak_pressure_bar
    }

    /// Elapsed time when the cup first reached [`FIRST_DRIP_G`] (s)
    pub fn time_to_first_drip_s(&self) -> Option<f32> {
        self.first_drip_s
    }

    /// Current readings
    pub fn snapshot(&self) -> Telemetry {
        let state = self.integrator.state();
        Telemetry {
            pressure_bar: state.pressure_bar,
            temp_c: state.temp_c,
            weight_g: state.weight_g,
            elapsed_s: self.sequencer.total_elapsed_s(),
        }
    }

    /// Phase progress and targets for display
    pub fn status(&self) -> BrewStatus {
        let state = self.integrator.state();
        BrewStatus {
            phase_number: self.sequencer.phase_index().map(|i| i + 1).unwrap_or(0),
            phase_count: self.sequencer.phases().len(),
            phase_kind: self.sequencer.current_phase().map(|p| p.kind),
            phase_remaining_s: self.sequencer.phase_remaining_s(),
            target_pressure_bar: state.target_pressure_bar,
            target_temp_c: state.target_temp_c,
            flow_rate_gps: state.flow_rate_gps,
            stop_reason: self.finished,
            paused: self.paused,
        }
    }

    fn enter_phase(&mut self, index: usize) {
        if let Some(phase) = self.sequencer.phases().get(index).copied() {
            self.integrator.apply_phase(&phase);
        }
    }

    fn target_weight_reached(&self, weight_g: f32) -> bool {
        matches!(self.options.target_weight_g, Some(target) if target > 0.0 && weight_g >= target)
    }

    fn finish(&mut self, reason: StopReason) -> SessionEvent {
        self.finished = Some(reason);
        self.paused = false;
        SessionEvent::Finished(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::abs;
    use crate::profile::load;
    use crate::sequencer::SequencerStatus;

    fn start(profile: &Profile) -> BrewSession {
        BrewSession::start(profile, SimulationConfig::default(), 93.0, BrewOptions::default())
    }

    fn run(session: &mut BrewSession, ticks: usize, dt_s: f32) {
        for _ in 0..ticks {
            session.tick(dt_s);
        }
    }

    #[test]
    fn test_start_applies_first_phase() {
        let profile = load("LM Leva");
        let session = start(&profile);

        assert!(!session.is_finished());
        assert_eq!(session.sequencer().status(), SequencerStatus::InPhase(0));
        assert_eq!(session.process().target_pressure_bar, 1.8);
        assert_eq!(session.process().target_temp_c, 89.0);
        assert_eq!(session.snapshot().weight_g, 0.0);
    }

    #[test]
    fn test_two_phase_progression() {
        let phases = [
            BrewPhase::new(PhaseKind::Preinfusion, 2.0, 2.0, 0.0, 93.0, 0.0),
            BrewPhase::new(PhaseKind::Brew, 3.0, 9.0, 0.0, 93.0, 0.0),
        ];
        let profile = Profile::from_phases("AB", None, &phases);
        let mut session = start(&profile);

        assert_eq!(session.tick(1.0), None);
        assert_eq!(
            session.tick(1.0),
            Some(SessionEvent::PhaseEntered {
                index: 1,
                kind: PhaseKind::Brew
            })
        );
        assert_eq!(session.process().target_pressure_bar, 9.0);

        assert_eq!(session.tick(1.0), None);
        assert_eq!(session.tick(1.0), None);
        assert_eq!(
            session.tick(1.0),
            Some(SessionEvent::Finished(StopReason::PhasesComplete))
        );
        assert_eq!(session.snapshot().elapsed_s, 5.0);
    }

    #[test]
    fn test_volumetric_short_circuit() {
        let phases = [BrewPhase::new(PhaseKind::Brew, 100.0, 9.0, 2.0, 93.0, 10.0)];
        let profile = Profile::from_phases("Volumetric", None, &phases);
        let mut session = start(&profile);

        run(&mut session, 4, 1.0);
        assert!(!session.is_finished());

        assert_eq!(
            session.tick(1.0),
            Some(SessionEvent::Finished(StopReason::VolumetricStop))
        );
        let snapshot = session.snapshot();
        assert!(abs(snapshot.weight_g - 10.0) < 1e-4);
        assert_eq!(snapshot.elapsed_s, 5.0);
    }

    #[test]
    fn test_timed_and_volumetric_tie_ends_session() {
        // Both limits are met on the second tick; no phantom second phase
        let phases = [
            BrewPhase::new(PhaseKind::Brew, 2.0, 9.0, 2.0, 93.0, 4.0),
            BrewPhase::new(PhaseKind::Brew, 10.0, 6.0, 0.0, 93.0, 0.0),
        ];
        let profile = Profile::from_phases("Tie", None, &phases);
        let mut session = start(&profile);

        session.tick(1.0);
        assert_eq!(
            session.tick(1.0),
            Some(SessionEvent::Finished(StopReason::VolumetricStop))
        );
        assert_eq!(session.sequencer().phase_index(), Some(0));
        assert_eq!(session.process().target_pressure_bar, 9.0);
    }

    #[test]
    fn test_classic_end_to_end() {
        let profile = load("Classic");
        let mut session = start(&profile);
        assert!(abs(session.process().flow_rate_gps - 1.2) < 1e-6);

        run(&mut session, 30, 1.0);

        assert!(session.is_finished());
        assert!(abs(session.snapshot().weight_g - 36.0) < 1e-3);
        assert!(abs(session.snapshot().elapsed_s - 30.0) < 1e-6);
    }

    #[test]
    fn test_global_target_weight() {
        let profile = load("LM Leva");
        let options = BrewOptions {
            target_weight_g: Some(3.0),
        };
        let mut session = BrewSession::start(&profile, SimulationConfig::default(), 93.0, options);

        let mut reason = None;
        for _ in 0..100 {
            if let Some(SessionEvent::Finished(r)) = session.tick(1.0) {
                reason = Some(r);
                break;
            }
        }
        assert_eq!(reason, Some(StopReason::TargetWeight));
        assert!(session.snapshot().weight_g >= 3.0);
    }

    #[test]
    fn test_tick_after_finish_is_noop() {
        let profile = load("Classic");
        let mut session = start(&profile);
        run(&mut session, 30, 1.0);
        assert!(session.is_finished());

        let before = session.snapshot();
        assert_eq!(session.tick(1.0), None);
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_cancel() {
        let profile = load("9Bar");
        let mut session = start(&profile);
        run(&mut session, 10, 0.1);
        let weight = session.snapshot().weight_g;

        assert_eq!(
            session.cancel(),
            Some(SessionEvent::Finished(StopReason::Cancelled))
        );
        assert_eq!(session.cancel(), None);
        assert_eq!(session.stop_reason(), Some(StopReason::Cancelled));
        assert_eq!(session.sequencer().status(), SequencerStatus::Idle);
        assert_eq!(session.snapshot().elapsed_s, 0.0);

        // Readings are not rewound
        assert_eq!(session.snapshot().weight_g, weight);
        assert_eq!(session.tick(1.0), None);
    }

    #[test]
    fn test_empty_profile_finishes_immediately() {
        let profile = load("Not a profile");
        let session = start(&profile);
        assert_eq!(session.stop_reason(), Some(StopReason::PhasesComplete));
    }

    #[test]
    fn test_status_reports_phase() {
        let profile = load("7 bar profile");
        let mut session = start(&profile);
        session.tick(3.0);

        let status = session.status();
        assert_eq!(status.phase_number, 1);
        assert_eq!(status.phase_count, 3);
        assert_eq!(status.phase_kind, Some(PhaseKind::Preinfusion));
        assert_eq!(status.phase_remaining_s, 5.0);
        assert_eq!(status.target_pressure_bar, 2.0);
        assert_eq!(status.stop_reason, None);
    }

    #[test]
    fn test_peak_pressure_tracked() {
        let profile = load("LM Leva");
        let mut session = start(&profile);
        run(&mut session, 400, 0.25);
        assert!(session.peak_pressure_bar() > 7.0);
        assert!(session.peak_pressure_bar() <= 8.0);
    }
    #[test]
    fn test_two_phase_progression_short_ticks() {
        let phases = [
            BrewPhase::new(PhaseKind::Preinfusion, 2.0, 2.0, 0.0, 93.0, 0.0),
            BrewPhase::new(PhaseKind::Brew, 3.0, 9.0, 0.0, 93.0, 0.0),
        ];
        let profile = Profile::from_phases("AB", None, &phases);
        let mut session = start(&profile);

        let mut entered_at = None;
        let mut finished_at = None;
        for tick in 1..=60 {
            match session.tick(0.1) {
                Some(SessionEvent::PhaseEntered { index: 1, .. }) => entered_at = Some(tick),
                Some(SessionEvent::Finished(reason)) => {
                    assert_eq!(reason, StopReason::PhasesComplete);
                    finished_at = Some(tick);
                    break;
                }
                _ => {}
            }
        }

        assert_eq!(entered_at, Some(20));
        assert_eq!(finished_at, Some(50));
        assert_eq!(session.snapshot().elapsed_s, 5.0);
    }

    #[test]
    fn test_lm_leva_runs_to_its_total_time() {
        let profile = load("LM Leva");
        let mut session = start(&profile);

        let mut ticks = 0;
        while !session.is_finished() && ticks < 2000 {
            session.tick(0.1);
            ticks += 1;
        }

        // The 36 g stop and the final timed limit land on the same tick
        assert!(matches!(
            session.stop_reason(),
            Some(StopReason::PhasesComplete | StopReason::VolumetricStop)
        ));
        assert_eq!(ticks, 1000);
        assert_eq!(session.snapshot().elapsed_s, 100.0);
    }

    #[test]
    fn test_pause_freezes_shot() {
        let profile = load("9Bar");
        let mut session = start(&profile);
        run(&mut session, 10, 0.1);
        let before = session.snapshot();

        session.set_paused(true);
        assert!(session.is_paused());
        assert!(session.status().paused);
        for _ in 0..100 {
            assert_eq!(session.tick(0.1), None);
        }
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.sequencer().phase_index(), Some(0));

        session.set_paused(false);
        session.tick(0.1);
        let after = session.snapshot();
        assert!(after.weight_g > before.weight_g);
        assert!(abs(after.elapsed_s - 1.1) < 1e-6);
    }

    #[test]
    fn test_finished_session_cannot_pause() {
        let profile = load("Classic");
        let mut session = start(&profile);
        run(&mut session, 30, 1.0);

        session.set_paused(true);
        assert!(!session.is_paused());
    }

    #[test]
    fn test_first_drip_recorded() {
        let profile = load("Classic");
        let mut session = start(&profile);
        assert_eq!(session.time_to_first_drip_s(), None);

        run(&mut session, 3, 1.0);
        assert_eq!(session.time_to_first_drip_s(), Some(1.0));
    }
}
