//! Brew controller implementation

use crate::config::{AdjustmentLimits, BrewConfig, SimulationConfig};
use crate::feedback::{
    shot_feedback, AdvancedShotMetrics, FeedbackOptions, ShotFeedback, ShotSummary,
};
use crate::profile::{load, load_key, Profile, ProfileKey, ProfileTargets};
use crate::session::{BrewOptions, BrewSession, SessionEvent, StopReason};
use crate::state::{Event, State};
use crate::telemetry::{BrewStatus, Telemetry};
use crate::traits::{EspressoController, ProfileSource};

use super::commands::Command;

/// Brew adjustments shown on the brew screen
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Adjustments {
    /// Brew temperature and time
    pub targets: ProfileTargets,
    /// Volumetric mode
    pub volumetric: bool,
    /// Target yield in volumetric mode (g)
    pub target_weight_g: f32,
    /// Steam temperature (°C)
    pub steam_temp_c: f32,
    /// Grinder run time (s)
    pub grind_time_s: f32,
}

impl Adjustments {
    /// Target weight to stop at, if volumetric mode is on
    pub fn volumetric_target(&self) -> Option<f32> {
        if self.volumetric && self.target_weight_g > 0.0 {
            Some(self.target_weight_g)
        } else {
            None
        }
    }
}

/// Controller coordinating selection, adjustments and the live session
pub struct BrewController<S: ProfileSource> {
    /// Profile document reader
    source: S,
    /// Simulation tuning
    sim: SimulationConfig,
    /// Adjustment steps and limits
    limits: AdjustmentLimits,
    /// Shot defaults
    brew: BrewConfig,
    /// Current state
    state: State,
    /// Selected profile
    selected: Profile,
    /// Current adjustments
    adjustments: Adjustments,
    /// Temperature carried between shots (°C)
    boiler_temp_c: f32,
    /// Live session
    session: Option<BrewSession>,
    /// Recipe of the live session, completed at its end
    recipe: ShotSummary,
    /// Last published telemetry
    last_telemetry: Telemetry,
    /// Why the last session ended
    last_stop: Option<StopReason>,
    /// Recipe and result of the last session
    last_shot: Option<ShotSummary>,
    /// Feedback on the last session that ended on its own
    last_feedback: Option<ShotFeedback>,
}

impl<S: ProfileSource> BrewController<S> {
    /// Create an idle controller
    ///
    /// The first carousel profile is selected; adjustments start from
    /// `brew` until a profile is selected explicitly.
    pub fn new(
        source: S,
        sim: SimulationConfig,
        limits: AdjustmentLimits,
        brew: BrewConfig,
    ) -> Self {
        Self {
            source,
            sim,
            limits,
            brew,
            state: State::Idle,
            selected: load_key(ProfileKey::CAROUSEL[0]),
            adjustments: Adjustments {
                targets: ProfileTargets {
                    temp_c: limits.clamp_temp(brew.target_temp_c),
                    duration_s: limits.clamp_time(brew.brew_time_s),
                },
                volumetric: brew.volumetric,
                target_weight_g: brew.target_weight_g,
                steam_temp_c: limits.clamp_steam(brew.steam_temp_c),
                grind_time_s: limits.clamp_grind(brew.grind_time_s),
            },
            boiler_temp_c: sim.boiler_temp_c,
            session: None,
            recipe: ShotSummary::default(),
            last_telemetry: Telemetry {
                temp_c: sim.boiler_temp_c,
                ..Default::default()
            },
            last_stop: None,
            last_shot: None,
            last_feedback: None,
        }
    }

    /// Get current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Selected profile
    pub fn selected(&self) -> &Profile {
        &self.selected
    }

    /// Current adjustments
    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    /// Temperature the next session starts at (°C)
    pub fn boiler_temp_c(&self) -> f32 {
        self.boiler_temp_c
    }

    /// Live session is frozen
    pub fn is_paused(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_paused())
    }

    /// Live session
    pub fn session(&self) -> Option<&BrewSession> {
        self.session.as_ref()
    }

    /// Why the last session ended
    pub fn last_stop_reason(&self) -> Option<StopReason> {
        self.last_stop
    }

    /// Recipe and result of the last session
    pub fn last_shot(&self) -> Option<&ShotSummary> {
        self.last_shot.as_ref()
    }

    /// Feedback on the last session, absent for cancelled shots
    pub fn last_feedback(&self) -> Option<&ShotFeedback> {
        self.last_feedback.as_ref()
    }

    /// Document source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Live readings, or the last published ones when idle
    pub fn telemetry(&self) -> Telemetry {
        match &self.session {
            Some(session) => session.snapshot(),
            None => self.last_telemetry,
        }
    }

    /// Phase progress of the live session
    pub fn status(&self) -> Option<BrewStatus> {
        self.session.as_ref().map(|s| s.status())
    }

    /// Select a profile by name
    ///
    /// Unknown names are kept as a profile without phases; starting it
    /// brews a single phase built from the adjustments.
    pub fn select_name(&mut self, name: &str) {
        self.selected = load(name);
        self.apply_document();
        self.transition(Event::SelectProfile);
    }

    /// Select a built-in profile
    pub fn select(&mut self, key: ProfileKey) {
        self.selected = load_key(key);
        self.apply_document();
        self.transition(Event::SelectProfile);
    }

    /// Process a command
    ///
    /// Returns the state machine event it produced, if any.
    pub fn handle(&mut self, command: Command) -> Option<Event> {
        match command {
            Command::Start => {
                if self.session.is_some() {
                    self.cancel().map(|_| Event::Cancel)
                } else {
                    self.start_session();
                    Some(Event::StartBrew)
                }
            }
            Command::Cancel => self.cancel().map(|_| Event::Cancel),
            Command::AcceptProfileAndStart => {
                self.session = None;
                self.start_session();
                Some(Event::StartBrew)
            }
            Command::SelectProfile(index) => {
                self.select(ProfileKey::from_index(index));
                Some(Event::SelectProfile)
            }
            Command::NextProfile => {
                self.select(ProfileKey::from_index(self.selected_index() + 1));
                Some(Event::SelectProfile)
            }
            Command::PreviousProfile => {
                let len = ProfileKey::CAROUSEL.len();
                self.select(ProfileKey::from_index(self.selected_index() + len - 1));
                Some(Event::SelectProfile)
            }
            Command::RaiseBrewTemp => {
                let temp = self.adjustments.targets.temp_c + self.limits.temp_step_c;
                self.set_brew_temp(temp);
                Some(self.adjusted())
            }
            Command::LowerBrewTemp => {
                let temp = self.adjustments.targets.temp_c - self.limits.temp_step_c;
                self.set_brew_temp(temp);
                Some(self.adjusted())
            }
            Command::RaiseBrewTime => {
                let time = self.adjustments.targets.duration_s + self.limits.time_step_s;
                self.adjustments.targets.duration_s = self.limits.clamp_time(time);
                Some(self.adjusted())
            }
            Command::LowerBrewTime => {
                let time = self.adjustments.targets.duration_s - self.limits.time_step_s;
                self.adjustments.targets.duration_s = self.limits.clamp_time(time);
                Some(self.adjusted())
            }
            Command::ToggleVolumetric => {
                self.adjustments.volumetric = !self.adjustments.volumetric;
                Some(self.adjusted())
            }
            Command::TogglePause => {
                let session = self.session.as_mut()?;
                let paused = !session.is_paused();
                session.set_paused(paused);
                let event = if paused { Event::Pause } else { Event::Resume };
                self.transition(event);
                Some(event)
            }
            Command::RaiseSteamTemp => {
                let temp = self.adjustments.steam_temp_c + self.limits.steam_step_c;
                self.adjustments.steam_temp_c = self.limits.clamp_steam(temp);
                Some(self.adjusted())
            }
            Command::LowerSteamTemp => {
                let temp = self.adjustments.steam_temp_c - self.limits.steam_step_c;
                self.adjustments.steam_temp_c = self.limits.clamp_steam(temp);
                Some(self.adjusted())
            }
            Command::RaiseGrindTime => {
                let time = self.adjustments.grind_time_s + self.limits.grind_step_s;
                self.adjustments.grind_time_s = self.limits.clamp_grind(time);
                Some(self.adjusted())
            }
            Command::LowerGrindTime => {
                let time = self.adjustments.grind_time_s - self.limits.grind_step_s;
                self.adjustments.grind_time_s = self.limits.clamp_grind(time);
                Some(self.adjusted())
            }
        }
    }

    /// Periodic tick update
    ///
    /// Call this at the scheduler period with the elapsed time in seconds.
    /// When the session ends its final readings are kept and the session
    /// is dropped.
    pub fn tick(&mut self, dt_s: f32) -> Option<SessionEvent> {
        let session = self.session.as_mut()?;
        let event = session.tick(dt_s)?;

        if let SessionEvent::Finished(reason) = event {
            let telemetry = session.snapshot();
            let metrics = shot_metrics(session);
            self.finish(reason, telemetry, metrics);
        }

        Some(event)
    }

    /// Stop the live session
    ///
    /// Returns `None` when no session is running.
    pub fn cancel(&mut self) -> Option<SessionEvent> {
        let mut session = self.session.take()?;
        let telemetry = session.snapshot();
        let metrics = shot_metrics(&session);
        session.cancel();
        Some(self.finish(StopReason::Cancelled, telemetry, metrics))
    }

    fn selected_index(&self) -> usize {
        self.selected.key.map(|key| key.index()).unwrap_or(0)
    }

    fn apply_document(&mut self) {
        let key = self.selected.key;
        let document = self
            .selected
            .data_file()
            .and_then(|path| self.source.read_override(path));

        let targets = match document {
            Some(document) => document.apply(self.adjustments.targets),
            None => ProfileTargets::defaults_for(key),
        };
        self.adjustments.targets = ProfileTargets {
            temp_c: self.limits.clamp_temp(targets.temp_c),
            duration_s: self.limits.clamp_time(targets.duration_s),
        };
    }

    fn set_brew_temp(&mut self, temp_c: f32) {
        let temp_c = self.limits.clamp_temp(temp_c);
        self.adjustments.targets.temp_c = temp_c;
        if let Some(session) = self.session.as_mut() {
            session.set_target_temp(temp_c);
        }
    }

    fn adjusted(&mut self) -> Event {
        self.transition(Event::Adjust);
        Event::Adjust
    }

    fn start_session(&mut self) {
        let target_weight = self.adjustments.volumetric_target();
        let profile = if self.selected.is_empty() {
            Profile::substitute(
                self.selected.label.as_str(),
                self.selected.key,
                self.adjustments.targets,
                self.sim.default_pressure_bar,
                target_weight,
            )
        } else {
            self.selected.clone()
        };

        let profile_yield = profile.total_volumetric_g();
        let profile_time = profile.total_duration_s();
        self.recipe = ShotSummary {
            dose_g: Some(self.brew.dose_g),
            target_yield_g: target_weight.or((profile_yield > 0.0).then_some(profile_yield)),
            actual_yield_g: None,
            target_time_s: (profile_time > 0.0).then_some(profile_time),
            actual_time_s: None,
            target_ratio: None,
            has_scale: true,
            roast: self.brew.roast,
        };

        let options = BrewOptions {
            target_weight_g: target_weight,
        };
        let session = BrewSession::start(&profile, self.sim, self.boiler_temp_c, options);
        let finished = session.stop_reason();
        let telemetry = session.snapshot();
        self.session = Some(session);
        self.transition(Event::StartBrew);

        if let Some(reason) = finished {
            self.session = None;
            self.finish(reason, telemetry, AdvancedShotMetrics::default());
        }
    }

    fn finish(
        &mut self,
        reason: StopReason,
        telemetry: Telemetry,
        metrics: AdvancedShotMetrics,
    ) -> SessionEvent {
        self.session = None;
        self.last_telemetry = telemetry;
        self.boiler_temp_c = telemetry.temp_c;
        self.last_stop = Some(reason);

        let summary = ShotSummary {
            actual_yield_g: Some(telemetry.weight_g),
            actual_time_s: Some(telemetry.elapsed_s),
            ..self.recipe
        };
        self.last_shot = Some(summary);

        self.last_feedback = if reason == StopReason::Cancelled {
            None
        } else {
            let options = FeedbackOptions {
                roast_tips: self.brew.roast_tips,
            };
            shot_feedback(&summary, Some(&metrics), options)
        };

        let event = if reason == StopReason::Cancelled {
            Event::Cancel
        } else {
            Event::ShotFinished
        };
        self.transition(event);

        SessionEvent::Finished(reason)
    }

    /// Perform state transition
    fn transition(&mut self, event: Event) {
        self.state = self.state.transition(event);
    }
}

/// Measurements of a session for shot feedback
fn shot_metrics(session: &BrewSession) -> AdvancedShotMetrics {
    AdvancedShotMetrics {
        peak_pressure_bar: Some(session.peak_pressure_bar()),
        time_to_first_drip_s: session.time_to_first_drip_s(),
        suspected_channeling: false,
    }
}

impl<S: ProfileSource> EspressoController for BrewController<S> {
    fn start_brew(&mut self) {
        if self.session.is_none() {
            self.start_session();
        }
    }

    fn stop_brew(&mut self) {
        self.cancel();
    }

    fn set_temperature(&mut self, temp_c: f32) {
        self.set_brew_temp(temp_c);
    }

    fn temperature(&self) -> f32 {
        self.telemetry().temp_c
    }

    fn pressure(&self) -> f32 {
        self.telemetry().pressure_bar
    }

    fn is_brewing(&self) -> bool {
        self.session.is_some()
    }
}
