//! Shot execution and telemetry output

use std::io::Write;

use tracing::{debug, info, warn};

use ristretto_core::controller::{BrewController, Command};
use ristretto_core::feedback::ShotFeedback;
use ristretto_core::session::{SessionEvent, StopReason};
use ristretto_core::telemetry::Telemetry;
use ristretto_core::traits::ProfileSource;

use crate::display::Renderer;
use crate::error::Result;

/// Runner options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    /// Scheduler period (ms)
    pub tick_ms: u32,
    /// Print one JSON telemetry record per tick instead of screens
    pub json: bool,
    /// Cancel shots that run longer than this (s)
    pub max_shot_s: f32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            tick_ms: ristretto_core::config::DEFAULT_TICK_MS,
            json: false,
            max_shot_s: 120.0,
        }
    }
}

impl RunOptions {
    /// Tick length in seconds
    pub fn tick_s(&self) -> f32 {
        self.tick_ms.max(1) as f32 / 1000.0
    }
}

/// Outcome of one shot
#[derive(Debug, Clone, PartialEq)]
pub struct ShotReport {
    /// Profile label
    pub profile: String,
    /// Why the shot ended
    pub stop_reason: StopReason,
    /// Final readings
    pub telemetry: Telemetry,
    /// Ticks executed
    pub ticks: u32,
    /// Shot feedback, absent for cancelled shots
    pub feedback: Option<ShotFeedback>,
}

/// Runs shots on a controller and writes their output
pub struct ShotRunner<W: Write> {
    /// Telemetry and screen output
    out: W,
    /// Runner options
    options: RunOptions,
    /// Brew screen renderer
    renderer: Renderer,
    /// Ticks executed in the current shot
    ticks: u32,
    /// Whole seconds of the last rendered brew screen
    last_rendered_s: Option<u32>,
}

impl<W: Write> ShotRunner<W> {
    /// Create a runner writing to `out`
    pub fn new(out: W, options: RunOptions) -> Self {
        Self {
            out,
            options,
            renderer: Renderer::new(),
            ticks: 0,
            last_rendered_s: None,
        }
    }

    /// Runner options
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Consume the runner and return its output
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Start a fresh shot on the selected profile
    pub fn begin<S: ProfileSource>(&mut self, ctrl: &mut BrewController<S>) -> Result<()> {
        self.ticks = 0;
        self.last_rendered_s = None;

        if !self.options.json {
            self.renderer
                .render_settings(ctrl.selected().label.as_str(), ctrl.adjustments());
            write!(self.out, "{}", self.renderer.screen())?;
        }

        ctrl.handle(Command::AcceptProfileAndStart);
        info!("Brewing {}", ctrl.selected().label);

        if let Some(status) = ctrl.status() {
            if let Some(kind) = status.phase_kind {
                info!("Phase {}: {}", status.phase_number, kind.label());
            }
        }
        Ok(())
    }

    /// Advance the shot by `dt_s` seconds
    ///
    /// Returns the stop reason once the shot has ended.
    pub fn step<S: ProfileSource>(
        &mut self,
        ctrl: &mut BrewController<S>,
        dt_s: f32,
    ) -> Result<Option<StopReason>> {
        if ctrl.session().is_none() {
            return Ok(ctrl.last_stop_reason());
        }

        let event = ctrl.tick(dt_s);
        self.ticks += 1;

        let telemetry = ctrl.telemetry();
        debug!("{}", telemetry);
        self.publish(ctrl, &telemetry)?;

        match event {
            Some(SessionEvent::PhaseEntered { index, kind }) => {
                info!("Phase {}: {}", index + 1, kind.label());
            }
            Some(SessionEvent::Finished(reason)) => {
                info!("{} after {:.1} s", reason.label(), telemetry.elapsed_s);
                return Ok(Some(reason));
            }
            None => {}
        }

        if telemetry.elapsed_s >= self.options.max_shot_s {
            warn!(
                "Shot still running after {:.0} s, stopping it",
                self.options.max_shot_s
            );
            ctrl.handle(Command::Cancel);
            return Ok(Some(StopReason::Cancelled));
        }

        Ok(None)
    }

    /// Run a shot to completion as fast as possible
    pub fn run<S: ProfileSource>(&mut self, ctrl: &mut BrewController<S>) -> Result<ShotReport> {
        self.begin(ctrl)?;
        let dt_s = self.options.tick_s();
        loop {
            if let Some(reason) = self.step(ctrl, dt_s)? {
                return self.finish(ctrl, reason);
            }
        }
    }

    /// Build the report for a finished shot and print the result screen
    pub fn finish<S: ProfileSource>(
        &mut self,
        ctrl: &BrewController<S>,
        reason: StopReason,
    ) -> Result<ShotReport> {
        let telemetry = ctrl.telemetry();
        let feedback = ctrl.last_feedback().copied();

        if !self.options.json {
            self.renderer
                .render_complete(reason, &telemetry, feedback.as_ref());
            write!(self.out, "{}", self.renderer.screen())?;
            if let Some(feedback) = &feedback {
                writeln!(self.out, "{}", feedback.message)?;
                if let Some(detail) = feedback.detail {
                    writeln!(self.out, "{}", detail)?;
                }
                if let Some(note) = feedback.roast_note {
                    writeln!(self.out, "{}", note)?;
                }
                writeln!(self.out, "{}", feedback.taste_note)?;
            }
        }
        self.out.flush()?;

        Ok(ShotReport {
            profile: ctrl.selected().label.as_str().to_owned(),
            stop_reason: reason,
            telemetry,
            ticks: self.ticks,
            feedback,
        })
    }

    fn publish<S: ProfileSource>(
        &mut self,
        ctrl: &BrewController<S>,
        telemetry: &Telemetry,
    ) -> Result<()> {
        if self.options.json {
            serde_json::to_writer(&mut self.out, telemetry)?;
            writeln!(self.out)?;
            return Ok(());
        }

        // Brew screen once per displayed second
        let second = telemetry.elapsed_s as u32;
        if self.last_rendered_s == Some(second) {
            return Ok(());
        }
        if let Some(status) = ctrl.status() {
            self.renderer
                .render_brewing(ctrl.selected().label.as_str(), &status, telemetry);
            write!(self.out, "{}", self.renderer.screen())?;
            self.last_rendered_s = Some(second);
        }
        Ok(())
    }
}
