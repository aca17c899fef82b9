//! Screen rendering
//!
//! Builds the brew screens for the terminal. A screen is a fixed grid of
//! text rows; rows longer than the screen width are cut off.

use core::fmt;

use heapless::String;

use ristretto_core::controller::Adjustments;
use ristretto_core::feedback::ShotFeedback;
use ristretto_core::profile::ProfileKey;
use ristretto_core::session::StopReason;
use ristretto_core::telemetry::{BrewStatus, Telemetry};

use super::format;

/// Rows per screen
pub const SCREEN_ROWS: usize = 8;

/// Characters per row
pub const SCREEN_COLS: usize = 40;

type Line = String<SCREEN_COLS>;

/// A screen buffer
pub struct Screen {
    /// Lines of text
    lines: [Line; SCREEN_ROWS],
    /// Highlighted row (menu selection)
    selected_row: Option<usize>,
}

impl Screen {
    /// Create a new empty screen
    pub const fn new() -> Self {
        Self {
            lines: [
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ],
            selected_row: None,
        }
    }

    /// Clear the screen
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.selected_row = None;
    }

    /// Set text at a specific row
    pub fn set_line(&mut self, row: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            for c in text.chars() {
                if line.push(c).is_err() {
                    break;
                }
            }
        }
    }

    /// Set the highlighted row
    pub fn set_selection(&mut self, row: usize) {
        if row < SCREEN_ROWS {
            self.selected_row = Some(row);
        }
    }

    /// Get a line of text
    pub fn get_line(&self, row: usize) -> &str {
        self.lines.get(row).map(|l| l.as_str()).unwrap_or("")
    }

    /// Get the highlighted row
    pub fn selected_row(&self) -> Option<usize> {
        self.selected_row
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Screen {
    /// Non-empty rows, one per line, the highlighted row marked with `>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let marker = if self.selected_row == Some(row) { "> " } else { "  " };
            writeln!(f, "{}{}", marker, line)?;
        }
        Ok(())
    }
}

/// Screen renderer for the brew screens
pub struct Renderer {
    screen: Screen,
}

impl Renderer {
    /// Create a new renderer
    pub const fn new() -> Self {
        Self {
            screen: Screen::new(),
        }
    }

    /// Get the current screen buffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Render the profile carousel
    ///
    /// # Arguments
    /// - `selected`: Highlighted profile, if it is a built-in one
    pub fn render_profiles(&mut self, selected: Option<ProfileKey>) {
        self.screen.clear();
        self.screen.set_line(0, "=== PROFILES ===");

        for (i, key) in ProfileKey::CAROUSEL.iter().enumerate() {
            let row = i + 1;
            self.screen.set_line(row, key.name());
            if selected == Some(*key) {
                self.screen.set_selection(row);
            }
        }
    }

    /// Render the brew settings screen
    pub fn render_settings(&mut self, label: &str, adjustments: &Adjustments) {
        self.screen.clear();
        self.screen.set_line(0, label);

        let mut line = Line::new();
        let _ = fmt::write(
            &mut line,
            format_args!("Temp {}", format::temperature(adjustments.targets.temp_c)),
        );
        self.screen.set_line(1, &line);

        line.clear();
        let _ = fmt::write(
            &mut line,
            format_args!("Time {}", format::duration(adjustments.targets.duration_s)),
        );
        self.screen.set_line(2, &line);

        line.clear();
        match adjustments.volumetric_target() {
            Some(target) => {
                let _ = fmt::write(&mut line, format_args!("Stop at {}", format::weight(target)));
            }
            None => {
                let _ = line.push_str("Volumetric off");
            }
        }
        self.screen.set_line(3, &line);

        line.clear();
        let _ = fmt::write(
            &mut line,
            format_args!("Steam {}", format::temperature(adjustments.steam_temp_c)),
        );
        self.screen.set_line(4, &line);

        line.clear();
        let _ = fmt::write(&mut line, format_args!("Grind {:.1} s", adjustments.grind_time_s));
        self.screen.set_line(5, &line);
    }

    /// Render the brewing screen
    ///
    /// # Arguments
    /// - `label`: Profile label
    /// - `status`: Phase progress of the live session
    /// - `telemetry`: Live readings
    pub fn render_brewing(&mut self, label: &str, status: &BrewStatus, telemetry: &Telemetry) {
        self.screen.clear();
        self.screen.set_line(0, label);

        if let Some(kind) = status.phase_kind {
            let mut line = Line::new();
            let _ = fmt::write(
                &mut line,
                format_args!(
                    "{} ({}/{})",
                    format::phase(status.phase_number, kind),
                    status.phase_number,
                    status.phase_count
                ),
            );
            self.screen.set_line(1, &line);
        }

        self.render_readings(telemetry, 2);

        if status.paused {
            self.screen.set_line(6, "Paused");
        }
    }

    /// Render the shot complete screen
    pub fn render_complete(
        &mut self,
        reason: StopReason,
        telemetry: &Telemetry,
        feedback: Option<&ShotFeedback>,
    ) {
        self.screen.clear();
        self.screen.set_line(0, reason.label());
        self.render_readings(telemetry, 1);

        if let Some(feedback) = feedback {
            self.screen.set_line(6, feedback.extraction);
            self.screen.set_line(7, feedback.strength);
        }
    }

    fn render_readings(&mut self, telemetry: &Telemetry, first_row: usize) {
        self.screen
            .set_line(first_row, &format::weight(telemetry.weight_g));
        self.screen
            .set_line(first_row + 1, &format::pressure(telemetry.pressure_bar));
        self.screen
            .set_line(first_row + 2, &format::temperature(telemetry.temp_c));
        self.screen
            .set_line(first_row + 3, &format::duration(telemetry.elapsed_s));
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
