//! State machine definition

use super::events::Event;

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No session; profile selection and adjustments active
    #[default]
    Idle,
    /// A session is running or paused
    Brewing,
    /// The last session ended on its own; results are on screen
    ShotComplete,
}

impl State {
    /// Check if a session is running
    pub fn is_brewing(&self) -> bool {
        matches!(self, State::Brewing)
    }

    /// Check if the previous shot's results are on display
    pub fn has_results(&self) -> bool {
        matches!(self, State::ShotComplete)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            (Idle, StartBrew) => Brewing,

            (Brewing, ShotFinished) => ShotComplete,
            (Brewing, Cancel) => Idle,

            (ShotComplete, StartBrew) => Brewing,
            (ShotComplete, SelectProfile) => Idle,
            (ShotComplete, Adjust) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
