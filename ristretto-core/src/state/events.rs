//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // User events
    /// A session was started for the selected profile
    StartBrew,
    /// The active session was stopped by hand
    Cancel,
    /// A different profile was selected
    SelectProfile,
    /// A brew target was adjusted
    Adjust,
    /// The active session was frozen
    Pause,
    /// A frozen session was resumed
    Resume,

    // Session events
    /// The session ended on its own (timed, volumetric or target weight)
    ShotFinished,
}

impl Event {
    /// Check if this event is user-initiated
    pub fn is_user_event(&self) -> bool {
        matches!(
            self,
            Event::StartBrew
                | Event::Cancel
                | Event::SelectProfile
                | Event::Adjust
                | Event::Pause
                | Event::Resume
        )
    }

    /// Check if this event comes from the brew session
    pub fn is_session_event(&self) -> bool {
        matches!(self, Event::ShotFinished)
    }
}
