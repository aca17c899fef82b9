//! Controller commands

/// Commands accepted by the brew controller
///
/// Each command is applied as a single atomic mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Brew button: start a shot, or stop the one in progress
    Start,
    /// Stop the shot in progress
    Cancel,
    /// Start a fresh shot on the selected profile, replacing any live one
    AcceptProfileAndStart,
    /// Select a profile by carousel position (wraps)
    SelectProfile(usize),
    /// Select the next profile
    NextProfile,
    /// Select the previous profile
    PreviousProfile,
    /// Raise the brew temperature by one step
    RaiseBrewTemp,
    /// Lower the brew temperature by one step
    LowerBrewTemp,
    /// Lengthen the brew time by one step
    RaiseBrewTime,
    /// Shorten the brew time by one step
    LowerBrewTime,
    /// Switch volumetric mode on or off
    ToggleVolumetric,
    /// Freeze the shot in progress, or resume a frozen one
    TogglePause,
    /// Raise the steam temperature by one step
    RaiseSteamTemp,
    /// Lower the steam temperature by one step
    LowerSteamTemp,
    /// Lengthen the grind time by one step
    RaiseGrindTime,
    /// Shorten the grind time by one step
    LowerGrindTime,
}

impl Command {
    /// Check if this command changes the profile selection
    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            Command::SelectProfile(_) | Command::NextProfile | Command::PreviousProfile
        )
    }

    /// Check if this command changes a brew adjustment
    pub fn is_adjustment(&self) -> bool {
        matches!(
            self,
            Command::RaiseBrewTemp
                | Command::LowerBrewTemp
                | Command::RaiseBrewTime
                | Command::LowerBrewTime
                | Command::ToggleVolumetric
                | Command::RaiseSteamTemp
                | Command::LowerSteamTemp
                | Command::RaiseGrindTime
                | Command::LowerGrindTime
        )
    }
}
