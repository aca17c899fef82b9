//! Espresso machine controller trait

/// Trait for the machine's brew controller
///
/// Implemented by the simulator and by hardware controllers so the UI can
/// drive either without knowing which one it has.
pub trait EspressoController {
    /// Start a shot on the selected profile
    fn start_brew(&mut self);

    /// Stop the shot in progress
    fn stop_brew(&mut self);

    /// Set the brew temperature target in degrees Celsius
    fn set_temperature(&mut self, temp_c: f32);

    /// Current brew temperature in degrees Celsius
    fn temperature(&self) -> f32;

    /// Current pump pressure in bar
    fn pressure(&self) -> f32;

    /// Check if a shot is in progress
    fn is_brewing(&self) -> bool;
}
