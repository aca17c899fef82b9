//! Brew screen rendering
//!
//! Text rendition of the machine's brew screens for the terminal. The
//! labels follow the formats the touchscreen uses, so simulator output can
//! be compared with the UI directly.

pub mod format;
pub mod renderer;

pub use renderer::{Renderer, Screen, SCREEN_ROWS};
