//! Display label formatting

use core::fmt::Write;

use heapless::String;

use ristretto_core::profile::PhaseKind;

/// Capacity of a single label
pub const LABEL_LEN: usize = 24;

/// Short text label
pub type Label = String<LABEL_LEN>;

fn label(args: core::fmt::Arguments<'_>) -> Label {
    let mut out = Label::new();
    // Labels that do not fit are cut short
    let _ = out.write_fmt(args);
    out
}

/// Cup weight, e.g. `36.0 g`
pub fn weight(weight_g: f32) -> Label {
    label(format_args!("{:.1} g", weight_g))
}

/// Pump pressure, e.g. `9.0 bar`
pub fn pressure(pressure_bar: f32) -> Label {
    label(format_args!("{:.1} bar", pressure_bar))
}

/// Temperature, e.g. `93.0°C`
pub fn temperature(temp_c: f32) -> Label {
    label(format_args!("{:.1}°C", temp_c))
}

/// Elapsed or target time as `m:ss`
pub fn duration(seconds: f32) -> Label {
    let total = if seconds > 0.0 { seconds as u32 } else { 0 };
    label(format_args!("{}:{:02}", total / 60, total % 60))
}

/// Active phase, e.g. `Phase 2: Brew`
pub fn phase(number: usize, kind: PhaseKind) -> Label {
    label(format_args!("Phase {}: {}", number, kind.label()))
}
