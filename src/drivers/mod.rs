//! Backlight and timer drivers.

pub mod backlight;
pub mod timer;
