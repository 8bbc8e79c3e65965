//! Register definitions for the AS3935
//! Generated from the AS3935 Franklin Lightning Sensor IC datasheet v1-04

mod afe;
mod oscillator;
mod status;

pub use afe::*;
pub use oscillator::*;
pub use status::*;
