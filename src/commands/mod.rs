//! Direct commands
//!
//! The AS3935 has no opcode channel: commands are issued by writing the magic
//! value [`DIRECT_COMMAND`] to a reserved register address.
//!
//! # Command Categories
//! - [`PresetDefault`]: reset every register to its power-on default
//! - [`CalibrateRco`]: calibrate the TRCO and SRCO internal oscillators
//!
//! # Important Notes
//! - Wait at least 2 ms after either command before touching the device
//! - Calibration results are read back from
//!   [`TrcoCalibration`](crate::registers::TrcoCalibration) and
//!   [`SrcoCalibration`](crate::registers::SrcoCalibration)
//! - Commands are write-only; reading their address is meaningless

mod direct;

pub use direct::*;
