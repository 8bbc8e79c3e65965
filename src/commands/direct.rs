use core::convert::Infallible;

use regiface::{register, ToByteArray, WritableRegister};

/// Value that triggers a direct command when written to a command address.
pub const DIRECT_COMMAND: u8 = 0x96;

/// PRESET_DEFAULT command (address: 0x3C)
///
/// Sets all registers to their default values.
#[register(0x3Cu8)]
#[derive(Debug, Clone, Copy, Default, WritableRegister)]
pub struct PresetDefault;

/// CALIB_RCO command (address: 0x3D)
///
/// Calibrates the TRCO against the antenna's LCO and the SRCO against the
/// TRCO.
///
/// # Important Notes
/// - The antenna must be connected for TRCO calibration to succeed
/// - Powering up the device after power down requires a new calibration
#[register(0x3Du8)]
#[derive(Debug, Clone, Copy, Default, WritableRegister)]
pub struct CalibrateRco;

impl ToByteArray for PresetDefault {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([DIRECT_COMMAND])
    }
}

impl ToByteArray for CalibrateRco {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([DIRECT_COMMAND])
    }
}
