//! Oscillator calibration and antenna tuning registers
//!
//! The AS3935 runs three internal oscillators:
//! - LCO: the antenna's resonant circuit, nominally 500 kHz
//! - SRCO: system RC oscillator, 1.1 MHz
//! - TRCO: timer RC oscillator, 32.768 kHz
//!
//! SRCO and TRCO are calibrated by the `CALIB_RCO` direct command; their
//! result is reported in 0x3A/0x3B. The LCO is matched to 500 kHz by adding
//! internal tuning capacitance. Any oscillator can be routed to the IRQ pin
//! for measurement with an external frequency counter.

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

bitflags! {
    /// Oscillators routed to the IRQ pin
    ///
    /// Only one oscillator should be displayed at a time. The IRQ pin does
    /// not report interrupts while any display bit is set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DisplayFlags: u8 {
        /// Antenna LC oscillator
        const LCO = 1 << 7;
        /// System RC oscillator
        const SRCO = 1 << 6;
        /// Timer RC oscillator
        const TRCO = 1 << 5;
    }
}

bitflags! {
    /// RCO calibration result bits shared by 0x3A and 0x3B
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CalibrationFlags: u8 {
        /// Calibration completed successfully
        const DONE = 1 << 7;
        /// Calibration was unsuccessful
        const NOK = 1 << 6;
    }
}

/// Oscillator display and tuning register (address: 0x08)
///
/// # Register Layout
/// - Bit 7: DISP_LCO
/// - Bit 6: DISP_SRCO
/// - Bit 5: DISP_TRCO
/// - Bit 4: reserved, preserved on write
/// - Bits 3:0: TUN_CAP, internal tuning capacitance in 8 pF steps (0-120 pF)
#[register(0x08u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct TuningControl {
    /// Oscillators displayed on the IRQ pin
    pub display: DisplayFlags,
    /// Tuning capacitance code (0-15)
    pub capacitance: u8,
    reserved: u8,
}

impl TuningControl {
    pub const ADDRESS: u8 = 0x08;

    /// Routes the LCO to the IRQ pin, or stops doing so. Other bits are kept.
    pub fn with_lco_displayed(self, displayed: bool) -> Self {
        let mut display = self.display;
        display.set(DisplayFlags::LCO, displayed);
        Self { display, ..self }
    }

    /// Replaces TUN_CAP, masked to 4 bits. Other bits are kept.
    pub fn with_capacitance(self, capacitance: u8) -> Self {
        Self {
            capacitance: capacitance & 0x0F,
            ..self
        }
    }

    /// Raw register value.
    pub fn raw(self) -> u8 {
        self.display.bits() | self.reserved | (self.capacitance & 0x0F)
    }
}

/// TRCO calibration status (address: 0x3A)
#[register(0x3Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct TrcoCalibration {
    pub status: CalibrationFlags,
}

/// SRCO calibration status (address: 0x3B)
#[register(0x3Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct SrcoCalibration {
    pub status: CalibrationFlags,
}

impl TrcoCalibration {
    pub fn is_done(&self) -> bool {
        self.status.contains(CalibrationFlags::DONE)
    }
}

impl SrcoCalibration {
    pub fn is_done(&self) -> bool {
        self.status.contains(CalibrationFlags::DONE)
    }
}

impl FromByteArray for TuningControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            display: DisplayFlags::from_bits_truncate(bytes[0]),
            capacitance: bytes[0] & 0x0F,
            reserved: bytes[0] & 0x10,
        })
    }
}

impl ToByteArray for TuningControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.raw()])
    }
}

impl FromByteArray for TrcoCalibration {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            status: CalibrationFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl FromByteArray for SrcoCalibration {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            status: CalibrationFlags::from_bits_retain(bytes[0]),
        })
    }
}
