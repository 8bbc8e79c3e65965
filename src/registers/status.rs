//! Interrupt and lightning estimation registers
//!
//! - 0x03: oscillator frequency division, disturber mask and interrupt reason
//! - 0x07: distance estimation
//!
//! Reading 0x03 acknowledges the interrupt; the IRQ pin drops once the reason
//! has been read.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::event::Distance;

/// Interrupt control register (address: 0x03)
///
/// Holds both configuration (LCO_FDIV, MASK_DIST) and the read-only
/// interrupt reason. The raw byte is kept so a read-modify-write preserves
/// every bit the caller does not touch.
///
/// # Register Layout
/// - Bits 7:6: LCO_FDIV, antenna oscillator division ratio (16, 32, 64, 128)
/// - Bit 5: MASK_DIST, suppress disturber interrupts
/// - Bit 4: reserved
/// - Bits 3:0: INT, interrupt reason
#[register(0x03u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct InterruptControl {
    raw: u8,
}

impl InterruptControl {
    pub const ADDRESS: u8 = 0x03;

    const FDIV_SHIFT: u8 = 6;
    const MASK_DIST: u8 = 1 << 5;
    const REASON_MASK: u8 = 0x0F;

    /// Wraps a raw register value.
    pub fn from_raw(raw: u8) -> Self {
        Self { raw }
    }

    /// Raw register value.
    pub fn raw(self) -> u8 {
        self.raw
    }

    /// Interrupt reason nibble.
    pub fn reason(self) -> u8 {
        self.raw & Self::REASON_MASK
    }

    pub fn masks_disturbers(self) -> bool {
        self.raw & Self::MASK_DIST != 0
    }

    /// Sets or clears MASK_DIST, preserving every other bit.
    pub fn with_masked_disturbers(self, masked: bool) -> Self {
        if masked {
            Self::from_raw(self.raw | Self::MASK_DIST)
        } else {
            Self::from_raw(self.raw & !Self::MASK_DIST)
        }
    }

    /// LCO_FDIV field (0-3).
    pub fn frequency_division(self) -> u8 {
        self.raw >> Self::FDIV_SHIFT
    }

    /// Replaces LCO_FDIV, preserving every other bit. `division` is masked to 2 bits.
    pub fn with_frequency_division(self, division: u8) -> Self {
        let cleared = self.raw & !(0x03 << Self::FDIV_SHIFT);
        Self::from_raw(cleared | ((division & 0x03) << Self::FDIV_SHIFT))
    }
}

/// Distance estimation register (address: 0x07)
///
/// # Important Notes
/// - DISTANCE occupies bits 5:0
/// - 0x3F means the storm is out of range (beyond ~40 km)
/// - 0x01 means the storm is overhead
#[register(0x07u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct DistanceEstimate {
    /// Raw 6-bit estimate
    pub raw: u8,
}

impl DistanceEstimate {
    /// Raw value reported when the storm is out of range
    pub const OUT_OF_RANGE: u8 = 0x3F;

    /// Interpreted distance.
    pub fn distance(self) -> Distance {
        Distance::from_raw(self.raw)
    }
}

impl FromByteArray for InterruptControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { raw: bytes[0] })
    }
}

impl ToByteArray for InterruptControl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.raw])
    }
}

impl FromByteArray for DistanceEstimate {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            raw: bytes[0] & 0x3F,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masking_disturbers_preserves_other_bits() {
        let reg = InterruptControl::from_raw(0b1001_0110).with_masked_disturbers(true);
        assert_eq!(reg.raw(), 0b1011_0110);
        assert!(reg.masks_disturbers());
        assert_eq!(reg.with_masked_disturbers(false).raw(), 0b1001_0110);
    }

    #[test]
    fn frequency_division_replaces_top_bits_only() {
        let reg = InterruptControl::from_raw(0b1011_1111).with_frequency_division(1);
        assert_eq!(reg.raw(), 0b0111_1111);
        assert_eq!(reg.frequency_division(), 1);
    }

    #[test]
    fn reason_is_low_nibble() {
        assert_eq!(InterruptControl::from_raw(0xE8).reason(), 0x08);
    }

    #[test]
    fn distance_ignores_top_bits() {
        let reg = DistanceEstimate::from_bytes([0xC5]).unwrap();
        assert_eq!(reg.raw, 0x05);
        assert_eq!(reg.distance(), Distance::Kilometers(5));

        let reg = DistanceEstimate::from_bytes([0xFF]).unwrap();
        assert_eq!(reg.distance(), Distance::OutOfRange);
    }
}
