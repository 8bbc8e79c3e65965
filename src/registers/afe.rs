//! Analog front-end and signal validation registers
//!
//! This module contains the three configuration registers written during
//! initialisation:
//! - AFE gain boost and power down (0x00)
//! - Noise floor level and watchdog threshold (0x01)
//! - Spike rejection, minimum strike count and statistics clear (0x02)
//!
//! These registers trade sensitivity against robustness to man-made
//! disturbers. The values depend on the installation site and are supplied
//! through [`DriverConfig`](crate::config::DriverConfig).

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// AFE gain boost register (address: 0x00)
///
/// Selects the analog front-end amplification and power state.
///
/// # Important Notes
/// - AFE_GB occupies bits 5:1, PWD bit 0
/// - Indoor operation uses gain 0x12, outdoor 0x0E
/// - The device does not detect anything while powered down
#[register(0x00u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct AfeGain {
    /// AFE gain boost (5 bits)
    pub gain: u8,
    /// Power down the sensor
    pub power_down: bool,
}

impl AfeGain {
    /// Gain boost recommended for indoor installations
    pub const INDOOR: u8 = 0x12;
    /// Gain boost recommended for outdoor installations
    pub const OUTDOOR: u8 = 0x0E;
}

impl Default for AfeGain {
    fn default() -> Self {
        Self {
            gain: Self::INDOOR,
            power_down: false,
        }
    }
}

/// Noise floor and watchdog register (address: 0x01)
///
/// # Important Notes
/// - NF_LEV occupies bits 6:4, WDTH bits 3:0
/// - A higher noise floor level tolerates noisier environments at the cost
///   of sensitivity
/// - A higher watchdog threshold rejects more disturbers
#[register(0x01u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct NoiseFloor {
    /// Noise floor level (0-7)
    pub level: u8,
    /// Watchdog threshold (0-15)
    pub watchdog: u8,
}

impl Default for NoiseFloor {
    fn default() -> Self {
        Self {
            level: 2,
            watchdog: 2,
        }
    }
}

/// Minimum number of strikes within 15 minutes before lightning is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MinStrikes {
    #[default]
    One = 0,
    Five = 1,
    Nine = 2,
    Sixteen = 3,
}

impl From<u8> for MinStrikes {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => Self::One,
            1 => Self::Five,
            2 => Self::Nine,
            _ => Self::Sixteen,
        }
    }
}

/// Lightning validation register (address: 0x02)
///
/// # Important Notes
/// - CL_STAT bit 6, MIN_NUM_LIGH bits 5:4, SREJ bits 3:0
/// - Toggling CL_STAT high-low-high clears the distance statistics
#[register(0x02u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct LightningValidation {
    /// Clear statistics bit
    pub clear_statistics: bool,
    /// Minimum number of strikes
    pub min_strikes: MinStrikes,
    /// Spike rejection (0-15)
    pub spike_rejection: u8,
}

impl Default for LightningValidation {
    fn default() -> Self {
        Self {
            clear_statistics: true,
            min_strikes: MinStrikes::One,
            spike_rejection: 2,
        }
    }
}

impl FromByteArray for AfeGain {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            gain: (bytes[0] >> 1) & 0x1F,
            power_down: bytes[0] & 0x01 != 0,
        })
    }
}

impl ToByteArray for AfeGain {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.gain & 0x1F) << 1) | self.power_down as u8])
    }
}

impl FromByteArray for NoiseFloor {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            level: (bytes[0] >> 4) & 0x07,
            watchdog: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for NoiseFloor {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.level & 0x07) << 4) | (self.watchdog & 0x0F)])
    }
}

impl FromByteArray for LightningValidation {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            clear_statistics: bytes[0] & 0x40 != 0,
            min_strikes: MinStrikes::from(bytes[0] >> 4),
            spike_rejection: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for LightningValidation {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.clear_statistics as u8) << 6)
            | ((self.min_strikes as u8) << 4)
            | (self.spike_rejection & 0x0F)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indoor_gain_encodes_as_0x24() {
        let reg = AfeGain {
            gain: AfeGain::INDOOR,
            power_down: false,
        };
        assert_eq!(reg.to_bytes(), Ok([0x24]));
    }

    #[test]
    fn outdoor_gain_encodes_as_0x1c() {
        let reg = AfeGain {
            gain: AfeGain::OUTDOOR,
            power_down: false,
        };
        assert_eq!(reg.to_bytes(), Ok([0x1C]));
    }

    #[test]
    fn noise_floor_packs_level_above_watchdog() {
        let reg = NoiseFloor {
            level: 1,
            watchdog: 2,
        };
        assert_eq!(reg.to_bytes(), Ok([0x12]));
        assert_eq!(NoiseFloor::from_bytes([0x12]), Ok(reg));
    }

    #[test]
    fn out_of_range_fields_are_masked() {
        let reg = NoiseFloor {
            level: 0xFF,
            watchdog: 0xFF,
        };
        assert_eq!(reg.to_bytes(), Ok([0x7F]));
    }

    #[test]
    fn lightning_validation_layout() {
        let reg = LightningValidation {
            clear_statistics: false,
            min_strikes: MinStrikes::Nine,
            spike_rejection: 3,
        };
        assert_eq!(reg.to_bytes(), Ok([0x23]));

        let decoded = LightningValidation::from_bytes([0xC2]).unwrap();
        assert!(decoded.clear_statistics);
        assert_eq!(decoded.min_strikes, MinStrikes::One);
        assert_eq!(decoded.spike_rejection, 2);
    }
}
