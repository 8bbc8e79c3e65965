//! Interrupt events
//!
//! The AS3935 reports why it raised IRQ in the low nibble of register 0x03.
//! Exactly one bit is expected to be set; anything else is treated as an
//! unknown event and counted as a disturber.

use core::fmt;

/// Noise level too high (INT_NH)
pub const REASON_NOISE_HIGH: u8 = 0x01;
/// Disturber detected (INT_D)
pub const REASON_DISTURBER: u8 = 0x04;
/// Lightning detected (INT_L)
pub const REASON_LIGHTNING: u8 = 0x08;

/// Interrupt reason as decoded from the INT field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reason {
    NoiseHigh,
    Disturber,
    Lightning,
    /// Any other bit pattern, carrying the raw nibble
    Unknown(u8),
}

impl Reason {
    /// Decodes the INT field. Only the low nibble is considered.
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0x0F {
            REASON_NOISE_HIGH => Self::NoiseHigh,
            REASON_DISTURBER => Self::Disturber,
            REASON_LIGHTNING => Self::Lightning,
            other => Self::Unknown(other),
        }
    }
}

/// Estimated distance to the head of the storm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Distance {
    /// Storm beyond the sensor's range
    OutOfRange,
    Kilometers(u8),
}

impl Distance {
    /// Interprets a raw DISTANCE value; only bits 5:0 are significant.
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0x3F {
            0x3F => Self::OutOfRange,
            km => Self::Kilometers(km),
        }
    }

    /// Distance in kilometers, `-1` when out of range.
    pub fn as_km(self) -> i16 {
        match self {
            Self::OutOfRange => -1,
            Self::Kilometers(km) => km as i16,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => f.write_str("out of range"),
            Self::Kilometers(km) => write!(f, "{km} km"),
        }
    }
}

/// A classified interrupt.
///
/// Counts are the value of the matching counter after the event was
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    NoiseHigh,
    Disturber { count: u32 },
    Lightning { count: u32, distance: Distance },
    Unknown { reason: u8, count: u32 },
}

impl Event {
    pub fn distance(&self) -> Option<Distance> {
        match self {
            Self::Lightning { distance, .. } => Some(*distance),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoiseHigh => f.write_str("Noise level too high (INT_NH)"),
            Self::Disturber { count } => write!(f, "Disturber detected (INT_D), event {count}"),
            Self::Lightning { count, distance } => {
                write!(f, "Lightning detected (INT_L), strike {count}, distance: {distance}")
            }
            Self::Unknown { reason, count } => {
                write!(f, "Unknown event (0x{reason:02X}), event {count}")
            }
        }
    }
}

/// Disturber and lightning counts for one run.
///
/// Both counts only ever increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventCounters {
    disturbers: u32,
    lightning: u32,
}

impl EventCounters {
    /// Disturbers plus unknown events.
    pub fn disturbers(&self) -> u32 {
        self.disturbers
    }

    pub fn lightning(&self) -> u32 {
        self.lightning
    }

    /// Counts one disturber and returns the new total.
    pub fn record_disturber(&mut self) -> u32 {
        self.disturbers = self.disturbers.saturating_add(1);
        self.disturbers
    }

    /// Counts one strike and returns the new total.
    pub fn record_lightning(&mut self) -> u32 {
        self.lightning = self.lightning.saturating_add(1);
        self.lightning
    }
}

impl fmt::Display for EventCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lightning, {} disturbers", self.lightning, self.disturbers)
    }
}
