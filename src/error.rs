//! Error taxonomy
//!
//! Every fallible operation in the crate returns [`Error`]. Bus and GPIO
//! failures are reduced to their `embedded_hal` [`ErrorKind`](embedded_hal::spi::ErrorKind)
//! so the error stays `Copy` and independent of the concrete peripherals.
//!
//! Errors raised by `init` and `tune` abort the whole sequence. Errors raised
//! while servicing interrupts end the run.

use embedded_hal::{digital, spi};
use thiserror::Error;

use crate::state::DeviceState;

/// A resource the lifecycle controller acquires at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resource {
    /// SPI bus to the sensor
    Bus,
    /// GPIO line wired to the sensor's IRQ pin
    InterruptLine,
    /// Persistent event log
    LogStream,
}

/// Errors produced by the AS3935 driver, classifier and lifecycle controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A single register access failed on the bus
    #[error("register transfer failed: {0}")]
    Transport(spi::ErrorKind),

    /// Reading or waiting on the interrupt line failed
    #[error("interrupt line failure: {0}")]
    Interrupt(digital::ErrorKind),

    /// RCO calibration did not complete on both oscillators
    #[error("RCO calibration failed (TRCO status 0x{trco:02X}, SRCO status 0x{srco:02X})")]
    Calibration { trco: u8, srco: u8 },

    /// The interrupt line stayed asserted for the whole poll budget
    #[error("interrupt line still asserted after {polls} polls")]
    Timeout { polls: u32 },

    /// A resource could not be opened or configured at startup
    #[error("unable to open {0:?}")]
    Resource(Resource),

    /// Tuning parameters out of range
    #[error("invalid tuning parameters (division {division}, capacitance {capacitance})")]
    InvalidTuning { division: u8, capacitance: u8 },

    /// A tuning register did not read back what was written
    #[error("register 0x{register:02X} read back 0x{actual:02X}, expected 0x{expected:02X}")]
    TuningMismatch { register: u8, expected: u8, actual: u8 },

    /// The operation is not legal in the device's current state
    #[error("operation requires a {expected} device, device is {actual}")]
    InvalidState {
        expected: DeviceState,
        actual: DeviceState,
    },

    /// A raw register value could not be decoded
    #[error("register 0x{0:02X} holds an undecodable value")]
    Deserialization(u8),

    /// A record could not be appended to the event log
    #[error("event log write failed")]
    LogStream,
}

impl Error {
    /// Wraps any SPI error.
    pub fn transport<E: spi::Error>(err: E) -> Self {
        Self::Transport(err.kind())
    }

    /// Wraps any GPIO error.
    pub fn interrupt<E: digital::Error>(err: E) -> Self {
        Self::Interrupt(err.kind())
    }
}
