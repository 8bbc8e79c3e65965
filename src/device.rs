//! AS3935 SPI Device Interface
//!
//! This module provides the bus-level interface to an AS3935 lightning sensor
//! wired to an SPI controller. Every register access is a single two byte
//! exchange:
//!
//! | Access | Byte 0 | Byte 1 |
//! |--------|--------|--------|
//! | Read   | `(addr & 0x3F) \| 0x40` | don't care, response carries the value |
//! | Write  | `addr & 0x3F` | value to store |
//!
//! The bus mode and clock are fixed by whoever opens the `SpiDevice`: it must
//! run in [`SPI_MODE`](crate::config::SPI_MODE) with 8-bit words, no faster
//! than [`SPI_FREQUENCY_HZ`](crate::config::SPI_FREQUENCY_HZ).
//!
//! # Example
//! ```no_run
//! use as3935::{Device, RegisterTransport, registers::DistanceEstimate};
//!
//! fn distance<SPI: embedded_hal::spi::SpiDevice>(spi: SPI) -> Result<(), as3935::Error> {
//!     let mut device = Device::new(spi);
//!     let _estimate: DistanceEstimate = device.read_register()?;
//!     Ok(())
//! }
//! ```

use embedded_hal::spi::Operation;

use crate::transport::{RegisterTransport, ADDRESS_MASK};
use crate::Error;

/// Mode bits selecting a register read.
pub const READ_MODE: u8 = 0x40;
/// Mode bits selecting a register write or direct command.
pub const WRITE_MODE: u8 = 0x00;

/// Bus interface to the AS3935.
///
/// Wraps an SPI device and implements [`RegisterTransport`] on top of it. No
/// buffering, batching or retries happen at this layer.
pub struct Device<SPI> {
    spi: SPI,
}

impl<SPI> Device<SPI> {
    /// Creates a new Device instance wrapping the provided SPI interface.
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> RegisterTransport for Device<SPI>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    /// Reads one register in a single full-duplex exchange.
    ///
    /// # Errors
    /// * `Error::Transport` - SPI communication failed
    fn read(&mut self, address: u8) -> Result<u8, Error> {
        let mut frame = [(address & ADDRESS_MASK) | READ_MODE, 0x00];

        self.spi
            .transaction(&mut [Operation::TransferInPlace(&mut frame)])
            .map_err(Error::transport)?;

        Ok(frame[1])
    }

    /// Writes one register.
    ///
    /// # Errors
    /// * `Error::Transport` - SPI communication failed
    fn write(&mut self, address: u8, value: u8) -> Result<(), Error> {
        let frame = [(address & ADDRESS_MASK) | WRITE_MODE, value];

        self.spi
            .transaction(&mut [Operation::Write(&frame)])
            .map_err(Error::transport)
    }
}
