//! Register transport capability
//!
//! [`RegisterTransport`] is the seam between the driver and the bus: one call
//! is one register access. The production implementation is
//! [`Device`](crate::Device), which frames each access as a two byte SPI
//! exchange. Tests substitute recording fakes.
//!
//! Addresses are 6 bits wide. Implementations mask larger values with
//! [`ADDRESS_MASK`] rather than rejecting them, and never retry.

use core::convert::Infallible;

use regiface::{ByteArray, ReadableRegister, WritableRegister};

use crate::Error;

/// AS3935 register addresses occupy the low 6 bits of the command byte.
pub const ADDRESS_MASK: u8 = 0x3F;

/// One half-duplex register access at a time.
pub trait RegisterTransport {
    /// Reads the register at `address & 0x3F`.
    fn read(&mut self, address: u8) -> Result<u8, Error>;

    /// Writes `value` to the register at `address & 0x3F`.
    fn write(&mut self, address: u8, value: u8) -> Result<(), Error>;

    /// Reads a typed register.
    ///
    /// Registers wider than one byte are read one address at a time, starting
    /// at the register id.
    fn read_register<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8>,
    {
        let mut raw_value = R::Array::new();
        for (offset, byte) in raw_value.as_mut().iter_mut().enumerate() {
            *byte = self.read(R::id().wrapping_add(offset as u8))?;
        }

        R::from_bytes(raw_value).map_err(|_| Error::Deserialization(R::id() & ADDRESS_MASK))
    }

    /// Writes a typed register.
    fn write_register<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let raw_value = register.to_bytes().unwrap_or_else(|never| match never {});
        for (offset, byte) in raw_value.as_ref().iter().enumerate() {
            self.write(R::id().wrapping_add(offset as u8), *byte)?;
        }
        Ok(())
    }
}

impl<T: RegisterTransport + ?Sized> RegisterTransport for &mut T {
    fn read(&mut self, address: u8) -> Result<u8, Error> {
        (**self).read(address)
    }

    fn write(&mut self, address: u8, value: u8) -> Result<(), Error> {
        (**self).write(address, value)
    }
}
