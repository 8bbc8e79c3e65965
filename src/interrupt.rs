//! Interrupt line capability
//!
//! The AS3935 raises its IRQ pin high when an event is pending and keeps it
//! high until the interrupt reason has been read. The host sees this pin as a
//! GPIO input configured for rising-edge notification.

use embedded_hal::digital::InputPin;

/// A GPIO input that can block until the next rising edge.
///
/// The level accessors come from [`InputPin`]. This is the blocking
/// counterpart of `embedded_hal_async::digital::Wait::wait_for_rising_edge`.
pub trait InterruptLine: InputPin {
    /// Blocks until a rising edge has been observed and consumed.
    ///
    /// There is no timeout: this only returns on an edge or an error.
    fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error>;
}

impl<T: InterruptLine + ?Sized> InterruptLine for &mut T {
    fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        (**self).wait_for_rising_edge()
    }
}
