//! Interrupt classifier
//!
//! Services one rising edge of the IRQ line:
//!
//! ```text
//! Idle -> EdgeReceived -> Reading -> WaitingForDeassert -> Classified -> Idle
//!              |
//!              +-- line already low: spurious, back to Idle
//! ```
//!
//! Reading the reason register acknowledges the interrupt and the sensor then
//! drops IRQ. The line is polled at a fixed interval for a bounded number of
//! iterations; a line that never drops means the sensor or the bus is stuck
//! and ends the run with [`Error::Timeout`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::{debug, error, warn};

use crate::config::ClassifierConfig;
use crate::driver::As3935;
use crate::event::{Event, EventCounters, Reason};
use crate::journal::{Clock, EventLog, Journal};
use crate::publish::Publisher;
use crate::state::DeviceState;
use crate::transport::RegisterTransport;
use crate::Error;

/// Classifies interrupts and keeps the run's event counters.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassifierConfig,
    counters: EventCounters,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            counters: EventCounters::default(),
        }
    }

    pub fn counters(&self) -> EventCounters {
        self.counters
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Services one edge on `line`.
    ///
    /// Returns `Ok(None)` for a spurious edge, otherwise the classified
    /// event after it has been recorded, published and any cooldown has
    /// elapsed.
    ///
    /// # Errors
    /// * `Error::InvalidState` - the device is not operational
    /// * `Error::Interrupt` - the line level could not be read
    /// * `Error::Transport` - a register access failed
    /// * `Error::Timeout` - the line did not drop within the poll budget
    /// * `Error::LogStream` - the event could not be recorded
    pub fn service<T, L, D, C, W, P>(
        &mut self,
        device: &mut As3935<T>,
        line: &mut L,
        delay: &mut D,
        journal: &mut Journal<'_, C, W, P>,
    ) -> Result<Option<Event>, Error>
    where
        T: RegisterTransport,
        L: InputPin,
        D: DelayNs,
        C: Clock,
        W: EventLog,
        P: Publisher,
    {
        if !device.state().services_interrupts() {
            return Err(Error::InvalidState {
                expected: DeviceState::Operational,
                actual: device.state(),
            });
        }

        if !line.is_high().map_err(Error::interrupt)? {
            debug!("spurious edge, IRQ already low");
            return Ok(None);
        }

        let reason = device.read_interrupt_reason()?;
        let polls = self.wait_for_deassert(line, delay)?;
        debug!("IRQ released after {polls} polls, reason {reason:?}");

        let event = match reason {
            Reason::NoiseHigh => Event::NoiseHigh,
            Reason::Disturber => Event::Disturber {
                count: self.counters.record_disturber(),
            },
            Reason::Lightning => {
                let count = self.counters.record_lightning();
                let distance = device.read_distance()?;
                Event::Lightning { count, distance }
            }
            Reason::Unknown(raw) => {
                warn!("unknown interrupt reason 0x{raw:02X}");
                Event::Unknown {
                    reason: raw,
                    count: self.counters.record_disturber(),
                }
            }
        };

        journal.report(event)?;

        match event {
            Event::Disturber { .. } => delay.delay_ms(self.config.disturber_cooldown_ms),
            Event::Lightning { .. } => delay.delay_ms(self.config.lightning_cooldown_ms),
            Event::NoiseHigh | Event::Unknown { .. } => {}
        }

        Ok(Some(event))
    }

    /// Polls until the line drops, returning the number of polls that saw it high.
    fn wait_for_deassert<L, D>(&self, line: &mut L, delay: &mut D) -> Result<u32, Error>
    where
        L: InputPin,
        D: DelayNs,
    {
        for poll in 0..self.config.poll_budget {
            if line.is_low().map_err(Error::interrupt)? {
                return Ok(poll);
            }
            delay.delay_us(self.config.poll_interval_us);
        }

        error!(
            "IRQ line still high after {} polls, sensor or bus stuck",
            self.config.poll_budget
        );
        Err(Error::Timeout {
            polls: self.config.poll_budget,
        })
    }
}
