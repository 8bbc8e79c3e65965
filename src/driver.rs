//! AS3935 device driver
//!
//! [`As3935`] owns a [`RegisterTransport`] and runs the multi-step register
//! sequences the sensor needs:
//!
//! 1. [`init`](As3935::init): reset, RCO calibration with pass/fail check,
//!    front-end configuration and disturber masking
//! 2. [`activate`](As3935::activate): hand the device to the interrupt loop
//! 3. [`tune`](As3935::tune): offline antenna tuning with read-back
//!    verification
//!
//! Every sequence aborts on the first failing register access. Registers
//! already written are left as they are; nothing is rolled back.

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::commands::{CalibrateRco, PresetDefault};
use crate::config::DriverConfig;
use crate::event::{Distance, Reason};
use crate::registers::{
    DistanceEstimate, InterruptControl, SrcoCalibration, TrcoCalibration, TuningControl,
};
use crate::state::DeviceState;
use crate::transport::RegisterTransport;
use crate::Error;

/// Antenna tuning request.
///
/// Values are validated on construction, so a `TuningParameters` can always
/// be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TuningParameters {
    division: u8,
    capacitance: u8,
}

impl TuningParameters {
    /// Largest LCO_FDIV code
    pub const MAX_DIVISION: u8 = 3;
    /// Largest TUN_CAP code
    pub const MAX_CAPACITANCE: u8 = 15;

    /// # Errors
    /// * `Error::InvalidTuning` - `division > 3` or `capacitance > 15`
    pub fn new(division: u8, capacitance: u8) -> Result<Self, Error> {
        if division > Self::MAX_DIVISION || capacitance > Self::MAX_CAPACITANCE {
            return Err(Error::InvalidTuning {
                division,
                capacitance,
            });
        }
        Ok(Self {
            division,
            capacitance,
        })
    }

    /// LCO_FDIV code (0-3).
    pub fn division(&self) -> u8 {
        self.division
    }

    /// TUN_CAP code (0-15).
    pub fn capacitance(&self) -> u8 {
        self.capacitance
    }

    /// Ratio between the LCO and the frequency seen on the IRQ pin.
    pub fn division_ratio(&self) -> u16 {
        16 << self.division
    }

    /// Internal tuning capacitance in picofarads.
    pub fn capacitance_pf(&self) -> u8 {
        self.capacitance * 8
    }
}

impl fmt::Display for TuningParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LCO_FDIV {} (1/{}), TUN_CAP {} ({} pF)",
            self.division,
            self.division_ratio(),
            self.capacitance,
            self.capacitance_pf()
        )
    }
}

/// Driver for one AS3935.
pub struct As3935<T> {
    transport: T,
    state: DeviceState,
    config: DriverConfig,
}

impl<T> As3935<T> {
    pub fn new(transport: T, config: DriverConfig) -> Self {
        Self {
            transport,
            state: DeviceState::Uninitialized,
            config,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Marks the device closed. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.state != DeviceState::Closed {
            debug!("AS3935 {} -> {}", self.state, DeviceState::Closed);
            self.state = DeviceState::Closed;
        }
    }

    /// Releases the underlying transport.
    pub fn release(self) -> T {
        self.transport
    }

    fn require(&self, expected: DeviceState) -> Result<(), Error> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    fn advance(&mut self, next: DeviceState) {
        debug_assert!(self.state.can_advance_to(next));
        debug!("AS3935 {} -> {}", self.state, next);
        self.state = next;
    }
}

impl<T> As3935<T>
where
    T: RegisterTransport,
{
    /// Calibrates and configures a freshly powered device.
    ///
    /// On success the device is [`DeviceState::Configured`]. A failed
    /// calibration leaves it [`DeviceState::CalibrationFailed`]; a bus error
    /// leaves it [`DeviceState::Calibrating`]. Either way a new driver is
    /// needed to try again.
    ///
    /// # Errors
    /// * `Error::InvalidState` - the device was already initialised
    /// * `Error::Transport` - a register access failed
    /// * `Error::Calibration` - TRCO or SRCO did not report completion
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error> {
        self.require(DeviceState::Uninitialized)?;
        self.advance(DeviceState::Calibrating);

        self.transport.write_register(PresetDefault)?;
        delay.delay_ms(self.config.command_settle_ms);
        self.transport.write_register(CalibrateRco)?;
        delay.delay_ms(self.config.command_settle_ms);

        let trco: TrcoCalibration = self.transport.read_register()?;
        let srco: SrcoCalibration = self.transport.read_register()?;
        if !(trco.is_done() && srco.is_done()) {
            warn!(
                "RCO calibration failed (TRCO 0x{:02X}, SRCO 0x{:02X}), check antenna",
                trco.status.bits(),
                srco.status.bits()
            );
            self.advance(DeviceState::CalibrationFailed);
            return Err(Error::Calibration {
                trco: trco.status.bits(),
                srco: srco.status.bits(),
            });
        }
        info!("RCO calibration successful");

        self.transport
            .write_register(self.config.environment.afe_gain())?;
        self.transport.write_register(self.config.noise_floor)?;
        self.transport.write_register(self.config.validation)?;

        let control: InterruptControl = self.transport.read_register()?;
        self.transport
            .write_register(control.with_masked_disturbers(true))?;

        delay.delay_ms(self.config.configure_settle_ms);
        self.advance(DeviceState::Configured);
        info!("AS3935 configured ({:?})", self.config.environment);
        Ok(())
    }

    /// Hands a configured device over to interrupt servicing.
    ///
    /// # Errors
    /// * `Error::InvalidState` - the device is not configured
    pub fn activate(&mut self) -> Result<(), Error> {
        self.require(DeviceState::Configured)?;
        self.advance(DeviceState::Operational);
        Ok(())
    }

    /// Tunes the antenna for measurement with an external frequency counter.
    ///
    /// Routes the LCO to the IRQ pin with the requested tuning capacitance
    /// and division ratio, verifies both registers, keeps the oscillator on
    /// the pin for `tuning_window_ms`, then stops displaying it. TUN_CAP
    /// keeps the tuned value.
    ///
    /// Only a configured, not yet activated device can be tuned: the IRQ pin
    /// carries the oscillator instead of interrupts while tuning.
    ///
    /// # Errors
    /// * `Error::InvalidState` - the device is not configured
    /// * `Error::Transport` - a register access failed
    /// * `Error::TuningMismatch` - a register did not read back as written
    pub fn tune<D: DelayNs>(
        &mut self,
        delay: &mut D,
        params: TuningParameters,
    ) -> Result<TuningParameters, Error> {
        self.require(DeviceState::Configured)?;

        let tuning: TuningControl = self.transport.read_register()?;
        let displayed = tuning
            .with_lco_displayed(true)
            .with_capacitance(params.capacitance());
        self.transport.write_register(displayed)?;

        let control: InterruptControl = self.transport.read_register()?;
        let divided = control.with_frequency_division(params.division());
        self.transport.write_register(divided)?;

        let readback: TuningControl = self.transport.read_register()?;
        if readback.with_lco_displayed(true) != readback
            || readback.capacitance != params.capacitance()
        {
            return Err(Error::TuningMismatch {
                register: TuningControl::ADDRESS,
                expected: displayed.raw(),
                actual: readback.raw(),
            });
        }

        let readback: InterruptControl = self.transport.read_register()?;
        if readback.frequency_division() != params.division() {
            return Err(Error::TuningMismatch {
                register: InterruptControl::ADDRESS,
                expected: divided.raw(),
                actual: readback.raw(),
            });
        }

        info!("Antenna tuning applied: {params}");
        delay.delay_ms(self.config.tuning_window_ms);

        let tuning: TuningControl = self.transport.read_register()?;
        self.transport
            .write_register(tuning.with_lco_displayed(false))?;
        Ok(params)
    }

    /// Reads and decodes the interrupt reason, acknowledging the interrupt.
    pub fn read_interrupt_reason(&mut self) -> Result<Reason, Error> {
        let control: InterruptControl = self.transport.read_register()?;
        Ok(Reason::from_raw(control.reason()))
    }

    /// Reads the distance estimate of the last strike.
    pub fn read_distance(&mut self) -> Result<Distance, Error> {
        let estimate: DistanceEstimate = self.transport.read_register()?;
        Ok(estimate.distance())
    }
}
