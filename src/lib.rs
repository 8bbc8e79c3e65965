#![cfg_attr(not(feature = "std"), no_std)]
//! AS3935 Lightning Sensor Driver
//!
//! This crate provides a type-safe driver and interrupt service loop for the
//! AMS AS3935 Franklin lightning sensor. The AS3935 detects the electrical
//! emissions of lightning, rejects man-made disturbers and estimates the
//! distance to the head of the storm.
//!
//! # Features
//! - Detection range: up to 40 km, in 15 distance steps
//! - Indoor and outdoor AFE gain presets
//! - Programmable noise floor, watchdog threshold and spike rejection
//! - Automatic RCO calibration with pass/fail reporting
//! - Antenna tuning through an LCO routed to the IRQ pin
//! - Events forwarded to a persistent log and a message broker
//!
//! # Architecture
//! The crate is organized into several modules:
//!
//! - [`device`]: SPI framing for single register accesses
//! - [`transport`]: the [`RegisterTransport`] seam the driver talks through
//! - [`registers`]: typed register definitions
//!   - AFE gain, noise floor and lightning validation
//!   - interrupt control and distance estimate
//!   - oscillator display, tuning capacitor and calibration status
//! - [`commands`]: direct commands (preset defaults, RCO calibration)
//! - [`driver`]: [`As3935`], the init and tuning sequences
//! - [`state`]: [`DeviceState`] and its legal transitions
//! - [`classifier`]: turns one IRQ edge into an [`Event`]
//! - [`journal`] and [`publish`]: where events end up
//! - [`lifecycle`]: opens resources, runs the loop, closes everything
//! - [`host`]: log file, clock and delay for Linux hosts (`std` feature)
//!
//! # Usage
//! The hardware is reached through `embedded-hal` 1.0 traits only: an
//! `SpiDevice` for the bus, an `InputPin` with edge waiting for the IRQ line
//! and a `DelayNs`. A session follows a fixed sequence:
//!
//! 1. Wrap the SPI device in a [`Device`] and hand it to [`As3935::new`]
//! 2. [`As3935::init`]: preset defaults, calibrate the RC oscillators and
//!    apply the front-end configuration
//! 3. Either [`As3935::tune`] the antenna, or [`As3935::activate`] the device
//! 4. Service each rising edge of IRQ with [`Classifier::service`]
//!
//! [`Lifecycle`] runs that whole sequence against a [`Platform`].
//!
//! # Important Notes
//! - Reading the interrupt register acknowledges the interrupt
//! - The distance register is only meaningful after a lightning interrupt
//! - Wait at least 2 ms after a direct command
//! - A failed calibration usually means a missing or detuned antenna
//!
//! # Example
//! ```no_run
//! use as3935::{As3935, Device, DriverConfig, Error};
//! use embedded_hal::{delay::DelayNs, spi::SpiDevice};
//!
//! fn start<SPI: SpiDevice, D: DelayNs>(
//!     spi: SPI,
//!     delay: &mut D,
//! ) -> Result<As3935<Device<SPI>>, Error> {
//!     let mut sensor = As3935::new(Device::new(spi), DriverConfig::default());
//!     sensor.init(delay)?;
//!     sensor.activate()?;
//!
//!     Ok(sensor)
//! }
//! ```

pub mod classifier;
pub mod commands;
pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod event;
#[cfg(feature = "std")]
pub mod host;
pub mod interrupt;
pub mod journal;
pub mod lifecycle;
pub mod publish;
pub mod registers;
pub mod state;
pub mod transport;

pub use classifier::Classifier;
pub use config::{ClassifierConfig, Config, DriverConfig, Environment};
pub use device::Device;
pub use driver::{As3935, TuningParameters};
pub use error::{Error, Resource};
pub use event::{Distance, Event, EventCounters, Reason};
pub use interrupt::InterruptLine;
pub use journal::{Clock, EventLog, Journal, LogEntry, LogRecord, Timestamp};
pub use lifecycle::{Lifecycle, Platform, RunSummary};
pub use publish::Publisher;
pub use state::DeviceState;
pub use transport::RegisterTransport;
