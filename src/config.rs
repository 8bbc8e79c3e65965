//! Configuration and hardware constants
//!
//! The bus constants state what the SPI device handed to
//! [`Device`](crate::Device) must be configured for. The runtime structs carry
//! every threshold and delay the driver, classifier and lifecycle controller
//! use; their `Default` values are the ones the station has been deployed with.

use embedded_hal::spi::{Mode, MODE_1};

use crate::registers::{AfeGain, LightningValidation, MinStrikes, NoiseFloor};

/// SPI mode expected by the AS3935 (CPOL = 0, CPHA = 1)
pub const SPI_MODE: Mode = MODE_1;

/// SPI clock. The sensor accepts up to 2 MHz
pub const SPI_FREQUENCY_HZ: u32 = 1_000_000;

/// Event log file name, opened in append mode by `FileLog::open_in`
pub const LOG_FILE_NAME: &str = "lightning.log";

/// Installation site, selecting the AFE gain preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Environment {
    #[default]
    Indoor,
    Outdoor,
}

impl Environment {
    /// AFE gain register value for this site.
    pub fn afe_gain(self) -> AfeGain {
        let gain = match self {
            Environment::Indoor => AfeGain::INDOOR,
            Environment::Outdoor => AfeGain::OUTDOOR,
        };
        AfeGain {
            gain,
            power_down: false,
        }
    }
}

/// Register values and delays used by [`As3935`](crate::As3935).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// AFE gain preset
    pub environment: Environment,
    /// Noise floor level and watchdog threshold
    pub noise_floor: NoiseFloor,
    /// Spike rejection and minimum strike count
    pub validation: LightningValidation,
    /// Delay after each direct command, at least 2 ms
    pub command_settle_ms: u32,
    /// Delay after configuration before the device is used, at least 300 ms
    pub configure_settle_ms: u32,
    /// How long the LCO stays on the IRQ pin during tuning
    pub tuning_window_ms: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Indoor,
            noise_floor: NoiseFloor {
                level: 1,
                watchdog: 2,
            },
            validation: LightningValidation {
                clear_statistics: false,
                min_strikes: MinStrikes::One,
                spike_rejection: 3,
            },
            command_settle_ms: 2,
            configure_settle_ms: 300,
            tuning_window_ms: 1_000,
        }
    }
}

/// Timing of the interrupt service loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Number of level polls before a stuck IRQ line is declared
    pub poll_budget: u32,
    /// Interval between level polls
    pub poll_interval_us: u32,
    /// Pause after a disturber before waiting for the next edge
    pub disturber_cooldown_ms: u32,
    /// Pause after a lightning strike before waiting for the next edge
    pub lightning_cooldown_ms: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            poll_budget: 200,
            poll_interval_us: 1_000,
            disturber_cooldown_ms: 100,
            lightning_cooldown_ms: 100,
        }
    }
}

/// Everything the lifecycle controller needs besides its resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub driver: DriverConfig,
    pub classifier: ClassifierConfig,
    /// Delay between acquiring resources and initialising the sensor
    pub startup_settle_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver: DriverConfig::default(),
            classifier: ClassifierConfig::default(),
            startup_settle_ms: 200,
        }
    }
}
