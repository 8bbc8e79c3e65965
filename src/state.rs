//! Device lifecycle state
//!
//! The driver advances a [`DeviceState`] synchronously as it issues register
//! sequences. Transitions only move forward; a device whose calibration failed
//! can only be closed. Re-initialising requires a fresh driver instance.
//!
//! ```text
//! Uninitialized -> Calibrating -> Configured -> Operational -> Closed
//!                       |
//!                       +------> CalibrationFailed ---------> Closed
//! ```

use core::fmt;

/// Lifecycle state of an AS3935 as tracked by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Nothing has been written to the device yet
    #[default]
    Uninitialized,
    /// Reset and RCO calibration are in progress
    Calibrating,
    /// TRCO or SRCO did not report a completed calibration
    CalibrationFailed,
    /// Calibrated and configured; safe for antenna tuning
    Configured,
    /// Interrupts are being serviced
    Operational,
    /// The bus has been given up
    Closed,
}

impl DeviceState {
    /// Returns true if `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: DeviceState) -> bool {
        use DeviceState::*;

        matches!(
            (self, next),
            (Uninitialized, Calibrating)
                | (Calibrating, CalibrationFailed)
                | (Calibrating, Configured)
                | (Configured, Operational)
                | (Uninitialized, Closed)
                | (Calibrating, Closed)
                | (CalibrationFailed, Closed)
                | (Configured, Closed)
                | (Operational, Closed)
        )
    }

    /// Interrupts may only be classified once the device is operational.
    pub fn services_interrupts(self) -> bool {
        self == DeviceState::Operational
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceState::Uninitialized => "uninitialized",
            DeviceState::Calibrating => "calibrating",
            DeviceState::CalibrationFailed => "calibration failed",
            DeviceState::Configured => "configured",
            DeviceState::Operational => "operational",
            DeviceState::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::DeviceState::*;
    use super::*;

    const ALL: [DeviceState; 6] = [
        Uninitialized,
        Calibrating,
        CalibrationFailed,
        Configured,
        Operational,
        Closed,
    ];

    #[test]
    fn happy_path_is_forward() {
        assert!(Uninitialized.can_advance_to(Calibrating));
        assert!(Calibrating.can_advance_to(Configured));
        assert!(Configured.can_advance_to(Operational));
        assert!(Operational.can_advance_to(Closed));
    }

    #[test]
    fn calibration_failure_only_closes() {
        for next in ALL {
            assert_eq!(CalibrationFailed.can_advance_to(next), next == Closed);
        }
    }

    #[test]
    fn no_state_moves_backwards_or_repeats() {
        for (i, from) in ALL.iter().enumerate() {
            for to in &ALL[..=i] {
                assert!(!from.can_advance_to(*to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn closed_is_terminal() {
        assert!(ALL.iter().all(|next| !Closed.can_advance_to(*next)));
    }

    #[test]
    fn only_operational_services_interrupts() {
        for state in ALL {
            assert_eq!(state.services_interrupts(), state == Operational);
        }
    }
}
