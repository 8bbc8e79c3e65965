//! Lifecycle controller
//!
//! Drives one session end to end:
//!
//! ```text
//! Start -> ResourcesOpen -> DeviceReady -> Running -> Stopping -> Closed
//! ```
//!
//! Resources come from a [`Platform`]. Whatever happens after `Start`, the
//! `Closed` step runs: the event log is flushed and closed, the interrupt
//! line released, then the bus released. Resources that were never acquired
//! are skipped.
//!
//! The run loop blocks on the next rising edge. A stop request is honoured
//! between two edges, never in the middle of servicing one. The flag is only
//! checked before each wait: a request raised while the loop is blocked takes
//! effect after the next edge, and that edge is still classified, recorded
//! and published.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use log::{error, info};

use crate::classifier::Classifier;
use crate::config::Config;
use crate::driver::{As3935, TuningParameters};
use crate::event::EventCounters;
use crate::interrupt::InterruptLine;
use crate::journal::{Clock, EventLog, Journal, LogEntry};
use crate::publish::Publisher;
use crate::transport::RegisterTransport;
use crate::Error;

/// Opens and releases the host resources a session needs.
///
/// `open_*` failures should be reported as [`Error::Resource`].
pub trait Platform {
    type Bus: RegisterTransport;
    type Line: InterruptLine;
    type Log: EventLog;

    fn open_bus(&mut self) -> Result<Self::Bus, Error>;

    fn open_interrupt_line(&mut self) -> Result<Self::Line, Error>;

    fn open_log(&mut self) -> Result<Self::Log, Error>;

    fn release_bus(&mut self, bus: Self::Bus) {
        drop(bus);
    }

    fn release_interrupt_line(&mut self, line: Self::Line) {
        drop(line);
    }

    fn close_log(&mut self, log: Self::Log) {
        drop(log);
    }
}

/// Outcome of a run that was stopped on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub counters: EventCounters,
}

/// Resources held by one session.
struct Session<P: Platform> {
    device: Option<As3935<P::Bus>>,
    line: Option<P::Line>,
    log: Option<P::Log>,
    classifier: Classifier,
}

impl<P: Platform> Session<P> {
    fn new(classifier: Classifier) -> Self {
        Self {
            device: None,
            line: None,
            log: None,
            classifier,
        }
    }
}

/// Owns everything a lightning detector session needs.
pub struct Lifecycle<P, D, C, Pb> {
    platform: P,
    delay: D,
    clock: C,
    publisher: Pb,
    config: Config,
}

impl<P, D, C, Pb> Lifecycle<P, D, C, Pb>
where
    P: Platform,
    D: DelayNs,
    C: Clock,
    Pb: Publisher,
{
    pub fn new(platform: P, delay: D, clock: C, publisher: Pb, config: Config) -> Self {
        Self {
            platform,
            delay,
            clock,
            publisher,
            config,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the detector until `stop` is set or a fatal error occurs.
    ///
    /// # Errors
    /// * `Error::Resource` - a resource could not be opened
    /// * `Error::Calibration` - the sensor failed RCO calibration
    /// * any error raised while servicing interrupts
    pub fn run(&mut self, stop: &AtomicBool) -> Result<RunSummary, Error> {
        let mut session = Session::new(Classifier::new(self.config.classifier));

        let outcome = self.serve(&mut session, stop);
        let counters = session.classifier.counters();
        let closed = self.shutdown(session, outcome.err());

        outcome.and(closed).map(|()| RunSummary { counters })
    }

    /// Operator tuning mode: initialise, tune once, close.
    ///
    /// The interrupt line is not opened; the IRQ pin carries the antenna
    /// oscillator for the external frequency counter while tuning.
    pub fn run_tuning(&mut self, params: TuningParameters) -> Result<TuningParameters, Error> {
        let mut session = Session::new(Classifier::new(self.config.classifier));

        let outcome = self.tune(&mut session, params);
        let closed = self.shutdown(session, outcome.err());

        let applied = outcome?;
        closed.map(|()| applied)
    }

    fn serve(&mut self, session: &mut Session<P>, stop: &AtomicBool) -> Result<(), Error> {
        let bus = self.platform.open_bus()?;
        let device = session.device.insert(As3935::new(bus, self.config.driver));
        let line = session.line.insert(self.platform.open_interrupt_line()?);
        let log = session.log.insert(self.platform.open_log()?);
        self.delay.delay_ms(self.config.startup_settle_ms);

        let mut journal = Journal::new(&mut self.clock, log, &mut self.publisher);
        journal.record(LogEntry::SessionStart)?;
        initialize(device, &mut self.delay, &mut journal)?;
        device.activate()?;

        info!("waiting for lightning on the interrupt line");
        while !stop.load(Ordering::Acquire) {
            line.wait_for_rising_edge().map_err(Error::interrupt)?;
            session
                .classifier
                .service(device, line, &mut self.delay, &mut journal)?;
        }

        info!("stop requested");
        Ok(())
    }

    fn tune(
        &mut self,
        session: &mut Session<P>,
        params: TuningParameters,
    ) -> Result<TuningParameters, Error> {
        let bus = self.platform.open_bus()?;
        let device = session.device.insert(As3935::new(bus, self.config.driver));
        let log = session.log.insert(self.platform.open_log()?);

        let mut journal = Journal::new(&mut self.clock, log, &mut self.publisher);
        journal.record(LogEntry::SessionStart)?;
        initialize(device, &mut self.delay, &mut journal)?;

        let applied = device.tune(&mut self.delay, params)?;
        journal.record(LogEntry::Tuned(applied))?;
        Ok(applied)
    }

    /// Releases whatever the session acquired: log, then line, then bus.
    fn shutdown(&mut self, session: Session<P>, fault: Option<Error>) -> Result<(), Error> {
        let Session {
            device,
            line,
            log,
            classifier,
        } = session;

        if let Some(err) = fault {
            error!("session aborted: {err}");
        }

        let mut closed = Ok(());
        if let Some(mut log) = log {
            let mut journal = Journal::new(&mut self.clock, &mut log, &mut self.publisher);
            if let Some(err) = fault {
                closed = journal.record(LogEntry::Fault(err)).map(drop);
            }
            if closed.is_ok() {
                closed = journal
                    .record(LogEntry::SessionEnd(classifier.counters()))
                    .map(drop);
            }
            if closed.is_ok() {
                closed = journal.flush();
            }
            self.platform.close_log(log);
        }

        if let Some(line) = line {
            self.platform.release_interrupt_line(line);
        }

        if let Some(mut device) = device {
            device.close();
            self.platform.release_bus(device.release());
        }

        closed
    }
}

/// Runs `init`, recording the calibration verdict.
fn initialize<T, D, C, W, Pb>(
    device: &mut As3935<T>,
    delay: &mut D,
    journal: &mut Journal<'_, C, W, Pb>,
) -> Result<(), Error>
where
    T: RegisterTransport,
    D: DelayNs,
    C: Clock,
    W: EventLog,
    Pb: Publisher,
{
    match device.init(delay) {
        Ok(()) => {
            journal.record(LogEntry::CalibrationSucceeded)?;
            Ok(())
        }
        Err(err @ Error::Calibration { .. }) => {
            journal.record(LogEntry::CalibrationFailed)?;
            Err(err)
        }
        Err(err) => Err(err),
    }
}
