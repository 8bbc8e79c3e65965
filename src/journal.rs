//! Persistent event log
//!
//! Every session start and end, calibration result, tuning action, fault and
//! classified event becomes one [`LogRecord`]: a `YYYY-MM-DD HH:MM:SS`
//! timestamp followed by a description. Records are appended to an
//! [`EventLog`] and flushed one by one; the log is never rewritten.
//!
//! A [`Journal`] bundles the log with the wall clock and the broker publisher
//! for the duration of a session.

use core::fmt;

use log::info;

use crate::driver::TuningParameters;
use crate::event::{Event, EventCounters};
use crate::publish::{publish_event, Publisher};
use crate::Error;

/// Local wall-clock time, second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Source of record timestamps.
pub trait Clock {
    fn now(&mut self) -> Timestamp;
}

/// What a log record reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEntry {
    SessionStart,
    SessionEnd(EventCounters),
    CalibrationSucceeded,
    CalibrationFailed,
    Tuned(TuningParameters),
    Event(Event),
    /// A fatal error that ended the session
    Fault(Error),
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::SessionStart => f.write_str("Session start"),
            LogEntry::SessionEnd(counters) => write!(f, "Session end: {counters}"),
            LogEntry::CalibrationSucceeded => f.write_str("RCO calibration successful"),
            LogEntry::CalibrationFailed => f.write_str("RCO calibration failed"),
            LogEntry::Tuned(params) => write!(f, "Antenna tuned: {params}"),
            LogEntry::Event(event) => write!(f, "{event}"),
            LogEntry::Fault(err) => write!(f, "Fatal: {err}"),
        }
    }
}

/// One timestamped line of the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: Timestamp,
    pub entry: LogEntry,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.timestamp, self.entry)
    }
}

/// Append-only record sink.
pub trait EventLog {
    type Error: fmt::Debug;

    /// Appends and flushes one record.
    fn append(&mut self, record: &LogRecord) -> Result<(), Self::Error>;

    /// Flushes anything still buffered.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<W: EventLog + ?Sized> EventLog for &mut W {
    type Error = W::Error;

    fn append(&mut self, record: &LogRecord) -> Result<(), Self::Error> {
        (**self).append(record)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

/// Clock, event log and publisher of the running session.
pub struct Journal<'a, C, W, P> {
    clock: &'a mut C,
    log: &'a mut W,
    publisher: &'a mut P,
}

impl<'a, C, W, P> Journal<'a, C, W, P>
where
    C: Clock,
    W: EventLog,
    P: Publisher,
{
    pub fn new(clock: &'a mut C, log: &'a mut W, publisher: &'a mut P) -> Self {
        Self {
            clock,
            log,
            publisher,
        }
    }

    /// Timestamps and appends one record.
    ///
    /// # Errors
    /// * `Error::LogStream` - the record could not be written
    pub fn record(&mut self, entry: LogEntry) -> Result<LogRecord, Error> {
        let record = LogRecord {
            timestamp: self.clock.now(),
            entry,
        };
        info!("{record}");
        self.log.append(&record).map_err(|err| {
            log::error!("unable to append to event log: {err:?}");
            Error::LogStream
        })?;
        Ok(record)
    }

    /// Records a classified event and forwards it to the broker.
    pub fn report(&mut self, event: Event) -> Result<LogRecord, Error> {
        let record = self.record(LogEntry::Event(event))?;
        publish_event(&mut *self.publisher, &event);
        Ok(record)
    }

    /// # Errors
    /// * `Error::LogStream` - the log could not be flushed
    pub fn flush(&mut self) -> Result<(), Error> {
        self.log.flush().map_err(|err| {
            log::error!("unable to flush event log: {err:?}");
            Error::LogStream
        })
    }
}
