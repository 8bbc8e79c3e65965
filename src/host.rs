//! Host-side implementations for Linux deployments
//!
//! Provides the pieces of a session that only need the standard library: the
//! append-only log file, the local wall clock and a sleeping delay. Opening
//! the SPI bus, requesting the GPIO line and connecting to the broker are left
//! to the binary wiring them up through [`Platform`](crate::Platform).

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use chrono::{Datelike, Local, Timelike};
use embedded_hal::delay::DelayNs;
use log::debug;

use crate::config::LOG_FILE_NAME;
use crate::journal::{Clock, EventLog, LogRecord, Timestamp};
use crate::{Error, Resource};

/// Event log backed by a file opened in append mode.
///
/// Each record is written as one line and flushed immediately.
#[derive(Debug)]
pub struct FileLog {
    writer: BufWriter<File>,
}

impl FileLog {
    /// Opens `path` for appending, creating it if needed.
    ///
    /// # Errors
    /// * `Error::Resource(Resource::LogStream)` - the file could not be opened
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| {
                log::error!("unable to open event log {}: {err}", path.display());
                Error::Resource(Resource::LogStream)
            })?;
        debug!("event log {} opened", path.display());

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Opens [`LOG_FILE_NAME`] inside `dir`.
    pub fn open_in<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        Self::open(dir.as_ref().join(LOG_FILE_NAME))
    }
}

impl EventLog for FileLog {
    type Error = io::Error;

    fn append(&mut self, record: &LogRecord) -> Result<(), Self::Error> {
        writeln!(self.writer, "{record}")?;
        self.writer.flush()
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.writer.flush()
    }
}

/// Local time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> Timestamp {
        let now = Local::now();
        Timestamp {
            year: u16::try_from(now.year()).unwrap_or_default(),
            month: now.month() as u8,
            day: now.day() as u8,
            hour: now.hour() as u8,
            minute: now.minute() as u8,
            second: now.second() as u8,
        }
    }
}

/// Delay implemented by putting the calling thread to sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
