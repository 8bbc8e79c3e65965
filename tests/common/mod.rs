//! Shared fakes for the integration tests
//!
//! Every hardware seam of the crate has an in-memory stand-in here: an SPI
//! register file, a recording register transport, a scripted IRQ line, a
//! clock, an event log, a publisher and a platform handing all of them out.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use as3935::journal::{Clock, EventLog, LogRecord, Timestamp};
use as3935::{Error, InterruptLine, Platform, Publisher, RegisterTransport, Resource};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin};
use embedded_hal::spi::{self, Operation, SpiDevice};

// ============================================================================
// SPI
// ============================================================================

/// Register file answering the AS3935 two byte SPI framing.
#[derive(Debug)]
pub struct FakeSpi {
    pub registers: [u8; 64],
    pub frames: Vec<[u8; 2]>,
    pub fail: bool,
}

impl Default for FakeSpi {
    fn default() -> Self {
        Self {
            registers: [0; 64],
            frames: Vec::new(),
            fail: false,
        }
    }
}

impl spi::ErrorType for FakeSpi {
    type Error = spi::ErrorKind;
}

impl SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(spi::ErrorKind::ModeFault);
        }

        for op in operations {
            match op {
                Operation::TransferInPlace(buf) if buf.len() == 2 => {
                    self.frames.push([buf[0], buf[1]]);
                    let address = usize::from(buf[0] & 0x3F);
                    if buf[0] & 0x40 != 0 {
                        buf[1] = self.registers[address];
                    } else {
                        self.registers[address] = buf[1];
                    }
                }
                Operation::Write(buf) if buf.len() == 2 => {
                    self.frames.push([buf[0], buf[1]]);
                    self.registers[usize::from(buf[0] & 0x3F)] = buf[1];
                }
                _ => return Err(spi::ErrorKind::Other),
            }
        }
        Ok(())
    }
}

// ============================================================================
// Register transport
// ============================================================================

/// One register access seen by [`FakeRegisters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(u8),
    Write(u8, u8),
}

#[derive(Debug)]
struct RegisterFile {
    values: [u8; 64],
    scripted: HashMap<u8, VecDeque<u8>>,
    log: Vec<Access>,
    fail_read: Option<u8>,
    fail_write: Option<u8>,
    freeze: Vec<u8>,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            values: [0; 64],
            scripted: HashMap::new(),
            log: Vec::new(),
            fail_read: None,
            fail_write: None,
            freeze: Vec::new(),
        }
    }
}

/// Register transport backed by a shared register file.
///
/// Clones share state, so a test can keep a handle while the driver owns
/// another. Reads of an address with scripted values pop those first.
#[derive(Debug, Clone, Default)]
pub struct FakeRegisters(Rc<RefCell<RegisterFile>>);

impl FakeRegisters {
    /// A sensor whose RCO calibration succeeds.
    pub fn calibrated() -> Self {
        let regs = Self::default();
        regs.set(0x3A, 0x80);
        regs.set(0x3B, 0x80);
        regs
    }

    pub fn set(&self, address: u8, value: u8) {
        self.0.borrow_mut().values[usize::from(address & 0x3F)] = value;
    }

    pub fn get(&self, address: u8) -> u8 {
        self.0.borrow().values[usize::from(address & 0x3F)]
    }

    /// Queues values returned by the next reads of `address`.
    pub fn script(&self, address: u8, values: &[u8]) {
        self.0
            .borrow_mut()
            .scripted
            .entry(address)
            .or_default()
            .extend(values.iter().copied());
    }

    /// Queues interrupt reasons for a session that still has to run `init`.
    ///
    /// `init` reads 0x03 once for its disturber-mask read-modify-write, so
    /// that read gets `0x00` and the reasons follow in order.
    pub fn script_interrupts(&self, reasons: &[u8]) {
        self.script(0x03, &[0x00]);
        self.script(0x03, reasons);
    }

    pub fn fail_reads_of(&self, address: u8) {
        self.0.borrow_mut().fail_read = Some(address);
    }

    pub fn fail_writes_to(&self, address: u8) {
        self.0.borrow_mut().fail_write = Some(address);
    }

    /// Ignores writes to `address`, as a register stuck at its value.
    pub fn freeze(&self, address: u8) {
        self.0.borrow_mut().freeze.push(address);
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.0.borrow().log.clone()
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.accesses()
            .into_iter()
            .filter_map(|access| match access {
                Access::Write(address, value) => Some((address, value)),
                Access::Read(_) => None,
            })
            .collect()
    }

    pub fn reads_of(&self, address: u8) -> usize {
        self.accesses()
            .iter()
            .filter(|access| **access == Access::Read(address))
            .count()
    }

    pub fn clear_log(&self) {
        self.0.borrow_mut().log.clear();
    }
}

impl RegisterTransport for FakeRegisters {
    fn read(&mut self, address: u8) -> Result<u8, Error> {
        let address = address & 0x3F;
        let mut file = self.0.borrow_mut();
        file.log.push(Access::Read(address));
        if file.fail_read == Some(address) {
            return Err(Error::Transport(spi::ErrorKind::Other));
        }
        if let Some(value) = file.scripted.get_mut(&address).and_then(VecDeque::pop_front) {
            return Ok(value);
        }
        Ok(file.values[usize::from(address)])
    }

    fn write(&mut self, address: u8, value: u8) -> Result<(), Error> {
        let address = address & 0x3F;
        let mut file = self.0.borrow_mut();
        file.log.push(Access::Write(address, value));
        if file.fail_write == Some(address) {
            return Err(Error::Transport(spi::ErrorKind::Other));
        }
        if !file.freeze.contains(&address) {
            file.values[usize::from(address)] = value;
        }
        Ok(())
    }
}

// ============================================================================
// Interrupt line
// ============================================================================

/// IRQ line replaying one level sequence per rising edge.
///
/// Once an edge's levels are used up the last level repeats, so a line
/// scripted `[true]` stays stuck high.
#[derive(Debug, Default)]
pub struct ScriptedLine {
    edges: VecDeque<Vec<bool>>,
    levels: VecDeque<bool>,
    last: bool,
    pub polls: u32,
    pub waits: u32,
    stop_after_last_edge: Option<Arc<AtomicBool>>,
    fail_wait: bool,
}

impl ScriptedLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an edge whose level reads return `levels` in order.
    pub fn edge(mut self, levels: &[bool]) -> Self {
        self.edges.push_back(levels.to_vec());
        self
    }

    /// An edge for an interrupt that is acknowledged on the first poll.
    pub fn pulse(self) -> Self {
        self.edge(&[true, false])
    }

    /// Sets `stop` as soon as the last edge has been handed out.
    pub fn stop_after_last_edge(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop_after_last_edge = Some(stop);
        self
    }

    pub fn failing_wait(mut self) -> Self {
        self.fail_wait = true;
        self
    }

    /// Loads levels without waiting, for driving the classifier directly.
    pub fn arm(&mut self) -> bool {
        match self.edges.pop_front() {
            Some(levels) => {
                self.levels = levels.into();
                true
            }
            None => false,
        }
    }

    fn level(&mut self) -> bool {
        self.polls += 1;
        if let Some(level) = self.levels.pop_front() {
            self.last = level;
        }
        self.last
    }
}

impl digital::ErrorType for ScriptedLine {
    type Error = digital::ErrorKind;
}

impl InputPin for ScriptedLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level())
    }
}

impl InterruptLine for ScriptedLine {
    fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.waits += 1;
        if self.fail_wait || !self.arm() {
            return Err(digital::ErrorKind::Other);
        }
        if self.edges.is_empty() {
            if let Some(stop) = &self.stop_after_last_edge {
                stop.store(true, Ordering::Release);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Delay, clock, log, publisher
// ============================================================================

/// Delay that returns immediately and remembers what was asked.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub ms: Vec<u32>,
    pub us: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_us(&mut self, us: u32) {
        self.us.push(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ms.push(ms);
    }
}

pub const NOON: Timestamp = Timestamp {
    year: 2025,
    month: 7,
    day: 14,
    hour: 12,
    minute: 0,
    second: 5,
};

/// Clock frozen at [`NOON`].
#[derive(Debug, Default)]
pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&mut self) -> Timestamp {
        NOON
    }
}

/// Event log keeping formatted lines in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    pub lines: Vec<String>,
    pub flushes: u32,
    pub fail: bool,
}

impl MemoryLog {
    /// Lines without their timestamp prefix.
    pub fn entries(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.split_once(" - ").map_or(line.clone(), |(_, e)| e.to_string()))
            .collect()
    }
}

impl EventLog for MemoryLog {
    type Error = &'static str;

    fn append(&mut self, record: &LogRecord) -> Result<(), Self::Error> {
        if self.fail {
            return Err("disk full");
        }
        self.lines.push(record.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

/// Publisher keeping every message.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    pub messages: Vec<(String, String)>,
}

impl Publisher for RecordingPublisher {
    fn publish(&mut self, topic: &str, payload: &str) {
        self.messages.push((topic.to_string(), payload.to_string()));
    }
}

// ============================================================================
// Platform
// ============================================================================

/// Platform handing out fakes and recording what is opened and released.
#[derive(Debug, Default)]
pub struct FakePlatform {
    pub bus: FakeRegisters,
    pub line: Option<ScriptedLine>,
    pub fail_bus: bool,
    pub fail_line: bool,
    pub fail_log: bool,
    pub events: Vec<&'static str>,
    pub closed_log: Option<MemoryLog>,
    pub released_line: Option<ScriptedLine>,
}

impl FakePlatform {
    pub fn new(bus: FakeRegisters, line: ScriptedLine) -> Self {
        Self {
            bus,
            line: Some(line),
            ..Self::default()
        }
    }

    pub fn log(&self) -> &MemoryLog {
        self.closed_log.as_ref().expect("log was never closed")
    }
}

impl Platform for FakePlatform {
    type Bus = FakeRegisters;
    type Line = ScriptedLine;
    type Log = MemoryLog;

    fn open_bus(&mut self) -> Result<Self::Bus, Error> {
        if self.fail_bus {
            return Err(Error::Resource(Resource::Bus));
        }
        self.events.push("open bus");
        Ok(self.bus.clone())
    }

    fn open_interrupt_line(&mut self) -> Result<Self::Line, Error> {
        if self.fail_line {
            return Err(Error::Resource(Resource::InterruptLine));
        }
        let line = self
            .line
            .take()
            .ok_or(Error::Resource(Resource::InterruptLine))?;
        self.events.push("open line");
        Ok(line)
    }

    fn open_log(&mut self) -> Result<Self::Log, Error> {
        if self.fail_log {
            return Err(Error::Resource(Resource::LogStream));
        }
        self.events.push("open log");
        Ok(MemoryLog::default())
    }

    fn release_bus(&mut self, _bus: Self::Bus) {
        self.events.push("release bus");
    }

    fn release_interrupt_line(&mut self, line: Self::Line) {
        self.events.push("release line");
        self.released_line = Some(line);
    }

    fn close_log(&mut self, log: Self::Log) {
        self.events.push("close log");
        self.closed_log = Some(log);
    }
}
