#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm;
use myrtio_tlc5955::{DriverConfig, GrayscaleClock, SerialBus, Tlc5955};

/// Everything the fakes observed, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Begin,
    End,
    Write(Vec<u8>),
    Words { width: u8, words: Vec<u8> },
    Suspend,
    Resume,
    Data(bool),
    Clock(bool),
    Latch(bool),
    Delay(u32),
    GsclkFrequency(u32),
    GsclkEnabled(bool),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

/// Serial bus that records every call
pub struct RecordingBus {
    log: Log,
    word_width: Option<u8>,
    fail_writes: bool,
}

impl RecordingBus {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            word_width: None,
            fail_writes: false,
        }
    }

    /// Advertise native support for one narrow word width
    pub fn with_word_width(mut self, width: u8) -> Self {
        self.word_width = Some(width);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    fn push(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl SerialBus for RecordingBus {
    type Error = BusFault;

    fn begin(&mut self) -> Result<(), BusFault> {
        self.push(Event::Begin);
        Ok(())
    }

    fn end(&mut self) -> Result<(), BusFault> {
        self.push(Event::End);
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), BusFault> {
        if self.fail_writes {
            return Err(BusFault);
        }
        self.push(Event::Write(bytes.to_vec()));
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), BusFault> {
        self.push(Event::Suspend);
        Ok(())
    }

    fn resume(&mut self) -> Result<(), BusFault> {
        self.push(Event::Resume);
        Ok(())
    }

    fn set_data(&mut self, high: bool) -> Result<(), BusFault> {
        self.push(Event::Data(high));
        Ok(())
    }

    fn set_clock(&mut self, high: bool) -> Result<(), BusFault> {
        self.push(Event::Clock(high));
        Ok(())
    }

    fn supports_word_width(&self, width: u8) -> bool {
        self.word_width == Some(width)
    }

    fn write_words(&mut self, width: u8, words: &[u8]) -> Result<(), BusFault> {
        self.push(Event::Words {
            width,
            words: words.to_vec(),
        });
        Ok(())
    }
}

/// Output pin that records its level changes as latch events
pub struct RecordingPin {
    log: Log,
    fail_high: bool,
}

impl RecordingPin {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail_high: false,
        }
    }

    /// Refuse every rising edge
    pub fn failing_high(mut self) -> Self {
        self.fail_high = true;
        self
    }
}

impl digital::ErrorType for RecordingPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), digital::ErrorKind> {
        self.log.borrow_mut().push(Event::Latch(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), digital::ErrorKind> {
        if self.fail_high {
            return Err(digital::ErrorKind::Other);
        }
        self.log.borrow_mut().push(Event::Latch(true));
        Ok(())
    }
}

pub struct RecordingDelay {
    log: Log,
}

impl RecordingDelay {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::Delay(ns));
    }
}

pub struct RecordingClock {
    log: Log,
}

impl RecordingClock {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl pwm::ErrorType for RecordingClock {
    type Error = Infallible;
}

impl GrayscaleClock for RecordingClock {
    fn set_frequency(&mut self, hz: u32) -> Result<(), Infallible> {
        self.log.borrow_mut().push(Event::GsclkFrequency(hz));
        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), Infallible> {
        self.log.borrow_mut().push(Event::GsclkEnabled(enabled));
        Ok(())
    }
}

pub type TestDriver = Tlc5955<RecordingBus, RecordingPin, RecordingDelay, RecordingClock, 4>;

/// Driver over recording fakes, with the construction events cleared
pub fn driver_with(bus: RecordingBus, log: &Log, config: &DriverConfig) -> TestDriver {
    driver_with_latch(bus, RecordingPin::new(log), log, config)
}

pub fn driver_with_latch(
    bus: RecordingBus,
    latch: RecordingPin,
    log: &Log,
    config: &DriverConfig,
) -> TestDriver {
    let driver = Tlc5955::new(
        bus,
        latch,
        RecordingDelay::new(log),
        RecordingClock::new(log),
        config,
    )
    .unwrap();
    log.borrow_mut().clear();
    driver
}

pub fn driver(chip_count: usize) -> (TestDriver, Log) {
    let log = new_log();
    let config = DriverConfig {
        chip_count,
        ..DriverConfig::default()
    };
    let driver = driver_with(RecordingBus::new(&log), &log, &config);
    (driver, log)
}

/// Bytes written between each `Begin` and `End`, one entry per frame
pub fn frames(log: &Log) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    let mut current: Option<Vec<u8>> = None;
    for event in log.borrow().iter() {
        match event {
            Event::Begin => current = Some(Vec::new()),
            Event::End => frames.extend(current.take()),
            Event::Write(bytes) => {
                if let Some(frame) = current.as_mut() {
                    frame.extend_from_slice(bytes);
                }
            }
            Event::Words { width, words } => {
                if let Some(frame) = current.as_mut() {
                    frame.extend(pack_words(*width, words));
                }
            }
            _ => {}
        }
    }
    frames
}

/// Pack narrow words MSB first into bytes
pub fn pack_words(width: u8, words: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut byte = 0u8;
    let mut filled = 0u8;
    for &word in words {
        for shift in (0..width).rev() {
            if (word >> shift) & 1 == 1 {
                byte |= 0x80 >> filled;
            }
            filled += 1;
            if filled == 8 {
                bytes.push(byte);
                byte = 0;
                filled = 0;
            }
        }
    }
    if filled > 0 {
        bytes.push(byte);
    }
    bytes
}

/// Events with delays filtered out
pub fn without_delays(log: &Log) -> Vec<Event> {
    log.borrow()
        .iter()
        .filter(|event| !matches!(event, Event::Delay(_)))
        .cloned()
        .collect()
}

/// Mode bit pulses: data level followed by a low-high-low clock
pub fn mode_pulses(log: &Log) -> Vec<bool> {
    let events = without_delays(log);
    events
        .windows(4)
        .filter_map(|window| match window {
            [
                Event::Data(level),
                Event::Clock(false),
                Event::Clock(true),
                Event::Clock(false),
            ] => Some(*level),
            _ => None,
        })
        .collect()
}

pub fn latch_pulses(log: &Log) -> usize {
    log.borrow()
        .iter()
        .filter(|event| **event == Event::Latch(true))
        .count()
}
