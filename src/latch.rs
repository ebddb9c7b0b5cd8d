use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::protocol::LATCH_DELAY;

/// Drives the LAT pin that moves shifted data into the chip's registers.
pub struct Latch<P, D> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Latch<P, D> {
    pub const fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Hold the latch low so shifted bits are not committed early.
    pub fn hold(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()
    }

    /// Pulse low -> high -> low with [`LATCH_DELAY`] around each edge.
    pub fn pulse(&mut self) -> Result<(), P::Error> {
        let delay_us = latch_delay_us();
        self.delay.delay_us(delay_us);
        self.pin.set_high()?;
        self.delay.delay_us(delay_us);
        self.pin.set_low()?;
        self.delay.delay_us(delay_us);
        Ok(())
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

fn latch_delay_us() -> u32 {
    u32::try_from(LATCH_DELAY.as_micros()).unwrap_or(u32::MAX)
}
