//! Serial transport abstraction.
//!
//! The chip is fed through a clocked, MSB-first serial line. Before every
//! frame the same two lines have to be driven by hand for the mode bit, so the
//! transport exposes both the byte-level interface and direct control over the
//! data and clock lines.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::spi::SpiBus;

use crate::bit_packer::BitPacker;

/// Transport collaborator used by the frame builders.
pub trait SerialBus {
    type Error;

    /// Acquire the bus for one frame.
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Release the bus after a frame; all bytes must be on the wire.
    fn end(&mut self) -> Result<(), Self::Error>;

    /// Shift out `bytes`, MSB first, blocking until done.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Hand the data and clock lines over to [`set_data`](Self::set_data)
    /// and [`set_clock`](Self::set_clock).
    fn suspend(&mut self) -> Result<(), Self::Error>;

    /// Give the data and clock lines back to the serial peripheral.
    fn resume(&mut self) -> Result<(), Self::Error>;

    /// Drive the data line while suspended.
    fn set_data(&mut self, high: bool) -> Result<(), Self::Error>;

    /// Drive the clock line while suspended.
    fn set_clock(&mut self, high: bool) -> Result<(), Self::Error>;

    /// Whether [`write_words`](Self::write_words) shifts `width`-bit words natively.
    fn supports_word_width(&self, _width: u8) -> bool {
        false
    }

    /// Shift out the low `width` bits of every word, MSB first.
    ///
    /// Widths above 8 are treated as 8. The default packs the words into
    /// bytes, so it is only correct when the total bit count is a multiple
    /// of eight.
    fn write_words(&mut self, width: u8, words: &[u8]) -> Result<(), Self::Error>
    where
        Self: Sized,
    {
        let mut packer = BitPacker::new(self);
        for &word in words {
            packer.push_bits(u16::from(word), width.min(8))?;
        }
        packer.flush()
    }
}

/// Bit-banged transport over two GPIO outputs.
///
/// Data is set while the clock is low and sampled by the chip on the
/// rising edge. Any word width from 1 to 8 bits is shifted natively.
pub struct BitBangBus<DATA, CLK, D> {
    data: DATA,
    clock: CLK,
    delay: D,
    half_period_ns: u32,
}

impl<DATA, CLK, D, E> BitBangBus<DATA, CLK, D>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    D: DelayNs,
{
    /// Default half clock period (~1 MHz).
    pub const DEFAULT_HALF_PERIOD_NS: u32 = 500;

    pub const fn new(data: DATA, clock: CLK, delay: D) -> Self {
        Self {
            data,
            clock,
            delay,
            half_period_ns: Self::DEFAULT_HALF_PERIOD_NS,
        }
    }

    /// Override the half clock period.
    #[must_use]
    pub const fn with_half_period_ns(mut self, half_period_ns: u32) -> Self {
        self.half_period_ns = half_period_ns;
        self
    }

    /// Give back the pins and delay.
    pub fn release(self) -> (DATA, CLK, D) {
        (self.data, self.clock, self.delay)
    }

    fn shift_bit(&mut self, bit: bool) -> Result<(), E> {
        self.data.set_state(PinState::from(bit))?;
        self.delay.delay_ns(self.half_period_ns);
        self.clock.set_high()?;
        self.delay.delay_ns(self.half_period_ns);
        self.clock.set_low()
    }

    /// Widths above 8 are treated as 8.
    fn shift_word(&mut self, word: u8, width: u8) -> Result<(), E> {
        for shift in (0..width.min(8)).rev() {
            self.shift_bit(((word >> shift) & 1) == 1)?;
        }
        Ok(())
    }
}

impl<DATA, CLK, D, E> SerialBus for BitBangBus<DATA, CLK, D>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    D: DelayNs,
{
    type Error = E;

    fn begin(&mut self) -> Result<(), E> {
        self.clock.set_low()
    }

    fn end(&mut self) -> Result<(), E> {
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), E> {
        for &byte in bytes {
            self.shift_word(byte, 8)?;
        }
        Ok(())
    }

    // The lines are plain GPIO already.
    fn suspend(&mut self) -> Result<(), E> {
        Ok(())
    }

    fn resume(&mut self) -> Result<(), E> {
        Ok(())
    }

    fn set_data(&mut self, high: bool) -> Result<(), E> {
        self.data.set_state(PinState::from(high))
    }

    fn set_clock(&mut self, high: bool) -> Result<(), E> {
        self.clock.set_state(PinState::from(high))
    }

    fn supports_word_width(&self, width: u8) -> bool {
        (1..=8).contains(&width)
    }

    fn write_words(&mut self, width: u8, words: &[u8]) -> Result<(), E> {
        for &word in words {
            self.shift_word(word, width)?;
        }
        Ok(())
    }
}

/// Platform hook that moves the SPI data and clock pins between the SPI
/// peripheral and plain GPIO.
pub trait ModeLines {
    type Error;

    /// Detach both lines from the peripheral and drive them as outputs.
    fn take_over(&mut self) -> Result<(), Self::Error>;

    /// Reattach both lines to the peripheral.
    fn hand_back(&mut self) -> Result<(), Self::Error>;

    fn set_data(&mut self, high: bool) -> Result<(), Self::Error>;

    fn set_clock(&mut self, high: bool) -> Result<(), Self::Error>;
}

/// Error of [`SpiTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiTransportError<S, L> {
    /// SPI peripheral failure.
    Spi(S),
    /// Pin hand-over failure.
    Lines(L),
}

/// Hardware SPI transport (mode 0, MSB first).
pub struct SpiTransport<SPI, L> {
    spi: SPI,
    lines: L,
}

impl<SPI, L> SpiTransport<SPI, L>
where
    SPI: SpiBus<u8>,
    L: ModeLines,
{
    pub const fn new(spi: SPI, lines: L) -> Self {
        Self { spi, lines }
    }

    pub fn release(self) -> (SPI, L) {
        (self.spi, self.lines)
    }
}

impl<SPI, L> SerialBus for SpiTransport<SPI, L>
where
    SPI: SpiBus<u8>,
    L: ModeLines,
{
    type Error = SpiTransportError<SPI::Error, L::Error>;

    fn begin(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        self.spi.flush().map_err(SpiTransportError::Spi)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(bytes).map_err(SpiTransportError::Spi)
    }

    fn suspend(&mut self) -> Result<(), Self::Error> {
        self.spi.flush().map_err(SpiTransportError::Spi)?;
        self.lines.take_over().map_err(SpiTransportError::Lines)
    }

    fn resume(&mut self) -> Result<(), Self::Error> {
        self.lines.hand_back().map_err(SpiTransportError::Lines)
    }

    fn set_data(&mut self, high: bool) -> Result<(), Self::Error> {
        self.lines.set_data(high).map_err(SpiTransportError::Lines)
    }

    fn set_clock(&mut self, high: bool) -> Result<(), Self::Error> {
        self.lines.set_clock(high).map_err(SpiTransportError::Lines)
    }
}
