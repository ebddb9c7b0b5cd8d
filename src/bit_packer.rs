//! MSB-first bit accumulator.
//!
//! Packs odd-width fields into whole bytes and hands every completed
//! byte to the [`SerialBus`].

use crate::bus::SerialBus;

/// Accumulates single bits into bytes, most significant bit first.
pub struct BitPacker<'a, B: SerialBus> {
    bus: &'a mut B,
    byte: u8,
    filled: u8,
}

impl<'a, B: SerialBus> BitPacker<'a, B> {
    /// Create an empty packer writing to `bus`.
    pub fn new(bus: &'a mut B) -> Self {
        Self {
            bus,
            byte: 0,
            filled: 0,
        }
    }

    /// Place one bit at the next free position, emitting the byte once full.
    pub fn push_bit(&mut self, bit: bool) -> Result<(), B::Error> {
        if bit {
            self.byte |= 0x80 >> self.filled;
        }
        self.filled += 1;
        if self.filled == 8 {
            self.emit()?;
        }
        Ok(())
    }

    /// Push the low `width` bits of `value`, MSB first.
    ///
    /// Widths above 16 are treated as 16.
    pub fn push_bits(&mut self, value: u16, width: u8) -> Result<(), B::Error> {
        for shift in (0..width.min(16)).rev() {
            self.push_bit(((value >> shift) & 1) == 1)?;
        }
        Ok(())
    }

    /// Emit a partially filled byte; unfilled low bits are zero.
    pub fn flush(&mut self) -> Result<(), B::Error> {
        if self.filled > 0 {
            self.emit()?;
        }
        Ok(())
    }

    /// True when no bits are waiting for a byte boundary.
    pub const fn is_aligned(&self) -> bool {
        self.filled == 0
    }

    /// Number of bits held in the current byte.
    pub const fn pending_bits(&self) -> u8 {
        self.filled
    }

    /// Underlying bus, for whole-byte writes at a byte boundary.
    pub(crate) fn bus(&mut self) -> &mut B {
        self.bus
    }

    fn emit(&mut self) -> Result<(), B::Error> {
        let byte = self.byte;
        self.byte = 0;
        self.filled = 0;
        self.bus.write(&[byte])
    }
}
