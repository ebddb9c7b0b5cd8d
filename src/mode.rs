//! Mode bit signalling.
//!
//! The first bit the chip clocks in selects how the rest of the frame is
//! read: high for control data, low for grayscale. It is not part of a byte,
//! so it is clocked by hand with the serial peripheral suspended.

use crate::bus::SerialBus;

/// Frame type selected by the mode bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    Grayscale,
    Control,
}

impl FrameMode {
    /// Data line level for this mode.
    pub const fn level(self) -> bool {
        matches!(self, Self::Control)
    }
}

/// Clock the mode bit out: data to level, clock low -> high -> low.
pub fn signal_mode<B: SerialBus>(bus: &mut B, mode: FrameMode) -> Result<(), B::Error> {
    bus.suspend()?;
    bus.set_data(mode.level())?;
    bus.set_clock(false)?;
    bus.set_clock(true)?;
    bus.set_clock(false)?;
    bus.resume()
}
