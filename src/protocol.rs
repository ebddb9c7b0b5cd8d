//! TLC5955 wire protocol constants.
//!
//! Field widths and frame sizes come from the TLC5955 datasheet
//! (SLVSBT7, "Control Data Latch" and "Grayscale Data Latch").

use embassy_time::Duration;

/// Number of RGB channels driven by one chip.
pub const LEDS_PER_CHIP: usize = 48;

/// Number of color outputs per channel.
pub const COLORS_PER_LED: usize = 3;

/// Grayscale width in bits.
pub const GS_BITS: u8 = 16;
/// Function control width in bits.
pub const FC_BITS: u8 = 5;
/// Global brightness control width in bits.
pub const BC_BITS: u8 = 7;
/// Maximum current width in bits.
pub const MC_BITS: u8 = 3;
/// Dot correction width in bits.
pub const DC_BITS: u8 = 7;

pub const BC_MAX: u8 = (1 << BC_BITS) - 1;
pub const MC_MAX: u8 = (1 << MC_BITS) - 1;
pub const DC_MAX: u8 = (1 << DC_BITS) - 1;

/// Selects a DC/MC/BC/FC write when the mode bit is high (`HLLHLHHL`).
pub const CONTROL_COMMAND: u8 = 0x96;

/// Zero bits between the command byte and the function data.
pub const CONTROL_ZERO_BITS: usize = 389;

/// Control frame size after the mode bit: 8 + 389 + 5 + 21 + 9 + 336 bits.
pub const CONTROL_FRAME_BYTES: usize = 96;

/// Grayscale frame size after the mode bit.
pub const GRAYSCALE_FRAME_BYTES: usize =
    LEDS_PER_CHIP * COLORS_PER_LED * (GS_BITS as usize / 8);

/// Minimum hold time around each latch edge.
pub const LATCH_DELAY: Duration = Duration::from_micros(1);

/// GS clock cycles in one full PWM period.
pub const GSCLK_CYCLES_PER_PERIOD: u64 = 1 << GS_BITS;
