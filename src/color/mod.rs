mod correction;

pub use correction::{gamma16, widen_rgb, widen8};
use smart_leds::{RGB, RGB8};

pub type Rgb = RGB8;
pub type Rgb16 = RGB<u16>;

/// Logical color of a channel output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Color {
    /// All colors in logical order.
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        Some(match index {
            0 => Self::Red,
            1 => Self::Green,
            2 => Self::Blue,
            _ => return None,
        })
    }
}

/// Split a color into logical `[r, g, b]` order.
pub const fn to_channels(color: Rgb16) -> [u16; 3] {
    [color.r, color.g, color.b]
}

/// Build a color from logical `[r, g, b]` order.
pub const fn from_channels(channels: [u16; 3]) -> Rgb16 {
    Rgb16 {
        r: channels[0],
        g: channels[1],
        b: channels[2],
    }
}
