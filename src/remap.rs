//! Logical color to physical output mapping.
//!
//! Boards route the R/G/B legs of an LED to the chip's three outputs of a
//! channel in whatever order the layout allowed. A [`ColorOrder`] records,
//! for each logical color, the physical position it is shifted out at.

use crate::color::Color;

/// Permutation of physical positions, indexed by logical color.
///
/// Always a permutation of `{0, 1, 2}`; every constructor preserves that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOrder([u8; 3]);

impl ColorOrder {
    /// Positions 0, 1, 2 carry red, green, blue.
    pub const RGB: Self = Self([0, 1, 2]);
    /// Positions 0, 1, 2 carry red, blue, green.
    pub const RBG: Self = Self([0, 2, 1]);
    /// Positions 0, 1, 2 carry green, red, blue.
    pub const GRB: Self = Self([1, 0, 2]);
    /// Positions 0, 1, 2 carry green, blue, red.
    pub const GBR: Self = Self([2, 0, 1]);
    /// Positions 0, 1, 2 carry blue, red, green.
    pub const BRG: Self = Self([1, 2, 0]);
    /// Positions 0, 1, 2 carry blue, green, red.
    pub const BGR: Self = Self([2, 1, 0]);

    /// Build an order from the physical position of red, green and blue.
    ///
    /// Returns `None` unless the positions are a permutation of `{0, 1, 2}`.
    pub const fn new(red: u8, green: u8, blue: u8) -> Option<Self> {
        if red > 2 || green > 2 || blue > 2 {
            return None;
        }
        if red == green || green == blue || red == blue {
            return None;
        }
        Some(Self([red, green, blue]))
    }

    /// Physical position of a logical color.
    pub const fn position(self, color: Color) -> u8 {
        self.0[color.index()]
    }

    /// Logical color shifted out at a physical position.
    ///
    /// Positions above 2 are treated as 2.
    pub const fn color_at(self, position: u8) -> Color {
        let position = if position > 2 { 2 } else { position };
        if self.0[0] == position {
            Color::Red
        } else if self.0[1] == position {
            Color::Green
        } else {
            Color::Blue
        }
    }

    /// Move one color to `position`; the color that held it takes the
    /// vacated position.
    ///
    /// Positions above 2 are clamped to 2.
    #[must_use]
    pub const fn with_position(self, color: Color, position: u8) -> Self {
        let position = if position > 2 { 2 } else { position };
        let displaced = self.color_at(position);
        let mut positions = self.0;
        positions[displaced.index()] = positions[color.index()];
        positions[color.index()] = position;
        Self(positions)
    }

    /// Positions of red, green and blue.
    pub const fn positions(self) -> [u8; 3] {
        self.0
    }
}

impl Default for ColorOrder {
    fn default() -> Self {
        Self::RGB
    }
}
