use crate::color::Color;
use crate::protocol::LEDS_PER_CHIP;
use crate::remap::ColorOrder;

/// Grayscale and remap state of one chip in the chain.
#[derive(Debug, Clone)]
pub struct Chip {
    /// Grayscale per channel, logical `[r, g, b]` order.
    pub(crate) grayscale: [[u16; 3]; LEDS_PER_CHIP],
    /// Physical position of each logical color per channel.
    pub(crate) order: [ColorOrder; LEDS_PER_CHIP],
}

impl Chip {
    /// All channels dark, every channel using `order`.
    pub const fn new(order: ColorOrder) -> Self {
        Self {
            grayscale: [[0; 3]; LEDS_PER_CHIP],
            order: [order; LEDS_PER_CHIP],
        }
    }

    /// Grayscale of one channel in logical order.
    pub fn channel(&self, led: usize) -> Option<[u16; 3]> {
        self.grayscale.get(led).copied()
    }

    /// Grayscale of a single color output.
    pub fn value(&self, led: usize, color: Color) -> Option<u16> {
        self.grayscale.get(led).map(|channel| channel[color.index()])
    }

    pub fn color_order(&self, led: usize) -> Option<ColorOrder> {
        self.order.get(led).copied()
    }

    /// Sum of grayscale values per logical color.
    pub fn color_sums(&self) -> [u64; 3] {
        self.grayscale.iter().fold([0; 3], |mut sums, channel| {
            for (sum, &value) in sums.iter_mut().zip(channel) {
                *sum += u64::from(value);
            }
            sums
        })
    }

    pub(crate) fn set_channel(&mut self, led: usize, channels: [u16; 3]) -> bool {
        let Some(slot) = self.grayscale.get_mut(led) else {
            return false;
        };
        *slot = channels;
        true
    }

    pub(crate) fn set_color_order(&mut self, led: usize, order: ColorOrder) -> bool {
        let Some(slot) = self.order.get_mut(led) else {
            return false;
        };
        *slot = order;
        true
    }

    pub(crate) fn fill(&mut self, channels: [u16; 3]) {
        self.grayscale = [channels; LEDS_PER_CHIP];
    }

    pub(crate) fn fill_color_order(&mut self, order: ColorOrder) {
        self.order = [order; LEDS_PER_CHIP];
    }
}
