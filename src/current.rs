//! Output current model.
//!
//! Per-output current follows equation 1 of the TLC5955 datasheet:
//! `I = I_MC * (0.1 + 0.9 * BC / 127) * (0.262 + 0.738 * DC / 127) * GS / 65535`.

use crate::chip::Chip;
use crate::color::Color;
use crate::protocol::{BC_MAX, DC_MAX};
use crate::settings::ControlSettings;

/// Output current ceiling in amps for each max current (MC) step.
pub const MAX_CURRENT_TABLE: [f32; 8] = [
    0.0032, 0.0080, 0.0112, 0.0159, 0.0191, 0.0239, 0.0271, 0.0319,
];

const GS_FULL_SCALE: f32 = 65535.0;

/// Current of one output of `color` at full grayscale, in amps.
pub fn channel_current(settings: &ControlSettings, color: Color) -> f32 {
    let max_current = MAX_CURRENT_TABLE[usize::from(settings.max_current_of(color))];
    let brightness = f32::from(settings.brightness_control_of(color)) / f32::from(BC_MAX);
    let dot_correction = f32::from(settings.dot_correction_of(color)) / f32::from(DC_MAX);
    max_current * (0.1 + 0.9 * brightness) * (0.262 + 0.738 * dot_correction)
}

/// Current drawn by each output of a single channel, in amps.
pub fn led_currents(settings: &ControlSettings, grayscale: [u16; 3]) -> [f32; 3] {
    Color::ALL.map(|color| {
        channel_current(settings, color) * f32::from(grayscale[color.index()]) / GS_FULL_SCALE
    })
}

/// Total instantaneous current of every chip, in amps.
///
/// Grayscale is summed per color with integers first so the float scale is
/// applied three times regardless of chain length.
#[allow(clippy::cast_precision_loss)]
pub fn total_current<'a>(
    chips: impl IntoIterator<Item = &'a Chip>,
    settings: &ControlSettings,
) -> f32 {
    let sums = chips.into_iter().fold([0u64; 3], |mut sums, chip| {
        for (sum, chip_sum) in sums.iter_mut().zip(chip.color_sums()) {
            *sum += chip_sum;
        }
        sums
    });

    Color::ALL
        .iter()
        .map(|&color| sums[color.index()] as f32 * channel_current(settings, color) / GS_FULL_SCALE)
        .sum()
}
