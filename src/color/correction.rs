use super::{Rgb, Rgb16};

/// Stretch an 8-bit level to the full 16-bit range (`0xAB` -> `0xABAB`).
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn widen8(value: u8) -> u16 {
    value as u16 * 257
}

/// Stretch every component of an 8-bit color to 16 bits.
pub const fn widen_rgb(color: Rgb) -> Rgb16 {
    Rgb16 {
        r: widen8(color.r),
        g: widen8(color.g),
        b: widen8(color.b),
    }
}

/// Map an 8-bit level through a power curve onto the 16-bit grayscale range.
///
/// With 16-bit PWM the low end keeps enough resolution that a perceptual
/// curve does not lose distinct steps.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn gamma16(value: u8, gamma: f32) -> u16 {
    if value == 0 {
        return 0;
    }
    let normalized = f32::from(value) / 255.0;
    let scaled = libm::powf(normalized, gamma) * 65535.0;
    libm::roundf(scaled).clamp(0.0, 65535.0) as u16
}
