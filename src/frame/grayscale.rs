use crate::bus::SerialBus;
use crate::chip::Chip;
use crate::protocol::{COLORS_PER_LED, GRAYSCALE_FRAME_BYTES, LEDS_PER_CHIP};

/// Grayscale words of one chip in shift order.
///
/// Channels 47 down to 0, and within a channel physical positions 2 down
/// to 0, each carrying the logical color its [`ColorOrder`] puts there.
///
/// [`ColorOrder`]: crate::remap::ColorOrder
pub fn physical_words(chip: &Chip) -> impl Iterator<Item = u16> + '_ {
    (0..LEDS_PER_CHIP).rev().flat_map(move |led| {
        let channel = chip.grayscale[led];
        let order = chip.order[led];
        (0..COLORS_PER_LED as u8)
            .rev()
            .map(move |position| channel[order.color_at(position).index()])
    })
}

/// Write one grayscale frame, 16 bits per output, MSB first.
pub fn write_grayscale_frame<B: SerialBus>(bus: &mut B, chip: &Chip) -> Result<(), B::Error> {
    let mut frame = [0u8; GRAYSCALE_FRAME_BYTES];
    for (bytes, word) in frame.chunks_exact_mut(2).zip(physical_words(chip)) {
        bytes.copy_from_slice(&word.to_be_bytes());
    }
    bus.write(&frame)
}

/// Write a grayscale frame with every output off.
pub fn write_blank_frame<B: SerialBus>(bus: &mut B) -> Result<(), B::Error> {
    bus.write(&[0; GRAYSCALE_FRAME_BYTES])
}
