use crate::bit_packer::BitPacker;
use crate::bus::SerialBus;
use crate::color::Color;
use crate::protocol::{
    BC_BITS, COLORS_PER_LED, CONTROL_COMMAND, CONTROL_ZERO_BITS, DC_BITS, FC_BITS,
    LEDS_PER_CHIP, MC_BITS,
};
use crate::settings::ControlSettings;

const PADDING_BYTES: usize = CONTROL_ZERO_BITS / 8;
const PADDING_BITS: usize = CONTROL_ZERO_BITS % 8;
const DC_WORDS: usize = LEDS_PER_CHIP * COLORS_PER_LED;

/// Write one control frame: command byte, zero padding, FC, BC, MC, DC.
///
/// Colors go out in descending index order, channels from 47 down to 0.
pub fn write_control_frame<B: SerialBus>(
    bus: &mut B,
    settings: &ControlSettings,
) -> Result<(), B::Error> {
    bus.write(&[CONTROL_COMMAND])?;
    bus.write(&[0; PADDING_BYTES])?;

    let mut packer = BitPacker::new(bus);
    for _ in 0..PADDING_BITS {
        packer.push_bit(false)?;
    }
    packer.push_bits(u16::from(settings.function().bits()), FC_BITS)?;
    for &color in Color::ALL.iter().rev() {
        packer.push_bits(u16::from(settings.brightness_control_of(color)), BC_BITS)?;
    }
    for &color in Color::ALL.iter().rev() {
        packer.push_bits(u16::from(settings.max_current_of(color)), MC_BITS)?;
    }

    write_dot_correction(&mut packer, settings)?;
    packer.flush()
}

fn write_dot_correction<B: SerialBus>(
    packer: &mut BitPacker<'_, B>,
    settings: &ControlSettings,
) -> Result<(), B::Error> {
    let descending = Color::ALL.iter().rev().cycle();

    // 5 + 5 + 21 + 9 bits leave the packer on a byte boundary here.
    if packer.is_aligned() && packer.bus().supports_word_width(DC_BITS) {
        let mut words = [0u8; DC_WORDS];
        for (word, &color) in words.iter_mut().zip(descending) {
            *word = settings.dot_correction_of(color);
        }
        return packer.bus().write_words(DC_BITS, &words);
    }

    for &color in descending.take(DC_WORDS) {
        packer.push_bits(u16::from(settings.dot_correction_of(color)), DC_BITS)?;
    }
    Ok(())
}
