//! Frame serializers.
//!
//! Each function writes exactly one chip's frame, i.e. everything the chip
//! shifts in after the mode bit. Framing (mode bit, begin/end, latch) is the
//! driver's job.

mod control;
mod grayscale;

pub use control::write_control_frame;
pub use grayscale::{physical_words, write_blank_frame, write_grayscale_frame};
