#![no_std]

pub mod bit_packer;
pub mod bus;
pub mod chip;
pub mod color;
pub mod command;
pub mod current;
pub mod driver;
pub mod frame;
pub mod latch;
pub mod mode;
pub mod protocol;
pub mod remap;
pub mod settings;

pub use bit_packer::BitPacker;
pub use bus::{BitBangBus, ModeLines, SerialBus, SpiTransport, SpiTransportError};
pub use chip::Chip;
pub use command::{
    CommandChannel, CommandReceiver, CommandSender, LedCommand, PendingUpdates, QueueFull,
};
pub use driver::{DriverConfig, Error, LedOutOfRange, Tlc5955, TransmitPhase};
pub use mode::FrameMode;
pub use protocol::LEDS_PER_CHIP;
pub use remap::ColorOrder;
pub use settings::{ControlSettings, FunctionFlags};

pub use color::{Color, Rgb, Rgb16, gamma16, widen_rgb, widen8};
pub use embassy_time::Duration;

/// Grayscale clock (GSCLK) generator.
///
/// The chip counts GS clock edges to produce its PWM outputs. Implement this
/// for whatever timer or PWM peripheral feeds the GSCLK pin.
pub trait GrayscaleClock: embedded_hal::pwm::ErrorType {
    /// Change the clock frequency in Hz.
    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error>;

    /// Start or stop the clock.
    fn set_enabled(&mut self, enabled: bool) -> Result<(), Self::Error>;
}

/// GS clock driven by something outside the driver's control.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalClock;

impl embedded_hal::pwm::ErrorType for ExternalClock {
    type Error = core::convert::Infallible;
}

impl GrayscaleClock for ExternalClock {
    fn set_frequency(&mut self, _hz: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_enabled(&mut self, _enabled: bool) -> Result<(), Self::Error> {
        Ok(())
    }
}
