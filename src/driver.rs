use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm;
use heapless::Vec;
use smart_leds::SmartLedsWrite;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::GrayscaleClock;
use crate::bus::SerialBus;
use crate::chip::Chip;
use crate::color::{Color, Rgb16, from_channels, to_channels};
use crate::current;
use crate::frame::{write_blank_frame, write_control_frame, write_grayscale_frame};
use crate::latch::Latch;
use crate::mode::{FrameMode, signal_mode};
use crate::protocol::{GSCLK_CYCLES_PER_PERIOD, LEDS_PER_CHIP};
use crate::remap::ColorOrder;
use crate::settings::{ControlSettings, FunctionFlags};

/// Driver error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error<E> {
    /// Serial transport failure.
    Bus(E),
    /// Latch pin failure.
    Latch(digital::ErrorKind),
    /// Grayscale clock failure.
    Clock(pwm::ErrorKind),
    /// Grayscale commit refused; nothing was transmitted.
    OverCurrent {
        /// Total current the frame would draw, in amps.
        amps: f32,
    },
    /// Chip count is zero or above the driver's capacity.
    InvalidChipCount,
}

/// LED index is past the end of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedOutOfRange;

/// Steps of one pass over the chain.
///
/// Every transmission starts at `Idle` and the driver is back in `Idle` when
/// the call returns. [`Tlc5955::last_phase`] reports how far the most recent
/// pass got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransmitPhase {
    /// Nothing sent yet, or the pass was refused before touching hardware.
    #[default]
    Idle,
    /// A mode bit went out but its frame was not fully shifted.
    ModeSignaled,
    /// Every chip's frame was shifted; the latch did not complete.
    FrameShifted,
    /// The whole chain was shifted and latched.
    Latched,
}

/// Driver configuration.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Number of daisy-chained chips.
    pub chip_count: usize,
    /// Color order of every channel.
    pub color_order: ColorOrder,
    /// Grayscale clock frequency in Hz.
    pub gsclk_frequency: u32,
    /// Current ceiling for grayscale commits, in amps.
    pub max_current_amps: f32,
    /// Refuse grayscale commits above `max_current_amps`.
    pub enforce_max_current: bool,
    /// Initial control register contents.
    pub control: ControlSettings,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            chip_count: 1,
            color_order: ColorOrder::RGB,
            gsclk_frequency: 2_500_000,
            max_current_amps: 5.0,
            enforce_max_current: false,
            control: ControlSettings::new(),
        }
    }
}

/// TLC5955 chain driver.
///
/// Owns the serial transport, the latch pin, the grayscale clock and the
/// state of up to `MAX_CHIPS` chips. Setters only touch memory; nothing
/// reaches the hardware until [`commit_grayscale`](Self::commit_grayscale)
/// or [`commit_control`](Self::commit_control).
pub struct Tlc5955<B, L, D, C, const MAX_CHIPS: usize> {
    bus: B,
    latch: Latch<L, D>,
    clock: C,
    chips: Vec<Chip, MAX_CHIPS>,
    control: ControlSettings,
    gsclk_frequency: u32,
    max_current_amps: f32,
    enforce_max_current: bool,
    last_phase: TransmitPhase,
}

impl<B, L, D, C, const MAX_CHIPS: usize> Tlc5955<B, L, D, C, MAX_CHIPS>
where
    B: SerialBus,
    L: OutputPin,
    D: DelayNs,
    C: GrayscaleClock,
{
    /// Create the driver, pull the latch low and start the grayscale clock.
    pub fn new(
        bus: B,
        latch: L,
        delay: D,
        clock: C,
        config: &DriverConfig,
    ) -> Result<Self, Error<B::Error>> {
        if config.chip_count == 0 || config.chip_count > MAX_CHIPS {
            return Err(Error::InvalidChipCount);
        }
        let mut chips = Vec::new();
        for _ in 0..config.chip_count {
            chips
                .push(Chip::new(config.color_order))
                .map_err(|_| Error::InvalidChipCount)?;
        }

        let mut driver = Self {
            bus,
            latch: Latch::new(latch, delay),
            clock,
            chips,
            control: config.control,
            gsclk_frequency: config.gsclk_frequency,
            max_current_amps: config.max_current_amps,
            enforce_max_current: config.enforce_max_current,
            last_phase: TransmitPhase::Idle,
        };
        driver.latch.hold().map_err(latch_error)?;
        driver.set_gsclk_frequency(config.gsclk_frequency)?;
        driver.clock.set_enabled(true).map_err(clock_error)?;
        Ok(driver)
    }

    /// Give back the hardware.
    pub fn release(self) -> (B, L, D, C) {
        let (latch, delay) = self.latch.release();
        (self.bus, latch, delay, self.clock)
    }

    pub fn chip_count(&self) -> usize {
        self.chips.len()
    }

    /// Number of addressable RGB channels in the chain.
    pub fn led_count(&self) -> usize {
        self.chips.len() * LEDS_PER_CHIP
    }

    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    /// Furthest phase the most recent transmission reached.
    ///
    /// `Latched` after a successful commit, the step a collaborator error
    /// interrupted otherwise, `Idle` after an over-current refusal.
    pub const fn last_phase(&self) -> TransmitPhase {
        self.last_phase
    }

    // Grayscale

    /// Set all three outputs of one channel to `value`.
    pub fn set_led(&mut self, led: usize, value: u16) -> Result<(), LedOutOfRange> {
        self.set_led_rgb(led, Rgb16::new(value, value, value))
    }

    /// Set one channel's red, green and blue independently.
    pub fn set_led_rgb(&mut self, led: usize, color: Rgb16) -> Result<(), LedOutOfRange> {
        let (chip, channel) = self.locate(led)?;
        if chip.set_channel(channel, to_channels(color)) {
            Ok(())
        } else {
            Err(LedOutOfRange)
        }
    }

    /// Set a single output of one channel.
    pub fn set_channel_value(
        &mut self,
        led: usize,
        color: Color,
        value: u16,
    ) -> Result<(), LedOutOfRange> {
        let mut channels = self.chip_channel(led)?;
        channels[color.index()] = value;
        self.set_led_rgb(led, from_channels(channels))
    }

    pub fn set_all(&mut self, value: u16) {
        self.set_all_rgb(Rgb16::new(value, value, value));
    }

    pub fn set_all_rgb(&mut self, color: Rgb16) {
        for chip in &mut self.chips {
            chip.fill(to_channels(color));
        }
    }

    /// Stored grayscale of one channel.
    pub fn led(&self, led: usize) -> Option<Rgb16> {
        self.chip_channel(led).ok().map(from_channels)
    }

    /// Stored grayscale of one output, in logical color terms.
    pub fn channel_value(&self, led: usize, color: Color) -> Option<u16> {
        self.led(led).map(|rgb| to_channels(rgb)[color.index()])
    }

    // Color order

    /// Use `order` for every channel of every chip.
    pub fn set_color_order(&mut self, order: ColorOrder) {
        for chip in &mut self.chips {
            chip.fill_color_order(order);
        }
    }

    /// Use `order` for one channel.
    pub fn set_color_order_led(
        &mut self,
        led: usize,
        order: ColorOrder,
    ) -> Result<(), LedOutOfRange> {
        let (chip, channel) = self.locate(led)?;
        if chip.set_color_order(channel, order) {
            Ok(())
        } else {
            Err(LedOutOfRange)
        }
    }

    /// Move one color of one channel to a physical position.
    ///
    /// The color that held the position takes the vacated one.
    pub fn set_color_position(
        &mut self,
        led: usize,
        color: Color,
        position: u8,
    ) -> Result<(), LedOutOfRange> {
        let order = self.color_order(led).ok_or(LedOutOfRange)?;
        self.set_color_order_led(led, order.with_position(color, position))
    }

    pub fn color_order(&self, led: usize) -> Option<ColorOrder> {
        let chip = self.chips.get(led / LEDS_PER_CHIP)?;
        chip.color_order(led % LEDS_PER_CHIP)
    }

    // Control register

    pub const fn control_settings(&self) -> &ControlSettings {
        &self.control
    }

    pub fn set_function(&mut self, function: FunctionFlags) {
        self.control.set_function(function);
    }

    pub const fn function(&self) -> FunctionFlags {
        self.control.function()
    }

    /// Same dot correction for every color, clamped to 127.
    pub fn set_dot_correction(&mut self, value: u8) {
        self.set_dot_correction_rgb([value; 3]);
    }

    /// Dot correction per color, each clamped to 127.
    pub fn set_dot_correction_rgb(&mut self, values: [u8; 3]) {
        self.control.set_dot_correction(values);
    }

    pub const fn dot_correction(&self) -> [u8; 3] {
        self.control.dot_correction()
    }

    /// Same brightness control for every color, clamped to 127.
    pub fn set_brightness_control(&mut self, value: u8) {
        self.set_brightness_control_rgb([value; 3]);
    }

    /// Brightness control per color, each clamped to 127.
    pub fn set_brightness_control_rgb(&mut self, values: [u8; 3]) {
        self.control.set_brightness_control(values);
    }

    pub const fn brightness_control(&self) -> [u8; 3] {
        self.control.brightness_control()
    }

    /// Same max current range for every color, clamped to 7.
    pub fn set_max_current(&mut self, value: u8) {
        self.set_max_current_rgb([value; 3]);
    }

    /// Max current range per color, each clamped to 7.
    pub fn set_max_current_rgb(&mut self, values: [u8; 3]) {
        self.control.set_max_current(values);
    }

    pub const fn max_current(&self) -> [u8; 3] {
        self.control.max_current()
    }

    // Current

    /// Total current the stored grayscale state would draw, in amps.
    pub fn total_current(&self) -> f32 {
        current::total_current(&self.chips, &self.control)
    }

    /// Current drawn by each output of a channel showing `color`, in amps.
    pub fn led_currents(&self, color: Rgb16) -> [f32; 3] {
        current::led_currents(&self.control, to_channels(color))
    }

    /// Change the grayscale commit ceiling.
    pub fn set_current_limit(&mut self, amps: f32, enforce: bool) {
        self.max_current_amps = amps;
        self.enforce_max_current = enforce;
    }

    /// Ceiling in amps, if enforced.
    pub fn current_limit(&self) -> Option<f32> {
        self.enforce_max_current.then_some(self.max_current_amps)
    }

    // Grayscale clock

    pub fn set_gsclk_frequency(&mut self, hz: u32) -> Result<(), Error<B::Error>> {
        self.clock.set_frequency(hz).map_err(clock_error)?;
        self.gsclk_frequency = hz;
        Ok(())
    }

    pub const fn gsclk_frequency(&self) -> u32 {
        self.gsclk_frequency
    }

    /// Length of one full 16-bit PWM period at the current GS clock.
    pub fn pwm_period(&self) -> Duration {
        if self.gsclk_frequency == 0 {
            return Duration::MAX;
        }
        Duration::from_micros(GSCLK_CYCLES_PER_PERIOD * 1_000_000 / u64::from(self.gsclk_frequency))
    }

    // Transmission

    /// Send the stored grayscale state to every chip and latch it.
    ///
    /// Returns the total current of the new frame. With an enforced ceiling
    /// the commit is refused before any hardware access when the frame
    /// would exceed it. The grayscale clock is stopped for an all-dark frame.
    pub fn commit_grayscale(&mut self) -> Result<f32, Error<B::Error>> {
        let amps = self.total_current();
        if let Some(limit) = self.current_limit() {
            if amps > limit {
                self.last_phase = TransmitPhase::Idle;
                #[cfg(feature = "esp32-log")]
                println!(
                    "[Tlc5955.commit_grayscale] refusing frame: {:?} A over {:?} A",
                    amps, limit
                );
                return Err(Error::OverCurrent { amps });
            }
        }

        self.transmit(FrameMode::Grayscale, |bus, chip, _| {
            write_grayscale_frame(bus, chip)
        })?;
        self.clock.set_enabled(amps > 0.0).map_err(clock_error)?;
        Ok(amps)
    }

    /// Send the control settings `repeat` times, latching after each pass.
    ///
    /// The chip only takes new control data reliably after consecutive
    /// identical writes; two is the usual count.
    pub fn commit_control(&mut self, repeat: u8) -> Result<(), Error<B::Error>> {
        #[cfg(feature = "esp32-log")]
        println!(
            "[Tlc5955.commit_control] writing {:?} x{:?}",
            self.control, repeat
        );
        for _ in 0..repeat {
            self.transmit(FrameMode::Control, |bus, _, settings| {
                write_control_frame(bus, settings)
            })?;
        }
        Ok(())
    }

    /// Turn every output off without touching the stored grayscale state.
    pub fn blank(&mut self) -> Result<(), Error<B::Error>> {
        self.transmit(FrameMode::Grayscale, |bus, _, _| write_blank_frame(bus))
    }

    /// One full pass over the chain: per chip (last first) mode bit and
    /// frame, then a single latch.
    fn transmit<F>(&mut self, mode: FrameMode, mut write_frame: F) -> Result<(), Error<B::Error>>
    where
        F: FnMut(&mut B, &Chip, &ControlSettings) -> Result<(), B::Error>,
    {
        self.last_phase = TransmitPhase::Idle;
        self.latch.hold().map_err(latch_error)?;
        for chip in self.chips.iter().rev() {
            signal_mode(&mut self.bus, mode).map_err(Error::Bus)?;
            self.last_phase = TransmitPhase::ModeSignaled;

            self.bus.begin().map_err(Error::Bus)?;
            write_frame(&mut self.bus, chip, &self.control).map_err(Error::Bus)?;
            self.bus.end().map_err(Error::Bus)?;
        }
        self.last_phase = TransmitPhase::FrameShifted;

        self.latch.pulse().map_err(latch_error)?;
        self.last_phase = TransmitPhase::Latched;
        Ok(())
    }

    fn locate(&mut self, led: usize) -> Result<(&mut Chip, usize), LedOutOfRange> {
        let chip = self
            .chips
            .get_mut(led / LEDS_PER_CHIP)
            .ok_or(LedOutOfRange)?;
        Ok((chip, led % LEDS_PER_CHIP))
    }

    fn chip_channel(&self, led: usize) -> Result<[u16; 3], LedOutOfRange> {
        self.chips
            .get(led / LEDS_PER_CHIP)
            .and_then(|chip| chip.channel(led % LEDS_PER_CHIP))
            .ok_or(LedOutOfRange)
    }
}

impl<B, L, D, C, const MAX_CHIPS: usize> SmartLedsWrite for Tlc5955<B, L, D, C, MAX_CHIPS>
where
    B: SerialBus,
    L: OutputPin,
    D: DelayNs,
    C: GrayscaleClock,
{
    type Error = Error<B::Error>;
    type Color = Rgb16;

    /// Fill channels from 0 upwards and commit a grayscale frame.
    ///
    /// Channels past the end of the iterator keep their values.
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let slots = self.chips.iter_mut().flat_map(|chip| chip.grayscale.iter_mut());
        for (slot, color) in slots.zip(iterator) {
            *slot = to_channels(color.into());
        }
        self.commit_grayscale().map(|_| ())
    }
}

fn latch_error<E>(error: impl digital::Error) -> Error<E> {
    Error::Latch(error.kind())
}

fn clock_error<E>(error: impl pwm::Error) -> Error<E> {
    Error::Clock(error.kind())
}
