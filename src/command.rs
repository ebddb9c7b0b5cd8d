//! Command queue for multi-context applications.
//!
//! The driver is owned by one task. Other tasks and interrupt handlers send
//! [`LedCommand`]s through a bounded queue built on `critical-section` and
//! `heapless::Deque`; the owner drains it with
//! [`Tlc5955::apply_pending`](crate::Tlc5955::apply_pending) and decides when
//! to commit.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::Deque;

use crate::GrayscaleClock;
use crate::bus::SerialBus;
use crate::color::{Color, Rgb16};
use crate::driver::{LedOutOfRange, Tlc5955};
use crate::remap::ColorOrder;
use crate::settings::FunctionFlags;

/// A change to the driver's in-memory state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LedCommand {
    /// Set one channel.
    SetLed { led: usize, color: Rgb16 },
    /// Set every channel.
    SetAll(Rgb16),
    /// Use one color order for every channel.
    SetColorOrder(ColorOrder),
    /// Move one color of one channel to a physical position.
    SetColorPosition {
        led: usize,
        color: Color,
        position: u8,
    },
    SetDotCorrection([u8; 3]),
    SetBrightnessControl([u8; 3]),
    SetMaxCurrent([u8; 3]),
    SetFunction(FunctionFlags),
}

impl LedCommand {
    /// Whether the command changes grayscale frame contents.
    pub const fn affects_grayscale(&self) -> bool {
        matches!(
            self,
            Self::SetLed { .. }
                | Self::SetAll(_)
                | Self::SetColorOrder(_)
                | Self::SetColorPosition { .. }
        )
    }
}

/// Frames that need a commit after draining the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingUpdates {
    pub grayscale: bool,
    pub control: bool,
}

impl PendingUpdates {
    pub const fn has_updates(&self) -> bool {
        self.grayscale || self.control
    }
}

/// Error returned when the queue is full.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueFull(pub LedCommand);

/// Bounded, interrupt-safe command queue.
pub struct CommandChannel<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<LedCommand, SIZE>>>,
}

impl<const SIZE: usize> CommandChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Handle for producers; any number may coexist.
    pub const fn sender(&self) -> CommandSender<'_, SIZE> {
        CommandSender { channel: self }
    }

    /// Handle for the driver owner.
    pub const fn receiver(&self) -> CommandReceiver<'_, SIZE> {
        CommandReceiver { channel: self }
    }

    /// Queue a command, handing it back if the queue is full.
    pub fn try_send(&self, command: LedCommand) -> Result<(), QueueFull> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(QueueFull)
        })
    }

    /// Take the oldest command, if any.
    pub fn try_receive(&self) -> Option<LedCommand> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for CommandChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub struct CommandSender<'a, const SIZE: usize> {
    channel: &'a CommandChannel<SIZE>,
}

impl<const SIZE: usize> CommandSender<'_, SIZE> {
    pub fn try_send(&self, command: LedCommand) -> Result<(), QueueFull> {
        self.channel.try_send(command)
    }
}

#[derive(Clone, Copy)]
pub struct CommandReceiver<'a, const SIZE: usize> {
    channel: &'a CommandChannel<SIZE>,
}

impl<const SIZE: usize> CommandReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Option<LedCommand> {
        self.channel.try_receive()
    }
}

impl<B, L, D, C, const MAX_CHIPS: usize> Tlc5955<B, L, D, C, MAX_CHIPS>
where
    B: SerialBus,
    L: OutputPin,
    D: DelayNs,
    C: GrayscaleClock,
{
    /// Apply every queued command (non-blocking).
    ///
    /// Commands addressing a channel past the end of the chain are dropped
    /// and do not mark anything stale. Nothing is transmitted; the result
    /// says which frames need a commit.
    pub fn apply_pending<const SIZE: usize>(
        &mut self,
        commands: &CommandReceiver<'_, SIZE>,
    ) -> PendingUpdates {
        let mut updates = PendingUpdates::default();

        while let Some(command) = commands.try_receive() {
            if self.apply(command).is_err() {
                continue;
            }
            if command.affects_grayscale() {
                updates.grayscale = true;
            } else {
                updates.control = true;
            }
        }

        updates
    }

    fn apply(&mut self, command: LedCommand) -> Result<(), LedOutOfRange> {
        match command {
            LedCommand::SetLed { led, color } => return self.set_led_rgb(led, color),
            LedCommand::SetAll(color) => self.set_all_rgb(color),
            LedCommand::SetColorOrder(order) => self.set_color_order(order),
            LedCommand::SetColorPosition {
                led,
                color,
                position,
            } => return self.set_color_position(led, color, position),
            LedCommand::SetDotCorrection(values) => self.set_dot_correction_rgb(values),
            LedCommand::SetBrightnessControl(values) => self.set_brightness_control_rgb(values),
            LedCommand::SetMaxCurrent(values) => self.set_max_current_rgb(values),
            LedCommand::SetFunction(function) => self.set_function(function),
        }
        Ok(())
    }
}
