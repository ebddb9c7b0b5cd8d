//! Control register model.
//!
//! Every numeric field is clamped to its bit width on write.

use crate::color::Color;
use crate::protocol::{BC_MAX, DC_MAX, MC_MAX};

/// Function control bits (FC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionFlags {
    /// DSPRPT: auto display repeat.
    pub repeat_display: bool,
    /// TMGRST: display timing reset on latch.
    pub timing_reset: bool,
    /// RFRESH: auto data refresh.
    pub auto_refresh: bool,
    /// ESPWM: enhanced spectrum PWM.
    pub enhanced_pwm: bool,
    /// LSDVLT: LED short detection voltage select.
    pub lsd_voltage_select: bool,
}

impl FunctionFlags {
    /// Pack into the 5-bit FC field, DSPRPT at bit 0.
    pub const fn bits(self) -> u8 {
        (self.repeat_display as u8)
            | (self.timing_reset as u8) << 1
            | (self.auto_refresh as u8) << 2
            | (self.enhanced_pwm as u8) << 3
            | (self.lsd_voltage_select as u8) << 4
    }

    /// Unpack the 5-bit FC field; higher bits are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            repeat_display: bits & 0x01 != 0,
            timing_reset: bits & 0x02 != 0,
            auto_refresh: bits & 0x04 != 0,
            enhanced_pwm: bits & 0x08 != 0,
            lsd_voltage_select: bits & 0x10 != 0,
        }
    }
}

/// Global control settings shared by every chip in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSettings {
    function: FunctionFlags,
    brightness_control: [u8; 3],
    max_current: [u8; 3],
    dot_correction: [u8; 3],
}

impl ControlSettings {
    /// Full brightness and dot correction at the lowest current range.
    pub const fn new() -> Self {
        Self {
            function: FunctionFlags {
                repeat_display: false,
                timing_reset: false,
                auto_refresh: false,
                enhanced_pwm: false,
                lsd_voltage_select: false,
            },
            brightness_control: [BC_MAX; 3],
            max_current: [0; 3],
            dot_correction: [DC_MAX; 3],
        }
    }

    pub const fn function(&self) -> FunctionFlags {
        self.function
    }

    pub fn set_function(&mut self, function: FunctionFlags) {
        self.function = function;
    }

    /// Global brightness control per color (BC, 0-127).
    pub const fn brightness_control(&self) -> [u8; 3] {
        self.brightness_control
    }

    pub fn set_brightness_control(&mut self, values: [u8; 3]) {
        self.brightness_control = clamp_all(values, BC_MAX);
    }

    /// Maximum current range per color (MC, 0-7).
    pub const fn max_current(&self) -> [u8; 3] {
        self.max_current
    }

    pub fn set_max_current(&mut self, values: [u8; 3]) {
        self.max_current = clamp_all(values, MC_MAX);
    }

    /// Dot correction per color (DC, 0-127), same for every channel.
    pub const fn dot_correction(&self) -> [u8; 3] {
        self.dot_correction
    }

    pub fn set_dot_correction(&mut self, values: [u8; 3]) {
        self.dot_correction = clamp_all(values, DC_MAX);
    }

    pub const fn brightness_control_of(&self, color: Color) -> u8 {
        self.brightness_control[color.index()]
    }

    pub const fn max_current_of(&self, color: Color) -> u8 {
        self.max_current[color.index()]
    }

    pub const fn dot_correction_of(&self, color: Color) -> u8 {
        self.dot_correction[color.index()]
    }
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_all(values: [u8; 3], max: u8) -> [u8; 3] {
    values.map(|value| value.min(max))
}
