#![allow(unused_braces)]
use modular_bitfield_msb::prelude::*;

/// Result reported by the device in parameter responses
#[derive(BitfieldSpecifier, Copy, Clone, Debug, PartialEq, Eq)]
#[bits = 4]
pub enum ResponseStatus {
    Ok = 0,
    OutOfRange = 1,
    Unsupported = 2,
}

impl Default for ResponseStatus {
    fn default() -> Self {
        Self::Ok
    }
}

#[bitfield(bits = 64)]
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
/// Payload of parameter set, request and response frames
pub struct ParamFrame {
    /// Parameter enumeration value
    pub param: B12,
    /// Device result, only used in responses
    pub status: ResponseStatus,
    /// Auxiliary value
    pub sub_value: B8,
    /// Parameter instance
    pub ordinal: B8,
    /// Two's complement parameter value
    pub value: B32,
}

impl ParamFrame {
    /// Value truncated toward zero to the 32-bit wire representation
    pub fn with_param_value(self, value: f64) -> Self {
        self.with_value(value as i32 as u32)
    }

    pub fn param_value(&self) -> f64 {
        self.value() as i32 as f64
    }
}

#[bitfield(bits = 64)]
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
/// Payload of the general control frame
pub struct ControlGeneralFrame {
    /// LED channel A duty cycle
    pub led_a: B10,
    /// LED channel B duty cycle
    pub led_b: B10,
    /// LED channel C duty cycle
    pub led_c: B10,
    /// Output level of the general purpose pins
    pub general_output: B11,
    /// Output enable of the general purpose pins
    pub output_enable: B11,
    #[skip]
    __: B12,
}

#[bitfield(bits = 64)]
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
/// Payload of the PWM output control frame
pub struct ControlPwmFrame {
    pub pwm0: B10,
    pub pwm1: B10,
    pub pwm2: B10,
    pub pwm3: B10,
    /// One enable bit per channel, channel 0 is the LSB
    pub enable: B4,
    #[skip]
    __: B20,
}

impl ControlPwmFrame {
    /// Sets the duty cycle of the given channel, returns None for unknown channels
    pub fn with_duty_cycle(self, channel: u32, duty_cycle: u16) -> Option<Self> {
        match channel {
            0 => Some(self.with_pwm0(duty_cycle)),
            1 => Some(self.with_pwm1(duty_cycle)),
            2 => Some(self.with_pwm2(duty_cycle)),
            3 => Some(self.with_pwm3(duty_cycle)),
            _ => None,
        }
    }

    /// Sets the enable bit of the given channel, returns None for unknown channels
    pub fn with_channel_enabled(self, channel: u32, enable: bool) -> Option<Self> {
        if channel > 3 {
            return None;
        }

        let bit = 1u8 << channel;
        let bits = if enable {
            self.enable() | bit
        } else {
            self.enable() & !bit
        };

        Some(self.with_enable(bits & 0xF))
    }
}
