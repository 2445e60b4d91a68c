//!# Device link
//! [DeviceLink] is the boundary to the transport carrying requests to one device.
//! Implementations handle one request at a time; callers serialize access through `&mut self`.
//!
//! [crate::can::CanLink] implements it on top of a CAN bus.

use crate::error::DeviceError;
use crate::params::ParamEnum;
use crate::status::{GeneralPin, PwmInput, QuadratureReading};
use serde::{Deserialize, Serialize};

/// Number of PWM output/input channels
pub const PWM_CHANNELS: u32 = 4;

/// Bitmask reported by the device
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BitmaskKind {
    Pins,
    Faults,
    StickyFaults,
}

/// Periodic status frames sent by the device, discriminant is the frame API id
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFrame {
    General1 = 0x041400,
    General2 = 0x041440,
    PwmInputs0 = 0x041480,
    PwmInputs1 = 0x0414C0,
    PwmInputs2 = 0x041500,
    PwmInputs3 = 0x041540,
    Misc = 0x0415C0,
}

impl StatusFrame {
    pub const ALL: [StatusFrame; 7] = [
        StatusFrame::General1,
        StatusFrame::General2,
        StatusFrame::PwmInputs0,
        StatusFrame::PwmInputs1,
        StatusFrame::PwmInputs2,
        StatusFrame::PwmInputs3,
        StatusFrame::Misc,
    ];

    pub const fn api(self) -> u32 {
        self as u32
    }

    /// Frame index used as parameter ordinal when configuring the frame period
    pub const fn index(self) -> u8 {
        ((self.api() >> 6) & 0xFF) as u8
    }

    pub fn from_api(api: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|frame| frame.api() == api)
    }
}

/// Control frames sent to the device, discriminant is the frame API id
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlFrame {
    General = 0x040000,
    PwmOutput = 0x040040,
}

impl ControlFrame {
    pub const fn api(self) -> u32 {
        self as u32
    }
}

/// LED output channels
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedChannel {
    A = 0,
    B = 1,
    C = 2,
}

/// PWM input channels
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PwmChannel {
    Channel0 = 0,
    Channel1 = 1,
    Channel2 = 2,
    Channel3 = 3,
}

impl PwmChannel {
    pub const fn status_frame(self) -> StatusFrame {
        match self {
            PwmChannel::Channel0 => StatusFrame::PwmInputs0,
            PwmChannel::Channel1 => StatusFrame::PwmInputs1,
            PwmChannel::Channel2 => StatusFrame::PwmInputs2,
            PwmChannel::Channel3 => StatusFrame::PwmInputs3,
        }
    }
}

/// Request/response primitives of one device
pub trait DeviceLink {
    /// Writes a parameter
    /// * `timeout_ms`: zero returns right after dispatch, otherwise waits for the device to confirm
    fn set_param(
        &mut self,
        param: ParamEnum,
        value: f64,
        sub_value: u8,
        ordinal: u8,
        timeout_ms: u32,
    ) -> Result<(), DeviceError>;

    /// Reads a parameter
    fn get_param(&mut self, param: ParamEnum, ordinal: u8, timeout_ms: u32) -> Result<f64, DeviceError>;

    /// Restores factory defaults of all persistent parameters
    fn factory_default(&mut self, timeout_ms: u32) -> Result<(), DeviceError>;

    /// Returns the latest pin or fault mask
    fn read_bitmask(&mut self, kind: BitmaskKind) -> Result<u32, DeviceError>;

    fn clear_sticky_faults(&mut self, timeout_ms: u32) -> Result<(), DeviceError>;

    fn set_status_frame_period(&mut self, frame: StatusFrame, period_ms: u8, timeout_ms: u32)
        -> Result<(), DeviceError>;

    fn get_status_frame_period(&mut self, frame: StatusFrame, timeout_ms: u32) -> Result<u8, DeviceError>;

    /// Sets the local transmission period of a control frame, zero disables periodic transmission
    fn set_control_frame_period(&mut self, frame: ControlFrame, period_ms: u32) -> Result<(), DeviceError>;

    /// * `duty_cycle`: 10-bit duty cycle
    fn set_led_output(&mut self, channel: LedChannel, duty_cycle: u16) -> Result<(), DeviceError>;

    fn set_general_output(&mut self, pin: GeneralPin, value: bool, output_enable: bool) -> Result<(), DeviceError>;

    /// Bit masks are ordered by [GeneralPin] position
    fn set_general_outputs(&mut self, output_bits: u16, output_enable_bits: u16) -> Result<(), DeviceError>;

    /// * `duty_cycle`: 10-bit duty cycle
    fn set_pwm_output(&mut self, channel: u32, duty_cycle: u16) -> Result<(), DeviceError>;

    fn enable_pwm_output(&mut self, channel: u32, enable: bool) -> Result<(), DeviceError>;

    fn read_quadrature(&mut self) -> Result<QuadratureReading, DeviceError>;

    /// Bus voltage in volts
    fn read_bus_voltage(&mut self) -> Result<f64, DeviceError>;

    fn read_pwm_input(&mut self, channel: PwmChannel) -> Result<PwmInput, DeviceError>;

    /// True if the device reset since the last call
    fn has_reset_occurred(&mut self) -> Result<bool, DeviceError>;
}
