//!# CAN link
//! [CanLink] implements [DeviceLink] on any [embedded_can::nb::Can] bus. Deadlines of blocking
//! requests are tracked with an [embedded_time::Clock].
//!
//!```
//!# use canifier::can::CanLink;
//!# use canifier::example::{ExampleCanBus, ExampleClock};
//!# use canifier::link::DeviceLink;
//!# use canifier::params::ParamEnum;
//!#
//! let bus = ExampleCanBus::default();
//! let clock = ExampleClock::default();
//!
//! // Link to device number 5
//! let mut link = CanLink::new(bus, clock, 5).unwrap();
//!
//! // Write custom parameter slot 1 and wait max. 10 ms for the confirmation
//! link.set_param(ParamEnum::CustomParam, 42.0, 0, 1, 10).unwrap();
//! assert_eq!(42.0, link.get_param(ParamEnum::CustomParam, 1, 10).unwrap());
//!```
//!
//!## Frame format
//! Frames use 29-bit identifiers `0x0300_0000 | api | device_number`.
//! Parameter frames carry an 8-byte MSB-first payload: parameter (12 bits), response status (4 bits),
//! sub value (8 bits), ordinal (8 bits) and the value as 32-bit two's complement integer.

use crate::codec::{decode_bus_voltage, DUTY_CYCLE_MAX};
use crate::error::DeviceError;
use crate::link::{BitmaskKind, ControlFrame, DeviceLink, LedChannel, PwmChannel, StatusFrame};
use crate::params::ParamEnum;
use crate::registers::{ControlGeneralFrame, ControlPwmFrame, ParamFrame, ResponseStatus};
use crate::status::{GeneralPin, PwmInput, QuadratureReading, PIN_MASK};
use byteorder::{ByteOrder, LittleEndian};
use embedded_can::nb::Can;
use embedded_can::{Error as _, ExtendedId, Frame, Id};
use embedded_time::duration::Milliseconds;
use embedded_time::{Clock, Instant};
use log::debug;

/// Device type bits of the arbitration id
pub const DEVICE_TYPE_ID: u32 = 0x0300_0000;

const DEVICE_TYPE_MASK: u32 = 0x1F00_0000;

const API_MASK: u32 = 0x00FF_FFC0;

const DEVICE_NUMBER_MASK: u32 = 0x3F;

/// Highest device number on the bus
pub const MAX_DEVICE_NUMBER: u8 = 0x3F;

/// Parameter read request
pub const API_PARAM_REQUEST: u32 = 0x041800;

/// Parameter response, sent by the device for requests and confirmed writes
pub const API_PARAM_RESPONSE: u32 = 0x041840;

/// Parameter write
pub const API_PARAM_SET: u32 = 0x041880;

/// Value written to command parameters (factory default, clear sticky faults)
const COMMAND_VALUE: f64 = 1.0;

/// Upper bound of frames processed by one drain of the RX queue
const MAX_DRAIN_FRAMES: usize = 64;

/// Returns the 29-bit arbitration id for the given API and device
pub const fn arbitration_id(api: u32, device_number: u8) -> u32 {
    DEVICE_TYPE_ID | (api & API_MASK) | (device_number as u32 & DEVICE_NUMBER_MASK)
}

/// Latest values of received status frames
#[derive(Copy, Clone, Debug, Default)]
struct StatusCache {
    pins: Option<u32>,
    bus_voltage: Option<u8>,
    reset_occurred: bool,
    quadrature: Option<QuadratureReading>,
    pwm_inputs: [Option<PwmInput>; 4],
    faults: Option<u32>,
    sticky_faults: Option<u32>,
}

/// Outcome of one receive attempt
enum Poll {
    /// RX queue empty
    Empty,
    /// Frame not answering a parameter access
    Other,
    /// Parameter response of this device
    Response(ParamFrame),
}

/// Link to one device on a CAN bus
pub struct CanLink<B: Can, CLK: Clock> {
    /// CAN bus
    bus: B,

    /// Clock for request deadlines and control frame periods
    clock: CLK,

    device_number: u8,

    status: StatusCache,

    control_general: ControlGeneralFrame,

    control_pwm: ControlPwmFrame,

    /// Periodic transmission of control frames, indexed by [Self::control_slot]
    control_periods: [u32; 2],

    control_due: [Option<Instant<CLK>>; 2],
}

impl<B, CLK> CanLink<B, CLK>
where
    B: Can,
    CLK: Clock,
{
    /// Creates a link to the given device number (0-63)
    pub fn new(bus: B, clock: CLK, device_number: u8) -> Result<Self, DeviceError> {
        if device_number > MAX_DEVICE_NUMBER {
            return Err(DeviceError::ValueOutOfRange);
        }

        Ok(Self {
            bus,
            clock,
            device_number,
            status: StatusCache::default(),
            control_general: ControlGeneralFrame::new(),
            control_pwm: ControlPwmFrame::new(),
            control_periods: [0; 2],
            control_due: [None, None],
        })
    }

    pub fn device_number(&self) -> u8 {
        self.device_number
    }

    /// Releases bus and clock
    pub fn free(self) -> (B, CLK) {
        (self.bus, self.clock)
    }

    /// Processes received frames and re-transmits control frames whose period elapsed.
    /// Needs to be called regularly if control frame periods are configured.
    pub fn service(&mut self) -> Result<(), DeviceError> {
        self.drain()?;

        for frame in [ControlFrame::General, ControlFrame::PwmOutput] {
            let slot = Self::control_slot(frame);
            let period = self.control_periods[slot];

            if period == 0 {
                continue;
            }

            let now = self.clock.try_now()?;
            if let Some(due) = &self.control_due[slot] {
                if now < *due {
                    continue;
                }
            }

            self.send_control(frame)?;
            self.control_due[slot] = now.checked_add(Milliseconds::new(period));
        }

        Ok(())
    }

    fn control_slot(frame: ControlFrame) -> usize {
        match frame {
            ControlFrame::General => 0,
            ControlFrame::PwmOutput => 1,
        }
    }

    /// Transmits the current image of the given control frame
    fn send_control(&mut self, frame: ControlFrame) -> Result<(), DeviceError> {
        let payload = match frame {
            ControlFrame::General => self.control_general.into_bytes(),
            ControlFrame::PwmOutput => self.control_pwm.into_bytes(),
        };

        self.transmit(frame.api(), &payload)
    }

    /// Hands one frame to the bus without waiting for a free transmit buffer
    fn transmit(&mut self, api: u32, data: &[u8]) -> Result<(), DeviceError> {
        let id = ExtendedId::new(arbitration_id(api, self.device_number)).ok_or(DeviceError::TxFailed)?;
        let frame = B::Frame::new(id, data).ok_or(DeviceError::TxFailed)?;

        match self.bus.transmit(&frame) {
            Ok(_) => Ok(()),
            Err(nb::Error::WouldBlock) => {
                debug!("TX buffer full, frame with API {api:#X} not sent");
                Err(DeviceError::TxFailed)
            }
            Err(nb::Error::Other(error)) => {
                debug!("Bus error during transmission: {:?}", error.kind());
                Err(DeviceError::TxFailed)
            }
        }
    }

    /// Receives at most one frame
    fn poll(&mut self) -> Result<Poll, DeviceError> {
        let frame = match self.bus.receive() {
            Ok(frame) => frame,
            Err(nb::Error::WouldBlock) => return Ok(Poll::Empty),
            Err(nb::Error::Other(error)) => {
                debug!("Bus error during reception: {:?}", error.kind());
                return Err(DeviceError::TxFailed);
            }
        };

        Ok(self.dispatch(&frame))
    }

    /// Caches status frames of this device and extracts parameter responses
    fn dispatch(&mut self, frame: &B::Frame) -> Poll {
        let raw_id = match frame.id() {
            Id::Extended(id) => id.as_raw(),
            Id::Standard(_) => return Poll::Other,
        };

        if raw_id & DEVICE_TYPE_MASK != DEVICE_TYPE_ID || raw_id & DEVICE_NUMBER_MASK != self.device_number as u32 {
            return Poll::Other;
        }

        let api = raw_id & API_MASK;
        let data = frame.data();

        if api == API_PARAM_RESPONSE {
            if data.len() < 8 {
                debug!("Dropping parameter response with {} bytes", data.len());
                return Poll::Other;
            }

            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&data[..8]);
            return Poll::Response(ParamFrame::from_bytes(bytes));
        }

        if let Some(status_frame) = StatusFrame::from_api(api) {
            self.cache_status(status_frame, data);
        }

        Poll::Other
    }

    fn cache_status(&mut self, frame: StatusFrame, data: &[u8]) {
        let required = match frame {
            StatusFrame::General1 | StatusFrame::Misc => 4,
            StatusFrame::General2 => 6,
            _ => 8,
        };

        if data.len() < required {
            debug!("Dropping {frame:?} status frame with {} bytes", data.len());
            return;
        }

        match frame {
            StatusFrame::General1 => {
                self.status.pins = Some(LittleEndian::read_u16(&data[0..2]) as u32);
                self.status.bus_voltage = Some(data[2]);
                self.status.reset_occurred |= data[3] & 1 != 0;
            }
            StatusFrame::General2 => {
                self.status.quadrature = Some(QuadratureReading {
                    position: LittleEndian::read_i32(&data[0..4]),
                    velocity: LittleEndian::read_i16(&data[4..6]) as i32,
                });
            }
            StatusFrame::PwmInputs0 | StatusFrame::PwmInputs1 | StatusFrame::PwmInputs2 | StatusFrame::PwmInputs3 => {
                let index = (frame.index() - StatusFrame::PwmInputs0.index()) as usize;
                self.status.pwm_inputs[index] = Some(PwmInput {
                    pulse_width_us: LittleEndian::read_u32(&data[0..4]),
                    period_us: LittleEndian::read_u32(&data[4..8]),
                });
            }
            StatusFrame::Misc => {
                self.status.faults = Some(LittleEndian::read_u16(&data[0..2]) as u32);
                self.status.sticky_faults = Some(LittleEndian::read_u16(&data[2..4]) as u32);
            }
        }
    }

    /// Processes all pending frames. Parameter responses still queued are discarded.
    fn drain(&mut self) -> Result<(), DeviceError> {
        for _ in 0..MAX_DRAIN_FRAMES {
            if let Poll::Empty = self.poll()? {
                break;
            }
        }

        Ok(())
    }

    /// Waits for the response to the given parameter.
    /// With zero timeout only one receive attempt is made.
    fn await_response(&mut self, param: ParamEnum, ordinal: u8, timeout_ms: u32) -> Result<ParamFrame, DeviceError> {
        let matches = |response: &ParamFrame| response.param() == param.raw() && response.ordinal() == ordinal;

        if timeout_ms == 0 {
            return match self.poll()? {
                Poll::Response(response) if matches(&response) => Ok(response),
                _ => Err(DeviceError::Timeout),
            };
        }

        let deadline = self
            .clock
            .try_now()?
            .checked_add(Milliseconds::new(timeout_ms))
            .ok_or(DeviceError::ClockError)?;

        loop {
            if let Poll::Response(response) = self.poll()? {
                if matches(&response) {
                    return Ok(response);
                }
            }

            if self.clock.try_now()? > deadline {
                debug!("No response for {param:?} (ordinal {ordinal}) within {timeout_ms} ms");
                return Err(DeviceError::Timeout);
            }
        }
    }

    /// Maps the device result of a response
    fn check_response(response: &ParamFrame) -> Result<(), DeviceError> {
        match response.status_or_err() {
            Ok(ResponseStatus::Ok) => Ok(()),
            Ok(ResponseStatus::OutOfRange) => Err(DeviceError::ValueOutOfRange),
            Ok(ResponseStatus::Unsupported) => Err(DeviceError::UnsupportedParameter),
            Err(_) => {
                debug!("Unknown status in response to parameter {}", response.param());
                Err(DeviceError::UnsupportedParameter)
            }
        }
    }
}

impl<B, CLK> DeviceLink for CanLink<B, CLK>
where
    B: Can,
    CLK: Clock,
{
    fn set_param(
        &mut self,
        param: ParamEnum,
        value: f64,
        sub_value: u8,
        ordinal: u8,
        timeout_ms: u32,
    ) -> Result<(), DeviceError> {
        let payload = ParamFrame::new()
            .with_param(param.raw())
            .with_sub_value(sub_value)
            .with_ordinal(ordinal)
            .with_param_value(value);

        self.drain()?;
        self.transmit(API_PARAM_SET, &payload.into_bytes())?;

        if timeout_ms == 0 {
            return Ok(());
        }

        let response = self.await_response(param, ordinal, timeout_ms)?;
        Self::check_response(&response)
    }

    fn get_param(&mut self, param: ParamEnum, ordinal: u8, timeout_ms: u32) -> Result<f64, DeviceError> {
        let payload = ParamFrame::new().with_param(param.raw()).with_ordinal(ordinal);

        self.drain()?;
        self.transmit(API_PARAM_REQUEST, &payload.into_bytes())?;

        let response = self.await_response(param, ordinal, timeout_ms)?;
        Self::check_response(&response)?;

        Ok(response.param_value())
    }

    fn factory_default(&mut self, timeout_ms: u32) -> Result<(), DeviceError> {
        self.set_param(ParamEnum::DefaultConfig, COMMAND_VALUE, 0, 0, timeout_ms)
    }

    fn read_bitmask(&mut self, kind: BitmaskKind) -> Result<u32, DeviceError> {
        self.drain()?;

        let mask = match kind {
            BitmaskKind::Pins => self.status.pins,
            BitmaskKind::Faults => self.status.faults,
            BitmaskKind::StickyFaults => self.status.sticky_faults,
        };

        mask.ok_or(DeviceError::Timeout)
    }

    fn clear_sticky_faults(&mut self, timeout_ms: u32) -> Result<(), DeviceError> {
        self.set_param(ParamEnum::ClearStickyFaults, COMMAND_VALUE, 0, 0, timeout_ms)
    }

    fn set_status_frame_period(
        &mut self,
        frame: StatusFrame,
        period_ms: u8,
        timeout_ms: u32,
    ) -> Result<(), DeviceError> {
        self.set_param(ParamEnum::StatusFramePeriod, period_ms as f64, 0, frame.index(), timeout_ms)
    }

    fn get_status_frame_period(&mut self, frame: StatusFrame, timeout_ms: u32) -> Result<u8, DeviceError> {
        let period = self.get_param(ParamEnum::StatusFramePeriod, frame.index(), timeout_ms)?;

        if !(0.0..=u8::MAX as f64).contains(&period) {
            return Err(DeviceError::ValueOutOfRange);
        }

        Ok(period as u8)
    }

    fn set_control_frame_period(&mut self, frame: ControlFrame, period_ms: u32) -> Result<(), DeviceError> {
        let slot = Self::control_slot(frame);
        self.control_periods[slot] = period_ms;
        self.control_due[slot] = None;

        Ok(())
    }

    fn set_led_output(&mut self, channel: LedChannel, duty_cycle: u16) -> Result<(), DeviceError> {
        let duty_cycle = duty_cycle.min(DUTY_CYCLE_MAX);

        self.control_general = match channel {
            LedChannel::A => self.control_general.with_led_a(duty_cycle),
            LedChannel::B => self.control_general.with_led_b(duty_cycle),
            LedChannel::C => self.control_general.with_led_c(duty_cycle),
        };

        self.send_control(ControlFrame::General)
    }

    fn set_general_output(&mut self, pin: GeneralPin, value: bool, output_enable: bool) -> Result<(), DeviceError> {
        let mut outputs = self.control_general.general_output();
        let mut enabled = self.control_general.output_enable();

        if value {
            outputs |= pin.mask();
        } else {
            outputs &= !pin.mask();
        }

        if output_enable {
            enabled |= pin.mask();
        } else {
            enabled &= !pin.mask();
        }

        self.set_general_outputs(outputs, enabled)
    }

    fn set_general_outputs(&mut self, output_bits: u16, output_enable_bits: u16) -> Result<(), DeviceError> {
        self.control_general = self
            .control_general
            .with_general_output(output_bits & PIN_MASK as u16)
            .with_output_enable(output_enable_bits & PIN_MASK as u16);

        self.send_control(ControlFrame::General)
    }

    fn set_pwm_output(&mut self, channel: u32, duty_cycle: u16) -> Result<(), DeviceError> {
        self.control_pwm = self
            .control_pwm
            .with_duty_cycle(channel, duty_cycle.min(DUTY_CYCLE_MAX))
            .ok_or(DeviceError::ValueOutOfRange)?;

        self.send_control(ControlFrame::PwmOutput)
    }

    fn enable_pwm_output(&mut self, channel: u32, enable: bool) -> Result<(), DeviceError> {
        self.control_pwm = self
            .control_pwm
            .with_channel_enabled(channel, enable)
            .ok_or(DeviceError::ValueOutOfRange)?;

        self.send_control(ControlFrame::PwmOutput)
    }

    fn read_quadrature(&mut self) -> Result<QuadratureReading, DeviceError> {
        self.drain()?;
        self.status.quadrature.ok_or(DeviceError::Timeout)
    }

    fn read_bus_voltage(&mut self) -> Result<f64, DeviceError> {
        self.drain()?;
        self.status.bus_voltage.map(decode_bus_voltage).ok_or(DeviceError::Timeout)
    }

    fn read_pwm_input(&mut self, channel: PwmChannel) -> Result<PwmInput, DeviceError> {
        self.drain()?;
        self.status.pwm_inputs[channel as usize].ok_or(DeviceError::Timeout)
    }

    fn has_reset_occurred(&mut self) -> Result<bool, DeviceError> {
        self.drain()?;

        if self.status.pins.is_none() {
            return Err(DeviceError::Timeout);
        }

        Ok(core::mem::take(&mut self.status.reset_occurred))
    }
}
