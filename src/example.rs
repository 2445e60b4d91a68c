//! # Simulated devices for doc examples
//!
//! [ExampleLink] simulates a device behind a [DeviceLink], [ExampleCanBus] answers parameter
//! frames on the CAN bus level.
use crate::can::{API_PARAM_REQUEST, API_PARAM_RESPONSE, API_PARAM_SET};
use crate::config::{ConfigField, FACTORY_DEFAULT};
use crate::error::DeviceError;
use crate::frame::CanFrame;
use crate::link::{BitmaskKind, ControlFrame, DeviceLink, LedChannel, PwmChannel, StatusFrame, PWM_CHANNELS};
use crate::params::ParamEnum;
use crate::registers::ParamFrame;
use crate::status::{GeneralPin, PwmInput, QuadratureReading};
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cell::Cell;
use embedded_can::nb::Can;
use embedded_can::{ErrorKind, ExtendedId, Frame, Id};
use embedded_time::clock::Error;
use embedded_time::duration::Duration;
use embedded_time::fixed_point::FixedPoint;
use embedded_time::fraction::Fraction;
use embedded_time::timer::param::{Armed, OneShot};
use embedded_time::{Clock, Instant, Timer};

/// In-memory device
#[derive(Debug)]
pub struct ExampleLink {
    /// Stored parameters: kind, ordinal, value
    params: Vec<(ParamEnum, u8, f64)>,

    /// Number of parameter writes, factory resets excluded
    pub param_writes: u32,

    pub pins: u32,
    pub faults: u32,
    pub sticky_faults: u32,
    pub led_outputs: [u16; 3],
    pub pwm_outputs: [u16; 4],
    pub quadrature: QuadratureReading,
    pub firmware_version: i32,
}

impl Default for ExampleLink {
    fn default() -> Self {
        let mut link = Self {
            params: Vec::new(),
            param_writes: 0,
            pins: 0,
            faults: 0,
            sticky_faults: 0,
            led_outputs: [0; 3],
            pwm_outputs: [0; 4],
            quadrature: QuadratureReading::default(),
            firmware_version: 0x0400,
        };

        link.restore_defaults();
        link
    }
}

impl ExampleLink {
    fn restore_defaults(&mut self) {
        for field in ConfigField::ALL {
            let address = field.address();
            self.store(address.kind, address.ordinal, FACTORY_DEFAULT.field_value(field));
        }
    }

    fn store(&mut self, param: ParamEnum, ordinal: u8, value: f64) {
        match self.params.iter_mut().find(|(kind, slot, _)| *kind == param && *slot == ordinal) {
            Some(entry) => entry.2 = value,
            None => self.params.push((param, ordinal, value)),
        }
    }
}

impl DeviceLink for ExampleLink {
    fn set_param(&mut self, param: ParamEnum, value: f64, _sub: u8, ordinal: u8, _timeout: u32) -> Result<(), DeviceError> {
        self.param_writes += 1;

        match param {
            ParamEnum::DefaultConfig => self.restore_defaults(),
            ParamEnum::ClearStickyFaults => self.sticky_faults = 0,
            ParamEnum::QuadraturePosition => self.quadrature.position = value as i32,
            _ => self.store(param, ordinal, value),
        }

        Ok(())
    }

    fn get_param(&mut self, param: ParamEnum, ordinal: u8, _timeout: u32) -> Result<f64, DeviceError> {
        if param == ParamEnum::FirmwareVersion {
            return Ok(self.firmware_version as f64);
        }

        self.params
            .iter()
            .find(|(kind, slot, _)| *kind == param && *slot == ordinal)
            .map(|(_, _, value)| *value)
            .ok_or(DeviceError::UnsupportedParameter)
    }

    fn factory_default(&mut self, _timeout: u32) -> Result<(), DeviceError> {
        self.restore_defaults();
        Ok(())
    }

    fn read_bitmask(&mut self, kind: BitmaskKind) -> Result<u32, DeviceError> {
        Ok(match kind {
            BitmaskKind::Pins => self.pins,
            BitmaskKind::Faults => self.faults,
            BitmaskKind::StickyFaults => self.sticky_faults,
        })
    }

    fn clear_sticky_faults(&mut self, _timeout: u32) -> Result<(), DeviceError> {
        self.sticky_faults = 0;
        Ok(())
    }

    fn set_status_frame_period(&mut self, frame: StatusFrame, period_ms: u8, _timeout: u32) -> Result<(), DeviceError> {
        self.store(ParamEnum::StatusFramePeriod, frame.index(), period_ms as f64);
        Ok(())
    }

    fn get_status_frame_period(&mut self, frame: StatusFrame, timeout: u32) -> Result<u8, DeviceError> {
        self.get_param(ParamEnum::StatusFramePeriod, frame.index(), timeout)
            .map(|period| period as u8)
    }

    fn set_control_frame_period(&mut self, _frame: ControlFrame, _period_ms: u32) -> Result<(), DeviceError> {
        Ok(())
    }

    fn set_led_output(&mut self, channel: LedChannel, duty_cycle: u16) -> Result<(), DeviceError> {
        self.led_outputs[channel as usize] = duty_cycle;
        Ok(())
    }

    fn set_general_output(&mut self, _pin: GeneralPin, _value: bool, _enable: bool) -> Result<(), DeviceError> {
        Ok(())
    }

    fn set_general_outputs(&mut self, _output_bits: u16, _enable_bits: u16) -> Result<(), DeviceError> {
        Ok(())
    }

    fn set_pwm_output(&mut self, channel: u32, duty_cycle: u16) -> Result<(), DeviceError> {
        if channel >= PWM_CHANNELS {
            return Err(DeviceError::ValueOutOfRange);
        }

        self.pwm_outputs[channel as usize] = duty_cycle;
        Ok(())
    }

    fn enable_pwm_output(&mut self, channel: u32, _enable: bool) -> Result<(), DeviceError> {
        if channel >= PWM_CHANNELS {
            return Err(DeviceError::ValueOutOfRange);
        }

        Ok(())
    }

    fn read_quadrature(&mut self) -> Result<QuadratureReading, DeviceError> {
        Ok(self.quadrature)
    }

    fn read_bus_voltage(&mut self) -> Result<f64, DeviceError> {
        Ok(12.0)
    }

    fn read_pwm_input(&mut self, _channel: PwmChannel) -> Result<PwmInput, DeviceError> {
        Ok(PwmInput::default())
    }

    fn has_reset_occurred(&mut self) -> Result<bool, DeviceError> {
        Ok(false)
    }
}

/// CAN bus with a device confirming every parameter write and answering every read request
#[derive(Default, Debug)]
pub struct ExampleCanBus {
    /// Stored parameters: param, ordinal, raw value
    params: Vec<(u16, u8, u32)>,

    /// Frames waiting to be received
    rx_queue: VecDeque<CanFrame>,
}

impl Can for ExampleCanBus {
    type Frame = CanFrame;
    type Error = ErrorKind;

    fn transmit(&mut self, frame: &CanFrame) -> nb::Result<Option<CanFrame>, ErrorKind> {
        let raw_id = match frame.id() {
            Id::Extended(id) => id.as_raw(),
            Id::Standard(_) => return Ok(None),
        };

        let api = raw_id & 0x00FF_FFC0;
        if (api != API_PARAM_SET && api != API_PARAM_REQUEST) || frame.data().len() != 8 {
            return Ok(None);
        }

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(frame.data());
        let request = ParamFrame::from_bytes(bytes);

        let position = self
            .params
            .iter()
            .position(|(param, ordinal, _)| *param == request.param() && *ordinal == request.ordinal());

        if api == API_PARAM_SET {
            match position {
                Some(index) => self.params[index].2 = request.value(),
                None => self.params.push((request.param(), request.ordinal(), request.value())),
            }
        }

        let value = self
            .params
            .iter()
            .find(|(param, ordinal, _)| *param == request.param() && *ordinal == request.ordinal())
            .map(|(_, _, value)| *value)
            .unwrap_or_default();

        let response_id = (raw_id & !0x00FF_FFC0) | API_PARAM_RESPONSE;
        let response = ExtendedId::new(response_id)
            .and_then(|id| CanFrame::new(id, &request.with_value(value).into_bytes()));

        match response {
            Some(response) => self.rx_queue.push_back(response),
            None => return Err(nb::Error::Other(ErrorKind::Other)),
        }

        Ok(None)
    }

    fn receive(&mut self) -> nb::Result<CanFrame, ErrorKind> {
        self.rx_queue.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

/// Clock advancing 100 µs on every reading
#[derive(Debug, Default)]
pub struct ExampleClock {
    ticks: Cell<u64>,
}

impl Clock for ExampleClock {
    type T = u64;
    const SCALING_FACTOR: Fraction = Fraction::new(1, 1_000_000);

    fn try_now(&self) -> Result<Instant<Self>, Error> {
        let now = self.ticks.get();
        self.ticks.set(now + 100);

        Ok(Instant::new(now))
    }

    fn new_timer<Dur: Duration + FixedPoint>(&self, duration: Dur) -> Timer<OneShot, Armed, Self, Dur> {
        Timer::new(self, duration)
    }
}
