use crate::error::DeviceError;
use crate::frame::CanFrame;
use crate::link::{BitmaskKind, ControlFrame, DeviceLink, LedChannel, PwmChannel, StatusFrame};
use crate::params::ParamEnum;
use crate::status::{GeneralPin, PwmInput, QuadratureReading};
use alloc::vec::Vec;
use core::cell::RefCell;
use embedded_can::nb::Can;
use embedded_can::ErrorKind;
use embedded_time::clock::Error;
use embedded_time::duration::Duration;
use embedded_time::fixed_point::FixedPoint;
use embedded_time::fraction::Fraction;
use embedded_time::timer::param::{Armed, OneShot};
use embedded_time::{Clock, Instant, Timer};
use mockall::mock;

#[derive(Debug, PartialEq, Eq)]
pub struct TestClock {
    pub next_instants: RefCell<Vec<u64>>,
}

impl TestClock {
    pub fn new(next_instants: Vec<u64>) -> Self {
        Self {
            next_instants: RefCell::new(next_instants),
        }
    }
}

impl Clock for TestClock {
    type T = u64;
    const SCALING_FACTOR: Fraction = Fraction::new(1, 1_000_000);

    fn try_now(&self) -> Result<Instant<Self>, Error> {
        if self.next_instants.borrow().len() == 0 {
            return Err(Error::Unspecified);
        }

        Ok(Instant::new(self.next_instants.borrow_mut().remove(0)))
    }

    fn new_timer<Dur>(&self, duration: Dur) -> Timer<OneShot, Armed, Self, Dur>
    where
        Dur: Duration + FixedPoint,
    {
        Timer::new(self, duration)
    }
}

mock! {
    pub Bus {}

    impl Can for Bus {
        type Frame = CanFrame;
        type Error = ErrorKind;

        fn transmit(&mut self, frame: &CanFrame) -> nb::Result<Option<CanFrame>, ErrorKind>;
        fn receive(&mut self) -> nb::Result<CanFrame, ErrorKind>;
    }
}

mock! {
    pub Link {}

    impl DeviceLink for Link {
        fn set_param(&mut self, param: ParamEnum, value: f64, sub_value: u8, ordinal: u8, timeout_ms: u32) -> Result<(), DeviceError>;
        fn get_param(&mut self, param: ParamEnum, ordinal: u8, timeout_ms: u32) -> Result<f64, DeviceError>;
        fn factory_default(&mut self, timeout_ms: u32) -> Result<(), DeviceError>;
        fn read_bitmask(&mut self, kind: BitmaskKind) -> Result<u32, DeviceError>;
        fn clear_sticky_faults(&mut self, timeout_ms: u32) -> Result<(), DeviceError>;
        fn set_status_frame_period(&mut self, frame: StatusFrame, period_ms: u8, timeout_ms: u32) -> Result<(), DeviceError>;
        fn get_status_frame_period(&mut self, frame: StatusFrame, timeout_ms: u32) -> Result<u8, DeviceError>;
        fn set_control_frame_period(&mut self, frame: ControlFrame, period_ms: u32) -> Result<(), DeviceError>;
        fn set_led_output(&mut self, channel: LedChannel, duty_cycle: u16) -> Result<(), DeviceError>;
        fn set_general_output(&mut self, pin: GeneralPin, value: bool, output_enable: bool) -> Result<(), DeviceError>;
        fn set_general_outputs(&mut self, output_bits: u16, output_enable_bits: u16) -> Result<(), DeviceError>;
        fn set_pwm_output(&mut self, channel: u32, duty_cycle: u16) -> Result<(), DeviceError>;
        fn enable_pwm_output(&mut self, channel: u32, enable: bool) -> Result<(), DeviceError>;
        fn read_quadrature(&mut self) -> Result<QuadratureReading, DeviceError>;
        fn read_bus_voltage(&mut self) -> Result<f64, DeviceError>;
        fn read_pwm_input(&mut self, channel: PwmChannel) -> Result<PwmInput, DeviceError>;
        fn has_reset_occurred(&mut self) -> Result<bool, DeviceError>;
    }
}
