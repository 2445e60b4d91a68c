//!# CANifier device
//!
//!```
//!# use canifier::device::Canifier;
//!# use canifier::config::{Configuration, VelocityMeasPeriod};
//!# use canifier::example::ExampleLink;
//!# use canifier::link::LedChannel;
//!#
//! let mut canifier = Canifier::new(ExampleLink::default(), 0);
//!
//! let config = Configuration {
//!     velocity_measurement_period: VelocityMeasPeriod::Period10Ms,
//!     clear_position_on_limit_f: true,
//!     ..Configuration::default()
//! };
//!
//! // Reset to factory defaults and write the two differing fields
//! canifier.config_all_settings(&config, 10).unwrap();
//! assert_eq!(config, canifier.get_all_configs(10));
//!
//! // Drive LED channel A with 50% duty cycle
//! canifier.set_led_output(0.5, LedChannel::A).unwrap();
//! ```

use crate::codec::{encode_bool, encode_channel_index, encode_duty_cycle, truncate_velocity_window};
use crate::config::{ConfigField, Configuration, VelocityMeasPeriod, FACTORY_DEFAULT};
use crate::error::DeviceError;
use crate::link::{BitmaskKind, ControlFrame, DeviceLink, LedChannel, PwmChannel, StatusFrame};
use crate::params::{ParamAddress, ParamEnum, ParameterStore};
use crate::status::{Faults, GeneralPin, PinValues, PwmInput, StickyFaults};
use crate::sync::ConfigSynchronizer;
use log::warn;

/// CANifier device reached through a [DeviceLink]
pub struct Canifier<L: DeviceLink> {
    link: L,

    /// CAN device number, used for diagnostics
    device_number: u8,
}

impl<L: DeviceLink> Canifier<L> {
    pub fn new(link: L, device_number: u8) -> Self {
        Self { link, device_number }
    }

    pub fn device_number(&self) -> u8 {
        self.device_number
    }

    /// Releases the link
    pub fn free(self) -> L {
        self.link
    }

    /// Logs failed operations
    fn report<T>(&self, operation: &str, result: Result<T, DeviceError>) -> Result<T, DeviceError> {
        if let Err(error) = &result {
            warn!("CANifier {}: {operation} failed: {error:?}", self.device_number);
        }

        result
    }

    fn set_field(&mut self, field: ConfigField, value: f64, timeout_ms: u32) -> Result<(), DeviceError> {
        self.link.set_parameter(field.address(), value, timeout_ms)
    }

    //------ Outputs ----------//

    /// Sets the LED output
    /// * `percent_output`: duty cycle from 0 to 1, clamped
    pub fn set_led_output(&mut self, percent_output: f64, channel: LedChannel) -> Result<(), DeviceError> {
        let result = self.link.set_led_output(channel, encode_duty_cycle(percent_output));
        self.report("set_led_output", result)
    }

    /// Sets the output of a general pin
    /// * `output_enable`: true configures the pin as output
    pub fn set_general_output(&mut self, pin: GeneralPin, value: bool, output_enable: bool) -> Result<(), DeviceError> {
        let result = self.link.set_general_output(pin, value, output_enable);
        self.report("set_general_output", result)
    }

    /// Sets the output of all general pins. Bits are ordered by [GeneralPin] position.
    /// * `is_output_bits`: a set bit configures the pin as output
    pub fn set_general_outputs(&mut self, output_bits: u16, is_output_bits: u16) -> Result<(), DeviceError> {
        let result = self.link.set_general_outputs(output_bits, is_output_bits);
        self.report("set_general_outputs", result)
    }

    /// Sets the PWM output duty cycle (0 to 1, clamped). Negative channels select channel 0.
    pub fn set_pwm_output(&mut self, channel: i32, duty_cycle: f64) -> Result<(), DeviceError> {
        let result = self
            .link
            .set_pwm_output(encode_channel_index(channel), encode_duty_cycle(duty_cycle));
        self.report("set_pwm_output", result)
    }

    /// Enables the PWM output. Negative channels select channel 0.
    pub fn enable_pwm_output(&mut self, channel: i32, enable: bool) -> Result<(), DeviceError> {
        let result = self.link.enable_pwm_output(encode_channel_index(channel), enable);
        self.report("enable_pwm_output", result)
    }

    //------ Inputs ----------//

    /// Reads the state of all general pins
    pub fn get_general_inputs(&mut self) -> Result<PinValues, DeviceError> {
        let result = self.link.read_bitmask(BitmaskKind::Pins).map(PinValues::from_register);
        self.report("get_general_inputs", result)
    }

    /// Reads the state of a single general pin
    pub fn get_general_input(&mut self, pin: GeneralPin) -> Result<bool, DeviceError> {
        self.get_general_inputs().map(|pins| pins.get(pin))
    }

    pub fn get_quadrature_position(&mut self) -> Result<i32, DeviceError> {
        let result = self.link.read_quadrature().map(|reading| reading.position);
        self.report("get_quadrature_position", result)
    }

    pub fn set_quadrature_position(&mut self, position: i32, timeout_ms: u32) -> Result<(), DeviceError> {
        let address = ParamAddress::new(ParamEnum::QuadraturePosition, 0);
        let result = self.link.set_parameter(address, position as f64, timeout_ms);
        self.report("set_quadrature_position", result)
    }

    pub fn get_quadrature_velocity(&mut self) -> Result<i32, DeviceError> {
        let result = self.link.read_quadrature().map(|reading| reading.velocity);
        self.report("get_quadrature_velocity", result)
    }

    /// Bus voltage in volts
    pub fn get_bus_voltage(&mut self) -> Result<f64, DeviceError> {
        let result = self.link.read_bus_voltage();
        self.report("get_bus_voltage", result)
    }

    pub fn get_pwm_input(&mut self, channel: PwmChannel) -> Result<PwmInput, DeviceError> {
        let result = self.link.read_pwm_input(channel);
        self.report("get_pwm_input", result)
    }

    /// Firmware version of the device, major version in the upper byte
    pub fn get_firmware_version(&mut self, timeout_ms: u32) -> Result<i32, DeviceError> {
        let address = ParamAddress::new(ParamEnum::FirmwareVersion, 0);
        let result = self.link.get_parameter(address, timeout_ms).map(|value| value as i32);
        self.report("get_firmware_version", result)
    }

    /// True if the device reset since the last call
    pub fn has_reset_occurred(&mut self) -> Result<bool, DeviceError> {
        let result = self.link.has_reset_occurred();
        self.report("has_reset_occurred", result)
    }

    //------ Configuration ----------//

    /// Configures the period of each velocity sample.
    ///
    /// Every 1 ms a position value is sampled, and the delta between that sample and the position
    /// sampled one period ago is inserted into the rolling average filter.
    pub fn config_velocity_measurement_period(
        &mut self,
        period: VelocityMeasPeriod,
        timeout_ms: u32,
    ) -> Result<(), DeviceError> {
        let result = self.set_field(ConfigField::VelocityMeasurementPeriod, period as i32 as f64, timeout_ms);
        self.report("config_velocity_measurement_period", result)
    }

    /// Sets the number of samples in the rolling average of velocity measurement.
    /// Valid sizes are 1, 2, 4, 8, 16 and 32, other sizes truncate to the next lower valid size.
    pub fn config_velocity_measurement_window(&mut self, window: i32, timeout_ms: u32) -> Result<(), DeviceError> {
        let window = truncate_velocity_window(window);
        let result = self.set_field(ConfigField::VelocityMeasurementWindow, window as f64, timeout_ms);
        self.report("config_velocity_measurement_window", result)
    }

    /// Enables clearing the quadrature position when the forward limit switch is triggered
    pub fn config_clear_position_on_limit_f(&mut self, enable: bool, timeout_ms: u32) -> Result<(), DeviceError> {
        let result = self.set_field(ConfigField::ClearPositionOnLimitF, encode_bool(enable), timeout_ms);
        self.report("config_clear_position_on_limit_f", result)
    }

    /// Enables clearing the quadrature position when the reverse limit switch is triggered
    pub fn config_clear_position_on_limit_r(&mut self, enable: bool, timeout_ms: u32) -> Result<(), DeviceError> {
        let result = self.set_field(ConfigField::ClearPositionOnLimitR, encode_bool(enable), timeout_ms);
        self.report("config_clear_position_on_limit_r", result)
    }

    /// Enables clearing the quadrature position when the index signal is detected
    pub fn config_clear_position_on_quad_idx(&mut self, enable: bool, timeout_ms: u32) -> Result<(), DeviceError> {
        let result = self.set_field(ConfigField::ClearPositionOnQuadIdx, encode_bool(enable), timeout_ms);
        self.report("config_clear_position_on_quad_idx", result)
    }

    /// Sets a custom parameter, for arbitrary use (e.g. calibration data kept on the device)
    /// * `index`: parameter slot, 0 or 1
    pub fn config_set_custom_param(&mut self, value: i32, index: u8, timeout_ms: u32) -> Result<(), DeviceError> {
        let result = Self::custom_param_field(index).and_then(|field| self.set_field(field, value as f64, timeout_ms));
        self.report("config_set_custom_param", result)
    }

    /// Reads a custom parameter
    /// * `index`: parameter slot, 0 or 1
    pub fn config_get_custom_param(&mut self, index: u8, timeout_ms: u32) -> Result<i32, DeviceError> {
        let result = Self::custom_param_field(index)
            .and_then(|field| self.link.get_parameter(field.address(), timeout_ms))
            .map(|value| value as i32);
        self.report("config_get_custom_param", result)
    }

    fn custom_param_field(index: u8) -> Result<ConfigField, DeviceError> {
        match index {
            0 => Ok(ConfigField::CustomParam0),
            1 => Ok(ConfigField::CustomParam1),
            _ => Err(DeviceError::ValueOutOfRange),
        }
    }

    /// Restores factory defaults of all persistent settings
    pub fn config_factory_default(&mut self, timeout_ms: u32) -> Result<(), DeviceError> {
        let result = self.link.factory_default(timeout_ms);
        self.report("config_factory_default", result)
    }

    /// Configures all persistent settings.
    ///
    /// Restores factory defaults first and writes only the settings differing from them.
    /// Returns the worst outcome of all writes.
    pub fn config_all_settings(&mut self, configs: &Configuration, timeout_ms: u32) -> Result<(), DeviceError> {
        let result = ConfigSynchronizer::new(&FACTORY_DEFAULT).apply(&mut self.link, configs, timeout_ms);
        self.report("config_all_settings", result)
    }

    /// Reads all persistent settings. Settings failing to read keep their factory default.
    pub fn get_all_configs(&mut self, timeout_ms: u32) -> Configuration {
        ConfigSynchronizer::new(&FACTORY_DEFAULT).get_all(&mut self.link, timeout_ms)
    }

    /// Reads all persistent settings, failing with the worst read outcome
    pub fn read_all_configs(&mut self, timeout_ms: u32) -> Result<Configuration, DeviceError> {
        let result = ConfigSynchronizer::new(&FACTORY_DEFAULT).read_all(&mut self.link, timeout_ms);
        self.report("read_all_configs", result)
    }

    //------ Faults ----------//

    pub fn get_faults(&mut self) -> Result<Faults, DeviceError> {
        let result = self.link.read_bitmask(BitmaskKind::Faults).map(Faults::from_register);
        self.report("get_faults", result)
    }

    pub fn get_sticky_faults(&mut self) -> Result<StickyFaults, DeviceError> {
        let result = self
            .link
            .read_bitmask(BitmaskKind::StickyFaults)
            .map(StickyFaults::from_register);
        self.report("get_sticky_faults", result)
    }

    pub fn clear_sticky_faults(&mut self, timeout_ms: u32) -> Result<(), DeviceError> {
        let result = self.link.clear_sticky_faults(timeout_ms);
        self.report("clear_sticky_faults", result)
    }

    //------ Frames ----------//

    pub fn set_status_frame_period(
        &mut self,
        frame: StatusFrame,
        period_ms: u8,
        timeout_ms: u32,
    ) -> Result<(), DeviceError> {
        let result = self.link.set_status_frame_period(frame, period_ms, timeout_ms);
        self.report("set_status_frame_period", result)
    }

    pub fn get_status_frame_period(&mut self, frame: StatusFrame, timeout_ms: u32) -> Result<u8, DeviceError> {
        let result = self.link.get_status_frame_period(frame, timeout_ms);
        self.report("get_status_frame_period", result)
    }

    pub fn set_control_frame_period(&mut self, frame: ControlFrame, period_ms: u32) -> Result<(), DeviceError> {
        let result = self.link.set_control_frame_period(frame, period_ms);
        self.report("set_control_frame_period", result)
    }

    //------ Generic parameters ----------//

    /// Raw parameter access bypassing the structured configuration
    pub fn advanced(&mut self) -> AdvancedParams<'_, L> {
        AdvancedParams { canifier: self }
    }
}

/// Raw parameter access, typically not used.
///
/// Useful for device features not covered by the structured API, errata workarounds and
/// firmware testing. Values are passed to the device unchecked.
pub struct AdvancedParams<'a, L: DeviceLink> {
    canifier: &'a mut Canifier<L>,
}

impl<L: DeviceLink> AdvancedParams<'_, L> {
    /// Writes a parameter
    /// * `sub_value`: auxiliary byte
    /// * `ordinal`: parameter instance
    pub fn set_parameter(
        &mut self,
        param: ParamEnum,
        value: f64,
        sub_value: u8,
        ordinal: u8,
        timeout_ms: u32,
    ) -> Result<(), DeviceError> {
        let address = ParamAddress::new(param, ordinal).with_sub_value(sub_value);
        let result = self.canifier.link.set_parameter(address, value, timeout_ms);
        self.canifier.report("set_parameter", result)
    }

    /// Reads a parameter
    pub fn get_parameter(&mut self, param: ParamEnum, ordinal: u8, timeout_ms: u32) -> Result<f64, DeviceError> {
        let result = self
            .canifier
            .link
            .get_parameter(ParamAddress::new(param, ordinal), timeout_ms);
        self.canifier.report("get_parameter", result)
    }
}
