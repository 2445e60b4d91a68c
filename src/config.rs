//!# Persistent configuration
//! [Configuration] holds every persistent setting of the device. Each field maps to exactly one
//! parameter address, see [ConfigField].

use crate::codec::{decode_bool, encode_bool, truncate_velocity_window};
use crate::error::DeviceError;
use crate::params::{ParamAddress, ParamEnum};
use serde::{Deserialize, Serialize};

/// Factory default of every persistent setting
pub const FACTORY_DEFAULT: Configuration = Configuration::factory_default();

/// Entire persistent configuration
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Period of each velocity sample
    pub velocity_measurement_period: VelocityMeasPeriod,

    /// Number of samples in the rolling average of velocity measurement.
    /// Valid sizes are 1, 2, 4, 8, 16 and 32, other sizes truncate to the next lower valid size.
    pub velocity_measurement_window: i32,

    /// Clear quadrature position when the forward limit switch is triggered
    pub clear_position_on_limit_f: bool,

    /// Clear quadrature position when the reverse limit switch is triggered
    pub clear_position_on_limit_r: bool,

    /// Clear quadrature position when the index signal is detected
    pub clear_position_on_quad_idx: bool,

    /// Custom parameter slot 0, for arbitrary use
    pub custom_param_0: i32,

    /// Custom parameter slot 1, for arbitrary use
    pub custom_param_1: i32,
}

impl Configuration {
    pub const fn factory_default() -> Self {
        Self {
            velocity_measurement_period: VelocityMeasPeriod::Period100Ms,
            velocity_measurement_window: 32,
            clear_position_on_limit_f: false,
            clear_position_on_limit_r: false,
            clear_position_on_quad_idx: false,
            custom_param_0: 0,
            custom_param_1: 0,
        }
    }

    /// Value sent to the device for the given field
    pub fn field_value(&self, field: ConfigField) -> f64 {
        match field {
            ConfigField::VelocityMeasurementPeriod => self.velocity_measurement_period as i32 as f64,
            ConfigField::VelocityMeasurementWindow => truncate_velocity_window(self.velocity_measurement_window) as f64,
            ConfigField::ClearPositionOnLimitF => encode_bool(self.clear_position_on_limit_f),
            ConfigField::ClearPositionOnLimitR => encode_bool(self.clear_position_on_limit_r),
            ConfigField::ClearPositionOnQuadIdx => encode_bool(self.clear_position_on_quad_idx),
            ConfigField::CustomParam0 => self.custom_param_0 as f64,
            ConfigField::CustomParam1 => self.custom_param_1 as f64,
        }
    }

    /// Updates the given field from a value read from the device
    pub fn set_field_value(&mut self, field: ConfigField, value: f64) -> Result<(), DeviceError> {
        match field {
            ConfigField::VelocityMeasurementPeriod => {
                self.velocity_measurement_period =
                    VelocityMeasPeriod::from_raw(value as i32).ok_or(DeviceError::ValueOutOfRange)?
            }
            ConfigField::VelocityMeasurementWindow => self.velocity_measurement_window = value as i32,
            ConfigField::ClearPositionOnLimitF => self.clear_position_on_limit_f = decode_bool(value),
            ConfigField::ClearPositionOnLimitR => self.clear_position_on_limit_r = decode_bool(value),
            ConfigField::ClearPositionOnQuadIdx => self.clear_position_on_quad_idx = decode_bool(value),
            ConfigField::CustomParam0 => self.custom_param_0 = value as i32,
            ConfigField::CustomParam1 => self.custom_param_1 = value as i32,
        }

        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::factory_default()
    }
}

/// Fields of [Configuration]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigField {
    VelocityMeasurementPeriod,
    VelocityMeasurementWindow,
    ClearPositionOnLimitF,
    ClearPositionOnLimitR,
    ClearPositionOnQuadIdx,
    CustomParam0,
    CustomParam1,
}

impl ConfigField {
    pub const ALL: [ConfigField; 7] = [
        ConfigField::VelocityMeasurementPeriod,
        ConfigField::VelocityMeasurementWindow,
        ConfigField::ClearPositionOnLimitF,
        ConfigField::ClearPositionOnLimitR,
        ConfigField::ClearPositionOnQuadIdx,
        ConfigField::CustomParam0,
        ConfigField::CustomParam1,
    ];

    /// Parameter address backing the field
    pub const fn address(self) -> ParamAddress {
        match self {
            ConfigField::VelocityMeasurementPeriod => ParamAddress::new(ParamEnum::SampleVelocityPeriod, 0),
            ConfigField::VelocityMeasurementWindow => ParamAddress::new(ParamEnum::SampleVelocityWindow, 0),
            ConfigField::ClearPositionOnLimitF => ParamAddress::new(ParamEnum::ClearPositionOnLimitF, 0),
            ConfigField::ClearPositionOnLimitR => ParamAddress::new(ParamEnum::ClearPositionOnLimitR, 0),
            ConfigField::ClearPositionOnQuadIdx => ParamAddress::new(ParamEnum::ClearPositionOnQuadIdx, 0),
            ConfigField::CustomParam0 => ParamAddress::new(ParamEnum::CustomParam, 0),
            ConfigField::CustomParam1 => ParamAddress::new(ParamEnum::CustomParam, 1),
        }
    }
}

/// Period of the velocity measurement samples
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VelocityMeasPeriod {
    Period1Ms = 1,
    Period2Ms = 2,
    Period5Ms = 5,
    Period10Ms = 10,
    Period20Ms = 20,
    Period25Ms = 25,
    Period50Ms = 50,
    Period100Ms = 100,
}

impl Default for VelocityMeasPeriod {
    fn default() -> Self {
        Self::Period100Ms
    }
}

impl VelocityMeasPeriod {
    /// Maps the period in ms to the enumerant
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Period1Ms),
            2 => Some(Self::Period2Ms),
            5 => Some(Self::Period5Ms),
            10 => Some(Self::Period10Ms),
            20 => Some(Self::Period20Ms),
            25 => Some(Self::Period25Ms),
            50 => Some(Self::Period50Ms),
            100 => Some(Self::Period100Ms),
            _ => None,
        }
    }
}
