//!# Parameter access
//! Parameters are addressed by kind and ordinal. [ParameterStore] is the only path through which
//! configuration values are read from or written to the device.
//!
//! `timeout_ms` semantics are shared by all operations: zero dispatches the request and returns
//! without waiting for the device, a positive value blocks until the device confirms or the
//! timeout elapses.

use crate::error::DeviceError;
use crate::link::DeviceLink;
use log::trace;

/// Parameters known to the device
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ParamEnum {
    ClearPositionOnQuadIdx = 100,
    ClearPositionOnLimitF = 144,
    ClearPositionOnLimitR = 145,
    FirmwareVersion = 200,
    StatusFramePeriod = 300,
    SampleVelocityPeriod = 325,
    SampleVelocityWindow = 326,
    QuadraturePosition = 330,
    CustomParam = 400,
    ClearStickyFaults = 450,
    DefaultConfig = 500,
}

impl ParamEnum {
    pub const fn raw(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for ParamEnum {
    type Error = DeviceError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            100 => Ok(Self::ClearPositionOnQuadIdx),
            144 => Ok(Self::ClearPositionOnLimitF),
            145 => Ok(Self::ClearPositionOnLimitR),
            200 => Ok(Self::FirmwareVersion),
            300 => Ok(Self::StatusFramePeriod),
            325 => Ok(Self::SampleVelocityPeriod),
            326 => Ok(Self::SampleVelocityWindow),
            330 => Ok(Self::QuadraturePosition),
            400 => Ok(Self::CustomParam),
            450 => Ok(Self::ClearStickyFaults),
            500 => Ok(Self::DefaultConfig),
            _ => Err(DeviceError::UnsupportedParameter),
        }
    }
}

/// Location of one remote scalar
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamAddress {
    pub kind: ParamEnum,
    /// Distinguishes instances of the same kind, e.g. custom parameter slots
    pub ordinal: u8,
    /// Auxiliary byte sent along with writes
    pub sub_value: u8,
}

impl ParamAddress {
    pub const fn new(kind: ParamEnum, ordinal: u8) -> Self {
        Self {
            kind,
            ordinal,
            sub_value: 0,
        }
    }

    pub const fn with_sub_value(mut self, sub_value: u8) -> Self {
        self.sub_value = sub_value;
        self
    }
}

/// Generic get/set of addressed parameters
pub trait ParameterStore {
    /// Writes a parameter value
    fn set_parameter(&mut self, address: ParamAddress, value: f64, timeout_ms: u32) -> Result<(), DeviceError>;

    /// Reads a parameter value
    fn get_parameter(&mut self, address: ParamAddress, timeout_ms: u32) -> Result<f64, DeviceError>;
}

impl<L: DeviceLink> ParameterStore for L {
    fn set_parameter(&mut self, address: ParamAddress, value: f64, timeout_ms: u32) -> Result<(), DeviceError> {
        trace!("Setting {address:?} to {value} (timeout {timeout_ms} ms)");
        self.set_param(address.kind, value, address.sub_value, address.ordinal, timeout_ms)
    }

    fn get_parameter(&mut self, address: ParamAddress, timeout_ms: u32) -> Result<f64, DeviceError> {
        trace!("Reading {address:?} (timeout {timeout_ms} ms)");
        self.get_param(address.kind, address.ordinal, timeout_ms)
    }
}
