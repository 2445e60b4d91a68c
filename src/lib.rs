#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]
#![allow(dead_code)]
#![allow(clippy::identity_op)]

//! # Library for the CANifier CAN peripheral
//!
//! Crate currently offer the following features:
//! * Synchronization of the persistent configuration, writing only settings differing from the factory defaults
//! * Generic parameter access by parameter enumeration and ordinal
//! * Decoding of pin and fault states
//! * LED, PWM and general purpose outputs
//! * [embedded_can] based link with timeout handling
//! * no_std support
//!
//!## Example
//!
//!```
//!use canifier::device::Canifier;
//!use canifier::config::{Configuration, VelocityMeasPeriod};
//!use canifier::example::ExampleLink;
//!use canifier::error::DeviceError;
//!
//!let mut canifier = Canifier::new(ExampleLink::default(), 0);
//!
//! // Configure all persistent settings, waiting max. 10 ms for each confirmation
//!canifier
//!    .config_all_settings(
//!        &Configuration {
//!            velocity_measurement_period: VelocityMeasPeriod::Period20Ms,
//!            velocity_measurement_window: 16,
//!            clear_position_on_quad_idx: true,
//!            custom_param_0: 1234,
//!            ..Configuration::default()
//!        },
//!        10,
//!    )
//!    .unwrap();
//!
//!assert_eq!(1234, canifier.config_get_custom_param(0, 10).unwrap());
//!assert_eq!(Err(DeviceError::ValueOutOfRange), canifier.config_get_custom_param(2, 10));
//!
//! // Read pin states
//!let pins = canifier.get_general_inputs().unwrap();
//!assert!(!pins.limit_forward);
//!```

extern crate alloc;

pub mod can;
pub mod codec;
pub mod config;
pub mod device;
pub mod error;
pub mod frame;
pub mod link;
pub mod params;
pub mod status;
pub mod sync;

pub mod example;
#[cfg(test)]
pub(crate) mod mocks;
mod registers;
#[cfg(test)]
mod tests;
