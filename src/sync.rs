//!# Configuration synchronization
//! Brings the device to a desired [Configuration] by restoring factory defaults and writing
//! only the fields that differ from the defaults.
//!
//!```
//!# use canifier::config::{Configuration, FACTORY_DEFAULT};
//!# use canifier::example::ExampleLink;
//!# use canifier::sync::ConfigSynchronizer;
//!#
//! let mut link = ExampleLink::default();
//! let synchronizer = ConfigSynchronizer::new(&FACTORY_DEFAULT);
//!
//! let desired = Configuration {
//!     custom_param_1: 7,
//!     ..Configuration::default()
//! };
//!
//! synchronizer.apply(&mut link, &desired, 10).unwrap();
//! assert_eq!(1, link.param_writes);
//! assert_eq!(desired, synchronizer.get_all(&mut link, 10));
//!```

use crate::config::{ConfigField, Configuration};
use crate::error::{DeviceError, ErrorCollection};
use crate::link::DeviceLink;
use crate::params::ParameterStore;
use log::{debug, warn};

/// Synchronizes configurations against a fixed baseline
#[derive(Copy, Clone, Debug)]
pub struct ConfigSynchronizer<'a> {
    /// Values the device holds after a factory reset
    defaults: &'a Configuration,
}

impl<'a> ConfigSynchronizer<'a> {
    pub const fn new(defaults: &'a Configuration) -> Self {
        Self { defaults }
    }

    /// Fields of `desired` whose device value differs from the baseline
    pub fn differing_fields<'b>(&'b self, desired: &'b Configuration) -> impl Iterator<Item = ConfigField> + 'b {
        ConfigField::ALL
            .into_iter()
            .filter(move |field| desired.field_value(*field) != self.defaults.field_value(*field))
    }

    /// Restores factory defaults, then writes every differing field.
    ///
    /// A failing reset does not stop the writes. Returns the worst outcome of all operations.
    pub fn apply<L: DeviceLink>(
        &self,
        link: &mut L,
        desired: &Configuration,
        timeout_ms: u32,
    ) -> Result<(), DeviceError> {
        let mut errors = ErrorCollection::new();
        errors.record(link.factory_default(timeout_ms));

        let mut written = 0;
        for field in self.differing_fields(desired) {
            errors.record(link.set_parameter(field.address(), desired.field_value(field), timeout_ms));
            written += 1;
        }

        debug!("Configuration applied with {written} field writes: {:?}", errors.result());
        errors.result()
    }

    /// Reads every field from the device.
    ///
    /// Read failures are not reported, a field failing to read keeps its baseline value.
    pub fn get_all<L: DeviceLink>(&self, link: &mut L, timeout_ms: u32) -> Configuration {
        let mut config = *self.defaults;

        for field in ConfigField::ALL {
            let outcome = link
                .get_parameter(field.address(), timeout_ms)
                .and_then(|value| config.set_field_value(field, value));

            if let Err(error) = outcome {
                warn!("Reading {field:?} failed: {error:?}");
            }
        }

        config
    }

    /// Reads every field from the device and reports the worst read outcome
    pub fn read_all<L: DeviceLink>(&self, link: &mut L, timeout_ms: u32) -> Result<Configuration, DeviceError> {
        let mut config = *self.defaults;
        let mut errors = ErrorCollection::new();

        for field in ConfigField::ALL {
            errors.record(
                link.get_parameter(field.address(), timeout_ms)
                    .and_then(|value| config.set_field_value(field, value)),
            );
        }

        errors.result().map(|_| config)
    }
}
