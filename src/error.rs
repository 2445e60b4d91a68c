//!# Operation outcomes
//!
//! Every device interaction returns `Result<T, DeviceError>`; `Ok` is the "no error" outcome.
//! [ErrorCollection] folds several outcomes into the worst one.
//!
//! ```
//!# use canifier::error::{DeviceError, ErrorCollection};
//! let mut errors = ErrorCollection::new();
//! errors.record(Ok(()));
//! errors.record(Err::<(), _>(DeviceError::ValueOutOfRange));
//! errors.record(Err::<(), _>(DeviceError::Timeout));
//! errors.record(Ok(()));
//!
//! assert_eq!(Err(DeviceError::Timeout), errors.result());
//! ```

/// Failure classification of a single device interaction.
///
/// Variants are declared from least to most severe. The derived ordering is the
/// severity ranking used by [ErrorCollection].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceError {
    /// Device rejected the value
    ValueOutOfRange,
    /// Parameter is unknown to the device
    UnsupportedParameter,
    /// Confirmation or response not received within the given timeout
    Timeout,
    /// Deadline clock could not be read
    ClockError,
    /// Frame could not be handed to the bus
    TxFailed,
}

impl From<embedded_time::clock::Error> for DeviceError {
    fn from(_error: embedded_time::clock::Error) -> Self {
        DeviceError::ClockError
    }
}

/// Keeps the worst outcome of a sequence of operations
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorCollection {
    worst: Option<DeviceError>,
}

impl ErrorCollection {
    pub const fn new() -> Self {
        Self { worst: None }
    }

    /// Records one outcome. A failure replaces the current one only if it ranks strictly worse,
    /// so among failures of equal severity the first one is kept.
    pub fn record<T>(&mut self, outcome: Result<T, DeviceError>) {
        if let Err(error) = outcome {
            match self.worst {
                Some(worst) if worst >= error => {}
                _ => self.worst = Some(error),
            }
        }
    }

    /// Returns the worst recorded outcome, `Ok(())` if nothing failed
    pub fn result(&self) -> Result<(), DeviceError> {
        match self.worst {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
