use crate::error::{DeviceError, ErrorCollection};

#[test]
fn test_error_collection_empty() {
    assert_eq!(Ok(()), ErrorCollection::new().result());
}

#[test]
fn test_error_collection_only_successes() {
    let mut errors = ErrorCollection::new();
    errors.record(Ok(()));
    errors.record(Ok(5.0));

    assert_eq!(Ok(()), errors.result());
}

#[test]
fn test_error_collection_worst_wins() {
    let mut errors = ErrorCollection::new();
    errors.record(Err::<(), _>(DeviceError::Timeout));
    errors.record(Err::<(), _>(DeviceError::ValueOutOfRange));
    errors.record(Ok(()));

    assert_eq!(Err(DeviceError::Timeout), errors.result());

    errors.record(Err::<(), _>(DeviceError::TxFailed));
    assert_eq!(Err(DeviceError::TxFailed), errors.result());
}

#[test]
fn test_error_collection_order_independent() {
    let outcomes = [
        Err(DeviceError::UnsupportedParameter),
        Ok(()),
        Err(DeviceError::ClockError),
        Err(DeviceError::ValueOutOfRange),
    ];

    let mut forward = ErrorCollection::new();
    outcomes.iter().for_each(|outcome| forward.record(*outcome));

    let mut backward = ErrorCollection::new();
    outcomes.iter().rev().for_each(|outcome| backward.record(*outcome));

    assert_eq!(Err(DeviceError::ClockError), forward.result());
    assert_eq!(forward.result(), backward.result());
}

#[test]
fn test_severity_ranking() {
    assert!(DeviceError::ValueOutOfRange < DeviceError::UnsupportedParameter);
    assert!(DeviceError::UnsupportedParameter < DeviceError::Timeout);
    assert!(DeviceError::Timeout < DeviceError::ClockError);
    assert!(DeviceError::ClockError < DeviceError::TxFailed);
}

#[test]
fn test_clock_error_conversion() {
    assert_eq!(
        DeviceError::ClockError,
        DeviceError::from(embedded_time::clock::Error::Unspecified)
    );
}
