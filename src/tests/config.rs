use crate::config::*;
use crate::error::DeviceError;
use crate::params::ParamEnum;

#[test]
fn test_factory_default() {
    let config = Configuration::default();

    assert_eq!(FACTORY_DEFAULT, config);
    assert_eq!(VelocityMeasPeriod::Period100Ms, config.velocity_measurement_period);
    assert_eq!(32, config.velocity_measurement_window);
    assert!(!config.clear_position_on_limit_f);
    assert_eq!(0, config.custom_param_1);
}

#[test]
fn test_field_addresses_unique() {
    for (i, field) in ConfigField::ALL.into_iter().enumerate() {
        for other in ConfigField::ALL.into_iter().skip(i + 1) {
            assert_ne!(field.address(), other.address(), "{field:?} and {other:?}");
        }
    }
}

#[test]
fn test_field_addresses() {
    let address = ConfigField::CustomParam1.address();
    assert_eq!(ParamEnum::CustomParam, address.kind);
    assert_eq!(1, address.ordinal);
    assert_eq!(0, address.sub_value);

    assert_eq!(
        ParamEnum::SampleVelocityPeriod,
        ConfigField::VelocityMeasurementPeriod.address().kind
    );
}

#[test]
fn test_field_value() {
    let config = Configuration {
        velocity_measurement_period: VelocityMeasPeriod::Period25Ms,
        velocity_measurement_window: 20,
        clear_position_on_limit_r: true,
        custom_param_0: -12,
        ..Configuration::default()
    };

    assert_eq!(25.0, config.field_value(ConfigField::VelocityMeasurementPeriod));
    assert_eq!(16.0, config.field_value(ConfigField::VelocityMeasurementWindow));
    assert_eq!(0.0, config.field_value(ConfigField::ClearPositionOnLimitF));
    assert_eq!(1.0, config.field_value(ConfigField::ClearPositionOnLimitR));
    assert_eq!(-12.0, config.field_value(ConfigField::CustomParam0));
}

#[test]
fn test_set_field_value() {
    let mut config = Configuration::default();

    config.set_field_value(ConfigField::VelocityMeasurementPeriod, 5.0).unwrap();
    config.set_field_value(ConfigField::ClearPositionOnQuadIdx, 1.0).unwrap();
    config.set_field_value(ConfigField::CustomParam1, 77.0).unwrap();

    assert_eq!(VelocityMeasPeriod::Period5Ms, config.velocity_measurement_period);
    assert!(config.clear_position_on_quad_idx);
    assert_eq!(77, config.custom_param_1);
}

#[test]
fn test_set_field_value_invalid_period() {
    let mut config = Configuration::default();

    assert_eq!(
        Err(DeviceError::ValueOutOfRange),
        config.set_field_value(ConfigField::VelocityMeasurementPeriod, 3.0)
    );
    assert_eq!(FACTORY_DEFAULT, config);
}

#[test]
fn test_field_value_round_trip() {
    let config = Configuration {
        velocity_measurement_period: VelocityMeasPeriod::Period1Ms,
        velocity_measurement_window: 8,
        clear_position_on_limit_f: true,
        clear_position_on_limit_r: true,
        clear_position_on_quad_idx: true,
        custom_param_0: i32::MIN,
        custom_param_1: i32::MAX,
    };

    let mut decoded = FACTORY_DEFAULT;
    for field in ConfigField::ALL {
        decoded.set_field_value(field, config.field_value(field)).unwrap();
    }

    assert_eq!(config, decoded);
}

#[test]
fn test_velocity_meas_period_from_raw() {
    assert_eq!(Some(VelocityMeasPeriod::Period50Ms), VelocityMeasPeriod::from_raw(50));
    assert_eq!(None, VelocityMeasPeriod::from_raw(0));
    assert_eq!(None, VelocityMeasPeriod::from_raw(101));
}
