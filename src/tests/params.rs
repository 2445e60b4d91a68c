use crate::error::DeviceError;
use crate::mocks::MockLink;
use crate::params::{ParamAddress, ParamEnum, ParameterStore};
use mockall::predicate::eq;

#[test]
fn test_param_enum_raw() {
    for param in [
        ParamEnum::ClearPositionOnQuadIdx,
        ParamEnum::ClearPositionOnLimitF,
        ParamEnum::ClearPositionOnLimitR,
        ParamEnum::FirmwareVersion,
        ParamEnum::StatusFramePeriod,
        ParamEnum::SampleVelocityPeriod,
        ParamEnum::SampleVelocityWindow,
        ParamEnum::QuadraturePosition,
        ParamEnum::CustomParam,
        ParamEnum::ClearStickyFaults,
        ParamEnum::DefaultConfig,
    ] {
        assert_eq!(Ok(param), ParamEnum::try_from(param.raw()));
    }

    assert_eq!(400, ParamEnum::CustomParam.raw());
    assert_eq!(Err(DeviceError::UnsupportedParameter), ParamEnum::try_from(401));
}

#[test]
fn test_set_parameter_forwarded() {
    let mut link = MockLink::new();
    link.expect_set_param()
        .with(eq(ParamEnum::CustomParam), eq(-3.0), eq(9), eq(1), eq(20))
        .times(1)
        .returning(|_, _, _, _, _| Ok(()));

    let address = ParamAddress::new(ParamEnum::CustomParam, 1).with_sub_value(9);
    assert_eq!(Ok(()), link.set_parameter(address, -3.0, 20));
}

#[test]
fn test_get_parameter_forwarded() {
    let mut link = MockLink::new();
    link.expect_get_param()
        .with(eq(ParamEnum::SampleVelocityWindow), eq(0), eq(0))
        .times(1)
        .returning(|_, _, _| Err(DeviceError::Timeout));

    let address = ParamAddress::new(ParamEnum::SampleVelocityWindow, 0);
    assert_eq!(Err(DeviceError::Timeout), link.get_parameter(address, 0));
}
