use crate::registers::*;

#[test]
fn test_param_frame() {
    assert_eq!(
        [0x19, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x2A],
        ParamFrame::new()
            .with_param(400)
            .with_ordinal(1)
            .with_param_value(42.0)
            .into_bytes()
    );
}

#[test]
fn test_param_frame_status() {
    let frame = ParamFrame::new()
        .with_param(300)
        .with_status(ResponseStatus::OutOfRange)
        .with_sub_value(0xAB)
        .with_ordinal(0x05);

    assert_eq!([0x12, 0xC1, 0xAB, 0x05, 0x00, 0x00, 0x00, 0x00], frame.into_bytes());

    let decoded = ParamFrame::from_bytes(frame.into_bytes());
    assert_eq!(300, decoded.param());
    assert_eq!(ResponseStatus::OutOfRange, decoded.status());
}

#[test]
fn test_param_frame_unknown_status() {
    let frame = ParamFrame::from_bytes([0x01, 0x97, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

    assert_eq!(0x019, frame.param());
    assert!(frame.status_or_err().is_err());
}

#[test]
fn test_param_frame_negative_value() {
    let frame = ParamFrame::new().with_param_value(-5.7);

    assert_eq!(0xFFFF_FFFB, frame.value());
    assert_eq!(-5.0, frame.param_value());
    assert_eq!([0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFB], frame.into_bytes());
}

#[test]
fn test_control_general_frame() {
    assert_eq!(
        [0xFF, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        ControlGeneralFrame::new().with_led_a(0x3FF).into_bytes()
    );

    assert_eq!(
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00],
        ControlGeneralFrame::new().with_output_enable(0x001).into_bytes()
    );
}

#[test]
fn test_control_pwm_frame_duty_cycle() {
    let frame = ControlPwmFrame::new().with_duty_cycle(1, 0x3FF).unwrap();
    assert_eq!([0x00, 0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00], frame.into_bytes());

    assert!(ControlPwmFrame::new().with_duty_cycle(4, 1).is_none());
}

#[test]
fn test_control_pwm_frame_enable() {
    let frame = ControlPwmFrame::new()
        .with_channel_enabled(0, true)
        .unwrap()
        .with_channel_enabled(3, true)
        .unwrap();

    assert_eq!(0b1001, frame.enable());
    assert_eq!([0x00, 0x00, 0x00, 0x00, 0x00, 0x90, 0x00, 0x00], frame.into_bytes());

    let frame = frame.with_channel_enabled(0, false).unwrap();
    assert_eq!(0b1000, frame.enable());

    assert!(frame.with_channel_enabled(4, true).is_none());
}
