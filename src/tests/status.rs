use crate::status::*;

#[test]
fn test_pin_values_single_bit() {
    for pin in GeneralPin::ALL {
        let values = PinValues::from_register(1 << pin.position());

        for other in GeneralPin::ALL {
            assert_eq!(pin == other, values.get(other), "{pin:?} set, checking {other:?}");
        }
    }
}

#[test]
fn test_pin_values_named_fields() {
    let values = PinValues::from_register(0b100_0001_0000);

    assert!(values.limit_forward);
    assert!(values.spi_clk_pwm0);
    assert!(!values.limit_reverse);
    assert!(!values.quad_idx);
}

#[test]
fn test_pin_values_undefined_bits_ignored() {
    assert_eq!(PinValues::default(), PinValues::from_register(!PIN_MASK));
    assert_eq!(
        PinValues::from_register(0b101),
        PinValues::from_register(0b101 | 0xFFFF_F800)
    );
}

#[test]
fn test_pin_values_all_set() {
    let values = PinValues::from_register(PIN_MASK);
    assert!(GeneralPin::ALL.into_iter().all(|pin| values.get(pin)));
}

#[test]
fn test_faults_single_bit() {
    assert_eq!(
        Faults {
            hardware_failure: true,
            ..Faults::default()
        },
        Faults::from_register(1 << FaultBit::HardwareFailure.position())
    );
    assert_eq!(
        Faults {
            under_voltage: true,
            ..Faults::default()
        },
        Faults::from_register(1 << FaultBit::UnderVoltage.position())
    );
    assert_eq!(
        Faults {
            reset_during_enable: true,
            ..Faults::default()
        },
        Faults::from_register(1 << FaultBit::ResetDuringEnable.position())
    );
}

#[test]
fn test_faults_undefined_bits_ignored() {
    let faults = Faults::from_register(!FAULT_MASK);

    assert_eq!(Faults::default(), faults);
    assert!(!faults.has_any_fault());
}

#[test]
fn test_sticky_faults() {
    let faults = StickyFaults::from_register(0b110);

    assert!(!faults.hardware_failure);
    assert!(faults.under_voltage);
    assert!(faults.reset_during_enable);
    assert!(faults.has_any_fault());

    assert!(!StickyFaults::from_register(0).has_any_fault());
}
