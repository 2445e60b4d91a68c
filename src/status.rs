//!# Pin and fault snapshots
//! Decodes the pin and fault bitmasks reported by the device. The bit position of every named
//! field is taken from a fixed table, checked at compile time for duplicates and gaps.

use crate::codec::{decode_bit, positions_distinct, positions_mask};
use serde::{Deserialize, Serialize};

/// General purpose pins; the discriminant is the bit position in the pin mask
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneralPin {
    QuadIdx = 0,
    QuadB = 1,
    QuadA = 2,
    LimitReverse = 3,
    LimitForward = 4,
    Sda = 5,
    Scl = 6,
    SpiCs = 7,
    SpiMisoPwm2 = 8,
    SpiMosiPwm1 = 9,
    SpiClkPwm0 = 10,
}

impl GeneralPin {
    pub const ALL: [GeneralPin; 11] = [
        GeneralPin::QuadIdx,
        GeneralPin::QuadB,
        GeneralPin::QuadA,
        GeneralPin::LimitReverse,
        GeneralPin::LimitForward,
        GeneralPin::Sda,
        GeneralPin::Scl,
        GeneralPin::SpiCs,
        GeneralPin::SpiMisoPwm2,
        GeneralPin::SpiMosiPwm1,
        GeneralPin::SpiClkPwm0,
    ];

    pub const fn position(self) -> u8 {
        self as u8
    }

    pub(crate) const fn mask(self) -> u16 {
        1 << self.position()
    }
}

/// Bits of the pin mask the device defines
pub const PIN_MASK: u32 = 0x7FF;

const PIN_POSITIONS: [u8; GeneralPin::ALL.len()] = {
    let mut positions = [0u8; GeneralPin::ALL.len()];
    let mut i = 0;

    while i < positions.len() {
        positions[i] = GeneralPin::ALL[i].position();
        i += 1;
    }

    positions
};

const _: () = assert!(positions_distinct(&PIN_POSITIONS));
const _: () = assert!(positions_mask(&PIN_POSITIONS) == PIN_MASK);

/// State of all general purpose pins
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinValues {
    pub quad_idx: bool,
    pub quad_b: bool,
    pub quad_a: bool,
    pub limit_reverse: bool,
    pub limit_forward: bool,
    pub sda: bool,
    pub scl: bool,
    pub spi_cs_pwm3: bool,
    pub spi_miso_pwm2: bool,
    pub spi_mosi_pwm1: bool,
    pub spi_clk_pwm0: bool,
}

impl PinValues {
    /// Maps pin mask to pin states, undefined bits are ignored
    pub fn from_register(mask: u32) -> Self {
        let pin = |pin: GeneralPin| decode_bit(mask, pin.position());

        Self {
            quad_idx: pin(GeneralPin::QuadIdx),
            quad_b: pin(GeneralPin::QuadB),
            quad_a: pin(GeneralPin::QuadA),
            limit_reverse: pin(GeneralPin::LimitReverse),
            limit_forward: pin(GeneralPin::LimitForward),
            sda: pin(GeneralPin::Sda),
            scl: pin(GeneralPin::Scl),
            spi_cs_pwm3: pin(GeneralPin::SpiCs),
            spi_miso_pwm2: pin(GeneralPin::SpiMisoPwm2),
            spi_mosi_pwm1: pin(GeneralPin::SpiMosiPwm1),
            spi_clk_pwm0: pin(GeneralPin::SpiClkPwm0),
        }
    }

    /// State of a single pin
    pub fn get(&self, pin: GeneralPin) -> bool {
        match pin {
            GeneralPin::QuadIdx => self.quad_idx,
            GeneralPin::QuadB => self.quad_b,
            GeneralPin::QuadA => self.quad_a,
            GeneralPin::LimitReverse => self.limit_reverse,
            GeneralPin::LimitForward => self.limit_forward,
            GeneralPin::Sda => self.sda,
            GeneralPin::Scl => self.scl,
            GeneralPin::SpiCs => self.spi_cs_pwm3,
            GeneralPin::SpiMisoPwm2 => self.spi_miso_pwm2,
            GeneralPin::SpiMosiPwm1 => self.spi_mosi_pwm1,
            GeneralPin::SpiClkPwm0 => self.spi_clk_pwm0,
        }
    }
}

/// Fault bits shared by the volatile and the sticky fault mask
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FaultBit {
    HardwareFailure = 0,
    UnderVoltage = 1,
    ResetDuringEnable = 2,
}

impl FaultBit {
    pub const ALL: [FaultBit; 3] = [
        FaultBit::HardwareFailure,
        FaultBit::UnderVoltage,
        FaultBit::ResetDuringEnable,
    ];

    pub const fn position(self) -> u8 {
        self as u8
    }
}

/// Bits of the fault masks the device defines
pub const FAULT_MASK: u32 = 0x7;

const FAULT_POSITIONS: [u8; FaultBit::ALL.len()] = {
    let mut positions = [0u8; FaultBit::ALL.len()];
    let mut i = 0;

    while i < positions.len() {
        positions[i] = FaultBit::ALL[i].position();
        i += 1;
    }

    positions
};

const _: () = assert!(positions_distinct(&FAULT_POSITIONS));
const _: () = assert!(positions_mask(&FAULT_POSITIONS) == FAULT_MASK);

/// Faults currently present. Cleared by the device as soon as the condition is gone.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faults {
    pub hardware_failure: bool,
    pub under_voltage: bool,
    pub reset_during_enable: bool,
}

impl Faults {
    pub fn from_register(mask: u32) -> Self {
        Self {
            hardware_failure: decode_bit(mask, FaultBit::HardwareFailure.position()),
            under_voltage: decode_bit(mask, FaultBit::UnderVoltage.position()),
            reset_during_enable: decode_bit(mask, FaultBit::ResetDuringEnable.position()),
        }
    }

    pub fn has_any_fault(&self) -> bool {
        self.hardware_failure || self.under_voltage || self.reset_during_enable
    }
}

/// Faults latched since the last clear. Stay set until cleared by command.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickyFaults {
    pub hardware_failure: bool,
    pub under_voltage: bool,
    pub reset_during_enable: bool,
}

impl StickyFaults {
    pub fn from_register(mask: u32) -> Self {
        let faults = Faults::from_register(mask);

        Self {
            hardware_failure: faults.hardware_failure,
            under_voltage: faults.under_voltage,
            reset_during_enable: faults.reset_during_enable,
        }
    }

    pub fn has_any_fault(&self) -> bool {
        self.hardware_failure || self.under_voltage || self.reset_during_enable
    }
}

/// Latest quadrature encoder measurement
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadratureReading {
    pub position: i32,
    /// Position change per velocity measurement period
    pub velocity: i32,
}

/// Latest measurement of one PWM input
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwmInput {
    /// Pulse width in microseconds
    pub pulse_width_us: u32,
    /// Period in microseconds
    pub period_us: u32,
}
