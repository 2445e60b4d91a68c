//!# Value conversion
//! Stateless conversion between application values and the device's wire representation.

/// Largest value of the 10-bit duty cycle representation
pub const DUTY_CYCLE_MAX: u16 = 1023;

/// Valid sizes of the velocity measurement rolling average
pub const VELOCITY_WINDOWS: [u8; 6] = [1, 2, 4, 8, 16, 32];

/// Converts a duty cycle fraction to the 10-bit representation.
///
/// The input is clamped to `[0.0, 1.0]` first, then scaled by 1023 and truncated toward zero,
/// so `0.5` encodes as 511. NaN encodes as 0.
pub fn encode_duty_cycle(fraction: f64) -> u16 {
    let fraction = if fraction > 1.0 {
        1.0
    } else if fraction >= 0.0 {
        fraction
    } else {
        0.0
    };

    (fraction * DUTY_CYCLE_MAX as f64) as u16
}

/// Negative channel indices select channel 0. There is no upper bound here, the link validates it.
pub fn encode_channel_index(channel: i32) -> u32 {
    channel.max(0) as u32
}

/// Extracts bit `position` of `mask`, positions beyond the mask width read as cleared
pub const fn decode_bit(mask: u32, position: u8) -> bool {
    match mask.checked_shr(position as u32) {
        Some(shifted) => shifted & 1 != 0,
        None => false,
    }
}

pub fn encode_bool(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

pub fn decode_bool(value: f64) -> bool {
    value != 0.0
}

/// Truncates a window size to the largest valid size not above it. Sizes below 1 select 1.
pub fn truncate_velocity_window(window: i32) -> u8 {
    let mut selected = VELOCITY_WINDOWS[0];

    for size in VELOCITY_WINDOWS {
        if (size as i32) <= window {
            selected = size;
        }
    }

    selected
}

/// Bus voltage is sent in 0.05 V steps above 4 V
pub fn decode_bus_voltage(raw: u8) -> f64 {
    raw as f64 * 0.05 + 4.0
}

/// Returns true if no bit position occurs twice and all are within a 32-bit mask
pub const fn positions_distinct(positions: &[u8]) -> bool {
    let mut seen = 0u32;
    let mut i = 0;

    while i < positions.len() {
        if positions[i] >= 32 {
            return false;
        }

        let bit = 1u32 << positions[i];
        if seen & bit != 0 {
            return false;
        }

        seen |= bit;
        i += 1;
    }

    true
}

/// Mask with every listed bit position set
pub const fn positions_mask(positions: &[u8]) -> u32 {
    let mut mask = 0u32;
    let mut i = 0;

    while i < positions.len() {
        mask |= 1u32 << (positions[i] % 32);
        i += 1;
    }

    mask
}
