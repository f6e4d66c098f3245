//! Round-to-nearest helpers that saturate instead of wrapping
//!
//! Ties round away from zero. Values beyond a target range clamp to that
//! range's extreme.

/// Round to the nearest integer, ties away from zero.
///
/// The input is expected to fit in an `i32`; use [`round_to_i32`] when it
/// might not.
pub fn round_to_integer(value: f64) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

pub fn round_to_i32(value: f64) -> i32 {
    if value < -2_147_483_647.5 {
        i32::MIN
    } else if value > 2_147_483_646.5 {
        i32::MAX
    } else {
        round_to_integer(value)
    }
}

/// Round into the 24-bit signed range, returned in an `i32`.
pub fn round_to_i24(value: f64) -> i32 {
    if value < -8_388_607.5 {
        -8_388_608
    } else if value > 8_388_606.5 {
        8_388_607
    } else {
        round_to_integer(value)
    }
}

pub fn round_to_i16(value: f64) -> i16 {
    if value < -32_767.5 {
        i16::MIN
    } else if value > 32_766.5 {
        i16::MAX
    } else {
        round_to_integer(value) as i16
    }
}

pub fn round_to_i8(value: f64) -> i8 {
    if value < -127.5 {
        i8::MIN
    } else if value > 126.5 {
        i8::MAX
    } else {
        round_to_integer(value) as i8
    }
}

pub fn round_to_u32(value: f64) -> u32 {
    if value < 0.5 {
        0
    } else if value > 4_294_967_294.5 {
        u32::MAX
    } else {
        // Above 2^31, so it can't go through round_to_integer
        (value + 0.5) as u32
    }
}

/// Round into the 24-bit unsigned range, returned in a `u32`.
pub fn round_to_u24(value: f64) -> u32 {
    if value < 0.5 {
        0
    } else if value > 16_777_214.5 {
        super::U24_MAX
    } else {
        round_to_integer(value) as u32
    }
}

pub fn round_to_u16(value: f64) -> u16 {
    if value < 0.5 {
        0
    } else if value > 65_534.5 {
        u16::MAX
    } else {
        round_to_integer(value) as u16
    }
}

pub fn round_to_u8(value: f64) -> u8 {
    if value < 0.5 {
        0
    } else if value > 254.5 {
        u8::MAX
    } else {
        round_to_integer(value) as u8
    }
}
