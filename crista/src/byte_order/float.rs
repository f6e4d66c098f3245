//! IEEE-754 field decoding with a validity check
//!
//! Only normal numbers and signed zero are accepted. NaN, infinity and
//! denormals decode to the substitute value `1.0` with `invalid` set, so a
//! decode never stops on bad data but the caller can still tell.

use super::{get_u32, get_u64, put_u32, put_u64};

const F32_EXPONENT_MASK: u32 = 0x7F80_0000;
const F32_MANTISSA_MASK: u32 = 0x007F_FFFF;
const F64_EXPONENT_MASK: u64 = 0x7FF0_0000_0000_0000;
const F64_MANTISSA_MASK: u64 = 0x000F_FFFF_FFFF_FFFF;

/// A decoded float together with its validity.
///
/// When `invalid` is set, `value` holds the substitute `1.0` rather than
/// anything read from the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checked<T> {
    pub value: T,
    pub invalid: bool,
}

impl<T> Checked<T> {
    pub fn is_valid(&self) -> bool {
        !self.invalid
    }

    /// The decoded value, or `None` for a rejected bit pattern.
    pub fn into_option(self) -> Option<T> {
        if self.invalid {
            None
        } else {
            Some(self.value)
        }
    }
}

/// Check a 32-bit pattern. Infinity/NaN (all-ones exponent) and denormals
/// (zero exponent, non-zero mantissa) are rejected; the sign is ignored.
pub fn is_valid_f32(bits: u32) -> bool {
    let mantissa = bits & F32_MANTISSA_MASK;
    let exponent = (bits & F32_EXPONENT_MASK) >> 23;

    match exponent {
        0xFF => false,
        0 => mantissa == 0,
        _ => true,
    }
}

/// 64-bit version of [`is_valid_f32`].
pub fn is_valid_f64(bits: u64) -> bool {
    let mantissa = bits & F64_MANTISSA_MASK;
    let exponent = (bits & F64_EXPONENT_MASK) >> 52;

    match exponent {
        0x7FF => false,
        0 => mantissa == 0,
        _ => true,
    }
}

pub fn validate_f32(bits: u32) -> Checked<f32> {
    if is_valid_f32(bits) {
        Checked {
            value: f32::from_bits(bits),
            invalid: false,
        }
    } else {
        Checked {
            value: 1.0,
            invalid: true,
        }
    }
}

pub fn validate_f64(bits: u64) -> Checked<f64> {
    if is_valid_f64(bits) {
        Checked {
            value: f64::from_bits(bits),
            invalid: false,
        }
    } else {
        Checked {
            value: 1.0,
            invalid: true,
        }
    }
}

/// Read a big-endian single precision float.
pub fn get_f32(data: &[u8]) -> Checked<f32> {
    validate_f32(get_u32(data))
}

/// Read a big-endian double precision float.
pub fn get_f64(data: &[u8]) -> Checked<f64> {
    validate_f64(get_u64(data))
}

pub fn put_f32(out: &mut [u8], value: f32) -> usize {
    put_u32(out, value.to_bits())
}

pub fn put_f64(out: &mut [u8], value: f64) -> usize {
    put_u64(out, value.to_bits())
}
