//! Compact 16-bit float used by some Crista telemetry fields
//!
//! Layout: 1 sign bit, 6 exponent bits (bias 31), 9 mantissa bits. There is
//! no infinity or NaN. Narrowing truncates the mantissa; exponents below
//! the range become exact zero and exponents above it clamp to the largest
//! finite exponent.

const SIGN_MASK: u16 = 0x8000;
const EXPONENT_MASK: u16 = 0x7E00;
const MANTISSA_MASK: u16 = 0x01FF;
const EXPONENT_BIAS: i32 = 31;
const MANTISSA_DROP_BITS: u32 = 23 - 9;

pub fn f32_to_float16(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = bits & 0x8000_0000;
    let mantissa = bits & 0x007F_FFFF;
    let biased_exponent = (bits & 0x7F80_0000) >> 23;

    if mantissa == 0 && biased_exponent == 0 {
        return 0;
    }

    let mantissa = mantissa >> MANTISSA_DROP_BITS;
    let exponent = (biased_exponent as i32 - 127).min(EXPONENT_BIAS);
    if exponent < -EXPONENT_BIAS {
        return 0;
    }

    let exponent = (exponent + EXPONENT_BIAS) as u32;
    ((sign >> 16) | (exponent << 9) | mantissa) as u16
}

pub fn float16_to_f32(half: u16) -> f32 {
    let sign = u32::from(half & SIGN_MASK) << 16;
    if half & !SIGN_MASK == 0 {
        return f32::from_bits(sign);
    }

    let exponent = i32::from((half & EXPONENT_MASK) >> 9) - EXPONENT_BIAS;
    let mantissa = u32::from(half & MANTISSA_MASK) << MANTISSA_DROP_BITS;
    let exponent = ((exponent + 127) as u32) << 23;

    f32::from_bits(sign | exponent | mantissa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero() {
        assert_eq!(f32_to_float16(0.0), 0);
        assert_eq!(f32_to_float16(-0.0), 0);
        assert_eq!(float16_to_f32(0), 0.0);
        assert!(float16_to_f32(0x8000).is_sign_negative());
    }

    #[test]
    fn test_exact_values() {
        assert_eq!(f32_to_float16(1.0), 0x3E00);
        assert_eq!(f32_to_float16(-2.0), 0xC000);
        assert_eq!(f32_to_float16(1.5), 0x3F00);
        assert_eq!(float16_to_f32(0x3E00), 1.0);
        assert_eq!(float16_to_f32(0xC000), -2.0);
        assert_eq!(float16_to_f32(0x3F00), 1.5);
    }

    #[test]
    fn test_roundtrip_within_mantissa_precision() {
        let mut value = std::f32::consts::PI;
        for _ in 0..8 {
            let back = float16_to_f32(f32_to_float16(value));
            assert_relative_eq!(back, value, max_relative = 1.0 / 512.0);
            assert!(back <= value, "narrowing must truncate");
            value *= 10.0;
        }
    }

    #[test]
    fn test_underflow_is_zero() {
        assert_eq!(f32_to_float16(1.0e-20), 0);
        assert_eq!(f32_to_float16(-1.0e-20), 0);
        // Denormal input
        assert_eq!(f32_to_float16(f32::from_bits(1)), 0);
    }

    #[test]
    fn test_overflow_saturates_exponent() {
        let half = f32_to_float16(1.0e20);
        assert_eq!((half & EXPONENT_MASK) >> 9, 62);
        assert_eq!(half & SIGN_MASK, 0);

        let negative = f32_to_float16(-1.0e20);
        assert_eq!(negative & SIGN_MASK, SIGN_MASK);
        assert!(float16_to_f32(negative).is_finite());
        assert!(float16_to_f32(f32_to_float16(f32::INFINITY)).is_finite());
    }
}
