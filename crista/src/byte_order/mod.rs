//! Conversions between wire bytes and host numbers
//!
//! The Crista wire format is big-endian (network order). The functions at
//! this level read and write big-endian fields; [`le`] holds the
//! little-endian set used by some targets. Readers take a slice positioned
//! at the field and panic if it is shorter than the field. Writers return
//! the number of bytes written so callers can advance a cursor.

mod cursor;
mod float;
mod float16;
pub mod le;
mod round;

pub use cursor::{WireReader, WireWriter};
pub use float::{
    get_f32, get_f64, is_valid_f32, is_valid_f64, put_f32, put_f64, validate_f32, validate_f64,
    Checked,
};
pub use float16::{f32_to_float16, float16_to_f32};
pub use round::{
    round_to_i16, round_to_i24, round_to_i32, round_to_i8, round_to_integer, round_to_u16,
    round_to_u24, round_to_u32, round_to_u8,
};

/// Largest value representable in a 24-bit unsigned field.
pub const U24_MAX: u32 = 0x00FF_FFFF;

pub fn get_u16(data: &[u8]) -> u16 {
    u16::from_be_bytes([data[0], data[1]])
}

pub fn get_i16(data: &[u8]) -> i16 {
    i16::from_be_bytes([data[0], data[1]])
}

/// Read a 24-bit unsigned field into the low 24 bits of a `u32`.
pub fn get_u24(data: &[u8]) -> u32 {
    u32::from_be_bytes([0, data[0], data[1], data[2]])
}

pub fn get_u32(data: &[u8]) -> u32 {
    u32::from_be_bytes([data[0], data[1], data[2], data[3]])
}

pub fn get_i32(data: &[u8]) -> i32 {
    i32::from_be_bytes([data[0], data[1], data[2], data[3]])
}

pub fn get_u64(data: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[..8]);
    u64::from_be_bytes(bytes)
}

pub fn get_i64(data: &[u8]) -> i64 {
    get_u64(data) as i64
}

pub fn put_u16(out: &mut [u8], value: u16) -> usize {
    out[..2].copy_from_slice(&value.to_be_bytes());
    2
}

pub fn put_i16(out: &mut [u8], value: i16) -> usize {
    out[..2].copy_from_slice(&value.to_be_bytes());
    2
}

/// Write the low 24 bits of `value`. The high byte is dropped.
pub fn put_u24(out: &mut [u8], value: u32) -> usize {
    out[..3].copy_from_slice(&value.to_be_bytes()[1..]);
    3
}

pub fn put_u32(out: &mut [u8], value: u32) -> usize {
    out[..4].copy_from_slice(&value.to_be_bytes());
    4
}

pub fn put_i32(out: &mut [u8], value: i32) -> usize {
    out[..4].copy_from_slice(&value.to_be_bytes());
    4
}

pub fn put_u64(out: &mut [u8], value: u64) -> usize {
    out[..8].copy_from_slice(&value.to_be_bytes());
    8
}

pub fn put_i64(out: &mut [u8], value: i64) -> usize {
    out[..8].copy_from_slice(&value.to_be_bytes());
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_integers_big_endian() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
        assert_eq!(get_u16(&data), 0x1234);
        assert_eq!(get_u24(&data), 0x0012_3456);
        assert_eq!(get_u32(&data), 0x1234_5678);
        assert_eq!(get_u64(&data), 0x1234_5678_9ABC_DEF0);
    }

    #[test]
    fn test_get_signed() {
        assert_eq!(get_i16(&[0xFF, 0xFE]), -2);
        assert_eq!(get_i16(&[0x80, 0x00]), i16::MIN);
        assert_eq!(get_i32(&[0xFF, 0xFF, 0xFF, 0xFF]), -1);
        assert_eq!(get_i64(&[0x80, 0, 0, 0, 0, 0, 0, 0]), i64::MIN);
    }

    #[test]
    fn test_u24_high_byte_zero() {
        assert_eq!(get_u24(&[0xFF, 0xFF, 0xFF, 0xAA]), U24_MAX);
    }

    #[test]
    fn test_put_returns_width() {
        let mut buf = [0u8; 8];
        assert_eq!(put_u16(&mut buf, 0xBEEF), 2);
        assert_eq!(&buf[..2], &[0xBE, 0xEF]);

        assert_eq!(put_u24(&mut buf, 0xAA12_3456), 3);
        assert_eq!(&buf[..3], &[0x12, 0x34, 0x56]);

        assert_eq!(put_i32(&mut buf, -2), 4);
        assert_eq!(&buf[..4], &[0xFF, 0xFF, 0xFF, 0xFE]);

        assert_eq!(put_u64(&mut buf, 0x0102_0304_0506_0708), 8);
        assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_cursor_advance() {
        let mut buf = [0u8; 9];
        let mut i = 0;
        i += put_i16(&mut buf[i..], -300);
        i += put_u32(&mut buf[i..], 40_000);
        i += put_u24(&mut buf[i..], 70_000);
        assert_eq!(i, 9);

        assert_eq!(get_i16(&buf[0..]), -300);
        assert_eq!(get_u32(&buf[2..]), 40_000);
        assert_eq!(get_u24(&buf[6..]), 70_000);
    }
}
