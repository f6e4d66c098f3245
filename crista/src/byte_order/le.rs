//! Little-endian counterparts of the big-endian field helpers
//!
//! Byte order is explicit in every function, so results do not depend on
//! the host's own endianness.

use super::float::{validate_f32, validate_f64, Checked};

pub fn get_u16(data: &[u8]) -> u16 {
    u16::from_le_bytes([data[0], data[1]])
}

pub fn get_i16(data: &[u8]) -> i16 {
    i16::from_le_bytes([data[0], data[1]])
}

pub fn get_u32(data: &[u8]) -> u32 {
    u32::from_le_bytes([data[0], data[1], data[2], data[3]])
}

pub fn get_i32(data: &[u8]) -> i32 {
    i32::from_le_bytes([data[0], data[1], data[2], data[3]])
}

pub fn get_u64(data: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[..8]);
    u64::from_le_bytes(bytes)
}

pub fn get_i64(data: &[u8]) -> i64 {
    get_u64(data) as i64
}

pub fn get_f32(data: &[u8]) -> Checked<f32> {
    validate_f32(get_u32(data))
}

pub fn get_f64(data: &[u8]) -> Checked<f64> {
    validate_f64(get_u64(data))
}

pub fn put_u16(out: &mut [u8], value: u16) -> usize {
    out[..2].copy_from_slice(&value.to_le_bytes());
    2
}

pub fn put_i16(out: &mut [u8], value: i16) -> usize {
    out[..2].copy_from_slice(&value.to_le_bytes());
    2
}

pub fn put_u32(out: &mut [u8], value: u32) -> usize {
    out[..4].copy_from_slice(&value.to_le_bytes());
    4
}

pub fn put_i32(out: &mut [u8], value: i32) -> usize {
    out[..4].copy_from_slice(&value.to_le_bytes());
    4
}

pub fn put_u64(out: &mut [u8], value: u64) -> usize {
    out[..8].copy_from_slice(&value.to_le_bytes());
    8
}

pub fn put_i64(out: &mut [u8], value: i64) -> usize {
    out[..8].copy_from_slice(&value.to_le_bytes());
    8
}

pub fn put_f32(out: &mut [u8], value: f32) -> usize {
    put_u32(out, value.to_bits())
}

pub fn put_f64(out: &mut [u8], value: f64) -> usize {
    put_u64(out, value.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_le_integers() {
        let data = [0x78, 0x56, 0x34, 0x12, 0, 0, 0, 0x80];
        assert_eq!(get_u16(&data), 0x5678);
        assert_eq!(get_u32(&data), 0x1234_5678);
        assert_eq!(get_i64(&data), i64::MIN + 0x1234_5678);
        assert_eq!(get_i16(&[0xFE, 0xFF]), -2);
        assert_eq!(get_i32(&[0xFF, 0xFF, 0xFF, 0xFF]), -1);
    }

    #[test]
    fn test_le_float_layout_is_host_independent() {
        let mut buf = [0u8; 4];
        assert_eq!(put_f32(&mut buf, 1.0), 4);
        assert_eq!(buf, [0x00, 0x00, 0x80, 0x3F]);

        let mut buf = [0u8; 8];
        assert_eq!(put_f64(&mut buf, -2.0), 8);
        assert_eq!(buf, [0, 0, 0, 0, 0, 0, 0x00, 0xC0]);
        assert_eq!(get_f64(&buf).value, -2.0);
    }

    #[test]
    fn test_le_invalid_float() {
        let nan = [0x00, 0x00, 0xC0, 0x7F];
        let checked = get_f32(&nan);
        assert!(checked.invalid);
        assert_eq!(checked.value, 1.0);
    }

    #[test]
    fn test_le_put_signed() {
        let mut buf = [0u8; 8];
        put_i16(&mut buf, -2);
        assert_eq!(&buf[..2], &[0xFE, 0xFF]);
        put_i32(&mut buf, 0x0102_0304);
        assert_eq!(&buf[..4], &[4, 3, 2, 1]);
        put_u64(&mut buf, 1);
        assert_eq!(buf, [1, 0, 0, 0, 0, 0, 0, 0]);
        put_i64(&mut buf, -1);
        assert_eq!(buf, [0xFF; 8]);
        put_u16(&mut buf, 0xABCD);
        assert_eq!(&buf[..2], &[0xCD, 0xAB]);
    }
}
