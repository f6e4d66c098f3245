//! Nibble-table CRC-16 used by every Crista frame
//!
//! The accumulator starts at zero and has no final XOR. Each byte is folded
//! in as two 4-bit steps, low nibble first, through a 16-entry table.

/// Cached CRC-16 update for each 4-bit input value.
const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800, 0xB401,
    0x5000, 0x9C01, 0x8801, 0x4400,
];

#[inline]
fn crc16_nibble(crc: u16, nibble: u8) -> u16 {
    (crc >> 4) ^ CRC_TABLE[((crc ^ u16::from(nibble)) & 0xF) as usize]
}

/// Fold a single byte into a running CRC.
///
/// Calling this once per byte, starting from 0, gives the same result as
/// [`crc16`] over the whole buffer.
pub fn crc16_one_byte(byte: u8, crc: u16) -> u16 {
    let crc = crc16_nibble(crc, byte & 0xF);
    crc16_nibble(crc, byte >> 4)
}

/// Compute the CRC-16 of a buffer, starting from a zero accumulator.
pub fn crc16(data: &[u8]) -> u16 {
    data.iter().fold(0, |crc, &byte| crc16_one_byte(byte, crc))
}

/// Verify a block whose last two bytes are its CRC, most significant byte first.
pub fn verify_crc(block: &[u8]) -> bool {
    if block.len() < 2 {
        return false;
    }

    let data_end = block.len() - 2;
    let stored = u16::from_be_bytes([block[data_end], block[data_end + 1]]);
    crc16(&block[..data_end]) == stored
}
