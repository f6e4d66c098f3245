//! Packet layout and outbound frame construction
//!
//! A frame on the wire is:
//!
//! ```text
//! 0x55 0xAA | type | len | payload (len bytes) | crc_hi crc_lo
//! ```
//!
//! except for [`MessageType::HsRaw`], which has no length byte and a fixed
//! 13-byte payload. The CRC covers everything before it that is actually on
//! the wire.

use bytemuck::{bytes_of, Pod, Zeroable};
use thiserror::Error;

use crate::byte_order::{get_u16, put_u16};
use crate::crc16::{crc16, crc16_one_byte};
use crate::messages::{MessageType, HS_RAW_PAYLOAD_BYTES};

pub const SYNC_BYTE0: u8 = 0x55;
pub const SYNC_BYTE1: u8 = 0xAA;
pub const MAX_PAYLOAD_BYTES: usize = 18;
pub const CRC_BYTES: usize = 2;
/// sync0, sync1, type, len
pub const HEADER_BYTES: usize = 4;
pub const MAX_FRAME_BYTES: usize = HEADER_BYTES + MAX_PAYLOAD_BYTES + CRC_BYTES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("payload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { size: usize, max: usize },
    #[error("high-speed raw payload must be exactly {expected} bytes, got {got}")]
    HsRawLength { expected: usize, got: usize },
}

/// One packet in wire order, as assembled by the framer.
///
/// `data` holds the payload followed by the two CRC bytes. For a
/// high-speed raw packet `len` is filled in with the implied 13 even though
/// no length byte was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Packet {
    pub sync: [u8; 2],
    pub kind: u8,
    pub len: u8,
    pub data: [u8; MAX_PAYLOAD_BYTES + CRC_BYTES],
}

impl Packet {
    pub fn message_type(&self) -> MessageType {
        MessageType::from(self.kind)
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[..self.payload_len()]
    }

    fn payload_len(&self) -> usize {
        usize::from(self.len).min(MAX_PAYLOAD_BYTES)
    }

    /// CRC carried in the trailer, most significant byte first.
    pub fn received_crc(&self) -> u16 {
        get_u16(&self.data[self.payload_len()..])
    }

    /// CRC over the bytes this packet occupies on the wire.
    pub fn compute_crc(&self) -> u16 {
        if self.message_type().is_length_elided() {
            // sync0, sync1, type; there is no length byte to include
            let header = crc16(&bytes_of(self)[..3]);
            self.data[..HS_RAW_PAYLOAD_BYTES]
                .iter()
                .fold(header, |crc, &byte| crc16_one_byte(byte, crc))
        } else {
            crc16(&bytes_of(self)[..self.payload_len() + HEADER_BYTES])
        }
    }

    pub fn is_valid(&self) -> bool {
        self.received_crc() == self.compute_crc()
    }

    /// Number of bytes this packet occupies on the wire.
    pub fn wire_len(&self) -> usize {
        if self.message_type().is_length_elided() {
            3 + HS_RAW_PAYLOAD_BYTES + CRC_BYTES
        } else {
            HEADER_BYTES + self.payload_len() + CRC_BYTES
        }
    }
}

/// A complete outbound frame, ready for the transport.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; MAX_FRAME_BYTES],
    len: usize,
}

impl Frame {
    /// Frame a payload under the given message type and stamp its CRC.
    ///
    /// [`MessageType::HsRaw`] requires exactly 13 payload bytes and is
    /// framed without a length byte.
    pub fn build(kind: MessageType, payload: &[u8]) -> Result<Self, FrameError> {
        if kind.is_length_elided() {
            let payload: &[u8; HS_RAW_PAYLOAD_BYTES] =
                payload.try_into().map_err(|_| FrameError::HsRawLength {
                    expected: HS_RAW_PAYLOAD_BYTES,
                    got: payload.len(),
                })?;
            return Ok(Self::build_hs_raw(payload));
        }

        if payload.len() > MAX_PAYLOAD_BYTES {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_BYTES,
            });
        }

        Ok(Self::framed(kind, payload))
    }

    /// Frame a high-speed raw payload: no length byte, CRC over
    /// sync+type then the payload one byte at a time.
    pub fn build_hs_raw(payload: &[u8; HS_RAW_PAYLOAD_BYTES]) -> Self {
        let mut packet = Packet::zeroed();
        packet.sync = [SYNC_BYTE0, SYNC_BYTE1];
        packet.kind = MessageType::HsRaw.into();
        packet.len = HS_RAW_PAYLOAD_BYTES as u8;
        packet.data[..HS_RAW_PAYLOAD_BYTES].copy_from_slice(payload);

        let crc = packet.compute_crc();
        put_u16(&mut packet.data[HS_RAW_PAYLOAD_BYTES..], crc);

        Self::from_packet(&packet)
    }

    /// Payload length must already be within [`MAX_PAYLOAD_BYTES`].
    pub(crate) fn framed(kind: MessageType, payload: &[u8]) -> Self {
        let len = payload.len();
        let mut packet = Packet::zeroed();
        packet.sync = [SYNC_BYTE0, SYNC_BYTE1];
        packet.kind = kind.into();
        packet.len = len as u8;
        packet.data[..len].copy_from_slice(payload);

        let crc = packet.compute_crc();
        put_u16(&mut packet.data[len..], crc);

        Self::from_packet(&packet)
    }

    /// Serialise a packet exactly as it appears on the wire.
    pub fn from_packet(packet: &Packet) -> Self {
        let mut bytes = [0u8; MAX_FRAME_BYTES];
        let len = packet.wire_len();

        if packet.message_type().is_length_elided() {
            bytes[..3].copy_from_slice(&bytes_of(packet)[..3]);
            bytes[3..len].copy_from_slice(&packet.data[..HS_RAW_PAYLOAD_BYTES + CRC_BYTES]);
        } else {
            bytes[..len].copy_from_slice(&bytes_of(packet)[..len]);
        }

        Self { bytes, len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn message_type(&self) -> MessageType {
        MessageType::from(self.bytes[2])
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("kind", &self.message_type())
            .field("bytes", &self.as_bytes())
            .finish()
    }
}
