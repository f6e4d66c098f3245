//! Byte-at-a-time packet framing
//!
//! The framer scans for the two sync bytes, captures type and length, then
//! collects payload plus CRC into a single reused [`Packet`]. A packet is
//! only handed out once its CRC checks; anything else is dropped and the
//! scan starts over at the next sync byte.

use bytemuck::Zeroable;
use log::trace;

use crate::frame::{Packet, CRC_BYTES, MAX_PAYLOAD_BYTES, SYNC_BYTE0, SYNC_BYTE1};
use crate::messages::{MessageType, HS_RAW_PAYLOAD_BYTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramerState {
    #[default]
    Sync0,
    Sync1,
    MessageType,
    /// Skipped for high-speed raw frames, which carry no length byte.
    Len,
    Data,
}

/// Framing state for one byte stream.
///
/// Not shareable between streams: feed every byte of one link, in order,
/// through the same instance.
#[derive(Debug, Clone)]
pub struct PacketFramer {
    state: FramerState,
    index: usize,
    packet: Packet,
}

impl PacketFramer {
    pub fn new() -> Self {
        Self {
            state: FramerState::Sync0,
            index: 0,
            packet: Packet::zeroed(),
        }
    }

    pub fn state(&self) -> FramerState {
        self.state
    }

    /// Drop any partially assembled frame.
    pub fn reset(&mut self) {
        self.state = FramerState::Sync0;
        self.index = 0;
    }

    /// Consume one byte. Returns the packet it completed, if it completed
    /// one with a matching CRC.
    pub fn feed(&mut self, byte: u8) -> Option<Packet> {
        match self.state {
            FramerState::Sync0 => {
                if byte == SYNC_BYTE0 {
                    self.packet.sync[0] = byte;
                    self.index = 0;
                    self.state = FramerState::Sync1;
                }
            }
            FramerState::Sync1 => {
                if byte == SYNC_BYTE1 {
                    self.packet.sync[1] = byte;
                    self.state = FramerState::MessageType;
                } else {
                    trace!("Sync lost on byte {byte:#04x}");
                    self.state = FramerState::Sync0;
                }
            }
            FramerState::MessageType => {
                self.packet.kind = byte;
                if MessageType::from(byte).is_length_elided() {
                    // No length byte on the wire; this frame's next byte is payload
                    self.packet.len = HS_RAW_PAYLOAD_BYTES as u8;
                    self.state = FramerState::Data;
                } else {
                    self.state = FramerState::Len;
                }
            }
            FramerState::Len => {
                if usize::from(byte) > MAX_PAYLOAD_BYTES {
                    trace!(
                        "Dropping frame type {:#04x}: length {byte} exceeds {MAX_PAYLOAD_BYTES}",
                        self.packet.kind
                    );
                    self.state = FramerState::Sync0;
                } else {
                    self.packet.len = byte;
                    self.state = FramerState::Data;
                }
            }
            FramerState::Data => {
                self.packet.data[self.index] = byte;
                self.index += 1;

                if self.index == usize::from(self.packet.len) + CRC_BYTES {
                    self.state = FramerState::Sync0;
                    return self.validate();
                }
            }
        }

        None
    }

    /// Feed a block of bytes, collecting every packet completed along the way.
    pub fn push_bytes(&mut self, data: &[u8]) -> Vec<Packet> {
        data.iter().filter_map(|&byte| self.feed(byte)).collect()
    }

    fn validate(&self) -> Option<Packet> {
        let received = self.packet.received_crc();
        let computed = self.packet.compute_crc();

        if received == computed {
            Some(self.packet)
        } else {
            trace!(
                "CRC mismatch on type {:#04x}: received {received:#06x}, computed {computed:#06x}",
                self.packet.kind
            );
            None
        }
    }
}

impl Default for PacketFramer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;

    const RAW_GYRO_FRAME: [u8; 13] = [
        0x55, 0xAA, 0x00, 0x07, 0x12, 0x34, 0x80, 0x00, 0xFF, 0xFF, 0x2A, 0x3D, 0xB0,
    ];

    #[test]
    fn test_single_frame() {
        let mut framer = PacketFramer::new();
        let packets = framer.push_bytes(&RAW_GYRO_FRAME);

        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].message_type(), MessageType::RawGyro);
        assert_eq!(
            packets[0].payload(),
            &[0x12, 0x34, 0x80, 0x00, 0xFF, 0xFF, 0x2A]
        );
        assert_eq!(framer.state(), FramerState::Sync0);
    }

    #[test]
    fn test_packet_only_on_last_byte() {
        let mut framer = PacketFramer::new();
        let (last, head) = RAW_GYRO_FRAME.split_last().unwrap();
        for &byte in head {
            assert!(framer.feed(byte).is_none());
        }
        assert!(framer.feed(*last).is_some());
    }

    #[test]
    fn test_bad_crc_dropped() {
        let mut frame = RAW_GYRO_FRAME;
        frame[12] ^= 0x01;

        let mut framer = PacketFramer::new();
        assert!(framer.push_bytes(&frame).is_empty());
        assert_eq!(framer.state(), FramerState::Sync0);

        // The next good frame still comes through
        assert_eq!(framer.push_bytes(&RAW_GYRO_FRAME).len(), 1);
    }

    #[test]
    fn test_sync1_mismatch_discards_byte() {
        let mut framer = PacketFramer::new();
        framer.feed(0x55);
        assert_eq!(framer.state(), FramerState::Sync1);

        // A second 0x55 is not reinterpreted as a new sync0
        framer.feed(0x55);
        assert_eq!(framer.state(), FramerState::Sync0);
        framer.feed(0xAA);
        assert_eq!(framer.state(), FramerState::Sync0);
    }

    #[test]
    fn test_garbage_prefix() {
        let mut stream = vec![0x00, 0x13, 0xAA, 0xFF, 0x54];
        stream.extend_from_slice(&RAW_GYRO_FRAME);

        let mut framer = PacketFramer::new();
        let packets = framer.push_bytes(&stream);
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].payload()[6], 0x2A);
    }

    #[test]
    fn test_oversize_length_resets() {
        let mut framer = PacketFramer::new();
        framer.push_bytes(&[0x55, 0xAA, 0x16, 19]);
        assert_eq!(framer.state(), FramerState::Sync0);
    }

    #[test]
    fn test_hs_raw_without_length_byte() {
        let payload: [u8; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];
        let frame = Frame::build_hs_raw(&payload);

        let mut framer = PacketFramer::new();
        framer.push_bytes(&frame.as_bytes()[..3]);
        assert_eq!(framer.state(), FramerState::Data);

        let packets = framer.push_bytes(&frame.as_bytes()[3..]);
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].message_type(), MessageType::HsRaw);
        assert_eq!(packets[0].payload(), &payload);
    }

    #[test]
    fn test_back_to_back_frames() {
        let config = Frame::build(MessageType::ReqConfig, &[0]).unwrap();
        let mut stream = RAW_GYRO_FRAME.to_vec();
        stream.extend_from_slice(config.as_bytes());
        stream.extend_from_slice(&RAW_GYRO_FRAME);

        let mut framer = PacketFramer::new();
        let kinds: Vec<MessageType> = framer
            .push_bytes(&stream)
            .iter()
            .map(Packet::message_type)
            .collect();
        assert_eq!(
            kinds,
            vec![
                MessageType::RawGyro,
                MessageType::ReqConfig,
                MessageType::RawGyro
            ]
        );
    }

    #[test]
    fn test_reset_abandons_partial_frame() {
        let mut framer = PacketFramer::new();
        framer.push_bytes(&RAW_GYRO_FRAME[..8]);
        assert_eq!(framer.state(), FramerState::Data);

        framer.reset();
        assert_eq!(framer.state(), FramerState::Sync0);
        assert_eq!(framer.push_bytes(&RAW_GYRO_FRAME).len(), 1);
    }
}
