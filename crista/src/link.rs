//! Byte transport seam and a per-link driver
//!
//! The protocol layer needs only two primitives from a transport: take the
//! next available byte without blocking, and write a block. [`ImuLink`]
//! owns the framer and device-state record for one such transport.

use std::collections::VecDeque;
use std::io;

use log::{debug, warn};
use thiserror::Error;

use crate::codec::{decode, DecodeError};
use crate::frame::Frame;
use crate::framer::PacketFramer;
use crate::imu_data::ImuData;
use crate::messages::MessageType;

/// Upper bound on bytes consumed by one [`ImuLink::poll`] or
/// [`ImuLink::next_message`] call.
pub const POLL_BUDGET: usize = 4096;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("transport I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
}

/// Non-blocking byte input.
pub trait ByteSource {
    /// Next available byte, or `None` if nothing is waiting.
    fn read_byte(&mut self) -> Result<Option<u8>, LinkError>;
}

/// Block output.
pub trait ByteSink {
    /// Write as much of `data` as the transport accepts, returning the count.
    fn write_block(&mut self, data: &[u8]) -> Result<usize, LinkError>;
}

impl ByteSource for VecDeque<u8> {
    fn read_byte(&mut self) -> Result<Option<u8>, LinkError> {
        Ok(self.pop_front())
    }
}

impl ByteSink for VecDeque<u8> {
    fn write_block(&mut self, data: &[u8]) -> Result<usize, LinkError> {
        self.extend(data);
        Ok(data.len())
    }
}

impl ByteSink for Vec<u8> {
    fn write_block(&mut self, data: &[u8]) -> Result<usize, LinkError> {
        self.extend_from_slice(data);
        Ok(data.len())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub bytes_read: u64,
    pub packets: u64,
    pub truncated: u64,
    pub frames_sent: u64,
}

/// One IMU connection: transport, framer and decoded state.
#[derive(Debug)]
pub struct ImuLink<T> {
    io: T,
    framer: PacketFramer,
    data: ImuData,
    stats: LinkStats,
}

impl<T> ImuLink<T> {
    pub fn new(io: T) -> Self {
        Self {
            io,
            framer: PacketFramer::new(),
            data: ImuData::new(),
            stats: LinkStats::default(),
        }
    }

    pub fn data(&self) -> &ImuData {
        &self.data
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    pub fn io(&self) -> &T {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut T {
        &mut self.io
    }

    pub fn into_inner(self) -> T {
        self.io
    }
}

impl<T: ByteSource> ImuLink<T> {
    /// Read until one packet has been decoded, no input is waiting, or
    /// [`POLL_BUDGET`] bytes have gone by without a packet.
    pub fn next_message(&mut self) -> Result<Option<MessageType>, LinkError> {
        self.next_message_within(POLL_BUDGET)
    }

    fn next_message_within(&mut self, budget: usize) -> Result<Option<MessageType>, LinkError> {
        let mut consumed = 0;
        while consumed < budget {
            let Some(byte) = self.io.read_byte()? else {
                return Ok(None);
            };
            consumed += 1;
            self.stats.bytes_read += 1;

            let Some(packet) = self.framer.feed(byte) else {
                continue;
            };

            self.stats.packets += 1;
            match decode(&packet, &mut self.data) {
                Ok(kind) => return Ok(Some(kind)),
                Err(DecodeError::Truncated { .. }) => self.stats.truncated += 1,
            }
        }
        Ok(None)
    }

    /// Drain waiting input (up to [`POLL_BUDGET`] bytes), returning the
    /// type of every packet applied, in arrival order.
    pub fn poll(&mut self) -> Result<Vec<MessageType>, LinkError> {
        let start = self.stats.bytes_read;
        let mut kinds = Vec::new();

        loop {
            let used = (self.stats.bytes_read - start) as usize;
            if used >= POLL_BUDGET {
                break;
            }
            match self.next_message_within(POLL_BUDGET - used)? {
                Some(kind) => kinds.push(kind),
                None => break,
            }
        }

        if !kinds.is_empty() {
            debug!("Applied {} packets", kinds.len());
        }
        Ok(kinds)
    }
}

impl<T: ByteSink> ImuLink<T> {
    /// Write one whole frame.
    pub fn send(&mut self, frame: &Frame) -> Result<(), LinkError> {
        let written = self.io.write_block(frame.as_bytes())?;
        if written != frame.len() {
            warn!(
                "Short write sending {}: {written}/{}",
                frame.message_type().name(),
                frame.len()
            );
            return Err(LinkError::ShortWrite {
                written,
                expected: frame.len(),
            });
        }

        self.stats.frames_sent += 1;
        debug!("Sent {} ({} bytes)", frame.message_type().name(), written);
        Ok(())
    }
}
