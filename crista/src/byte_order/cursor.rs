//! Sequential readers and writers over a payload
//!
//! Message layouts are not self-describing; fields are consumed in order.
//! These cursors keep the running offset so decode and encode routines read
//! as a list of fields.

use super::{get_f32, get_i16, get_u16, get_u32, put_f32, put_i16, put_u16, put_u32, Checked};
use crate::frame::MAX_PAYLOAD_BYTES;

/// Big-endian field reader over a payload slice.
///
/// Callers check the payload length against the message layout before
/// reading; reading past the end panics.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn advance(&mut self, n: usize) -> &'a [u8] {
        let field = &self.data[self.pos..self.pos + n];
        self.pos += n;
        field
    }

    pub fn u8(&mut self) -> u8 {
        self.advance(1)[0]
    }

    pub fn u16(&mut self) -> u16 {
        get_u16(self.advance(2))
    }

    pub fn i16(&mut self) -> i16 {
        get_i16(self.advance(2))
    }

    pub fn u32(&mut self) -> u32 {
        get_u32(self.advance(4))
    }

    pub fn f32(&mut self) -> Checked<f32> {
        get_f32(self.advance(4))
    }
}

/// Big-endian field writer into a payload-sized buffer.
#[derive(Debug, Clone)]
pub struct WireWriter {
    buf: [u8; MAX_PAYLOAD_BYTES],
    len: usize,
}

impl WireWriter {
    pub fn new() -> Self {
        Self {
            buf: [0; MAX_PAYLOAD_BYTES],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf[self.len] = value;
        self.len += 1;
        self
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.len += put_u16(&mut self.buf[self.len..], value);
        self
    }

    pub fn i16(&mut self, value: i16) -> &mut Self {
        self.len += put_i16(&mut self.buf[self.len..], value);
        self
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.len += put_u32(&mut self.buf[self.len..], value);
        self
    }

    pub fn f32(&mut self, value: f32) -> &mut Self {
        self.len += put_f32(&mut self.buf[self.len..], value);
        self
    }
}

impl Default for WireWriter {
    fn default() -> Self {
        Self::new()
    }
}
