//! Message encoder
//!
//! Encoding writes the header, then (for a non-empty payload) the format
//! length, one tag byte per element, and finally every element's value bytes
//! in payload order. The same routine drives both a growable `Vec<u8>` and the
//! allocation-free [`MessageEncoder`] over a caller-provided buffer.

use alloc::vec::Vec;

use tracing::trace;

use crate::error::{Error, Result};
use crate::header::MessageHeader;
use crate::size;
use crate::value::PayloadValue;

/// Destination for encoded bytes
///
/// All multi-byte values are written little-endian.
pub trait WireSink {
    /// Append raw bytes
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Write a u8 value
    #[inline]
    fn put_u8(&mut self, value: u8) -> Result<()> {
        self.put_bytes(&[value])
    }

    /// Write an i16 value
    #[inline]
    fn put_i16(&mut self, value: i16) -> Result<()> {
        self.put_bytes(&value.to_le_bytes())
    }

    /// Write an i32 value
    #[inline]
    fn put_i32(&mut self, value: i32) -> Result<()> {
        self.put_bytes(&value.to_le_bytes())
    }

    /// Write an i64 value
    #[inline]
    fn put_i64(&mut self, value: i64) -> Result<()> {
        self.put_bytes(&value.to_le_bytes())
    }

    /// Write an f64 value (IEEE-754 bit pattern)
    #[inline]
    fn put_f64(&mut self, value: f64) -> Result<()> {
        self.put_bytes(&value.to_le_bytes())
    }

    /// Write a u32 length prefix
    #[inline]
    fn put_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| Error::Oversize {
            size: len,
            max: u32::MAX as usize,
        })?;
        self.put_bytes(&len.to_le_bytes())
    }

    /// Write bytes with a u32 length prefix
    #[inline]
    fn put_lenbytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.put_len(bytes.len())?;
        self.put_bytes(bytes)
    }
}

impl WireSink for Vec<u8> {
    #[inline]
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Encoder that writes into a user-provided buffer
pub struct MessageEncoder<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> MessageEncoder<'a> {
    /// Create new encoder with the given buffer
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Get current position in buffer
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get remaining buffer capacity
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Reset encoder for reuse with the same buffer
    #[inline]
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Get a slice of the encoded data
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl WireSink for MessageEncoder<'_> {
    #[inline]
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(Error::ShortBuffer);
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }
}

/// Write one element's value bytes (nothing for `Null`)
#[inline]
pub fn write_value<S: WireSink + ?Sized>(sink: &mut S, value: &PayloadValue) -> Result<()> {
    match value {
        PayloadValue::Null => Ok(()),
        PayloadValue::Int8(v) => sink.put_u8(*v as u8),
        PayloadValue::Bool(v) => sink.put_u8(u8::from(*v)),
        PayloadValue::Int16(v) => sink.put_i16(*v),
        PayloadValue::Int32(v) => sink.put_i32(*v),
        PayloadValue::Int64(v) => sink.put_i64(*v),
        PayloadValue::Float64(v) => sink.put_f64(*v),
        PayloadValue::Utf8String(s) => sink.put_lenbytes(s.as_bytes()),
        PayloadValue::ByteBlob(b) => sink.put_lenbytes(b),
    }
}

/// Write a complete message into `sink`
pub fn write_message<S: WireSink + ?Sized>(
    sink: &mut S,
    header: &MessageHeader,
    payload: &[PayloadValue],
) -> Result<()> {
    let mut raw = [0u8; MessageHeader::SIZE];
    header.encode(&mut raw)?;
    sink.put_bytes(&raw)?;

    if payload.is_empty() {
        return Ok(());
    }

    // format string: one ASCII tag per element
    sink.put_len(payload.len())?;
    for value in payload {
        sink.put_u8(value.tag().as_byte())?;
    }

    for value in payload {
        write_value(sink, value)?;
    }

    Ok(())
}

/// Encode a message into a freshly allocated buffer
pub fn encode(header: &MessageHeader, payload: &[PayloadValue]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(size::exact_len(payload));
    write_message(&mut out, header, payload)?;

    trace!(
        msg_type = header.msg_type,
        elements = payload.len(),
        len = out.len(),
        "encoded backlog message"
    );
    Ok(out)
}

/// Encode a message into `buf` without allocating
///
/// Returns the number of bytes written.
pub fn encode_into(
    buf: &mut [u8],
    header: &MessageHeader,
    payload: &[PayloadValue],
) -> Result<usize> {
    let mut encoder = MessageEncoder::new(buf);
    write_message(&mut encoder, header, payload)?;
    Ok(encoder.position())
}
