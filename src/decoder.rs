//! Message decoder
//!
//! Decoding never reads past the end of the input: every read is bounds
//! checked against the remaining bytes and a short input surfaces as
//! [`Error::Malformed`].

use alloc::string::String;
use alloc::vec::Vec;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::header::MessageHeader;
use crate::value::{PayloadValue, Tag};

/// Cursor for reading message content with position tracking
#[derive(Debug)]
pub struct ByteCursor<'a> {
    /// Buffer being read
    pub buf: &'a [u8],
    /// Current read position
    pub pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `buf`
    #[inline]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Get remaining bytes in cursor
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Check if cursor is at end
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Skip bytes in the cursor
    #[inline]
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.get_bytes(n).map(|_| ())
    }

    /// Read raw bytes without length prefix
    ///
    /// Returns a zero-copy slice into the original buffer
    #[inline]
    pub fn get_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(len)?;
        self.pos += len;
        Ok(bytes)
    }

    /// Peek at bytes without advancing cursor
    #[inline]
    pub fn peek_bytes(&self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::Malformed);
        }
        Ok(&self.buf[self.pos..self.pos + len])
    }

    #[inline]
    fn get_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.get_bytes(N)?);
        Ok(out)
    }

    /// Read a u8 value
    #[inline]
    pub fn get_u8(&mut self) -> Result<u8> {
        Ok(self.get_array::<1>()?[0])
    }

    /// Read an i16 value (little-endian)
    #[inline]
    pub fn get_i16(&mut self) -> Result<i16> {
        self.get_array().map(i16::from_le_bytes)
    }

    /// Read a u32 value (little-endian)
    #[inline]
    pub fn get_u32(&mut self) -> Result<u32> {
        self.get_array().map(u32::from_le_bytes)
    }

    /// Read an i32 value (little-endian)
    #[inline]
    pub fn get_i32(&mut self) -> Result<i32> {
        self.get_array().map(i32::from_le_bytes)
    }

    /// Read an i64 value (little-endian)
    #[inline]
    pub fn get_i64(&mut self) -> Result<i64> {
        self.get_array().map(i64::from_le_bytes)
    }

    /// Read an f64 value (little-endian IEEE-754)
    #[inline]
    pub fn get_f64(&mut self) -> Result<f64> {
        self.get_array().map(f64::from_le_bytes)
    }

    /// Read bytes with a u32 length prefix
    #[inline]
    pub fn get_lenbytes(&mut self) -> Result<&'a [u8]> {
        let len = self.get_u32()? as usize;
        self.get_bytes(len)
    }

    /// Read one value described by `tag`
    pub fn get_value(&mut self, tag: Tag) -> Result<PayloadValue> {
        let value = match tag {
            Tag::Null => PayloadValue::Null,
            Tag::Int8 => PayloadValue::Int8(self.get_u8()? as i8),
            Tag::Bool => match self.get_u8()? {
                0 => PayloadValue::Bool(false),
                1 => PayloadValue::Bool(true),
                other => return Err(Error::InvalidBooleanEncoding(other)),
            },
            Tag::Int16 => PayloadValue::Int16(self.get_i16()?),
            Tag::Int32 => PayloadValue::Int32(self.get_i32()?),
            Tag::Int64 => PayloadValue::Int64(self.get_i64()?),
            Tag::Float64 => PayloadValue::Float64(self.get_f64()?),
            Tag::Utf8String => {
                let bytes = self.get_lenbytes()?;
                let text = core::str::from_utf8(bytes).map_err(|_| Error::Malformed)?;
                PayloadValue::Utf8String(String::from(text))
            }
            Tag::ByteBlob => PayloadValue::ByteBlob(self.get_lenbytes()?.to_vec()),
        };
        Ok(value)
    }
}

/// Decode a complete message
///
/// Bytes after the last value described by the format string are ignored.
pub fn decode(buf: &[u8]) -> Result<(MessageHeader, Vec<PayloadValue>)> {
    let result = decode_inner(buf);
    match &result {
        Ok((header, payload)) => trace!(
            msg_type = header.msg_type,
            elements = payload.len(),
            len = buf.len(),
            "decoded backlog message"
        ),
        Err(err) => debug!(len = buf.len(), error = %err, "rejected backlog message"),
    }
    result
}

fn decode_inner(buf: &[u8]) -> Result<(MessageHeader, Vec<PayloadValue>)> {
    let header = MessageHeader::decode(buf)?;
    let mut cursor = ByteCursor::new(buf);
    cursor.skip(MessageHeader::SIZE)?;

    if cursor.is_at_end() {
        return Ok((header, Vec::new()));
    }

    let format = cursor.get_lenbytes()?;
    let format = core::str::from_utf8(format).map_err(|_| Error::Malformed)?;

    let mut payload = Vec::with_capacity(format.len());
    for tag in format.chars() {
        let tag = Tag::try_from(tag)?;
        payload.push(cursor.get_value(tag)?);
    }

    Ok((header, payload))
}
