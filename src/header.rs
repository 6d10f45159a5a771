//! Message header: type code and timestamp

use crate::error::{Error, Result};
use crate::registry::MessageType;
use crate::HEADER_SIZE;

/// Fixed 9-byte header that starts every message (little-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    /// Message type code
    pub msg_type: MessageType,
    /// Producer timestamp in milliseconds
    pub timestamp: i64,
}

impl MessageHeader {
    /// Header size in bytes (fixed)
    pub const SIZE: usize = HEADER_SIZE;

    /// Create a new message header
    #[inline]
    pub fn new(msg_type: MessageType, timestamp: i64) -> Self {
        Self {
            msg_type,
            timestamp,
        }
    }

    /// Encode header to bytes
    #[inline]
    pub fn encode(&self, buf: &mut [u8]) -> Result<()> {
        if buf.len() < Self::SIZE {
            return Err(Error::ShortBuffer);
        }

        buf[0] = self.msg_type;
        buf[1..9].copy_from_slice(&self.timestamp.to_le_bytes());

        Ok(())
    }

    /// Decode header from the start of `buf`
    #[inline]
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::SIZE {
            return Err(Error::Malformed);
        }

        let mut ts = [0u8; 8];
        ts.copy_from_slice(&buf[1..9]);

        Ok(Self {
            msg_type: buf[0],
            timestamp: i64::from_le_bytes(ts),
        })
    }
}
