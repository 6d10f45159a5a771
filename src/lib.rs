//! backlog-wire: message codec for the backlog protocol
//!
//! The backlog protocol carries typed, variable-shape messages between a
//! sensor-network acquisition core and its CoreStation field gateways. This
//! crate encodes and decodes single messages; stream framing, retries and the
//! meaning of each plugin type code belong to the layers around it.
//!
//! # Message Format
//!
//! ```text
//! +----------+----------------+
//! | Type u8  | Timestamp i64  |   header, always present
//! +----------+----------------+
//! | FmtLen u32 | Format (FmtLen ASCII tags) | Values...   only if payload non-empty
//! +------------+----------------------------+
//! ```
//!
//! All integers are little-endian. Each format tag describes one payload
//! element (see [`value::Tag`]); `Null` elements have a tag but no value bytes.
//!
//! # Example
//!
//! ```rust
//! use backlog_wire::*;
//!
//! let msg = Message::with_payload(
//!     registry::BINARY,
//!     1_700_000_000_000,
//!     vec![PayloadValue::Int32(7), PayloadValue::from("hi")],
//! )?;
//!
//! let bytes = msg.encode()?.to_vec();
//! let decoded = decode(&bytes)?;
//! assert_eq!(decoded.msg_type(), registry::BINARY);
//! assert_eq!(decoded.payload(), msg.payload());
//! # Ok::<(), backlog_wire::Error>(())
//! ```

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod message;
pub mod registry;
pub mod size;
pub mod value;

// Re-export main types
pub use decoder::ByteCursor;
pub use encoder::{MessageEncoder, WireSink};
pub use error::{Error, Result};
pub use header::MessageHeader;
pub use message::Message;
pub use registry::MessageType;
pub use size::SizeMode;
pub use value::{PayloadValue, Tag};

/// Maximum message size enforced when a payload is attached
pub const MAX_PAYLOAD_SIZE: usize = 1 << 16;

/// Header size: type code + timestamp
pub const HEADER_SIZE: usize = 9;

/// Size of the format length field
pub const FORMAT_LEN_SIZE: usize = 4;

/// Decode one complete message
#[inline]
pub fn decode(buf: &[u8]) -> Result<Message> {
    Message::from_bytes(buf)
}
