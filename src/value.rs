//! Payload values and the format tag table
//!
//! Every payload element is one [`PayloadValue`]. On the wire each element is
//! described by a single ASCII [`Tag`] in the message's format string, followed
//! (in a separate region) by its value bytes.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Wire type of a payload element, as written in the format string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// `0`: absent value, no value bytes
    Null = b'0',
    /// `b`: signed 8-bit integer
    Int8 = b'b',
    /// `?`: boolean, one byte holding 0 or 1
    Bool = b'?',
    /// `h`: signed 16-bit integer
    Int16 = b'h',
    /// `i`: signed 32-bit integer
    Int32 = b'i',
    /// `q`: signed 64-bit integer
    Int64 = b'q',
    /// `d`: IEEE-754 double
    Float64 = b'd',
    /// `s`: u32 length followed by UTF-8 bytes
    Utf8String = b's',
    /// `X`: u32 length followed by raw bytes
    ByteBlob = b'X',
}

impl Tag {
    /// Size of the length prefix of variable-width values
    pub const LEN_PREFIX_SIZE: usize = 4;

    /// Tag as a format string byte
    #[inline]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Value width for fixed-width tags, `None` for length-prefixed ones
    #[inline]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Tag::Null => Some(0),
            Tag::Int8 | Tag::Bool => Some(1),
            Tag::Int16 => Some(2),
            Tag::Int32 => Some(4),
            Tag::Int64 | Tag::Float64 => Some(8),
            Tag::Utf8String | Tag::ByteBlob => None,
        }
    }
}

impl TryFrom<char> for Tag {
    type Error = Error;

    fn try_from(ch: char) -> Result<Self> {
        u8::try_from(ch)
            .map_err(|_| Error::UnknownFormatTag(ch))
            .and_then(Tag::try_from)
    }
}

impl TryFrom<u8> for Tag {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            b'0' => Ok(Tag::Null),
            b'b' => Ok(Tag::Int8),
            b'?' => Ok(Tag::Bool),
            b'h' => Ok(Tag::Int16),
            b'i' => Ok(Tag::Int32),
            b'q' => Ok(Tag::Int64),
            b'd' => Ok(Tag::Float64),
            b's' => Ok(Tag::Utf8String),
            b'X' => Ok(Tag::ByteBlob),
            other => Err(Error::UnknownFormatTag(char::from(other))),
        }
    }
}

/// One element of a message payload
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    /// Absent value
    Null,
    /// Signed byte
    Int8(i8),
    /// Boolean
    Bool(bool),
    /// 16-bit integer
    Int16(i16),
    /// 32-bit integer
    Int32(i32),
    /// 64-bit integer
    Int64(i64),
    /// Double precision float
    Float64(f64),
    /// UTF-8 text
    Utf8String(String),
    /// Opaque bytes
    ByteBlob(Vec<u8>),
}

impl PayloadValue {
    /// Format tag this value is written with
    #[inline]
    pub fn tag(&self) -> Tag {
        match self {
            PayloadValue::Null => Tag::Null,
            PayloadValue::Int8(_) => Tag::Int8,
            PayloadValue::Bool(_) => Tag::Bool,
            PayloadValue::Int16(_) => Tag::Int16,
            PayloadValue::Int32(_) => Tag::Int32,
            PayloadValue::Int64(_) => Tag::Int64,
            PayloadValue::Float64(_) => Tag::Float64,
            PayloadValue::Utf8String(_) => Tag::Utf8String,
            PayloadValue::ByteBlob(_) => Tag::ByteBlob,
        }
    }

    /// Number of value bytes this element occupies on the wire
    #[inline]
    pub fn wire_len(&self) -> usize {
        match self {
            PayloadValue::Utf8String(s) => Tag::LEN_PREFIX_SIZE + s.len(),
            PayloadValue::ByteBlob(b) => Tag::LEN_PREFIX_SIZE + b.len(),
            // fixed-width tags always carry a width
            other => other.tag().fixed_width().unwrap_or(0),
        }
    }

    /// True for [`PayloadValue::Null`]
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, PayloadValue::Null)
    }

    /// Boolean value, if this is a `Bool`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PayloadValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Any integer variant widened to `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PayloadValue::Int8(v) => Some(i64::from(*v)),
            PayloadValue::Int16(v) => Some(i64::from(*v)),
            PayloadValue::Int32(v) => Some(i64::from(*v)),
            PayloadValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Float value, if this is a `Float64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PayloadValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrowed text, if this is a `Utf8String`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PayloadValue::Utf8String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrowed bytes, if this is a `ByteBlob`
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PayloadValue::ByteBlob(b) => Some(b),
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PayloadValue {
                #[inline]
                fn from(v: $ty) -> Self {
                    PayloadValue::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    i8 => Int8,
    bool => Bool,
    i16 => Int16,
    u8 => Int16,
    i32 => Int32,
    u16 => Int32,
    i64 => Int64,
    u32 => Int64,
    f64 => Float64,
    f32 => Float64,
    String => Utf8String,
    &str => Utf8String,
    Vec<u8> => ByteBlob,
    &[u8] => ByteBlob,
}

impl<T: Into<PayloadValue>> From<Option<T>> for PayloadValue {
    #[inline]
    fn from(v: Option<T>) -> Self {
        v.map_or(PayloadValue::Null, Into::into)
    }
}

// Unsigned 64-bit values only fit when they do not exceed i64::MAX.
impl TryFrom<u64> for PayloadValue {
    type Error = Error;

    fn try_from(v: u64) -> Result<Self> {
        i64::try_from(v)
            .map(PayloadValue::Int64)
            .map_err(|_| Error::UnsupportedPayloadType)
    }
}

impl TryFrom<usize> for PayloadValue {
    type Error = Error;

    fn try_from(v: usize) -> Result<Self> {
        i64::try_from(v)
            .map(PayloadValue::Int64)
            .map_err(|_| Error::UnsupportedPayloadType)
    }
}
