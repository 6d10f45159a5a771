//! Error types for the backlog wire protocol

use core::fmt;

/// Errors that can occur while building, encoding or decoding a backlog message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Encoded (or estimated) length exceeds the protocol maximum
    Oversize {
        /// Measured size in bytes
        size: usize,
        /// Allowed maximum in bytes
        max: usize,
    },
    /// A host value has no wire representation
    UnsupportedPayloadType,
    /// Message truncated (not enough bytes for a declared length or required
    /// field) or structurally invalid (format string or string value is not
    /// valid UTF-8)
    Malformed,
    /// Format string contains a character outside the tag table
    UnknownFormatTag(char),
    /// Boolean field byte is neither 0 nor 1
    InvalidBooleanEncoding(u8),
    /// A required payload was absent
    NullPayload,
    /// Caller-provided buffer too small for the encoded message
    ShortBuffer,
}

impl Error {
    /// Returns a human-readable description of the error
    pub const fn description(&self) -> &'static str {
        match self {
            Error::Oversize { .. } => "payload exceeds the maximum message size",
            Error::UnsupportedPayloadType => "payload value has no wire type",
            Error::Malformed => "message truncated or structurally invalid",
            Error::UnknownFormatTag(_) => "unrecognized format character",
            Error::InvalidBooleanEncoding(_) => "boolean field is neither 0 nor 1",
            Error::NullPayload => "payload must not be null",
            Error::ShortBuffer => "buffer too small for operation",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Oversize { size, max } => {
                write!(f, "{} ({} > {} bytes)", self.description(), size, max)
            }
            Error::UnknownFormatTag(tag) => {
                write!(f, "{} {:?}", self.description(), tag)
            }
            Error::InvalidBooleanEncoding(byte) => {
                write!(f, "{} (got {})", self.description(), byte)
            }
            _ => f.write_str(self.description()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias for backlog wire operations
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display_carries_context() {
        let err = Error::Oversize {
            size: 70_000,
            max: 65_536,
        };
        assert_eq!(
            err.to_string(),
            "payload exceeds the maximum message size (70000 > 65536 bytes)"
        );
        assert_eq!(
            Error::UnknownFormatTag('z').to_string(),
            "unrecognized format character 'z'"
        );
        assert_eq!(Error::Malformed.to_string(), Error::Malformed.description());
        assert_eq!(
            Error::UnknownFormatTag('é').to_string(),
            "unrecognized format character 'é'"
        );
    }
}
