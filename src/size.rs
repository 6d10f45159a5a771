//! Size validation
//!
//! Two measures exist. [`estimate`] is the guard deployed CoreStations have
//! always applied: it starts from 2 bytes and charges each element one tag byte
//! plus its value width, but under-counts string and blob length prefixes by one
//! byte and ignores the header and format length field. [`exact_len`] is the true
//! number of bytes [`encode`](crate::encoder::encode) produces.

use tracing::warn;

use crate::error::{Error, Result};
use crate::value::PayloadValue;
use crate::{FORMAT_LEN_SIZE, HEADER_SIZE, MAX_PAYLOAD_SIZE};

/// Base overhead of the legacy estimate
pub const ESTIMATE_BASE: usize = 2;

/// Which measure the bound is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// Legacy estimate, compatible with existing deployments
    #[default]
    Legacy,
    /// True encoded length
    Exact,
}

/// Legacy size estimate of a payload
pub fn estimate(payload: &[PayloadValue]) -> usize {
    payload.iter().fold(ESTIMATE_BASE, |len, value| {
        len + match value {
            PayloadValue::Null => 1,
            PayloadValue::Int8(_) | PayloadValue::Bool(_) => 2,
            PayloadValue::Int16(_) => 3,
            PayloadValue::Int32(_) => 5,
            PayloadValue::Int64(_) | PayloadValue::Float64(_) => 9,
            PayloadValue::Utf8String(s) => s.len() + 3,
            PayloadValue::ByteBlob(b) => b.len() + 3,
        }
    })
}

/// Exact encoded length of a message carrying `payload`
pub fn exact_len(payload: &[PayloadValue]) -> usize {
    if payload.is_empty() {
        return HEADER_SIZE;
    }

    let values: usize = payload.iter().map(PayloadValue::wire_len).sum();
    HEADER_SIZE + FORMAT_LEN_SIZE + payload.len() + values
}

/// Measure `payload` with `mode`
#[inline]
pub fn measure(payload: &[PayloadValue], mode: SizeMode) -> usize {
    match mode {
        SizeMode::Legacy => estimate(payload),
        SizeMode::Exact => exact_len(payload),
    }
}

/// Check `payload` against [`MAX_PAYLOAD_SIZE`]
///
/// Returns the measured size. A size equal to the maximum is accepted.
pub fn check(payload: &[PayloadValue], mode: SizeMode) -> Result<usize> {
    let size = measure(payload, mode);
    if size > MAX_PAYLOAD_SIZE {
        warn!(size, max = MAX_PAYLOAD_SIZE, ?mode, "payload rejected as oversize");
        return Err(Error::Oversize {
            size,
            max: MAX_PAYLOAD_SIZE,
        });
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn test_estimate_per_variant() {
        assert_eq!(estimate(&[]), 2);
        assert_eq!(estimate(&[PayloadValue::Null]), 3);
        assert_eq!(estimate(&[PayloadValue::Int8(1)]), 4);
        assert_eq!(estimate(&[PayloadValue::Bool(true)]), 4);
        assert_eq!(estimate(&[PayloadValue::Int16(1)]), 5);
        assert_eq!(estimate(&[PayloadValue::Int32(1)]), 7);
        assert_eq!(estimate(&[PayloadValue::Int64(1)]), 11);
        assert_eq!(estimate(&[PayloadValue::Float64(1.0)]), 11);
        assert_eq!(estimate(&[PayloadValue::from("abcd")]), 9);
        assert_eq!(estimate(&[PayloadValue::ByteBlob(vec![0; 10])]), 15);
    }

    #[test]
    fn test_estimate_counts_utf8_bytes() {
        // two code points, five bytes
        assert_eq!(estimate(&[PayloadValue::from("é€")]), 2 + 5 + 3);
    }

    #[test]
    fn test_exact_len() {
        assert_eq!(exact_len(&[]), 9);
        // header + format length + "is" + i32 + (u32 + "hi")
        let payload = [PayloadValue::Int32(7), PayloadValue::from("hi")];
        assert_eq!(exact_len(&payload), 9 + 4 + 2 + 4 + 6);
        assert_eq!(exact_len(&[PayloadValue::Null]), 9 + 4 + 1);
    }

    #[test]
    fn test_check_boundary() {
        // base 2 + blob (len + 3) == MAX
        let at_max = vec![PayloadValue::ByteBlob(vec![0; MAX_PAYLOAD_SIZE - 5])];
        assert_eq!(check(&at_max, SizeMode::Legacy), Ok(MAX_PAYLOAD_SIZE));

        let over = vec![PayloadValue::ByteBlob(vec![0; MAX_PAYLOAD_SIZE - 4])];
        assert_eq!(
            check(&over, SizeMode::Legacy),
            Err(Error::Oversize {
                size: MAX_PAYLOAD_SIZE + 1,
                max: MAX_PAYLOAD_SIZE
            })
        );
    }

    #[test]
    fn test_exact_mode_is_stricter() {
        let payload: Vec<PayloadValue> = vec![PayloadValue::ByteBlob(vec![0; MAX_PAYLOAD_SIZE - 5])];
        assert!(check(&payload, SizeMode::Legacy).is_ok());
        assert!(matches!(
            check(&payload, SizeMode::Exact),
            Err(Error::Oversize { .. })
        ));
    }
}
