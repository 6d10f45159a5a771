//! Backlog message entity
//!
//! A [`Message`] owns its type code, timestamp and payload together with an
//! optional cache of its encoded bytes. The cache is filled by the first call
//! to [`Message::encode`] (or taken from the input of [`Message::from_bytes`])
//! and cleared by every mutator, so the cached bytes always describe the
//! current fields.
//!
//! The cache uses interior mutability and makes `Message` `!Sync`. Share a
//! message across threads by cloning it or by putting it behind a lock.

use alloc::vec::Vec;
use core::cell::OnceCell;

use crate::decoder;
use crate::encoder;
use crate::error::{Error, Result};
use crate::header::MessageHeader;
use crate::registry::{self, MessageType};
use crate::size::{self, SizeMode};
use crate::value::PayloadValue;

/// A typed, timestamped backlog message
#[derive(Debug, Clone, Default)]
pub struct Message {
    msg_type: MessageType,
    timestamp: i64,
    payload: Vec<PayloadValue>,
    mode: SizeMode,
    encoded: OnceCell<Vec<u8>>,
}

impl Message {
    /// Message with timestamp 0 and an empty payload
    #[inline]
    pub fn new(msg_type: MessageType) -> Self {
        Self::with_timestamp(msg_type, 0)
    }

    /// Message with an empty payload
    #[inline]
    pub fn with_timestamp(msg_type: MessageType, timestamp: i64) -> Self {
        Self {
            msg_type,
            timestamp,
            payload: Vec::new(),
            mode: SizeMode::Legacy,
            encoded: OnceCell::new(),
        }
    }

    /// Message carrying `payload`, validated with the legacy size estimate
    ///
    /// Fails with [`Error::NullPayload`] when `payload` is `None` and with
    /// [`Error::Oversize`] when it does not fit in a message.
    pub fn with_payload<P>(msg_type: MessageType, timestamp: i64, payload: P) -> Result<Self>
    where
        P: Into<Option<Vec<PayloadValue>>>,
    {
        Self::with_payload_checked(msg_type, timestamp, payload, SizeMode::Legacy)
    }

    /// Like [`Message::with_payload`], bounding the size measured with `mode`
    ///
    /// The mode is kept and applied again by [`Message::set_payload`].
    pub fn with_payload_checked<P>(
        msg_type: MessageType,
        timestamp: i64,
        payload: P,
        mode: SizeMode,
    ) -> Result<Self>
    where
        P: Into<Option<Vec<PayloadValue>>>,
    {
        let payload = payload.into().ok_or(Error::NullPayload)?;
        size::check(&payload, mode)?;

        Ok(Self {
            msg_type,
            timestamp,
            payload,
            mode,
            encoded: OnceCell::new(),
        })
    }

    /// Decode a received message, keeping `buf` as its cached encoding
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        Self::from_vec(buf.to_vec())
    }

    /// Decode a received message, taking ownership of the buffer
    pub fn from_vec(buf: Vec<u8>) -> Result<Self> {
        let (header, payload) = decoder::decode(&buf)?;

        Ok(Self {
            msg_type: header.msg_type,
            timestamp: header.timestamp,
            payload,
            mode: SizeMode::Legacy,
            encoded: OnceCell::from(buf),
        })
    }

    /// Encoded bytes of this message
    ///
    /// Computed on first use and cached; later calls return the same buffer
    /// until the message is mutated.
    pub fn encode(&self) -> Result<&[u8]> {
        if let Some(bytes) = self.encoded.get() {
            return Ok(bytes.as_slice());
        }

        let bytes = encoder::encode(&self.header(), &self.payload)?;
        Ok(self.encoded.get_or_init(|| bytes).as_slice())
    }

    /// Write the encoded message into `buf`, returning the bytes written
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        match self.encoded.get() {
            Some(bytes) => {
                let dst = buf.get_mut(..bytes.len()).ok_or(Error::ShortBuffer)?;
                dst.copy_from_slice(bytes);
                Ok(bytes.len())
            }
            None => encoder::encode_into(buf, &self.header(), &self.payload),
        }
    }

    /// True when an encoded representation is cached
    #[inline]
    pub fn is_encoded(&self) -> bool {
        self.encoded.get().is_some()
    }

    /// Message type code
    #[inline]
    pub fn msg_type(&self) -> MessageType {
        self.msg_type
    }

    /// Registry name of the message type, if known
    #[inline]
    pub fn type_name(&self) -> Option<&'static str> {
        registry::name(self.msg_type)
    }

    /// Producer timestamp in milliseconds
    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Payload elements in wire order
    #[inline]
    pub fn payload(&self) -> &[PayloadValue] {
        &self.payload
    }

    /// Consume the message, returning its payload
    #[inline]
    pub fn into_payload(self) -> Vec<PayloadValue> {
        self.payload
    }

    /// Header fields of this message
    #[inline]
    pub fn header(&self) -> MessageHeader {
        MessageHeader::new(self.msg_type, self.timestamp)
    }

    /// Exact encoded length once cached, the legacy estimate before that
    pub fn size(&self) -> usize {
        match self.encoded.get() {
            Some(bytes) => bytes.len(),
            None => size::estimate(&self.payload),
        }
    }

    /// Exact encoded length, without encoding
    #[inline]
    pub fn exact_size(&self) -> usize {
        size::exact_len(&self.payload)
    }

    /// Change the message type
    pub fn set_msg_type(&mut self, msg_type: MessageType) {
        self.msg_type = msg_type;
        self.encoded.take();
    }

    /// Change the timestamp
    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
        self.encoded.take();
    }

    /// Size measure new payloads are bounded with
    #[inline]
    pub fn size_mode(&self) -> SizeMode {
        self.mode
    }

    /// Replace the payload, validated with the message's [`SizeMode`]
    ///
    /// On failure the message is left unchanged.
    pub fn set_payload<P>(&mut self, payload: P) -> Result<()>
    where
        P: Into<Option<Vec<PayloadValue>>>,
    {
        let payload = payload.into().ok_or(Error::NullPayload)?;
        size::check(&payload, self.mode)?;

        self.payload = payload;
        self.encoded.take();
        Ok(())
    }
}

// The cache is derived state and takes no part in equality.
impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.msg_type == other.msg_type
            && self.timestamp == other.timestamp
            && self.payload == other.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{GPS, PING};
    use crate::MAX_PAYLOAD_SIZE;
    use alloc::vec;

    #[test]
    fn test_constructors() {
        let msg = Message::new(PING);
        assert_eq!(msg.msg_type(), PING);
        assert_eq!(msg.timestamp(), 0);
        assert!(msg.payload().is_empty());
        assert_eq!(msg.type_name(), Some("PING"));

        let msg = Message::with_timestamp(GPS, -42);
        assert_eq!(msg.timestamp(), -42);
        assert!(msg.payload().is_empty());
        assert!(!msg.is_encoded());
    }

    #[test]
    fn test_null_payload_rejected() {
        assert_eq!(
            Message::with_payload(GPS, 0, None::<Vec<PayloadValue>>),
            Err(Error::NullPayload)
        );

        let mut msg = Message::new(GPS);
        assert_eq!(
            msg.set_payload(None::<Vec<PayloadValue>>),
            Err(Error::NullPayload)
        );
    }

    #[test]
    fn test_oversize_payload_rejected() {
        let blob = PayloadValue::ByteBlob(vec![0; MAX_PAYLOAD_SIZE]);
        assert!(matches!(
            Message::with_payload(30, 0, vec![blob.clone()]),
            Err(Error::Oversize { .. })
        ));

        let mut msg = Message::with_payload(30, 0, vec![PayloadValue::Int8(1)]).unwrap();
        assert!(matches!(
            msg.set_payload(vec![blob]),
            Err(Error::Oversize { .. })
        ));
        assert_eq!(msg.payload(), &[PayloadValue::Int8(1)]);
    }

    #[test]
    fn test_set_payload_keeps_size_mode() {
        let mut msg =
            Message::with_payload_checked(30, 0, vec![PayloadValue::Int8(1)], SizeMode::Exact)
                .unwrap();
        assert_eq!(msg.size_mode(), SizeMode::Exact);

        // fits the legacy estimate, not the true length
        let blob = vec![PayloadValue::ByteBlob(vec![0; MAX_PAYLOAD_SIZE - 5])];
        assert!(matches!(
            msg.set_payload(blob.clone()),
            Err(Error::Oversize { .. })
        ));
        assert_eq!(msg.payload(), &[PayloadValue::Int8(1)]);
        assert!(msg.exact_size() <= MAX_PAYLOAD_SIZE);

        let mut legacy = Message::new(30);
        assert_eq!(legacy.size_mode(), SizeMode::Legacy);
        legacy.set_payload(blob).unwrap();
        assert_eq!(Message::from_bytes(&[1; 9]).unwrap().size_mode(), SizeMode::Legacy);
    }

    #[test]
    fn test_encode_is_memoized() {
        let msg = Message::with_payload(30, 7, vec![PayloadValue::from("x")]).unwrap();

        let first = msg.encode().unwrap();
        let second = msg.encode().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_ptr(), second.as_ptr());
        assert!(msg.is_encoded());
    }

    #[test]
    fn test_mutators_clear_cache() {
        let mut msg = Message::with_payload(30, 7, vec![PayloadValue::Int32(1)]).unwrap();
        let before = msg.encode().unwrap().to_vec();

        msg.set_timestamp(8);
        assert!(!msg.is_encoded());
        assert_ne!(msg.encode().unwrap(), before.as_slice());

        msg.set_msg_type(31);
        assert!(!msg.is_encoded());
        assert_eq!(msg.encode().unwrap()[0], 31);

        msg.set_payload(vec![PayloadValue::Int32(2)]).unwrap();
        assert!(!msg.is_encoded());
        assert_eq!(Message::from_bytes(msg.encode().unwrap()).unwrap(), msg);
    }

    #[test]
    fn test_size_reporting() {
        let msg = Message::with_payload(30, 0, vec![PayloadValue::from("hi")]).unwrap();
        // legacy estimate: 2 + (2 + 3)
        assert_eq!(msg.size(), 7);
        assert_eq!(msg.exact_size(), 9 + 4 + 1 + 4 + 2);

        msg.encode().unwrap();
        assert_eq!(msg.size(), msg.exact_size());
    }

    #[test]
    fn test_from_bytes_keeps_received_buffer() {
        let wire = [0x02, 0xE8, 0x03, 0, 0, 0, 0, 0, 0];
        let msg = Message::from_bytes(&wire).unwrap();

        assert!(msg.is_encoded());
        assert_eq!(msg.encode().unwrap(), &wire);
        assert_eq!(msg.size(), 9);
    }

    #[test]
    fn test_encode_into() {
        let msg = Message::with_payload(60, 1, vec![PayloadValue::Float64(0.5)]).unwrap();
        let mut buf = [0u8; 64];

        let n = msg.encode_into(&mut buf).unwrap();
        assert_eq!(&buf[..n], msg.encode().unwrap());

        // cached path
        let n2 = msg.encode_into(&mut buf).unwrap();
        assert_eq!(n, n2);

        let mut small = [0u8; 4];
        assert_eq!(msg.encode_into(&mut small), Err(Error::ShortBuffer));
    }

    #[test]
    fn test_equality_ignores_cache() {
        let a = Message::with_payload(10, 3, vec![PayloadValue::Null]).unwrap();
        let b = a.clone();
        a.encode().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.clone().into_payload(), vec![PayloadValue::Null]);
    }
}
