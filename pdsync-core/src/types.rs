//! Core types flowing through the pipeline

use alloc::string::String;
use bytes::Bytes;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Out-of-band marker raised by the upstream correlator
///
/// `offset` is the absolute bit-stream position of the last bit of the
/// detected sync word; `key` names the pattern that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEvent {
    /// Absolute stream offset, in bits
    pub offset: u64,
    /// Identifying key of the pattern
    pub key: String,
}

impl SyncEvent {
    /// Create a new sync event
    pub fn new(offset: u64, key: impl Into<String>) -> Self {
        Self {
            offset,
            key: key.into(),
        }
    }
}

/// One complete, byte-packed frame emitted by the synchronizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Emission counter, starting at 1
    pub sequence: u64,

    /// Packed frame bits, MSB-first
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame
    pub fn new(sequence: u64, payload: Bytes) -> Self {
        Self { sequence, payload }
    }

    /// Create a frame by copying `payload`
    pub fn from_slice(sequence: u64, payload: &[u8]) -> Self {
        Self::new(sequence, Bytes::copy_from_slice(payload))
    }

    /// Sequence number of this frame
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// True if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Lowercase hex rendering of the payload
    pub fn to_hex(&self) -> String {
        hex::encode(&self.payload)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.sequence, self.to_hex())
    }
}

/// Outcome of the word sync check on a sub-message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Leading word sync matched; payload may still carry bit errors
    Valid,
    /// Leading word sync did not match; payload kept for inspection
    Invalid,
}

impl Classification {
    /// Name of the output this classification is routed to
    pub const fn as_str(&self) -> &'static str {
        match self {
            Classification::Valid => "valid",
            Classification::Invalid => "invalid",
        }
    }

    /// True for [`Classification::Valid`]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Classification::Valid)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed-size slice of a frame payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubMessage {
    /// Sequence number of the source frame
    pub sequence: u64,

    /// Position within the frame, starting at 0
    pub index: usize,

    /// Sub-message bytes; shares the frame's buffer
    pub payload: Bytes,

    /// Word sync outcome
    pub classification: Classification,
}

impl SubMessage {
    /// Lowercase hex rendering of the payload
    pub fn to_hex(&self) -> String {
        hex::encode(&self.payload)
    }
}

/// Result of one synchronizer call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutput {
    /// Number of input bits consumed; the caller re-delivers the rest
    pub consumed: usize,

    /// Frame completed during this call, if any
    pub frame: Option<Frame>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_display() {
        let frame = Frame::new(3, Bytes::from_static(&[0xD6, 0x05, 0xAB]));
        assert_eq!(frame.to_hex(), "d605ab");
        assert_eq!(frame.to_string(), "[3] d605ab");
        assert_eq!(frame.len(), 3);
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_submessage_hex() {
        let message = SubMessage {
            sequence: 1,
            index: 2,
            payload: Bytes::from_static(&[0x00, 0x0f, 0xf0]),
            classification: Classification::Invalid,
        };
        assert_eq!(message.to_hex(), "000ff0");
    }

    #[test]
    fn test_classification_names() {
        assert_eq!(Classification::Valid.as_str(), "valid");
        assert_eq!(Classification::Invalid.to_string(), "invalid");
        assert!(Classification::Valid.is_valid());
        assert!(!Classification::Invalid.is_valid());
    }
}
