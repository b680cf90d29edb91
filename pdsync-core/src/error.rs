//! Error types for pdsync operations

use alloc::string::String;

/// Errors raised while configuring or running the synchronizer and extractor
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq)]
pub enum PdsError {
    /// Frame length cannot be packed into whole bytes
    #[cfg_attr(feature = "std", error("Frame length {0} bits is not a multiple of 8"))]
    FrameNotByteAligned(usize),

    /// Frame length of zero bits
    #[cfg_attr(feature = "std", error("Frame length must be greater than zero"))]
    EmptyFrame,

    /// Frame length above the configured ceiling
    #[cfg_attr(feature = "std", error("Frame length {0} bits exceeds maximum {1}"))]
    FrameTooLong(usize, usize),

    /// Sub-message partition does not cover the frame payload exactly
    #[cfg_attr(
        feature = "std",
        error("Payload of {payload_len} bytes cannot be split into {count} sub-messages of {size} bytes")
    )]
    UnevenPartition {
        /// Frame payload length in bytes.
        payload_len: usize,
        /// Configured sub-message count.
        count: usize,
        /// Configured sub-message size in bytes.
        size: usize,
    },

    /// Sync tag key is empty
    #[cfg_attr(feature = "std", error("Sync tag name must not be empty"))]
    EmptySyncTag,

    /// Any other rejected configuration value
    #[cfg_attr(feature = "std", error("Invalid configuration: {0}"))]
    InvalidConfig(String),

    /// A frame handed to the extractor has the wrong payload length
    #[cfg_attr(
        feature = "std",
        error("Frame {sequence}: payload is {actual} bytes, expected {expected}")
    )]
    PayloadLengthMismatch {
        /// Sequence number of the offending frame.
        sequence: u64,
        /// Payload length the extractor was configured for.
        expected: usize,
        /// Payload length actually received.
        actual: usize,
    },
}

impl PdsError {
    /// True for errors that abort construction
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PdsError::FrameNotByteAligned(_)
                | PdsError::EmptyFrame
                | PdsError::FrameTooLong(..)
                | PdsError::UnevenPartition { .. }
                | PdsError::EmptySyncTag
                | PdsError::InvalidConfig(_)
        )
    }

    /// True for per-frame errors that drop one frame and let processing continue
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, PdsError::PayloadLengthMismatch { .. })
    }
}
