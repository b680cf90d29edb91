//! Construction-time configuration for the synchronizer and the extractor
//!
//! Configuration is fixed once a component is built. Every constructor
//! validates its input and returns a configuration error instead of
//! guessing at a remainder policy.

use crate::constants::{
    BITS_PER_BYTE, DEFAULT_SYNC_TAG, FRAME_LEN_BITS, MAX_FRAME_LEN_BITS, SUBMESSAGE_COUNT,
    SUBMESSAGE_SIZE, SYNC_BYTE, SYNC_EXPECTED, SYNC_MASK,
};
use crate::error::PdsError;
use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};

/// Word sync check applied to the first two bytes of a sub-message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPattern {
    /// Required value of byte 0
    pub sync_byte: u8,
    /// Mask applied to byte 1
    pub mask: u8,
    /// Required value of `byte1 & mask`
    pub expected: u8,
}

impl SyncPattern {
    /// Create a new pattern
    pub const fn new(sync_byte: u8, mask: u8, expected: u8) -> Self {
        Self {
            sync_byte,
            mask,
            expected,
        }
    }

    /// Check the leading word sync of `payload`.
    ///
    /// Only the first two bytes are inspected; payloads shorter than that never match.
    pub fn matches(&self, payload: &[u8]) -> bool {
        match payload {
            [first, second, ..] => {
                *first == self.sync_byte && (*second & self.mask) == self.expected
            }
            _ => false,
        }
    }

    fn validate(&self) -> Result<(), PdsError> {
        if self.expected & !self.mask != 0 {
            return Err(PdsError::InvalidConfig(alloc::format!(
                "sync pattern expects {:#04x} outside mask {:#04x}",
                self.expected,
                self.mask
            )));
        }
        Ok(())
    }
}

impl Default for SyncPattern {
    fn default() -> Self {
        Self::new(SYNC_BYTE, SYNC_MASK, SYNC_EXPECTED)
    }
}

/// Frame synchronizer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Key of the sync events that start a frame
    pub sync_tag: String,
    /// Frame length `L` in bits
    pub frame_len_bits: usize,
}

impl SyncConfig {
    /// Create and validate a synchronizer config
    pub fn new(sync_tag: impl Into<String>, frame_len_bits: usize) -> Result<Self, PdsError> {
        let config = Self {
            sync_tag: sync_tag.into(),
            frame_len_bits,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), PdsError> {
        if self.sync_tag.is_empty() {
            return Err(PdsError::EmptySyncTag);
        }
        if self.frame_len_bits == 0 {
            return Err(PdsError::EmptyFrame);
        }
        if self.frame_len_bits > MAX_FRAME_LEN_BITS {
            return Err(PdsError::FrameTooLong(
                self.frame_len_bits,
                MAX_FRAME_LEN_BITS,
            ));
        }
        if self.frame_len_bits % BITS_PER_BYTE != 0 {
            return Err(PdsError::FrameNotByteAligned(self.frame_len_bits));
        }
        Ok(())
    }

    /// Packed frame length in bytes
    pub fn frame_len_bytes(&self) -> usize {
        self.frame_len_bits / BITS_PER_BYTE
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sync_tag: DEFAULT_SYNC_TAG.to_string(),
            frame_len_bits: FRAME_LEN_BITS,
        }
    }
}

/// Message extractor settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Sub-messages per frame (`N`)
    pub count: usize,
    /// Sub-message size in bytes (`S`)
    pub size: usize,
    /// Word sync check
    pub pattern: SyncPattern,
}

impl ExtractorConfig {
    /// Create and validate an extractor config
    pub fn new(count: usize, size: usize, pattern: SyncPattern) -> Result<Self, PdsError> {
        let config = Self {
            count,
            size,
            pattern,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), PdsError> {
        if self.count == 0 || self.size == 0 {
            return Err(PdsError::InvalidConfig(alloc::format!(
                "sub-message count ({}) and size ({}) must be non-zero",
                self.count,
                self.size
            )));
        }
        if self.count.checked_mul(self.size).is_none() {
            return Err(PdsError::InvalidConfig(
                "sub-message partition overflows".to_string(),
            ));
        }
        self.pattern.validate()
    }

    /// Frame payload length this extractor accepts (`N * S`)
    pub fn payload_len(&self) -> usize {
        self.count * self.size
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            count: SUBMESSAGE_COUNT,
            size: SUBMESSAGE_SIZE,
            pattern: SyncPattern::default(),
        }
    }
}

/// Joint configuration of both pipeline stages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Synchronizer stage
    pub sync: SyncConfig,
    /// Extractor stage
    pub extractor: ExtractorConfig,
}

impl PipelineConfig {
    /// Build and validate a pipeline config
    pub fn new(sync: SyncConfig, extractor: ExtractorConfig) -> Result<Self, PdsError> {
        let config = Self { sync, extractor };
        config.validate()?;
        Ok(config)
    }

    /// Validate both stages and that the partition covers the frame payload exactly
    pub fn validate(&self) -> Result<(), PdsError> {
        self.sync.validate()?;
        self.extractor.validate()?;

        let payload_len = self.sync.frame_len_bytes();
        if payload_len != self.extractor.payload_len() {
            return Err(PdsError::UnevenPartition {
                payload_len,
                count: self.extractor.count,
                size: self.extractor.size,
            });
        }
        Ok(())
    }
}
