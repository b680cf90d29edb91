//! Message extractor: split frames into sub-messages and check their word sync
//!
//! The extractor is stateless. A frame whose payload length differs from
//! `N * S` is rejected as a whole; no sub-message of it is ever emitted.

use crate::config::{ExtractorConfig, SyncPattern};
use crate::error::PdsError;
use crate::types::{Classification, Frame, SubMessage};
use alloc::vec::Vec;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Classify a sub-message by its leading word sync
///
/// Purely a function of the first two bytes.
pub fn classify(payload: &[u8], pattern: &SyncPattern) -> Classification {
    if pattern.matches(payload) {
        Classification::Valid
    } else {
        Classification::Invalid
    }
}

/// Sub-messages of one or more frames, split by output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routed {
    /// Sub-messages whose word sync matched, in frame-then-index order
    pub valid: Vec<SubMessage>,

    /// Sub-messages whose word sync did not match, in frame-then-index order
    pub invalid: Vec<SubMessage>,
}

impl Routed {
    /// Route each sub-message to its output, keeping order
    pub fn push(&mut self, message: SubMessage) {
        match message.classification {
            Classification::Valid => self.valid.push(message),
            Classification::Invalid => self.invalid.push(message),
        }
    }

    /// Total number of routed sub-messages
    pub fn len(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    /// True if nothing has been routed
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.invalid.is_empty()
    }
}

impl Extend<SubMessage> for Routed {
    fn extend<T: IntoIterator<Item = SubMessage>>(&mut self, iter: T) {
        for message in iter {
            self.push(message);
        }
    }
}

/// Extraction statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Frames split successfully
    pub frames_processed: usize,

    /// Frames dropped for a payload length mismatch
    pub frames_rejected: usize,

    /// Sub-messages routed to the valid output
    pub valid: usize,

    /// Sub-messages routed to the invalid output
    pub invalid: usize,
}

impl ExtractStats {
    /// Share of sub-messages with a matching word sync, as a percentage
    pub fn valid_rate(&self) -> f64 {
        let total = self.valid + self.invalid;
        if total == 0 {
            0.0
        } else {
            (self.valid as f64 / total as f64) * 100.0
        }
    }
}

/// Splits frames into `N` sub-messages of `S` bytes and classifies each
#[derive(Debug, Clone)]
pub struct MessageExtractor {
    config: ExtractorConfig,
}

impl MessageExtractor {
    /// Create an extractor, validating the config
    pub fn new(config: ExtractorConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Split `frame` into classified sub-messages in index order
    ///
    /// Sub-message payloads are zero-copy slices of the frame payload.
    pub fn extract(&self, frame: &Frame) -> crate::Result<Vec<SubMessage>> {
        let expected = self.config.payload_len();
        if frame.payload.len() != expected {
            #[cfg(feature = "logging")]
            warn!(
                "Dropping frame {}: payload is {} bytes, expected {}",
                frame.sequence,
                frame.payload.len(),
                expected
            );

            return Err(PdsError::PayloadLengthMismatch {
                sequence: frame.sequence,
                expected,
                actual: frame.payload.len(),
            });
        }

        let size = self.config.size;
        let messages: Vec<SubMessage> = (0..self.config.count)
            .map(|index| {
                let payload = frame.payload.slice(index * size..(index + 1) * size);
                let classification = classify(&payload, &self.config.pattern);
                SubMessage {
                    sequence: frame.sequence,
                    index,
                    payload,
                    classification,
                }
            })
            .collect();

        #[cfg(feature = "logging")]
        debug!(
            "Frame {}: {} of {} sub-messages valid",
            frame.sequence,
            messages
                .iter()
                .filter(|m| m.classification.is_valid())
                .count(),
            messages.len()
        );

        Ok(messages)
    }

    /// Extract `frame` and split the result by output
    pub fn route(&self, frame: &Frame) -> crate::Result<Routed> {
        let mut routed = Routed::default();
        routed.extend(self.extract(frame)?);
        Ok(routed)
    }

    /// Extract many frames, isolating per-frame failures
    ///
    /// Rejected frames are reported alongside the routed output and never
    /// stop the frames after them.
    pub fn extract_all<'a, I>(&self, frames: I) -> (Routed, Vec<PdsError>, ExtractStats)
    where
        I: IntoIterator<Item = &'a Frame>,
    {
        let mut routed = Routed::default();
        let mut violations = Vec::new();
        let mut stats = ExtractStats::default();

        for frame in frames {
            match self.extract(frame) {
                Ok(messages) => {
                    stats.frames_processed += 1;
                    for message in messages {
                        if message.classification.is_valid() {
                            stats.valid += 1;
                        } else {
                            stats.invalid += 1;
                        }
                        routed.push(message);
                    }
                }
                Err(e) => {
                    stats.frames_rejected += 1;
                    violations.push(e);
                }
            }
        }

        (routed, violations, stats)
    }
}
