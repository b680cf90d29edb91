//! Two-stage pipeline: synchronizer → extractor
//!
//! Frames pass from the synchronizer to the extractor through an ordered
//! single-producer/single-consumer queue. Extraction failures are isolated
//! to their frame and collected as violations.

use crate::config::PipelineConfig;
use crate::error::PdsError;
use crate::extractor::{ExtractStats, MessageExtractor, Routed};
use crate::synchronizer::{FrameSynchronizer, SyncStats};
use crate::types::{Frame, SyncEvent};
use alloc::collections::VecDeque;
use alloc::vec::Vec;

#[cfg(feature = "logging")]
use tracing::debug;

/// Everything produced by one pipeline call
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Input bits consumed
    pub consumed: usize,

    /// Frames emitted by the synchronizer
    pub frames: Vec<Frame>,

    /// Routed sub-messages
    pub messages: Routed,

    /// Frames the extractor rejected
    pub violations: Vec<PdsError>,
}

/// Synchronizer and extractor wired together
#[derive(Debug, Clone)]
pub struct Pipeline {
    synchronizer: FrameSynchronizer,
    extractor: MessageExtractor,
    handoff: VecDeque<Frame>,
    extract_stats: ExtractStats,
}

impl Pipeline {
    /// Build both stages from a jointly validated config
    pub fn new(config: PipelineConfig) -> crate::Result<Self> {
        config.validate()?;

        Ok(Self {
            synchronizer: FrameSynchronizer::new(config.sync)?,
            extractor: MessageExtractor::new(config.extractor)?,
            handoff: VecDeque::new(),
            extract_stats: ExtractStats::default(),
        })
    }

    /// Process one batch; same consumption contract as [`FrameSynchronizer::process`]
    pub fn process(
        &mut self,
        bits: &[u8],
        events: &[SyncEvent],
        batch_start_offset: u64,
    ) -> PipelineOutput {
        let sync = self.synchronizer.process(bits, events, batch_start_offset);
        self.handoff.extend(sync.frame);

        let mut output = PipelineOutput {
            consumed: sync.consumed,
            ..Default::default()
        };
        self.drain(&mut output);
        output
    }

    /// Run a whole in-memory stream whose first bit sits at `start_offset`
    ///
    /// Pass the total consumed so far when continuing after [`Pipeline::process`].
    pub fn run(
        &mut self,
        bits: &[u8],
        events: &[SyncEvent],
        start_offset: u64,
    ) -> PipelineOutput {
        let frames = self.synchronizer.drive(bits, events, start_offset);
        self.handoff.extend(frames);

        let mut output = PipelineOutput {
            consumed: bits.len(),
            ..Default::default()
        };
        self.drain(&mut output);

        #[cfg(feature = "logging")]
        debug!(
            "Pipeline run: {} frames, {} valid, {} invalid, {} rejected",
            output.frames.len(),
            output.messages.valid.len(),
            output.messages.invalid.len(),
            output.violations.len()
        );

        output
    }

    /// Synchronizer stage
    pub fn synchronizer(&self) -> &FrameSynchronizer {
        &self.synchronizer
    }

    /// Synchronizer statistics
    pub fn sync_stats(&self) -> &SyncStats {
        self.synchronizer.stats()
    }

    /// Extractor statistics accumulated over all calls
    pub fn extract_stats(&self) -> &ExtractStats {
        &self.extract_stats
    }

    fn drain(&mut self, output: &mut PipelineOutput) {
        while let Some(frame) = self.handoff.pop_front() {
            let (routed, violations, stats) = self.extractor.extract_all([&frame]);

            self.extract_stats.frames_processed += stats.frames_processed;
            self.extract_stats.frames_rejected += stats.frames_rejected;
            self.extract_stats.valid += stats.valid;
            self.extract_stats.invalid += stats.invalid;

            output.messages.valid.extend(routed.valid);
            output.messages.invalid.extend(routed.invalid);
            output.violations.extend(violations);
            output.frames.push(frame);
        }
    }
}
