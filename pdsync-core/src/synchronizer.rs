//! Frame synchronizer: tag-driven capture of fixed-length frames
//!
//! The synchronizer watches an unbounded stream of unpacked bits for sync
//! events raised upstream. A matching event starts a new frame at the
//! event's offset; once `L` bits are collected they are packed MSB-first
//! and emitted with the next sequence number.
//!
//! Each call reports how many input bits it consumed. When a frame
//! completes mid-batch only the bits up to the frame boundary are
//! consumed, and the caller must hand the remainder back on the next call.

use crate::config::SyncConfig;
use crate::packing::pack_bits;
use crate::types::{Frame, SyncEvent, SyncOutput};
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Synchronizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Waiting for a matching sync event
    Searching,
    /// Copying bits into the pending frame
    Accumulating {
        /// Bits collected so far
        filled: usize,
    },
}

/// Synchronizer statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Total bits reported as consumed
    pub bits_consumed: u64,

    /// Matching events that started a frame
    pub syncs_accepted: u64,

    /// Events with a different key
    pub foreign_events: u64,

    /// Matching events positioned outside the batch they arrived with
    pub out_of_window_events: u64,

    /// Partial frames dropped because a newer sync arrived
    pub partial_frames_discarded: u64,

    /// Frames emitted
    pub frames_emitted: u64,
}

/// Tag-driven frame synchronizer
///
/// The pending frame lives in a fixed arena of `L` slots indexed by the
/// fill cursor carried in [`SyncState::Accumulating`].
#[derive(Debug, Clone)]
pub struct FrameSynchronizer {
    config: SyncConfig,
    arena: Box<[u8]>,
    state: SyncState,
    sequence: u64,
    stats: SyncStats,
}

impl FrameSynchronizer {
    /// Create a synchronizer, validating the config
    pub fn new(config: SyncConfig) -> crate::Result<Self> {
        config.validate()?;
        let arena = vec![0u8; config.frame_len_bits].into_boxed_slice();

        Ok(Self {
            config,
            arena,
            state: SyncState::Searching,
            sequence: 0,
            stats: SyncStats::default(),
        })
    }

    /// Process one batch of bits
    ///
    /// `batch_start_offset` is the absolute stream position of `bits[0]`;
    /// event offsets live in the same space. Only the first matching event
    /// of a batch is acted on. A matching event that lands before the
    /// pending frame completes supersedes it, so across calls the most
    /// recent sync wins. Events past the completion point are left in the
    /// unconsumed tail for the caller to hand back.
    pub fn process(
        &mut self,
        bits: &[u8],
        events: &[SyncEvent],
        batch_start_offset: u64,
    ) -> SyncOutput {
        let horizon = match self.state {
            SyncState::Searching => bits.len(),
            SyncState::Accumulating { filled } => bits.len().min(self.arena.len() - filled),
        };
        let trigger = self.find_trigger(bits.len(), horizon, events, batch_start_offset);

        let output = match (self.state, trigger) {
            (state, Some(local)) => {
                if let SyncState::Accumulating { .. } = state {
                    self.stats.partial_frames_discarded += 1;

                    #[cfg(feature = "logging")]
                    debug!(
                        "Discarding partial frame of {} bits, resync at offset {}",
                        self.pending_len(),
                        batch_start_offset + local as u64
                    );
                }

                #[cfg(feature = "logging")]
                debug!("Frame sync at offset {}", batch_start_offset + local as u64);

                self.stats.syncs_accepted += 1;
                self.copy_from(bits, local, 0)
            }
            (SyncState::Searching, None) => SyncOutput {
                consumed: bits.len(),
                frame: None,
            },
            (SyncState::Accumulating { filled }, None) => self.copy_from(bits, 0, filled),
        };

        self.stats.bits_consumed += output.consumed as u64;
        output
    }

    /// Feed a whole in-memory stream that begins at `start_offset`
    ///
    /// Unconsumed tails are handed back with the events still ahead of
    /// them until the stream is exhausted. Events are taken in stream order.
    pub fn drive(&mut self, bits: &[u8], events: &[SyncEvent], start_offset: u64) -> Vec<Frame> {
        let mut ordered = events.to_vec();
        ordered.sort_by_key(|e| e.offset);

        let mut frames = Vec::new();
        let mut pos = 0usize;

        while pos < bits.len() {
            let batch_start = start_offset + pos as u64;
            let first = ordered.partition_point(|e| e.offset < batch_start);

            let output = self.process(&bits[pos..], &ordered[first..], batch_start);
            if output.consumed == 0 {
                break;
            }

            pos += output.consumed;
            frames.extend(output.frame);
        }

        frames
    }

    /// Drop any partial frame and return to searching
    ///
    /// The sequence counter keeps running.
    pub fn reset(&mut self) {
        self.state = SyncState::Searching;
    }

    /// Current state
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Sequence number of the last emitted frame (0 before the first)
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Bits held in the pending frame
    pub fn pending_len(&self) -> usize {
        match self.state {
            SyncState::Searching => 0,
            SyncState::Accumulating { filled } => filled,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Running statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Local index of the first matching event before `horizon`
    ///
    /// Matching events in `[horizon, batch_len)` are skipped without being
    /// counted; they come back with the unconsumed tail.
    fn find_trigger(
        &mut self,
        batch_len: usize,
        horizon: usize,
        events: &[SyncEvent],
        batch_start_offset: u64,
    ) -> Option<usize> {
        for event in events {
            if event.key != self.config.sync_tag {
                self.stats.foreign_events += 1;
                continue;
            }

            let local = event
                .offset
                .checked_sub(batch_start_offset)
                .and_then(|l| usize::try_from(l).ok())
                .filter(|&l| l < batch_len);

            match local {
                Some(local) if local < horizon => return Some(local),
                Some(_) => continue,
                None => {
                    self.stats.out_of_window_events += 1;

                    #[cfg(feature = "logging")]
                    warn!(
                        "Ignoring sync event at offset {} outside batch [{}, {})",
                        event.offset,
                        batch_start_offset,
                        batch_start_offset + batch_len as u64
                    );
                }
            }
        }
        None
    }

    /// Copy bits from `bits[start..]` into the arena at `filled`, stopping at the frame boundary
    fn copy_from(&mut self, bits: &[u8], start: usize, filled: usize) -> SyncOutput {
        let frame_len = self.arena.len();
        let take = (frame_len - filled).min(bits.len() - start);

        self.arena[filled..filled + take].copy_from_slice(&bits[start..start + take]);
        let filled = filled + take;
        let consumed = start + take;

        if filled < frame_len {
            self.state = SyncState::Accumulating { filled };
            return SyncOutput {
                consumed,
                frame: None,
            };
        }

        self.state = SyncState::Searching;
        SyncOutput {
            consumed,
            frame: Some(self.emit()),
        }
    }

    fn emit(&mut self) -> Frame {
        self.sequence += 1;
        self.stats.frames_emitted += 1;

        let frame = Frame::new(self.sequence, pack_bits(&self.arena));

        #[cfg(feature = "logging")]
        debug!("Emitting frame {}", frame);

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::{unpack_bytes, BitStreamBuilder};

    fn synchronizer(frame_len_bits: usize) -> FrameSynchronizer {
        FrameSynchronizer::new(SyncConfig::new("pds_sync", frame_len_bits).unwrap()).unwrap()
    }

    #[test]
    fn test_no_events_consumes_everything() {
        let mut sync = synchronizer(16);
        let out = sync.process(&[1; 100], &[], 0);

        assert_eq!(out.consumed, 100);
        assert!(out.frame.is_none());
        assert_eq!(sync.state(), SyncState::Searching);
    }

    #[test]
    fn test_foreign_events_ignored() {
        let mut sync = synchronizer(16);
        let events = [SyncEvent::new(5, "other_sync")];
        let out = sync.process(&[1; 100], &events, 0);

        assert_eq!(out.consumed, 100);
        assert!(out.frame.is_none());
        assert_eq!(sync.state(), SyncState::Searching);
        assert_eq!(sync.stats().foreign_events, 1);
    }

    #[test]
    fn test_frame_completes_in_same_batch() {
        let (bits, events) = BitStreamBuilder::new()
            .noise(300)
            .sync_here("pds_sync")
            .fill(1, 700)
            .build();
        let mut sync = synchronizer(576);

        let out = sync.process(&bits, &events, 0);

        assert_eq!(out.consumed, 876);
        let frame = out.frame.unwrap();
        assert_eq!(frame.sequence, 1);
        assert_eq!(frame.len(), 72);
        assert!(frame.payload.iter().all(|&b| b == 0xFF));
        assert_eq!(sync.state(), SyncState::Searching);
    }

    #[test]
    fn test_frame_spans_batches() {
        let payload = [0xD6, 0x05, 0x12, 0x34];
        let (bits, events) = BitStreamBuilder::new()
            .noise(4)
            .sync_here("pds_sync")
            .bytes(&payload)
            .noise(8)
            .build();
        let mut sync = synchronizer(32);

        let out = sync.process(&bits[0..10], &events, 0);
        assert_eq!(out.consumed, 10);
        assert_eq!(sync.state(), SyncState::Accumulating { filled: 6 });

        let out = sync.process(&bits[10..20], &[], 10);
        assert_eq!(out.consumed, 10);
        assert_eq!(sync.pending_len(), 16);

        let out = sync.process(&bits[20..], &[], 20);
        assert_eq!(out.consumed, 16);
        assert_eq!(out.frame.unwrap().payload.as_ref(), &payload);
        assert_eq!(sync.state(), SyncState::Searching);
    }

    #[test]
    fn test_event_relative_to_batch_offset() {
        let mut sync = synchronizer(8);
        let mut bits = vec![0u8; 20];
        bits[12..20].copy_from_slice(&unpack_bytes(&[0xA5]));

        let events = [SyncEvent::new(1012, "pds_sync")];
        let out = sync.process(&bits, &events, 1000);

        assert_eq!(out.consumed, 20);
        assert_eq!(out.frame.unwrap().payload.as_ref(), &[0xA5]);
    }

    #[test]
    fn test_out_of_window_event_ignored() {
        let mut sync = synchronizer(8);
        let events = [
            SyncEvent::new(5, "pds_sync"),
            SyncEvent::new(500, "pds_sync"),
        ];
        let out = sync.process(&[0; 10], &events, 100);

        assert_eq!(out.consumed, 10);
        assert!(out.frame.is_none());
        assert_eq!(sync.state(), SyncState::Searching);
        assert_eq!(sync.stats().out_of_window_events, 2);
    }

    #[test]
    fn test_only_first_matching_event_in_batch() {
        let (bits, events) = BitStreamBuilder::new()
            .sync_here("pds_sync")
            .bytes(&[0x11])
            .sync_here("pds_sync")
            .bytes(&[0x22])
            .build();
        let mut sync = synchronizer(8);

        let out = sync.process(&bits, &events, 0);
        assert_eq!(out.consumed, 8);
        assert_eq!(out.frame.unwrap().payload.as_ref(), &[0x11]);
    }

    #[test]
    fn test_last_sync_wins_across_calls() {
        let mut sync = synchronizer(16);

        let out = sync.process(&[1; 10], &[SyncEvent::new(2, "pds_sync")], 0);
        assert_eq!(out.consumed, 10);
        assert_eq!(sync.pending_len(), 8);

        let (second, _) = BitStreamBuilder::new()
            .fill(1, 3)
            .bytes(&[0x0F, 0xF0])
            .build();
        let out = sync.process(&second, &[SyncEvent::new(13, "pds_sync")], 10);

        assert_eq!(out.consumed, 19);
        assert_eq!(out.frame.unwrap().payload.as_ref(), &[0x0F, 0xF0]);
        assert_eq!(sync.stats().partial_frames_discarded, 1);
        assert_eq!(sync.stats().syncs_accepted, 2);
    }

    #[test]
    fn test_sync_after_completion_point_is_replayed() {
        let mut sync = synchronizer(16);

        let out = sync.process(&[1; 10], &[SyncEvent::new(2, "pds_sync")], 0);
        assert_eq!(out.consumed, 10);
        assert_eq!(sync.pending_len(), 8);

        let events = [SyncEvent::new(25, "pds_sync")];
        let out = sync.process(&[1; 20], &events, 10);

        assert_eq!(out.consumed, 8);
        assert_eq!(out.frame.unwrap().payload.as_ref(), &[0xFF, 0xFF]);
        assert_eq!(sync.state(), SyncState::Searching);
        assert_eq!(sync.stats().partial_frames_discarded, 0);

        let out = sync.process(&[0; 12], &events, 18);
        assert_eq!(out.consumed, 12);
        assert_eq!(sync.pending_len(), 5);
        assert_eq!(sync.stats().syncs_accepted, 2);
    }

    #[test]
    fn test_sync_on_completion_boundary_does_not_restart() {
        let mut sync = synchronizer(8);
        sync.process(&[1; 4], &[SyncEvent::new(0, "pds_sync")], 0);

        // 4 bits remain, so local index 4 is the first bit after the frame
        let out = sync.process(&[1; 8], &[SyncEvent::new(8, "pds_sync")], 4);
        assert_eq!(out.consumed, 4);
        assert_eq!(out.frame.unwrap().payload.as_ref(), &[0xFF]);
    }

    #[test]
    fn test_chunked_matches_whole_stream() {
        let (bits, events) = BitStreamBuilder::new()
            .noise(10)
            .sync_here("pds_sync")
            .fill(1, 20)
            .sync_here("pds_sync")
            .fill(0, 170)
            .build();

        let mut whole = synchronizer(16);
        let expected = whole.drive(&bits, &events, 0);
        assert_eq!(expected.len(), 2);

        let mut chunked = synchronizer(16);
        let mut frames = Vec::new();
        let mut pos = 0usize;
        while pos < bits.len() {
            let end = (pos + 20).min(bits.len());
            let batch: Vec<SyncEvent> = events
                .iter()
                .filter(|e| e.offset >= pos as u64 && e.offset < end as u64)
                .cloned()
                .collect();
            let out = chunked.process(&bits[pos..end], &batch, pos as u64);
            pos += out.consumed;
            frames.extend(out.frame);
        }

        assert_eq!(frames, expected);
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let (bits, events) = BitStreamBuilder::new()
            .sync_here("pds_sync")
            .bytes(&[1])
            .noise(5)
            .sync_here("pds_sync")
            .bytes(&[2])
            .sync_here("pds_sync")
            .bytes(&[3])
            .build();
        let mut sync = synchronizer(8);

        let frames = sync.drive(&bits, &events, 0);
        let seqs: Vec<u64> = frames.iter().map(|f| f.sequence).collect();
        let payloads: Vec<u8> = frames.iter().map(|f| f.payload[0]).collect();

        assert_eq!(seqs, vec![1, 2, 3]);
        assert_eq!(payloads, vec![1, 2, 3]);
        assert_eq!(sync.sequence(), 3);
        assert_eq!(sync.stats().bits_consumed, bits.len() as u64);
    }

    #[test]
    fn test_reset_drops_partial_frame() {
        let mut sync = synchronizer(16);
        sync.process(&[1; 4], &[SyncEvent::new(0, "pds_sync")], 0);
        assert_eq!(sync.pending_len(), 4);

        sync.reset();
        assert_eq!(sync.state(), SyncState::Searching);
        assert_eq!(sync.pending_len(), 0);

        let out = sync.process(&[1; 40], &[], 4);
        assert_eq!(out.consumed, 40);
        assert!(out.frame.is_none());
    }

    #[test]
    fn test_empty_batch() {
        let mut sync = synchronizer(8);
        let out = sync.process(&[], &[SyncEvent::new(0, "pds_sync")], 0);
        assert_eq!(out.consumed, 0);
        assert!(out.frame.is_none());
    }

    #[test]
    fn test_rejects_misaligned_config() {
        let config = SyncConfig {
            sync_tag: "pds_sync".into(),
            frame_len_bits: 570,
        };
        assert!(FrameSynchronizer::new(config).is_err());
    }
}
