//! Fuzzing harness for pdsync-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_sync

use pdsync_core::{
    extractor::MessageExtractor,
    synchronizer::FrameSynchronizer,
    types::{Frame, SyncEvent},
    ExtractorConfig, SyncConfig,
};

/// Drive the synchronizer with arbitrary bits; the first bytes place sync events
pub fn fuzz_sync(data: &[u8]) {
    let Ok(mut sync) = FrameSynchronizer::new(SyncConfig::default()) else {
        return;
    };

    let events: Vec<SyncEvent> = data
        .iter()
        .take(4)
        .map(|&b| SyncEvent::new(b as u64 * 8, "pds_sync"))
        .collect();

    // Should never panic and never over-consume
    let mut pos = 0usize;
    while pos < data.len() {
        let end = (pos + 97).min(data.len());
        let out = sync.process(&data[pos..end], &events, pos as u64);
        assert!(out.consumed <= end - pos);
        if out.consumed == 0 {
            break;
        }
        pos += out.consumed;
    }
}

/// Extract arbitrary bytes as a frame payload
pub fn fuzz_extract(data: &[u8]) {
    let Ok(extractor) = MessageExtractor::new(ExtractorConfig::default()) else {
        return;
    };

    // Should either split or reject, never panic
    let frame = Frame::from_slice(1, data);
    let _ = extractor.extract(&frame);
}
