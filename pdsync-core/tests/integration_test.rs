//! Integration tests for the complete bits → frames → sub-messages flow

use pdsync_core::{
    line::decimate_biphase,
    packing::BitStreamBuilder,
    pipeline::Pipeline,
    synchronizer::FrameSynchronizer,
    types::{Classification, SyncEvent},
    PipelineConfig, SyncConfig,
};

fn sarp_frame(heads: [[u8; 2]; 3], fill: u8) -> Vec<u8> {
    let mut payload = Vec::with_capacity(72);
    for head in heads {
        payload.extend_from_slice(&head);
        payload.extend_from_slice(&[fill; 22]);
    }
    payload
}

#[test]
fn test_full_workflow_clean() {
    let (bits, events) = BitStreamBuilder::new()
        .noise(57)
        .sync_here("pds_sync")
        .bytes(&sarp_frame([[0xD6, 0x00]; 3], 0x11))
        .noise(200)
        .sync_here("pds_sync")
        .bytes(&sarp_frame([[0xD6, 0x01]; 3], 0x22))
        .noise(9)
        .build();

    let mut pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let output = pipeline.run(&bits, &events, 0);

    assert_eq!(output.frames.len(), 2);
    assert_eq!(output.frames[0].sequence, 1);
    assert_eq!(output.frames[1].sequence, 2);
    assert_eq!(output.messages.valid.len(), 6);
    assert!(output.messages.invalid.is_empty());

    let order: Vec<(u64, usize)> = output
        .messages
        .valid
        .iter()
        .map(|m| (m.sequence, m.index))
        .collect();
    assert_eq!(order, vec![(1, 0), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)]);
}

#[test]
fn test_workflow_with_corrupted_word_sync() {
    let (bits, events) = BitStreamBuilder::new()
        .noise(10)
        .sync_here("pds_sync")
        .bytes(&sarp_frame([[0xD6, 0x00], [0x56, 0x00], [0xD6, 0x80]], 0x33))
        .build();

    let mut pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let output = pipeline.run(&bits, &events, 0);

    assert_eq!(output.messages.valid.len(), 1);
    assert_eq!(output.messages.invalid.len(), 2);
    for message in &output.messages.invalid {
        assert_eq!(message.classification, Classification::Invalid);
        assert_eq!(message.payload.len(), 24);
    }
}

#[test]
fn test_truncated_stream_emits_nothing() {
    let (bits, events) = BitStreamBuilder::new()
        .sync_here("pds_sync")
        .bytes(&sarp_frame([[0xD6, 0x00]; 3], 0))
        .build();

    let mut sync = FrameSynchronizer::new(SyncConfig::default()).unwrap();
    let frames = sync.drive(&bits[..500], &events, 0);

    assert!(frames.is_empty());
    assert_eq!(sync.pending_len(), 500);
}

#[test]
fn test_resync_mid_frame_discards_partial() {
    let good = sarp_frame([[0xD6, 0x0C]; 3], 0x44);
    let (bits, mut events) = BitStreamBuilder::new()
        .sync_here("pds_sync")
        .noise(300)
        .build();
    let (tail, _) = BitStreamBuilder::new().bytes(&good).build();

    let mut sync = FrameSynchronizer::new(SyncConfig::default()).unwrap();
    let first = sync.process(&bits, &events, 0);
    assert_eq!(first.consumed, 300);
    assert!(first.frame.is_none());

    events.clear();
    events.push(SyncEvent::new(300, "pds_sync"));
    let second = sync.process(&tail, &events, 300);

    assert_eq!(second.consumed, 576);
    assert_eq!(second.frame.unwrap().payload.as_ref(), good.as_slice());
    assert_eq!(sync.stats().partial_frames_discarded, 1);
}

#[test]
fn test_biphase_symbols_through_pipeline() {
    let payload = sarp_frame([[0xD6, 0x00], [0x00, 0x00], [0xD6, 0x00]], 0x5A);
    let (bits, events) = BitStreamBuilder::new()
        .noise(40)
        .sync_here("pds_sync")
        .bytes(&payload)
        .build();

    // Biphase-L: 1 -> (1, 0), 0 -> (0, 1)
    let symbols: Vec<u8> = bits.iter().flat_map(|&b| [b, b ^ 1]).collect();
    let decoded = decimate_biphase(&symbols);
    assert_eq!(decoded, bits);

    let mut pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let output = pipeline.run(&decoded, &events, 0);

    assert_eq!(output.frames.len(), 1);
    assert_eq!(output.messages.valid.len(), 2);
    assert_eq!(output.messages.invalid.len(), 1);
}
