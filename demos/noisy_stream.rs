//! Streaming example: random bit errors, a foreign tag and an interrupted frame

use pdsync_core::{
    packing::BitStreamBuilder, types::SyncEvent, Pipeline, PipelineConfig,
};
use rand::{Rng, SeedableRng};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("pdsync Noisy Stream Example\n");

    let mut frame = [0x5Au8; 72];
    for slot in 0..3 {
        frame[slot * 24] = 0xD6;
        frame[slot * 24 + 1] = 0x03;
    }

    let (mut bits, mut events) = BitStreamBuilder::new()
        .noise(100)
        .sync_here("pds_sync")
        .noise(200) // short burst; a later sync in the next batch supersedes it
        .sync_here("pds_sync")
        .bytes(&frame)
        .noise(50)
        .sync_here("pds_sync")
        .bytes(&frame)
        .noise(30)
        .build();
    events.push(SyncEvent::new(40, "time_sync"));

    // Flip a few bits in the second frame's first sub-message
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let second = events[2].offset as usize;
    for _ in 0..3 {
        let at = second + rng.gen_range(0..16);
        bits[at] ^= 1;
    }

    // Feed in arbitrary batches, re-delivering whatever was not consumed
    let mut pipeline = Pipeline::new(PipelineConfig::default())?;
    let mut pos = 0usize;
    while pos < bits.len() {
        let end = (pos + rng.gen_range(32..400)).min(bits.len());
        let batch: Vec<SyncEvent> = events
            .iter()
            .filter(|e| e.offset >= pos as u64 && e.offset < end as u64)
            .cloned()
            .collect();

        let output = pipeline.process(&bits[pos..end], &batch, pos as u64);
        pos += output.consumed;

        for frame in &output.frames {
            println!("{}", frame);
        }
        for message in output
            .messages
            .valid
            .iter()
            .chain(output.messages.invalid.iter())
        {
            println!(
                "  frame {} msg {} -> {}",
                message.sequence, message.index, message.classification
            );
        }
    }

    let stats = pipeline.sync_stats();
    println!("\nSyncs accepted:          {}", stats.syncs_accepted);
    println!("Partial frames dropped:  {}", stats.partial_frames_discarded);
    println!("Foreign events:          {}", stats.foreign_events);
    println!("Frames emitted:          {}", stats.frames_emitted);

    Ok(())
}
