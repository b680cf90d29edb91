use super::{count_matching, read_bits, read_events, write_json, FrameRecord};
use anyhow::Result;
use pdsync_core::{synchronizer::FrameSynchronizer, PipelineConfig};
use tracing::info;

pub fn execute(
    config: &PipelineConfig,
    input: &str,
    events_path: &str,
    output: Option<&str>,
    biphase: bool,
    stats_only: bool,
) -> Result<()> {
    info!("Synchronizing bit stream: {}", input);

    let bits = read_bits(input, biphase)?;
    let events = read_events(events_path)?;
    let matching = count_matching(&events, &config.sync.sync_tag);
    info!(
        "Stream: {} bits, {} events ({} matching '{}')",
        bits.len(),
        events.len(),
        matching,
        config.sync.sync_tag
    );

    let mut synchronizer = FrameSynchronizer::new(config.sync.clone())?;
    let frames = synchronizer.drive(&bits, &events, 0);
    let stats = synchronizer.stats();

    println!("\n=== Sync Results ===");
    println!("Bits consumed:      {}", stats.bits_consumed);
    println!("Syncs accepted:     {}", stats.syncs_accepted);
    println!("Foreign events:     {}", stats.foreign_events);
    println!("Partial discarded:  {}", stats.partial_frames_discarded);
    println!("Frames emitted:     {}", stats.frames_emitted);
    println!("Pending bits:       {}", synchronizer.pending_len());
    println!();

    if stats_only {
        return Ok(());
    }

    let records: Vec<FrameRecord> = frames.iter().map(FrameRecord::from).collect();

    if let Some(output_path) = output {
        write_json(output_path, &records)?;
    } else {
        println!("=== Frames ===");
        for frame in &frames {
            println!("{}", frame);
        }
    }

    Ok(())
}
