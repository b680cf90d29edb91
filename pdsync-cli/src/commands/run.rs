use super::{
    count_matching, read_bits, read_events, write_json, FrameRecord, MessageRecord,
    RejectedRecord,
};
use anyhow::Result;
use colored::*;
use pdsync_core::{Pipeline, PipelineConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Serialize, Deserialize)]
pub struct RunStats {
    pub bits: usize,
    pub syncs_accepted: u64,
    pub partial_frames_discarded: u64,
    pub frames: usize,
    pub frames_rejected: usize,
    pub valid: usize,
    pub invalid: usize,
}

#[derive(Serialize, Deserialize)]
pub struct RunOutput {
    pub stats: RunStats,
    pub frames: Vec<FrameRecord>,
    pub valid: Vec<MessageRecord>,
    pub invalid: Vec<MessageRecord>,
    pub rejected: Vec<RejectedRecord>,
}

pub fn execute(
    config: &PipelineConfig,
    input: &str,
    events_path: &str,
    output: Option<&str>,
    biphase: bool,
) -> Result<()> {
    info!("Running pipeline on: {}", input);

    let bits = read_bits(input, biphase)?;
    let events = read_events(events_path)?;
    count_matching(&events, &config.sync.sync_tag);

    let mut pipeline = Pipeline::new(config.clone())?;
    let result = pipeline.run(&bits, &events, 0);

    for violation in &result.violations {
        warn!("{}", violation);
    }

    let sync_stats = pipeline.sync_stats();
    let extract_stats = pipeline.extract_stats();
    let stats = RunStats {
        bits: bits.len(),
        syncs_accepted: sync_stats.syncs_accepted,
        partial_frames_discarded: sync_stats.partial_frames_discarded,
        frames: result.frames.len(),
        frames_rejected: extract_stats.frames_rejected,
        valid: result.messages.valid.len(),
        invalid: result.messages.invalid.len(),
    };

    println!("\n=== Pipeline Results ===");
    println!("Bits:               {}", stats.bits);
    println!("Syncs accepted:     {}", stats.syncs_accepted);
    println!("Frames:             {}", stats.frames);
    println!("Valid messages:     {}", stats.valid.to_string().green());
    println!("Invalid messages:   {}", stats.invalid.to_string().yellow());

    println!("\n=== Summary ===");
    if stats.frames == 0 {
        println!("{} No frames synchronized", "✗".red());
    } else if stats.invalid == 0 && stats.frames_rejected == 0 {
        println!("{} All sub-messages carry a valid word sync", "✓".green());
    } else {
        println!(
            "{} {} sub-messages failed the word sync check",
            "!".yellow(),
            stats.invalid
        );
    }

    let report = RunOutput {
        stats,
        frames: result.frames.iter().map(FrameRecord::from).collect(),
        valid: result.messages.valid.iter().map(MessageRecord::from).collect(),
        invalid: result
            .messages
            .invalid
            .iter()
            .map(MessageRecord::from)
            .collect(),
        rejected: result.violations.iter().map(RejectedRecord::from).collect(),
    };

    if let Some(output_path) = output {
        write_json(output_path, &report)?;
    }

    Ok(())
}
