use super::{read_frames, write_json, MessageRecord, RejectedRecord};
use anyhow::Result;
use colored::*;
use pdsync_core::{extractor::MessageExtractor, PipelineConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Serialize, Deserialize)]
pub struct ExtractOutput {
    pub valid: Vec<MessageRecord>,
    pub invalid: Vec<MessageRecord>,
    pub rejected: Vec<RejectedRecord>,
}

pub fn execute(config: &PipelineConfig, input: &str, output: Option<&str>) -> Result<()> {
    info!("Extracting sub-messages from: {}", input);

    let frames = read_frames(input)?;
    info!("Loaded {} frames", frames.len());

    let extractor = MessageExtractor::new(config.extractor)?;
    let (routed, violations, stats) = extractor.extract_all(&frames);

    for violation in &violations {
        warn!("{}", violation);
    }

    println!("\n=== Extraction Results ===");
    println!("Frames processed:   {}", stats.frames_processed);
    if stats.frames_rejected > 0 {
        println!(
            "Frames rejected:    {}",
            stats.frames_rejected.to_string().red()
        );
    } else {
        println!("Frames rejected:    {}", stats.frames_rejected);
    }
    println!("Valid messages:     {}", stats.valid.to_string().green());
    println!("Invalid messages:   {}", stats.invalid.to_string().yellow());
    println!("Valid rate:         {:.2}%", stats.valid_rate());
    println!();

    let result = ExtractOutput {
        valid: routed.valid.iter().map(MessageRecord::from).collect(),
        invalid: routed.invalid.iter().map(MessageRecord::from).collect(),
        rejected: violations.iter().map(RejectedRecord::from).collect(),
    };

    if let Some(output_path) = output {
        write_json(output_path, &result)?;
    } else {
        for record in result.valid.iter().chain(result.invalid.iter()) {
            println!(
                "[{}.{}] {:<7} {}",
                record.sequence, record.index, record.classification, record.hex
            );
        }
    }

    Ok(())
}
