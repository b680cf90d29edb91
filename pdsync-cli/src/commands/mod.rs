//! Subcommands and the file formats they share
//!
//! Bit files hold one byte per decoded bit (0 or 1). Event files are JSON
//! arrays of `{"offset": <bit>, "key": "<tag>"}`. Frames and sub-messages
//! are written as JSON with hex payloads.

pub mod extract;
pub mod run;
pub mod sync;

use anyhow::{Context, Result};
use pdsync_core::{
    line::decimate_biphase,
    types::{Frame, SubMessage, SyncEvent},
    PdsError, PipelineConfig,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read};
use tracing::{info, warn};

/// Frame as written to and read from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub sequence: u64,
    pub len: usize,
    pub hex: String,
}

impl From<&Frame> for FrameRecord {
    fn from(frame: &Frame) -> Self {
        Self {
            sequence: frame.sequence,
            len: frame.len(),
            hex: frame.to_hex(),
        }
    }
}

impl FrameRecord {
    /// Decode the hex payload back into a frame
    pub fn to_frame(&self) -> Result<Frame> {
        let payload = hex::decode(&self.hex)
            .with_context(|| format!("Frame {} has an invalid hex payload", self.sequence))?;
        Ok(Frame::from_slice(self.sequence, &payload))
    }
}

/// Sub-message as written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub sequence: u64,
    pub index: usize,
    pub classification: String,
    pub hex: String,
}

impl From<&SubMessage> for MessageRecord {
    fn from(message: &SubMessage) -> Self {
        Self {
            sequence: message.sequence,
            index: message.index,
            classification: message.classification.to_string(),
            hex: message.to_hex(),
        }
    }
}

/// Frame dropped by the extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub sequence: Option<u64>,
    pub error: String,
}

impl From<&PdsError> for RejectedRecord {
    fn from(err: &PdsError) -> Self {
        let sequence = match err {
            PdsError::PayloadLengthMismatch { sequence, .. } => Some(*sequence),
            _ => None,
        };
        Self {
            sequence,
            error: err.to_string(),
        }
    }
}

/// Load a pipeline config from JSON, or the defaults when no path is given
pub fn load_config(path: Option<&str>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path))?
        }
        None => PipelineConfig::default(),
    };

    config.validate().context("Invalid pipeline configuration")?;
    Ok(config)
}

/// Read a bit file (or stdin for `-`), optionally decimating Biphase-L symbols
pub fn read_bits(input: &str, biphase: bool) -> Result<Vec<u8>> {
    let raw = if input == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(input).with_context(|| format!("Failed to read input file: {}", input))?
    };

    let non_binary = raw.iter().filter(|&&b| b > 1).count();
    if non_binary > 0 {
        warn!(
            "{} samples are not 0/1; only the low bit of each is used",
            non_binary
        );
    }

    if biphase {
        let bits = decimate_biphase(&raw);
        info!("Decimated {} symbols into {} bits", raw.len(), bits.len());
        Ok(bits)
    } else {
        Ok(raw)
    }
}

/// Read a JSON array of sync events
pub fn read_events(path: &str) -> Result<Vec<SyncEvent>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read events file: {}", path))?;
    let events: Vec<SyncEvent> =
        serde_json::from_str(&content).with_context(|| "Failed to parse events JSON")?;
    Ok(events)
}

/// Read a JSON array of frames
pub fn read_frames(path: &str) -> Result<Vec<Frame>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read frames file: {}", path))?;
    let records: Vec<FrameRecord> =
        serde_json::from_str(&content).with_context(|| "Failed to parse frames JSON")?;

    records.iter().map(FrameRecord::to_frame).collect()
}

/// Serialize `value` as pretty JSON to `path`
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).with_context(|| "Failed to serialize output")?;
    fs::write(path, json).with_context(|| format!("Failed to write output file: {}", path))?;
    info!("Output written to: {}", path);
    Ok(())
}

/// Count events carrying `tag`, warning when none do
pub fn count_matching(events: &[SyncEvent], tag: &str) -> usize {
    let matching = events.iter().filter(|e| e.key == tag).count();
    if matching == 0 {
        warn!("No events with key '{}'; no frame can be synchronized", tag);
    }
    matching
}
