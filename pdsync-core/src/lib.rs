//! # pdsync Core
//!
//! Frame synchronization and sub-message extraction for decoded PDS
//! telemetry bit streams.
//!
//! ## Modules
//!
//! - `constants`: Observed frame layout and defaults
//! - `config`: Construction-time configuration and validation
//! - `types`: Core types (SyncEvent, Frame, SubMessage, Classification)
//! - `packing`: MSB-first bit packing and synthetic bit streams
//! - `synchronizer`: Tag-driven frame capture
//! - `extractor`: Sub-message splitting and word sync classification
//! - `line`: Biphase-L decimation
//! - `pipeline`: Synchronizer and extractor wired together

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod line;
pub mod packing;
pub mod pipeline;
pub mod synchronizer;
pub mod types;

// Re-export commonly used types
pub use config::{ExtractorConfig, PipelineConfig, SyncConfig, SyncPattern};
pub use error::PdsError;
pub use extractor::{classify, MessageExtractor, Routed};
pub use pipeline::{Pipeline, PipelineOutput};
pub use synchronizer::{FrameSynchronizer, SyncState};
pub use types::{Classification, Frame, SubMessage, SyncEvent, SyncOutput};

/// Result type alias for pdsync operations
pub type Result<T> = core::result::Result<T, PdsError>;
