//! Constants and defaults for PDS frame synchronization

/// Tag key raised by the upstream correlator on the last bit of the frame sync word
pub const DEFAULT_SYNC_TAG: &str = "pds_sync";

/// Frame length in bits captured after the sync tag (frame minus frame sync bits)
pub const FRAME_LEN_BITS: usize = 576;

/// Number of bits packed into each output byte
pub const BITS_PER_BYTE: usize = 8;

/// Upper bound on a configured frame length.
/// Keeps the accumulation arena at a sane size when configs come from files.
pub const MAX_FRAME_LEN_BITS: usize = 65_536;

/// Number of SARP sub-messages carried by one PDS frame
pub const SUBMESSAGE_COUNT: usize = 3;

/// Size of one SARP sub-message in bytes
pub const SUBMESSAGE_SIZE: usize = 24;

/// First byte of the 12-bit word sync `0xD60`
pub const SYNC_BYTE: u8 = 0xD6;

/// Mask applied to the second byte: only the high nibble belongs to the word sync
pub const SYNC_MASK: u8 = 0xF0;

/// Expected value of the masked second byte
pub const SYNC_EXPECTED: u8 = 0x00;

/// Line-code symbols per decoded bit for Biphase-L
pub const BIPHASE_SYMBOLS_PER_BIT: usize = 2;
