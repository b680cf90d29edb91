//! Bit packing helpers and a builder for synthetic bit streams
//!
//! Upstream delivers unpacked bits: one byte per bit, value in the least
//! significant bit. Packing is MSB-first, so the first bit of a group of
//! eight lands in bit 7 of the output byte.

use crate::constants::BITS_PER_BYTE;
use crate::types::SyncEvent;
use alloc::string::String;
use alloc::vec::Vec;
use bytes::{BufMut, Bytes, BytesMut};

/// Pack unpacked bits into bytes, MSB-first
///
/// Only the least significant bit of each input byte is used. A short
/// final group is padded with zero bits on the right.
pub fn pack_bits(bits: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(bits.len().div_ceil(BITS_PER_BYTE));

    for group in bits.chunks(BITS_PER_BYTE) {
        let mut byte = 0u8;
        for &bit in group {
            byte = (byte << 1) | (bit & 1);
        }
        byte <<= BITS_PER_BYTE - group.len();
        buf.put_u8(byte);
    }

    buf.freeze()
}

/// Expand bytes into unpacked bits, MSB-first
pub fn unpack_bytes(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * BITS_PER_BYTE);
    for byte in data {
        for shift in (0..BITS_PER_BYTE).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Builder for unpacked bit streams with sync events at known offsets
///
/// Each call appends to the stream; [`BitStreamBuilder::sync_here`] records
/// an event on the bit appended next, which is where the synchronizer
/// starts copying.
#[derive(Debug, Clone, Default)]
pub struct BitStreamBuilder {
    bits: Vec<u8>,
    events: Vec<SyncEvent>,
}

impl BitStreamBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` copies of `bit`
    pub fn fill(mut self, bit: u8, count: usize) -> Self {
        self.bits.extend(core::iter::repeat(bit & 1).take(count));
        self
    }

    /// Append an alternating 0/1 filler of `count` bits
    pub fn noise(mut self, count: usize) -> Self {
        self.bits.extend((0..count).map(|i| (i % 2) as u8));
        self
    }

    /// Append raw unpacked bits
    pub fn bits(mut self, bits: &[u8]) -> Self {
        self.bits.extend(bits.iter().map(|b| b & 1));
        self
    }

    /// Append bytes, unpacked MSB-first
    pub fn bytes(mut self, data: &[u8]) -> Self {
        self.bits.extend(unpack_bytes(data));
        self
    }

    /// Record a sync event with `key` at the next bit position
    pub fn sync_here(mut self, key: impl Into<String>) -> Self {
        let offset = self.bits.len() as u64;
        self.events.push(SyncEvent::new(offset, key));
        self
    }

    /// Current stream length in bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True if no bits have been appended
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Finish and return the bits and events
    pub fn build(self) -> (Vec<u8>, Vec<SyncEvent>) {
        (self.bits, self.events)
    }
}
