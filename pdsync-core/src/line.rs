//! Biphase-L line decoding by decimation
//!
//! Each decoded bit is carried by two half-bit symbols. This keeps the first
//! symbol of every pair, which is enough when the symbol stream is already
//! aligned to bit boundaries. It performs no clock recovery or error checking.

use crate::constants::BIPHASE_SYMBOLS_PER_BIT;
use alloc::vec::Vec;

/// Decimate an aligned Biphase-L symbol stream into bits
///
/// A trailing unpaired symbol is dropped.
pub fn decimate_biphase(symbols: &[u8]) -> Vec<u8> {
    symbols
        .chunks_exact(BIPHASE_SYMBOLS_PER_BIT)
        .map(|pair| pair[0] & 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_symbol_of_each_pair() {
        let symbols = [1, 0, 0, 1, 1, 0, 0, 1];
        assert_eq!(decimate_biphase(&symbols), vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_drops_odd_tail() {
        assert_eq!(decimate_biphase(&[1, 0, 1]), vec![1]);
        assert!(decimate_biphase(&[]).is_empty());
    }
}
