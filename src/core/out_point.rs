//! Pointer to a specific transaction output.

use crate::types::encoding::{Encode, EncodeSink};
use crate::types::hash::H256;
use std::fmt;

/// A `(transaction hash, output index)` pair identifying one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct OutPoint {
    /// Hash of the transaction that created the output.
    pub tx_hash: H256,
    /// Position of the output within that transaction.
    pub index: u32,
}

impl OutPoint {
    pub fn new(tx_hash: H256, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

impl Encode for OutPoint {
    /// Writes `[tx_hash (32 bytes)][index (4 bytes, big-endian)]`.
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.tx_hash.encode(out);
        self.index.encode(out);
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_hash_then_big_endian_index() {
        let point = OutPoint::new(H256([0x11; 32]), 256);
        let bytes = point.to_bytes();
        assert_eq!(bytes.len(), 36);
        assert_eq!(&bytes[..32], &[0x11; 32]);
        assert_eq!(&bytes[32..], &[0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn display_joins_hash_and_index() {
        let point = OutPoint::new(H256::zero(), 3);
        assert!(point.to_string().ends_with("0000:3"));
        assert!(point.to_string().starts_with("0x"));
    }
}
