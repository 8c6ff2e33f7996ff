//! 32-byte hash type and the CKB Blake2b-256 hasher.

use crate::types::encoding::{Encode, EncodeSink};
use crate::types::hex::{self, HexError};
use blake2b_simd::{Params, State};
use std::fmt;
use std::str::FromStr;

/// Hash length in bytes.
pub const HASH_LEN: usize = 32;

/// Personalization string of the chain's default Blake2b instance.
pub const CKB_HASH_PERSONALIZATION: &[u8; 16] = b"ckb-default-hash";

/// Fixed-size 32-byte hash: transaction hashes, script code hashes and
/// script hashes all use this type.
///
/// `Copy` so out points and scripts can be passed around on the stack.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Ord, PartialOrd)]
pub struct H256(pub [u8; HASH_LEN]);

impl H256 {
    /// Creates a zero-valued hash (all bytes are 0x00).
    pub const fn zero() -> H256 {
        H256([0u8; HASH_LEN])
    }

    /// Returns the hash as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Creates a new Blake2b-256 builder for incremental hashing.
    pub fn blake2b() -> HashBuilder {
        HashBuilder::new()
    }
}

impl fmt::Display for H256 {
    /// Formats as `0x` followed by 64 lowercase hex digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self)
    }
}

impl FromStr for H256 {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode_array(s).map(H256)
    }
}

impl From<[u8; HASH_LEN]> for H256 {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        H256(bytes)
    }
}

impl AsRef<[u8]> for H256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Encode for H256 {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(&self.0);
    }
}

/// Incremental Blake2b-256 builder with the `ckb-default-hash` personalization.
///
/// Implements [`EncodeSink`] so encodable segments can be hashed directly
/// without intermediate byte buffers.
pub struct HashBuilder {
    state: State,
}

impl HashBuilder {
    /// Creates a new hash builder with empty state.
    pub fn new() -> Self {
        Self {
            state: Params::new()
                .hash_length(HASH_LEN)
                .personal(CKB_HASH_PERSONALIZATION)
                .to_state(),
        }
    }

    /// Feeds data into the hash computation.
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Consumes the builder and returns the final hash.
    pub fn finalize(self) -> H256 {
        let mut out = [0u8; HASH_LEN];
        out.copy_from_slice(self.state.finalize().as_bytes());
        H256(out)
    }
}

impl Default for HashBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeSink for HashBuilder {
    fn write(&mut self, bytes: &[u8]) {
        self.state.update(bytes);
    }
}

/// Hashes a byte slice in one call.
pub fn blake2b_256(data: impl AsRef<[u8]>) -> H256 {
    let mut h = H256::blake2b();
    h.update(data.as_ref());
    h.finalize()
}
