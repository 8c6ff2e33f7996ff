//! Byte-level building blocks.
//!
//! - `H256`: fixed-size 32-byte hashes and the Blake2b-256 builder
//! - `Encode`: segment encoding with exact-capacity output
//! - `hex`: `0x`-prefixed hex codec

pub mod bytes;
pub mod encoding;
pub mod hash;
pub mod hex;
