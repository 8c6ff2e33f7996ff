//! Segment encoding for item byte layouts.
//!
//! Item values are built by appending fixed segments (hashes, indices, flags,
//! payloads) to a sink. All encoded data uses **big-endian** byte order for
//! multi-byte integers, matching the record wire layout.
//!
//! # Binary Format
//!
//! - `u8`: single byte
//! - `u32`: 4 bytes, big-endian
//! - `[u8; N]` / `[u8]` / `Bytes`: raw bytes, no length prefix
//! - `str`: raw UTF-8 bytes, no length prefix
//! - Tuples: fields serialized sequentially
//!
//! Unlike a general purpose codec there is no length prefix anywhere: the
//! item types fix every segment boundary except the trailing payload.

use crate::types::bytes::Bytes;

/// Sink for writing encoded bytes.
///
/// Implemented by byte buffers and hashers so segments can be written
/// directly into the target without intermediate allocations.
pub trait EncodeSink {
    /// Writes the given bytes to the sink.
    fn write(&mut self, bytes: &[u8]);
}

/// Counter for computing encoded size without allocating memory.
///
/// Used by `Encode::to_bytes` to pre-allocate exact capacity before encoding.
#[derive(Default)]
pub struct SizeCounter {
    len: usize,
}

impl SizeCounter {
    /// Creates a new counter initialized to zero.
    pub fn new() -> Self {
        Self { len: 0 }
    }

    /// Returns the total number of bytes counted.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing has been counted yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl EncodeSink for SizeCounter {
    fn write(&mut self, bytes: &[u8]) {
        self.len += bytes.len();
    }
}

impl EncodeSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Trait for segments that can be written into an item layout.
pub trait Encode {
    /// Writes the binary representation to the given sink.
    fn encode<S: EncodeSink>(&self, out: &mut S);

    /// Serializes to a new byte buffer with exact capacity.
    ///
    /// Performs two passes: first to count bytes, then to encode.
    fn to_bytes(&self) -> Bytes {
        let mut counter = SizeCounter::new();
        self.encode(&mut counter);

        let mut out = Vec::with_capacity(counter.len());
        self.encode(&mut out);
        Bytes::from_vec(out)
    }
}

/// Encodes an output index as exactly 4 big-endian bytes.
pub fn index_to_be_bytes(index: u32) -> [u8; 4] {
    index.to_be_bytes()
}

/// Encodes a sequence of characters as UTF-8.
///
/// Sums each character's UTF-8 width first, allocates exactly that many bytes,
/// then writes the characters in order.
pub fn chars_to_utf8<I>(chars: I) -> Vec<u8>
where
    I: IntoIterator<Item = char>,
    I::IntoIter: Clone,
{
    let chars = chars.into_iter();
    let size: usize = chars.clone().map(char::len_utf8).sum();

    let mut out = vec![0u8; size];
    let mut count = 0;
    for c in chars {
        count += c.encode_utf8(&mut out[count..]).len();
    }
    out
}

impl Encode for u8 {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(&[*self]);
    }
}

impl Encode for u32 {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(&index_to_be_bytes(*self));
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(self);
    }
}

impl Encode for [u8] {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(self);
    }
}

impl Encode for Vec<u8> {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(self);
    }
}

impl Encode for str {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(self.as_bytes());
    }
}

impl Encode for Bytes {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(self.as_slice());
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        (**self).encode(out);
    }
}

// Tuples
impl<A: Encode, B: Encode> Encode for (A, B) {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.0.encode(out);
        self.1.encode(out);
    }
}

impl<A: Encode, B: Encode, C: Encode> Encode for (A, B, C) {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.0.encode(out);
        self.1.encode(out);
        self.2.encode(out);
    }
}

impl<A: Encode, B: Encode, C: Encode, D: Encode> Encode for (A, B, C, D) {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.0.encode(out);
        self.1.encode(out);
        self.2.encode(out);
        self.3.encode(out);
    }
}
