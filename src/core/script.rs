//! Lock/type scripts and their molecule serialization.

use crate::types::bytes::Bytes;
use crate::types::hash::{H256, HashBuilder};
use std::fmt;
use std::io::{Result, Write};
use std::str::FromStr;
use thiserror::Error;

/// Size in bytes of a molecule `u32` (total size, offsets, vector lengths).
const NUMBER_SIZE: usize = 4;

/// Number of fields in the `Script` table.
const SCRIPT_FIELD_COUNT: usize = 3;

/// How a script's `code_hash` is matched against cell data or type scripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ScriptHashType {
    /// Matches the data hash of a cell, first VM version.
    #[default]
    Data,
    /// Matches the type script hash of a cell.
    Type,
    /// Matches the data hash of a cell, VM version 1.
    Data1,
    /// Matches the data hash of a cell, VM version 2.
    Data2,
}

/// Raised for hash type bytes or names outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown script hash type: {0}")]
pub struct UnknownHashType(pub String);

impl ScriptHashType {
    /// Returns the single-byte molecule representation.
    pub fn as_byte(self) -> u8 {
        match self {
            ScriptHashType::Data => 0,
            ScriptHashType::Type => 1,
            ScriptHashType::Data1 => 2,
            ScriptHashType::Data2 => 4,
        }
    }
}

impl TryFrom<u8> for ScriptHashType {
    type Error = UnknownHashType;

    fn try_from(byte: u8) -> std::result::Result<Self, Self::Error> {
        match byte {
            0 => Ok(ScriptHashType::Data),
            1 => Ok(ScriptHashType::Type),
            2 => Ok(ScriptHashType::Data1),
            4 => Ok(ScriptHashType::Data2),
            other => Err(UnknownHashType(format!("{other:#04x}"))),
        }
    }
}

impl FromStr for ScriptHashType {
    type Err = UnknownHashType;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "data" => Ok(ScriptHashType::Data),
            "type" => Ok(ScriptHashType::Type),
            "data1" => Ok(ScriptHashType::Data1),
            "data2" => Ok(ScriptHashType::Data2),
            _ => Err(UnknownHashType(s.to_string())),
        }
    }
}

impl fmt::Display for ScriptHashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScriptHashType::Data => "data",
            ScriptHashType::Type => "type",
            ScriptHashType::Data1 => "data1",
            ScriptHashType::Data2 => "data2",
        };
        f.write_str(name)
    }
}

/// A lock or type script attached to a cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Script {
    /// Hash identifying the script code.
    pub code_hash: H256,
    /// How `code_hash` is interpreted.
    pub hash_type: ScriptHashType,
    /// Script arguments; for default locks this is the public key hash.
    pub args: Bytes,
}

impl Script {
    pub fn new(code_hash: H256, hash_type: ScriptHashType, args: impl Into<Bytes>) -> Self {
        Self {
            code_hash,
            hash_type,
            args: args.into(),
        }
    }
}

/// Adapter that implements `Write` by feeding bytes directly into a hash builder.
struct HasherWriter<'a>(&'a mut HashBuilder);

impl Write for HasherWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Types with a canonical molecule serialization that can be hashed.
pub trait Molecule {
    /// Writes the molecule serialization to the provided writer.
    fn serialize<W: Write>(&self, w: W) -> Result<()>;

    /// Computes the Blake2b-256 hash of the serialization.
    ///
    /// Streams into the hasher without an intermediate buffer. The only
    /// failure source is `serialize` itself.
    fn hash(&self) -> Result<H256> {
        let mut hasher = H256::blake2b();
        self.serialize(HasherWriter(&mut hasher))?;
        Ok(hasher.finalize())
    }
}

impl Molecule for Script {
    /// Serializes as a molecule table:
    /// `[total_size][offset × 3][code_hash][hash_type][args_len][args]`,
    /// all numbers little-endian `u32`.
    fn serialize<W: Write>(&self, mut w: W) -> Result<()> {
        let header_size = NUMBER_SIZE * (1 + SCRIPT_FIELD_COUNT);
        let code_hash_offset = header_size;
        let hash_type_offset = code_hash_offset + self.code_hash.as_slice().len();
        let args_offset = hash_type_offset + 1;
        let total_size = args_offset + NUMBER_SIZE + self.args.len();

        for number in [total_size, code_hash_offset, hash_type_offset, args_offset] {
            w.write_all(&molecule_number(number)?)?;
        }
        w.write_all(self.code_hash.as_slice())?;
        w.write_all(&[self.hash_type.as_byte()])?;
        w.write_all(&molecule_number(self.args.len())?)?;
        w.write_all(&self.args)?;
        Ok(())
    }
}

fn molecule_number(n: usize) -> Result<[u8; NUMBER_SIZE]> {
    u32::try_from(n)
        .map(u32::to_le_bytes)
        .map_err(|_| std::io::Error::other("molecule size exceeds u32"))
}
