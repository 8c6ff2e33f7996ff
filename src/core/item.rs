//! Tagged identifiers for addresses, identities and records.
//!
//! An [`Item`] pairs an [`ItemType`] with a `0x`-prefixed hex value whose byte
//! layout depends on the type:
//!
//! | Type | Layout |
//! |---|---|
//! | `Address` | the raw address string, not hex encoded |
//! | `Identity` | `[flag][public key or lock args]` |
//! | `Record` | `[tx_hash (32)][index (4, big-endian)][sub-flag][payload]` |
//!
//! Record payloads are either the ASCII text of the first 20 hex digits of a
//! script hash (sub-flag `0x01`) or the UTF-8 bytes of an address (sub-flag
//! `0x00`).

use crate::core::address::{AddressError, AddressParser};
use crate::core::out_point::OutPoint;
use crate::core::script::Molecule;
use crate::types::encoding::{Encode, EncodeSink, chars_to_utf8};
use crate::types::hex::{self, HEX_PREFIX, HexError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identity flag for keys of the chain's default signature scheme.
pub const IDENTITY_FLAG_CKB: u8 = 0x00;

/// Record sub-flag: the payload is derived from the owning script's hash.
pub const RECORD_FLAG_SCRIPT: u8 = 0x01;

/// Record sub-flag: the payload is the owning address text.
pub const RECORD_FLAG_ADDRESS: u8 = 0x00;

/// Number of script hash hex digits kept in a script record.
///
/// The digits themselves are stored as text, so the payload is 20 bytes long
/// and covers only 10 bytes of the hash. Consumers rely on this exact layout.
pub const RECORD_SCRIPT_HASH_DIGITS: usize = 20;

/// Discriminant of an [`Item`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Address,
    Identity,
    Record,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Address => write!(f, "Address"),
            ItemType::Identity => write!(f, "Identity"),
            ItemType::Record => write!(f, "Record"),
        }
    }
}

/// Errors raised while building an [`Item`].
#[derive(Debug, Error)]
pub enum ItemError {
    /// Hex input (a public key) is malformed.
    #[error("invalid hex input: {0}")]
    HexDecode(#[from] HexError),
    /// The address could not be parsed into a lock script.
    #[error("invalid address: {0}")]
    AddressParse(#[from] AddressError),
    /// The script could not be hashed.
    #[error("script hashing failed: {0}")]
    ScriptHash(#[source] std::io::Error),
}

/// A tagged, serialized reference to an address, identity or record.
///
/// Immutable once built; serializes to JSON as `{"type": ..., "value": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    item_type: ItemType,
    value: String,
}

impl Item {
    /// Wraps an address string unchanged.
    ///
    /// No validation is performed; any string, including the empty one, is
    /// accepted.
    pub fn address(addr: impl Into<String>) -> Item {
        Item {
            item_type: ItemType::Address,
            value: addr.into(),
        }
    }

    /// Builds an identity from a hex-encoded public key.
    pub fn identity_by_ckb(pub_key_hex: &str) -> Result<Item, ItemError> {
        let pub_key = hex::decode(pub_key_hex)?;
        Ok(Item::identity(IDENTITY_FLAG_CKB, &pub_key))
    }

    /// Builds an identity from the lock args of an address on any network.
    pub fn identity_by_address(address: &str) -> Result<Item, ItemError> {
        Item::identity_by_address_with(&AddressParser::default(), address)
    }

    /// Builds an identity from the lock args of an address, using `parser`.
    pub fn identity_by_address_with(
        parser: &AddressParser,
        address: &str,
    ) -> Result<Item, ItemError> {
        let script = parser.parse(address)?.into_script();
        Ok(Item::identity(IDENTITY_FLAG_CKB, &script.args))
    }

    /// Builds a record owned by `script`.
    ///
    /// The payload is the first 20 hex digits of the script hash, stored as
    /// text rather than as raw hash bytes.
    pub fn record_by_script<S: Molecule + ?Sized>(
        point: &OutPoint,
        script: &S,
    ) -> Result<Item, ItemError> {
        let hash = script.hash().map_err(ItemError::ScriptHash)?;
        let text = hex::encode(hash);
        let digits = text[HEX_PREFIX.len()..]
            .chars()
            .take(RECORD_SCRIPT_HASH_DIGITS);
        let payload = chars_to_utf8(digits);

        Ok(Item::record(point, RECORD_FLAG_SCRIPT, &payload))
    }

    /// Builds a record owned by `address`, stored as its raw UTF-8 bytes.
    pub fn record_by_address(point: &OutPoint, address: &str) -> Item {
        Item::record(point, RECORD_FLAG_ADDRESS, address.as_bytes())
    }

    /// Returns the item's discriminant.
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Returns the encoded value.
    pub fn value(&self) -> &str {
        &self.value
    }

    fn identity(flag: u8, key: &[u8]) -> Item {
        Item {
            item_type: ItemType::Identity,
            value: hex::encode(IdentityLayout { flag, key }.to_bytes()),
        }
    }

    fn record(point: &OutPoint, flag: u8, payload: &[u8]) -> Item {
        Item {
            item_type: ItemType::Record,
            value: hex::encode(
                RecordLayout {
                    point,
                    flag,
                    payload,
                }
                .to_bytes(),
            ),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.item_type, self.value)
    }
}

/// `[flag][key]`
struct IdentityLayout<'a> {
    flag: u8,
    key: &'a [u8],
}

impl Encode for IdentityLayout<'_> {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        (self.flag, self.key).encode(out);
    }
}

/// `[tx_hash][index BE][flag][payload]`
struct RecordLayout<'a> {
    point: &'a OutPoint,
    flag: u8,
    payload: &'a [u8],
}

impl Encode for RecordLayout<'_> {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        (self.point, self.flag, self.payload).encode(out);
    }
}
