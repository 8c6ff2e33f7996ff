//! Bech32 chain addresses and their lock scripts.
//!
//! An address is a human-readable encoding of a lock script. Four payload
//! formats exist, selected by the first payload byte:
//!
//! | Byte | Format | Checksum | Payload |
//! |---|---|---|---|
//! | `0x00` | full | bech32m | `code_hash, hash_type, args` |
//! | `0x01` | short | bech32 | `code_hash_index, args` |
//! | `0x02` | full data | bech32 | `code_hash, args` (hash type `data`) |
//! | `0x04` | full type | bech32 | `code_hash, args` (hash type `type`) |
//!
//! The short and the two legacy full formats are accepted when parsing;
//! [`Address`] always displays in the full format.

use crate::core::script::{Script, ScriptHashType, UnknownHashType};
use crate::types::hash::{H256, HASH_LEN};
use bech32::{FromBase32, ToBase32, Variant};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Code hash of the default single-signature lock.
pub const SECP256K1_BLAKE160_CODE_HASH: H256 = H256([
    0x9b, 0xd7, 0xe0, 0x6f, 0x3e, 0xcf, 0x4b, 0xe0, 0xf2, 0xfc, 0xd2, 0x18, 0x8b, 0x23, 0xf1, 0xb9,
    0xfc, 0xc8, 0x8e, 0x5d, 0x4b, 0x65, 0xa8, 0x63, 0x7b, 0x17, 0x72, 0x3b, 0xbd, 0xa3, 0xcc, 0xe8,
]);

/// Code hash of the default multisig lock.
pub const SECP256K1_MULTISIG_CODE_HASH: H256 = H256([
    0x5c, 0x50, 0x69, 0xeb, 0x08, 0x57, 0xef, 0xc6, 0x5e, 0x1b, 0xca, 0x0c, 0x07, 0xdf, 0x34, 0xc3,
    0x16, 0x63, 0xb3, 0x62, 0x2f, 0xd3, 0x87, 0x6c, 0x87, 0x63, 0x20, 0xfc, 0x96, 0x34, 0xe2, 0xa8,
]);

/// Code hash of the anyone-can-pay lock on mainnet.
pub const ACP_MAINNET_CODE_HASH: H256 = H256([
    0xd3, 0x69, 0x59, 0x7f, 0xf4, 0x7f, 0x29, 0xfb, 0xc0, 0xd4, 0x7d, 0x2e, 0x37, 0x75, 0x37, 0x0d,
    0x12, 0x50, 0xb8, 0x51, 0x40, 0xc6, 0x70, 0xe4, 0x71, 0x8a, 0xf7, 0x12, 0x98, 0x3a, 0x23, 0x54,
]);

/// Code hash of the anyone-can-pay lock on testnet.
pub const ACP_TESTNET_CODE_HASH: H256 = H256([
    0x34, 0x19, 0xa1, 0xc0, 0x9e, 0xb2, 0x56, 0x7f, 0x65, 0x52, 0xee, 0x7a, 0x8e, 0xcf, 0xfd, 0x64,
    0x15, 0x5c, 0xff, 0xe0, 0xf1, 0x79, 0x6e, 0x6e, 0x61, 0xec, 0x08, 0x8d, 0x74, 0x0c, 0x13, 0x56,
]);

/// Length of a blake160 public key hash, the args of the short formats.
pub const BLAKE160_LEN: usize = 20;

const FORMAT_FULL: u8 = 0x00;
const FORMAT_SHORT: u8 = 0x01;
const FORMAT_FULL_DATA: u8 = 0x02;
const FORMAT_FULL_TYPE: u8 = 0x04;

const CODE_HASH_INDEX_SECP256K1: u8 = 0x00;
const CODE_HASH_INDEX_MULTISIG: u8 = 0x01;
const CODE_HASH_INDEX_ACP: u8 = 0x02;

/// Anyone-can-pay args may carry up to two extra minimum-amount bytes.
const ACP_MAX_ARGS_LEN: usize = BLAKE160_LEN + 2;

/// Chain an address belongs to, taken from its human-readable prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// Human-readable bech32 prefix.
    pub fn hrp(self) -> &'static str {
        match self {
            Network::Mainnet => "ckb",
            Network::Testnet => "ckt",
        }
    }

    /// Resolves a bech32 prefix to a network.
    pub fn from_hrp(hrp: &str) -> Option<Network> {
        match hrp {
            "ckb" => Some(Network::Mainnet),
            "ckt" => Some(Network::Testnet),
            _ => None,
        }
    }

    fn acp_code_hash(self) -> H256 {
        match self {
            Network::Mainnet => ACP_MAINNET_CODE_HASH,
            Network::Testnet => ACP_TESTNET_CODE_HASH,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "ckb" => Ok(Network::Mainnet),
            "testnet" | "ckt" => Ok(Network::Testnet),
            _ => Err(AddressError::UnknownNetwork(s.to_string())),
        }
    }
}

/// Errors produced while parsing an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The text is not valid bech32/bech32m.
    #[error("bech32 decoding failed: {0}")]
    Bech32(#[from] bech32::Error),
    /// The human-readable prefix names no known network.
    #[error("unknown address prefix: {0}")]
    UnknownPrefix(String),
    /// A network name in configuration is not recognized.
    #[error("unknown network: {0}")]
    UnknownNetwork(String),
    /// The address belongs to a network other than the configured one.
    #[error("address is for {actual}, expected {expected}")]
    NetworkMismatch { expected: Network, actual: Network },
    /// The decoded payload has no format byte.
    #[error("empty address payload")]
    EmptyPayload,
    /// The format byte is not one of the four known formats.
    #[error("unknown address format: {0:#04x}")]
    UnknownFormat(u8),
    /// The checksum variant does not match the payload format.
    #[error("address format {format:#04x} requires a {expected:?} checksum")]
    VariantMismatch { format: u8, expected: Variant },
    /// The short format names an unknown code hash.
    #[error("unknown code hash index: {0:#04x}")]
    UnknownCodeHashIndex(u8),
    /// The payload after the format byte is too short.
    #[error("invalid payload length {actual} for address format {format:#04x}")]
    InvalidLength { format: u8, actual: usize },
    /// The lock args length is not allowed for the short format's code hash.
    #[error("invalid lock args length {actual} for address format {format:#04x}")]
    InvalidArgsLength { format: u8, actual: usize },
    /// The full format carries an unknown hash type byte.
    #[error(transparent)]
    HashType(#[from] UnknownHashType),
}

/// A lock script bound to a network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    pub network: Network,
    pub script: Script,
}

impl Address {
    pub fn new(network: Network, script: Script) -> Self {
        Self { network, script }
    }

    /// Parses an address of any network.
    pub fn parse(address: &str) -> Result<Address, AddressError> {
        AddressParser::default().parse(address)
    }

    /// Consumes the address, returning its lock script.
    pub fn into_script(self) -> Script {
        self.script
    }

    fn full_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(1 + HASH_LEN + 1 + self.script.args.len());
        payload.push(FORMAT_FULL);
        payload.extend_from_slice(self.script.code_hash.as_slice());
        payload.push(self.script.hash_type.as_byte());
        payload.extend_from_slice(&self.script.args);
        payload
    }
}

impl fmt::Display for Address {
    /// Formats in the full (bech32m) format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = bech32::encode(
            self.network.hrp(),
            self.full_payload().to_base32(),
            Variant::Bech32m,
        )
        .map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

/// Parses addresses, optionally pinned to a single network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddressParser {
    network: Option<Network>,
}

impl AddressParser {
    /// Creates a parser that accepts any network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser that rejects addresses of other networks.
    pub fn for_network(network: Network) -> Self {
        Self {
            network: Some(network),
        }
    }

    /// Returns the pinned network, if any.
    pub fn network(&self) -> Option<Network> {
        self.network
    }

    /// Decodes an address string into its network and lock script.
    pub fn parse(&self, address: &str) -> Result<Address, AddressError> {
        let (hrp, data, variant) = bech32::decode(address)?;
        let network =
            Network::from_hrp(&hrp).ok_or_else(|| AddressError::UnknownPrefix(hrp.clone()))?;
        if let Some(expected) = self.network
            && expected != network
        {
            return Err(AddressError::NetworkMismatch {
                expected,
                actual: network,
            });
        }

        let payload = Vec::<u8>::from_base32(&data)?;
        let (&format, body) = payload.split_first().ok_or(AddressError::EmptyPayload)?;

        let script = match format {
            FORMAT_FULL => {
                expect_variant(format, variant, Variant::Bech32m)?;
                parse_full(format, body)?
            }
            FORMAT_SHORT => {
                expect_variant(format, variant, Variant::Bech32)?;
                parse_short(network, body)?
            }
            FORMAT_FULL_DATA => {
                expect_variant(format, variant, Variant::Bech32)?;
                parse_legacy_full(format, body, ScriptHashType::Data)?
            }
            FORMAT_FULL_TYPE => {
                expect_variant(format, variant, Variant::Bech32)?;
                parse_legacy_full(format, body, ScriptHashType::Type)?
            }
            other => return Err(AddressError::UnknownFormat(other)),
        };

        Ok(Address::new(network, script))
    }
}

fn expect_variant(format: u8, actual: Variant, expected: Variant) -> Result<(), AddressError> {
    if actual != expected {
        return Err(AddressError::VariantMismatch { format, expected });
    }
    Ok(())
}

fn split_code_hash(format: u8, body: &[u8]) -> Result<(H256, &[u8]), AddressError> {
    if body.len() < HASH_LEN {
        return Err(AddressError::InvalidLength {
            format,
            actual: body.len(),
        });
    }
    let (hash, rest) = body.split_at(HASH_LEN);
    let mut code_hash = [0u8; HASH_LEN];
    code_hash.copy_from_slice(hash);
    Ok((H256(code_hash), rest))
}

fn parse_full(format: u8, body: &[u8]) -> Result<Script, AddressError> {
    let (code_hash, rest) = split_code_hash(format, body)?;
    let (&hash_type, args) = rest.split_first().ok_or(AddressError::InvalidLength {
        format,
        actual: body.len(),
    })?;
    Ok(Script::new(
        code_hash,
        ScriptHashType::try_from(hash_type)?,
        args,
    ))
}

fn parse_legacy_full(
    format: u8,
    body: &[u8],
    hash_type: ScriptHashType,
) -> Result<Script, AddressError> {
    let (code_hash, args) = split_code_hash(format, body)?;
    Ok(Script::new(code_hash, hash_type, args))
}

fn parse_short(network: Network, body: &[u8]) -> Result<Script, AddressError> {
    let (&index, args) = body.split_first().ok_or(AddressError::InvalidLength {
        format: FORMAT_SHORT,
        actual: body.len(),
    })?;

    let (code_hash, args_valid) = match index {
        CODE_HASH_INDEX_SECP256K1 => (SECP256K1_BLAKE160_CODE_HASH, args.len() == BLAKE160_LEN),
        CODE_HASH_INDEX_MULTISIG => (SECP256K1_MULTISIG_CODE_HASH, args.len() == BLAKE160_LEN),
        CODE_HASH_INDEX_ACP => (
            network.acp_code_hash(),
            (BLAKE160_LEN..=ACP_MAX_ARGS_LEN).contains(&args.len()),
        ),
        other => return Err(AddressError::UnknownCodeHashIndex(other)),
    };
    if !args_valid {
        return Err(AddressError::InvalidArgsLength {
            format: FORMAT_SHORT,
            actual: args.len(),
        });
    }

    Ok(Script::new(code_hash, ScriptHashType::Type, args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::hex;

    const SHORT: &str = "ckb1qyqt8xaupvm8837nv3gtc9x0ekkj64vud3jqfwyw5v";
    const FULL: &str = "ckb1qzda0cr08m85hc8jlnfp3zer7xulejywt49kt2rr0vthywaa50xwsqdnnw7qkdnnclfkg59uzn8umtfd2kwxceqxwquc4";
    const ARGS: &str = "0xb39bbc0b3673c7d36450bc14cfcdad2d559c6c64";

    fn default_lock() -> Script {
        Script::new(
            SECP256K1_BLAKE160_CODE_HASH,
            ScriptHashType::Type,
            hex::decode(ARGS).unwrap(),
        )
    }

    #[test]
    fn parse_short_secp256k1() {
        let address = Address::parse(SHORT).unwrap();
        assert_eq!(address.network, Network::Mainnet);
        assert_eq!(address.script, default_lock());
    }

    #[test]
    fn parse_full_matches_short() {
        let full = Address::parse(FULL).unwrap();
        let short = Address::parse(SHORT).unwrap();
        assert_eq!(full, short);
    }

    #[test]
    fn display_uses_full_format() {
        let address = Address::new(Network::Mainnet, default_lock());
        assert_eq!(address.to_string(), FULL);
    }

    #[test]
    fn parse_testnet_short() {
        let address = Address::parse("ckt1qyqt8xaupvm8837nv3gtc9x0ekkj64vud3jq5t63cs").unwrap();
        assert_eq!(address.network, Network::Testnet);
        assert_eq!(address.script, default_lock());
    }

    #[test]
    fn parse_short_multisig() {
        let address = Address::parse("ckb1qyqm8xaupvm8837nv3gtc9x0ekkj64vud3jqaz46mc").unwrap();
        assert_eq!(address.script.code_hash, SECP256K1_MULTISIG_CODE_HASH);
        assert_eq!(address.script.args.as_slice(), default_lock().args.as_slice());
    }

    #[test]
    fn parse_legacy_full_data_and_type() {
        let data = Address::parse(
            "ckb1q2da0cr08m85hc8jlnfp3zer7xulejywt49kt2rr0vthywaa50xw3vumhs9nvu786dj9p0q5elx66t24n3kxgdwd2q8",
        )
        .unwrap();
        assert_eq!(data.script.hash_type, ScriptHashType::Data);
        assert_eq!(data.script.code_hash, SECP256K1_BLAKE160_CODE_HASH);

        let ty = Address::parse(
            "ckb1qjda0cr08m85hc8jlnfp3zer7xulejywt49kt2rr0vthywaa50xw3vumhs9nvu786dj9p0q5elx66t24n3kxgj53qks",
        )
        .unwrap();
        assert_eq!(ty.script, default_lock());
    }

    #[test]
    fn full_format_with_bech32_checksum_is_rejected() {
        let err = Address::parse(
            "ckb1qzda0cr08m85hc8jlnfp3zer7xulejywt49kt2rr0vthywaa50xwsqdnnw7qkdnnclfkg59uzn8umtfd2kwxceqnjssah",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AddressError::VariantMismatch {
                format: 0x00,
                expected: Variant::Bech32m
            }
        ));
    }

    #[test]
    fn short_format_with_bech32m_checksum_is_rejected() {
        let err = Address::parse("ckb1qyqt8xaupvm8837nv3gtc9x0ekkj64vud3jquj5z3w").unwrap_err();
        assert!(matches!(err, AddressError::VariantMismatch { format: 0x01, .. }));
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let mut corrupted = SHORT.to_string();
        corrupted.pop();
        corrupted.push('q');
        assert!(matches!(
            Address::parse(&corrupted),
            Err(AddressError::Bech32(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(Address::parse("not an address").is_err());
        assert!(Address::parse("").is_err());
    }

    #[test]
    fn unknown_prefix_is_rejected() {
        let encoded = bech32::encode(
            "btc",
            [FORMAT_SHORT, CODE_HASH_INDEX_SECP256K1].to_base32(),
            Variant::Bech32,
        )
        .unwrap();
        assert_eq!(
            Address::parse(&encoded),
            Err(AddressError::UnknownPrefix("btc".to_string()))
        );
    }

    #[test]
    fn unknown_format_and_index_are_rejected() {
        let encoded = bech32::encode("ckb", [0x07u8, 0x00].to_base32(), Variant::Bech32).unwrap();
        assert_eq!(
            Address::parse(&encoded),
            Err(AddressError::UnknownFormat(0x07))
        );

        let mut payload = vec![FORMAT_SHORT, 0x09];
        payload.extend_from_slice(&[0u8; BLAKE160_LEN]);
        let encoded = bech32::encode("ckb", payload.to_base32(), Variant::Bech32).unwrap();
        assert_eq!(
            Address::parse(&encoded),
            Err(AddressError::UnknownCodeHashIndex(0x09))
        );
    }

    #[test]
    fn short_args_length_is_checked() {
        let mut payload = vec![FORMAT_SHORT, CODE_HASH_INDEX_SECP256K1];
        payload.extend_from_slice(&[0u8; 19]);
        let encoded = bech32::encode("ckb", payload.to_base32(), Variant::Bech32).unwrap();
        assert_eq!(
            Address::parse(&encoded),
            Err(AddressError::InvalidArgsLength {
                format: FORMAT_SHORT,
                actual: 19
            })
        );
    }

    #[test]
    fn acp_short_accepts_minimum_amount_bytes() {
        let mut payload = vec![FORMAT_SHORT, CODE_HASH_INDEX_ACP];
        payload.extend_from_slice(&[0xAB; ACP_MAX_ARGS_LEN]);
        let encoded = bech32::encode("ckt", payload.to_base32(), Variant::Bech32).unwrap();
        let address = Address::parse(&encoded).unwrap();
        assert_eq!(address.script.code_hash, ACP_TESTNET_CODE_HASH);
        assert_eq!(address.script.args.len(), ACP_MAX_ARGS_LEN);
    }

    #[test]
    fn full_format_rejects_unknown_hash_type() {
        let mut payload = vec![FORMAT_FULL];
        payload.extend_from_slice(SECP256K1_BLAKE160_CODE_HASH.as_slice());
        payload.push(0x03);
        let encoded = bech32::encode("ckb", payload.to_base32(), Variant::Bech32m).unwrap();
        assert!(matches!(
            Address::parse(&encoded),
            Err(AddressError::HashType(_))
        ));
    }

    #[test]
    fn pinned_parser_rejects_other_network() {
        let parser = AddressParser::for_network(Network::Testnet);
        assert_eq!(
            parser.parse(SHORT),
            Err(AddressError::NetworkMismatch {
                expected: Network::Testnet,
                actual: Network::Mainnet
            })
        );
        assert!(AddressParser::for_network(Network::Mainnet).parse(SHORT).is_ok());
    }

    #[test]
    fn network_names_parse() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("CKT".parse::<Network>().unwrap(), Network::Testnet);
        assert!("devnet".parse::<Network>().is_err());
    }

    #[test]
    fn display_parse_roundtrip_with_data_args() {
        let script = Script::new(H256([7; 32]), ScriptHashType::Data2, vec![1u8, 2, 3]);
        let address = Address::new(Network::Testnet, script);
        assert_eq!(Address::parse(&address.to_string()).unwrap(), address);
    }
}
