//! `0x`-prefixed lowercase hex codec.

use thiserror::Error;

/// Prefix carried by every encoded value.
pub const HEX_PREFIX: &str = "0x";

/// Errors produced when decoding hex text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    /// Digit count is odd, so the text does not describe whole bytes.
    #[error("odd number of hex digits: {0}")]
    OddLength(usize),
    /// A byte outside `[0-9a-fA-F]` was found at `index` of the input text.
    #[error("invalid hex byte {byte:#04x} at position {index}")]
    InvalidCharacter { byte: u8, index: usize },
    /// Decoded byte count differs from the fixed size requested.
    #[error("expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Encodes bytes as `0x` followed by lowercase hex digits.
///
/// Empty input encodes to `"0x"`.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    let bytes = bytes.as_ref();
    let mut out = String::with_capacity(HEX_PREFIX.len() + bytes.len() * 2);
    out.push_str(HEX_PREFIX);
    out.push_str(&hex::encode(bytes));
    out
}

/// Decodes hex text into raw bytes.
///
/// The `0x`/`0X` prefix is optional. Odd digit counts and non-hex characters
/// are rejected rather than padded or skipped.
pub fn decode(text: &str) -> Result<Vec<u8>, HexError> {
    let digits = strip_prefix(text);
    if digits.len() % 2 != 0 {
        return Err(HexError::OddLength(digits.len()));
    }
    hex::decode(digits).map_err(|err| map_error(err, text, digits))
}

/// Decodes hex text into a fixed-size array, failing on length mismatch.
pub fn decode_array<const N: usize>(text: &str) -> Result<[u8; N], HexError> {
    let digits = strip_prefix(text);
    if digits.len() % 2 != 0 {
        return Err(HexError::OddLength(digits.len()));
    }
    if digits.len() / 2 != N {
        return Err(HexError::LengthMismatch {
            expected: N,
            actual: digits.len() / 2,
        });
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|err| map_error(err, text, digits))?;
    Ok(out)
}

fn map_error(err: hex::FromHexError, text: &str, digits: &str) -> HexError {
    match err {
        hex::FromHexError::InvalidHexCharacter { index, .. } => {
            let index = index + (text.len() - digits.len());
            HexError::InvalidCharacter {
                byte: text.as_bytes()[index],
                index,
            }
        }
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            HexError::OddLength(digits.len())
        }
    }
}

fn strip_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_prefixed_lowercase() {
        assert_eq!(encode([0xABu8, 0xCD, 0x01]), "0xabcd01");
    }

    #[test]
    fn encode_empty() {
        assert_eq!(encode(b""), "0x");
    }

    #[test]
    fn decode_accepts_both_prefixes_and_none() {
        assert_eq!(decode("0xabcd").unwrap(), vec![0xAB, 0xCD]);
        assert_eq!(decode("0XABCD").unwrap(), vec![0xAB, 0xCD]);
        assert_eq!(decode("abcd").unwrap(), vec![0xAB, 0xCD]);
        assert!(decode("0x").unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_odd_length() {
        assert_eq!(decode("0xabc"), Err(HexError::OddLength(3)));
        assert_eq!(decode("not-hex"), Err(HexError::OddLength(7)));
    }

    #[test]
    fn decode_rejects_invalid_characters() {
        assert_eq!(
            decode("0xzz"),
            Err(HexError::InvalidCharacter {
                byte: b'z',
                index: 2
            })
        );
        assert_eq!(
            decode("a0zz"),
            Err(HexError::InvalidCharacter {
                byte: b'z',
                index: 2
            })
        );
    }

    #[test]
    fn invalid_non_ascii_reports_raw_byte() {
        let err = decode("0x\u{e4}bc").unwrap_err();
        assert_eq!(
            err,
            HexError::InvalidCharacter {
                byte: 0xc3,
                index: 2
            }
        );
        assert_eq!(err.to_string(), "invalid hex byte 0xc3 at position 2");
    }

    #[test]
    fn decode_array_checks_length() {
        let arr: [u8; 2] = decode_array("0x0102").unwrap();
        assert_eq!(arr, [1, 2]);
        assert_eq!(
            decode_array::<4>("0x0102"),
            Err(HexError::LengthMismatch {
                expected: 4,
                actual: 2
            })
        );
    }
}
