//! Bech32 text encoding for Avalanche addresses
//!
//! A Bech32 string is `hrp + "1" + data`, where `data` is the payload repacked
//! into 5-bit groups followed by a 6-group BCH checksum. The checksum and
//! alphabet come from the `bech32` crate; this module adds the address-level
//! rules: the 90-character limit, case handling and the expected prefix.

use bech32::primitives::decode::{CharError, CheckedHrpstring, CheckedHrpstringError, UncheckedHrpstringError};
use bech32::{Bech32, Hrp};

use crate::error::{EncodingError, Result};

/// Maximum length of an encoded string
pub const MAX_LENGTH: usize = 90;

/// Number of 5-bit checksum groups
const CHECKSUM_LENGTH: usize = 6;

fn parse_hrp(hrp: &str) -> Result<Hrp> {
    if hrp.is_empty() {
        return Err(EncodingError::InvalidLength(0).into());
    }
    Hrp::parse(hrp).map_err(|e| EncodingError::MalformedInput(format!("invalid hrp {:?}: {}", hrp, e)).into())
}

fn decode_error(err: CheckedHrpstringError) -> EncodingError {
    match err {
        CheckedHrpstringError::Parse(UncheckedHrpstringError::Char(err)) => match err {
            CharError::MissingSeparator => EncodingError::MissingSeparator,
            CharError::NothingAfterSeparator => EncodingError::InvalidLength(0),
            CharError::InvalidChar(c) => EncodingError::InvalidCharacter(c),
            CharError::MixedCase => EncodingError::MixedCase,
            other => EncodingError::MalformedInput(other.to_string()),
        },
        CheckedHrpstringError::Checksum(_) => EncodingError::InvalidChecksum,
        other => EncodingError::MalformedInput(other.to_string()),
    }
}

/// Encode a payload under a human-readable prefix
pub fn encode(hrp: &str, payload: &[u8]) -> Result<String> {
    let parsed = parse_hrp(hrp)?;

    let length = hrp.len() + 1 + (payload.len() * 8 + 4) / 5 + CHECKSUM_LENGTH;
    if length > MAX_LENGTH {
        return Err(EncodingError::InvalidLength(length).into());
    }

    bech32::encode::<Bech32>(parsed, payload).map_err(|e| EncodingError::MalformedInput(e.to_string()).into())
}

/// Decode a string, requiring the given human-readable prefix
pub fn decode(expected_hrp: &str, text: &str) -> Result<Vec<u8>> {
    if text.len() > MAX_LENGTH {
        return Err(EncodingError::InvalidLength(text.len()).into());
    }

    let has_lower = text.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = text.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(EncodingError::MixedCase.into());
    }

    let checked = CheckedHrpstring::new::<Bech32>(text).map_err(decode_error)?;

    let hrp = checked.hrp().to_lowercase();
    if hrp != expected_hrp.to_ascii_lowercase() {
        return Err(EncodingError::WrongPrefix {
            expected: expected_hrp.to_string(),
            found: hrp,
        }
        .into());
    }

    Ok(checked.byte_iter().collect())
}

/// Decode an address string, additionally requiring the payload length
pub fn decode_address(expected_hrp: &str, text: &str, expected_len: usize) -> Result<Vec<u8>> {
    let payload = decode(expected_hrp, text)?;
    if payload.len() != expected_len {
        return Err(EncodingError::InvalidLength(payload.len()).into());
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;

    const ADDRESS: &str = "avax1escwyq2hsznvwth6au3gpc77f225uacvwldgal";
    const PAYLOAD: &str = "cc30e2015780a6c72efaef2280e3de4a954e770c";

    #[test]
    fn test_encode_known_address() {
        let payload = hex::decode(PAYLOAD).unwrap();
        assert_eq!(encode("avax", &payload).unwrap(), ADDRESS);
    }

    #[test]
    fn test_decode_known_address() {
        let payload = decode_address("avax", ADDRESS, 20).unwrap();
        assert_eq!(hex::encode(payload), PAYLOAD);

        let upper = ADDRESS.to_uppercase();
        assert_eq!(hex::encode(decode("avax", &upper).unwrap()), PAYLOAD);
    }

    #[test]
    fn test_decode_flipped_checksum_character() {
        let mut corrupted = ADDRESS.to_string();
        corrupted.pop();
        corrupted.push('m');
        assert_eq!(
            decode("avax", &corrupted),
            Err(Error::Encoding(EncodingError::InvalidChecksum))
        );
    }

    #[test]
    fn test_decode_rejects_bech32m_checksum() {
        let payload = hex::decode(PAYLOAD).unwrap();
        let hrp = Hrp::parse("avax").unwrap();
        let bech32m = bech32::encode::<bech32::Bech32m>(hrp, &payload).unwrap();
        assert_eq!(
            decode("avax", &bech32m),
            Err(Error::Encoding(EncodingError::InvalidChecksum))
        );
    }

    #[test]
    fn test_decode_wrong_prefix() {
        assert!(matches!(
            decode("fuji", ADDRESS),
            Err(Error::Encoding(EncodingError::WrongPrefix { .. }))
        ));
    }

    #[test]
    fn test_decode_missing_separator() {
        assert_eq!(
            decode("avax", "avaxescwyq2hsznvwth6au"),
            Err(Error::Encoding(EncodingError::MissingSeparator))
        );
    }

    #[test]
    fn test_decode_invalid_character() {
        // 'b' is not part of the data alphabet
        let corrupted = ADDRESS.replacen("escw", "escb", 1);
        assert_eq!(
            decode("avax", &corrupted),
            Err(Error::Encoding(EncodingError::InvalidCharacter('b')))
        );
    }

    #[test]
    fn test_decode_mixed_case() {
        let mixed = format!("AVAX{}", &ADDRESS[4..]);
        assert_eq!(decode("avax", &mixed), Err(Error::Encoding(EncodingError::MixedCase)));
    }

    #[test]
    fn test_decode_address_wrong_length() {
        let encoded = encode("avax", &[1u8; 32]).unwrap();
        assert_eq!(
            decode_address("avax", &encoded, 20),
            Err(Error::Encoding(EncodingError::InvalidLength(32)))
        );
    }

    #[test]
    fn test_encode_too_long() {
        assert!(matches!(
            encode("avax", &[0u8; 60]),
            Err(Error::Encoding(EncodingError::InvalidLength(_)))
        ));
    }

    proptest! {
        #[test]
        fn prop_bech32_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..40)) {
            let encoded = encode("fuji", &bytes).unwrap();
            prop_assert!(encoded.len() <= MAX_LENGTH);
            prop_assert_eq!(decode("fuji", &encoded).unwrap(), bytes);
        }
    }
}
