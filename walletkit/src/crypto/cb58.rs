//! CB58: Base58 with a trailing 4-byte SHA-256 checksum

use crate::crypto::hash::sha256;
use crate::error::{EncodingError, Result};

/// Number of checksum bytes appended before Base58 encoding
pub const CHECKSUM_BYTES: usize = 4;

/// The checksum is the last four bytes of the SHA-256 of the payload
fn checksum(payload: &[u8]) -> [u8; CHECKSUM_BYTES] {
    let hash = sha256(payload);
    let mut out = [0u8; CHECKSUM_BYTES];
    out.copy_from_slice(&hash[hash.len() - CHECKSUM_BYTES..]);
    out
}

/// Encode bytes as CB58 text
pub fn encode(bytes: &[u8]) -> String {
    let mut data = Vec::with_capacity(bytes.len() + CHECKSUM_BYTES);
    data.extend_from_slice(bytes);
    data.extend_from_slice(&checksum(bytes));

    bs58::encode(data).into_string()
}

/// Decode CB58 text back into the payload bytes
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let mut data = bs58::decode(text).into_vec().map_err(|e| match e {
        bs58::decode::Error::InvalidCharacter { character, .. } => {
            EncodingError::InvalidCharacter(character)
        }
        bs58::decode::Error::NonAsciiCharacter { index } => {
            let character = text[index..].chars().next().unwrap_or('\u{fffd}');
            EncodingError::InvalidCharacter(character)
        }
        other => EncodingError::MalformedInput(other.to_string()),
    })?;

    if data.len() < CHECKSUM_BYTES {
        return Err(EncodingError::InvalidLength(data.len()).into());
    }

    let claimed = data.split_off(data.len() - CHECKSUM_BYTES);
    if claimed[..] != checksum(&data)[..] {
        return Err(EncodingError::ChecksumMismatch.into());
    }

    Ok(data)
}
