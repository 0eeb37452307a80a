//! Fixed-size hash values and the digest functions used across the crate

use std::fmt;
use std::str::FromStr;

use ripemd::Ripemd160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::crypto::cb58;
use crate::error::{EncodingError, Error, Result};

/// Number of bytes in a [`Hash`]
pub const HASH_BYTES: usize = 32;

/// A 32-byte hash, generally SHA-256
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash([u8; HASH_BYTES]);

impl Hash {
    /// The all-zero hash
    pub const EMPTY: Hash = Hash([0u8; HASH_BYTES]);

    /// Create a hash from raw bytes
    pub fn from_bytes(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }

    /// Create a hash from a slice, which must be exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; HASH_BYTES] = bytes
            .try_into()
            .map_err(|_| EncodingError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; HASH_BYTES] {
        &self.0
    }

    /// True iff every byte is zero
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// The first four bytes as a little-endian `u32`, for bucketing in hashed sets
    pub fn bucket_value(&self) -> u32 {
        u32::from_le_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Parse the CB58 form used for Avalanche transaction, asset and chain ids
    pub fn from_cb58(text: &str) -> Result<Self> {
        let bytes = cb58::decode(text)?;
        Self::from_slice(&bytes)
    }

    /// The CB58 form of this hash
    pub fn to_cb58(&self) -> String {
        cb58::encode(&self.0)
    }
}

impl FromStr for Hash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 2 * HASH_BYTES || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EncodingError::MalformedInput(format!(
                "expected {} hex characters, got {:?}",
                2 * HASH_BYTES,
                s
            ))
            .into());
        }

        let mut bytes = [0u8; HASH_BYTES];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| EncodingError::MalformedInput(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self)
    }
}

impl From<[u8; HASH_BYTES]> for Hash {
    fn from(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// SHA-256 of data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// RIPEMD-160 of the SHA-256 of data
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(sha256(data)).into()
}

/// Calculate the Keccak-256 hash of data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH_HEX: &str = "48f2fcd93eeb282c2f5e059ee2265672680b101fe051d5d6afe717ccda535845";

    #[test]
    fn test_hash_hex_round_trip() {
        let hash: Hash = HASH_HEX.parse().unwrap();
        assert_eq!(hash.to_string(), HASH_HEX);

        let upper: Hash = HASH_HEX.to_uppercase().parse().unwrap();
        assert_eq!(upper, hash);
        assert_eq!(upper.to_string(), HASH_HEX);
    }

    #[test]
    fn test_hash_from_string_rejects_malformed() {
        assert!(matches!(
            "abcd".parse::<Hash>(),
            Err(Error::Encoding(EncodingError::MalformedInput(_)))
        ));

        let bad = format!("{}zz", &HASH_HEX[..62]);
        assert!(matches!(
            bad.parse::<Hash>(),
            Err(Error::Encoding(EncodingError::MalformedInput(_)))
        ));

        let prefixed = format!("0x{}", &HASH_HEX[..62]);
        assert!(prefixed.parse::<Hash>().is_err());
    }

    #[test]
    fn test_hash_empty() {
        assert!(Hash::EMPTY.is_empty());
        assert!(Hash::default().is_empty());

        let mut bytes = [0u8; HASH_BYTES];
        bytes[31] = 1;
        assert!(!Hash::from_bytes(bytes).is_empty());
    }

    #[test]
    fn test_hash_equality() {
        let a: Hash = HASH_HEX.parse().unwrap();
        let mut bytes = *a.as_bytes();
        assert_eq!(a, Hash::from_bytes(bytes));

        bytes[0] ^= 0x01;
        assert_ne!(a, Hash::from_bytes(bytes));
    }

    #[test]
    fn test_hash_cb58() {
        let hash = Hash::from_cb58("Z8PYSYJHWJutjMDSdVBybSrFhmw1n8EYXEGb7drLg8mzrYEnq").unwrap();
        assert_eq!(hash.to_string(), HASH_HEX);
        assert_eq!(hash.to_cb58(), "Z8PYSYJHWJutjMDSdVBybSrFhmw1n8EYXEGb7drLg8mzrYEnq");

        let empty = Hash::from_cb58("11111111111111111111111111111111LpoYY").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_hash_serde() {
        let hash: Hash = HASH_HEX.parse().unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", HASH_HEX));
        assert_eq!(serde_json::from_str::<Hash>(&json).unwrap(), hash);
    }

    #[test]
    fn test_digests() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(hex::encode(hash160(b"")), "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb");
    }
}
