//! Chain types and addresses

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crypto::bech32;
use crate::crypto::hash::{hash160, keccak256};
use crate::crypto::keys::{uncompressed_public_key, KeyType, PublicKey};
use crate::error::{EncodingError, Error, Result};

/// Number of payload bytes in an address
pub const ADDRESS_BYTES: usize = 20;

/// Human-readable prefix used when no network is specified
pub const MAINNET_HRP: &str = "avax";

/// The Avalanche chains an account holds an address on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChainType {
    /// Exchange chain
    X,
    /// Contract chain (EVM)
    C,
    /// Platform chain
    P,
}

impl ChainType {
    /// Every chain type, in tag order
    pub const ALL: [ChainType; 3] = [ChainType::X, ChainType::C, ChainType::P];

    /// The chain alias used in `X-avax1…` style strings
    pub fn alias(&self) -> &'static str {
        match self {
            ChainType::X => "X",
            ChainType::C => "C",
            ChainType::P => "P",
        }
    }

    pub(crate) fn tag(&self) -> u8 {
        match self {
            ChainType::X => 0,
            ChainType::C => 1,
            ChainType::P => 2,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|chain_type| chain_type.tag() == tag)
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

/// An address on one Avalanche chain
///
/// X and P addresses carry the hash160 of the compressed public key; C
/// addresses carry the Ethereum-style keccak address. Two addresses are equal
/// iff both the chain type and the payload match.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    chain_type: ChainType,
    bytes: [u8; ADDRESS_BYTES],
}

impl Address {
    /// Create an address from its raw payload
    pub fn new(chain_type: ChainType, bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self { chain_type, bytes }
    }

    /// Derive the address of a compressed secp256k1 public key on a chain
    pub fn from_public_key(public_key: &PublicKey, chain_type: ChainType) -> Result<Self> {
        if public_key.key_type() != KeyType::Secp256k1 || public_key.as_bytes().len() != 33 {
            return Err(Error::KeyDerivation("Not a compressed secp256k1 public key".to_string()));
        }

        let bytes = match chain_type {
            ChainType::X | ChainType::P => hash160(public_key.as_bytes()),
            ChainType::C => {
                let uncompressed = uncompressed_public_key(public_key)?;
                let hash = keccak256(&uncompressed[1..]);
                let mut bytes = [0u8; ADDRESS_BYTES];
                bytes.copy_from_slice(&hash[12..]);
                bytes
            }
        };

        Ok(Self::new(chain_type, bytes))
    }

    /// Parse an address string for the expected chain type
    ///
    /// X and P addresses may carry their own chain alias (`X-avax1…`); C
    /// addresses may carry a `0x` prefix.
    pub fn parse(text: &str, chain_type: ChainType, hrp: &str) -> Result<Self> {
        let payload = match chain_type {
            ChainType::X | ChainType::P => {
                let text = match text.split_once('-') {
                    Some((alias, rest)) if alias == chain_type.alias() => rest,
                    Some((alias, _)) => {
                        return Err(EncodingError::WrongPrefix {
                            expected: chain_type.alias().to_string(),
                            found: alias.to_string(),
                        }
                        .into())
                    }
                    None => text,
                };
                bech32::decode_address(hrp, text, ADDRESS_BYTES)?
            }
            ChainType::C => {
                let text = text
                    .strip_prefix("0x")
                    .or_else(|| text.strip_prefix("0X"))
                    .unwrap_or(text);
                if text.len() != 2 * ADDRESS_BYTES {
                    return Err(EncodingError::InvalidLength(text.len()).into());
                }
                hex::decode(text).map_err(|e| EncodingError::MalformedInput(e.to_string()))?
            }
        };

        let mut bytes = [0u8; ADDRESS_BYTES];
        bytes.copy_from_slice(&payload);
        Ok(Self::new(chain_type, bytes))
    }

    /// Get the chain type
    pub fn chain_type(&self) -> ChainType {
        self.chain_type
    }

    /// Get the raw payload
    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.bytes
    }

    /// Format the address with a network's human-readable prefix
    pub fn to_string_with_hrp(&self, hrp: &str) -> Result<String> {
        match self.chain_type {
            ChainType::X | ChainType::P => bech32::encode(hrp, &self.bytes),
            ChainType::C => Ok(hex::encode(self.bytes)),
        }
    }

    /// Format the address prefixed with its chain alias, e.g. `X-avax1…`
    pub fn to_aliased_string(&self, hrp: &str) -> Result<String> {
        match self.chain_type {
            ChainType::X | ChainType::P => {
                Ok(format!("{}-{}", self.chain_type.alias(), self.to_string_with_hrp(hrp)?))
            }
            ChainType::C => Ok(format!("0x{}", hex::encode(self.bytes))),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_string_with_hrp(MAINNET_HRP).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}, {})", self.chain_type, hex::encode(self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC_KEY: &str = "029dc79308883267bb49f3924e9eb58d60bcecd17ad3f2f53681ecc5c668b2ba5f";
    const X_ADDRESS: &str = "avax1escwyq2hsznvwth6au3gpc77f225uacvwldgal";
    const C_ADDRESS: &str = "bbc9bf879c06b13274c200c8b246881ef1ca33a0";

    fn public_key() -> PublicKey {
        PublicKey::new(hex::decode(PUBLIC_KEY).unwrap(), KeyType::Secp256k1)
    }

    #[test]
    fn test_address_from_public_key() {
        let x = Address::from_public_key(&public_key(), ChainType::X).unwrap();
        assert_eq!(hex::encode(x.as_bytes()), "cc30e2015780a6c72efaef2280e3de4a954e770c");
        assert_eq!(x.to_string(), X_ADDRESS);

        let c = Address::from_public_key(&public_key(), ChainType::C).unwrap();
        assert_eq!(c.to_string(), C_ADDRESS);

        let p = Address::from_public_key(&public_key(), ChainType::P).unwrap();
        assert_eq!(p.as_bytes(), x.as_bytes());
        assert_ne!(p, x);
    }

    #[test]
    fn test_address_parse() {
        let x = Address::parse(X_ADDRESS, ChainType::X, "avax").unwrap();
        assert_eq!(x, Address::from_public_key(&public_key(), ChainType::X).unwrap());
        assert_eq!(Address::parse(&format!("X-{}", X_ADDRESS), ChainType::X, "avax").unwrap(), x);

        let c = Address::parse(C_ADDRESS, ChainType::C, "avax").unwrap();
        assert_eq!(Address::parse(&format!("0x{}", C_ADDRESS), ChainType::C, "avax").unwrap(), c);
    }

    #[test]
    fn test_address_parse_rejects_wrong_alias() {
        assert!(matches!(
            Address::parse(&format!("P-{}", X_ADDRESS), ChainType::X, "avax"),
            Err(Error::Encoding(EncodingError::WrongPrefix { .. }))
        ));
    }

    #[test]
    fn test_address_parse_rejects_wrong_hrp() {
        assert!(matches!(
            Address::parse(X_ADDRESS, ChainType::X, "fuji"),
            Err(Error::Encoding(EncodingError::WrongPrefix { .. }))
        ));
    }

    #[test]
    fn test_address_parse_rejects_bad_c_address() {
        assert!(Address::parse("0x1234", ChainType::C, "avax").is_err());
        assert!(Address::parse(&C_ADDRESS.replace('b', "z"), ChainType::C, "avax").is_err());
    }

    #[test]
    fn test_aliased_string() {
        let x = Address::parse(X_ADDRESS, ChainType::X, "avax").unwrap();
        assert_eq!(x.to_aliased_string("avax").unwrap(), format!("X-{}", X_ADDRESS));

        let fuji = x.to_string_with_hrp("fuji").unwrap();
        assert!(fuji.starts_with("fuji1"));
        assert_eq!(Address::parse(&fuji, ChainType::X, "fuji").unwrap(), x);
    }

    #[test]
    fn test_chain_type_tags() {
        for chain_type in ChainType::ALL {
            assert_eq!(ChainType::from_tag(chain_type.tag()), Some(chain_type));
        }
        assert_eq!(ChainType::from_tag(3), None);
    }
}
