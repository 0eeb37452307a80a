//! BIP-32 key derivation over secp256k1

use std::fmt;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use secp256k1::{PublicKey as Secp256k1PublicKey, Secp256k1, SecretKey};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Offset marking a hardened path component
pub const HARDENED: u32 = 0x8000_0000;

/// Supported key types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum KeyType {
    /// secp256k1 (Avalanche X/P/C, Ethereum, Bitcoin)
    Secp256k1,
    /// Ed25519 (Solana, Stellar, Hedera)
    Ed25519,
}

/// A private key; the bytes are zeroized on drop
#[derive(Clone)]
pub struct PrivateKey {
    bytes: Zeroizing<Vec<u8>>,
    key_type: KeyType,
}

impl PrivateKey {
    /// Create a new private key from bytes
    pub fn new(bytes: Vec<u8>, key_type: KeyType) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
            key_type,
        }
    }

    /// Get the raw private key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the key type
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key_type", &self.key_type)
            .finish_non_exhaustive()
    }
}

/// A public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    bytes: Vec<u8>,
    key_type: KeyType,
}

impl PublicKey {
    /// Create a new public key from bytes
    pub fn new(bytes: Vec<u8>, key_type: KeyType) -> Self {
        Self { bytes, key_type }
    }

    /// Get the raw public key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the key type
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }
}

/// A matching private/public key pair
#[derive(Debug, Clone)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Create a new key pair
    pub fn new(private_key: PrivateKey, public_key: PublicKey) -> Result<Self> {
        if private_key.key_type() != public_key.key_type() {
            return Err(Error::KeyDerivation("Key type mismatch".to_string()));
        }
        Ok(Self { private_key, public_key })
    }

    /// Get the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Get the key type
    pub fn key_type(&self) -> KeyType {
        self.private_key.key_type()
    }
}

/// Derive a secp256k1 key pair from a seed and derivation path
pub fn derive_key_pair(seed: &[u8], path: &str) -> Result<KeyPair> {
    let path_components = parse_derivation_path(path)?;

    let (mut secret_key, mut chain_code) = derive_master_key(seed)?;

    for component in path_components {
        let (child_key, child_chain_code) = derive_child_key(&secret_key, &chain_code, component)?;
        secret_key = child_key;
        chain_code = child_chain_code;
    }

    let secp = Secp256k1::signing_only();
    let secret_key = SecretKey::from_slice(secret_key.as_slice())
        .map_err(|e| Error::KeyDerivation(format!("Invalid secret key: {}", e)))?;
    let public_key = Secp256k1PublicKey::from_secret_key(&secp, &secret_key);

    let private_key = PrivateKey::new(secret_key.secret_bytes().to_vec(), KeyType::Secp256k1);
    let public_key = PublicKey::new(public_key.serialize().to_vec(), KeyType::Secp256k1);

    KeyPair::new(private_key, public_key)
}

/// Parse a BIP-32 derivation path such as `m/44'/9000'/0'/0/0`
pub fn parse_derivation_path(path: &str) -> Result<Vec<u32>> {
    if !path.starts_with("m/") {
        return Err(Error::KeyDerivation(format!("Invalid derivation path: {}", path)));
    }

    let mut result = Vec::new();

    for component in path.trim_start_matches("m/").split('/') {
        if component.is_empty() {
            continue;
        }

        let hardened = component.ends_with('\'');
        let index = component
            .trim_end_matches('\'')
            .parse::<u32>()
            .ok()
            .filter(|index| *index < HARDENED)
            .ok_or_else(|| {
                Error::KeyDerivation(format!("Invalid derivation path component: {}", component))
            })?;

        result.push(if hardened { HARDENED + index } else { index });
    }

    Ok(result)
}

type KeyMaterial = (Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>);

fn split_hmac_output(output: &[u8]) -> KeyMaterial {
    let mut key = Zeroizing::new([0u8; 32]);
    let mut chain_code = Zeroizing::new([0u8; 32]);

    key.copy_from_slice(&output[0..32]);
    chain_code.copy_from_slice(&output[32..64]);

    (key, chain_code)
}

/// Derive the master key from a seed
fn derive_master_key(seed: &[u8]) -> Result<KeyMaterial> {
    let mut hmac = <Hmac<Sha512> as KeyInit>::new_from_slice(b"Bitcoin seed")
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;

    hmac.update(seed);
    let result = hmac.finalize().into_bytes();

    Ok(split_hmac_output(&result))
}

/// Derive a child key from a parent key
fn derive_child_key(parent_key: &[u8; 32], parent_chain_code: &[u8; 32], index: u32) -> Result<KeyMaterial> {
    let secp = Secp256k1::signing_only();
    let parent_secret_key = SecretKey::from_slice(parent_key)
        .map_err(|e| Error::KeyDerivation(format!("Invalid parent key: {}", e)))?;

    let mut data = Zeroizing::new(Vec::with_capacity(37));

    if index >= HARDENED {
        data.push(0);
        data.extend_from_slice(parent_key);
    } else {
        let parent_public_key = Secp256k1PublicKey::from_secret_key(&secp, &parent_secret_key);
        data.extend_from_slice(&parent_public_key.serialize());
    }

    data.extend_from_slice(&index.to_be_bytes());

    let mut hmac = <Hmac<Sha512> as KeyInit>::new_from_slice(parent_chain_code)
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;

    hmac.update(&data);
    let result = hmac.finalize().into_bytes();
    let (tweak, child_chain_code) = split_hmac_output(&result);

    // child = parse256(IL) + parent (mod n)
    let child_secret_key = SecretKey::from_slice(tweak.as_slice())
        .map_err(|e| Error::KeyDerivation(format!("Invalid child key: {}", e)))?;

    let child_secret_key = child_secret_key
        .add_tweak(&parent_secret_key.into())
        .map_err(|e| Error::KeyDerivation(format!("Key addition error: {}", e)))?;

    Ok((Zeroizing::new(child_secret_key.secret_bytes()), child_chain_code))
}

#[cfg(test)]
mod tests {
    use super::*;

    // BIP-32 test vector 1
    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn test_parse_derivation_path() {
        assert_eq!(
            parse_derivation_path("m/44'/9000'/0'/0/0").unwrap(),
            vec![HARDENED + 44, HARDENED + 9000, HARDENED, 0, 0]
        );
        assert!(parse_derivation_path("44'/9000'").is_err());
        assert!(parse_derivation_path("m/44'/x").is_err());
        assert!(parse_derivation_path("m/2147483648").is_err());
    }

    #[test]
    fn test_bip32_vector() {
        let seed = hex::decode(SEED).unwrap();

        let master = derive_key_pair(&seed, "m/").unwrap();
        assert_eq!(
            hex::encode(master.private_key().as_bytes()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );

        let child = derive_key_pair(&seed, "m/0'/1").unwrap();
        assert_eq!(
            hex::encode(child.private_key().as_bytes()),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );
        assert_eq!(
            hex::encode(child.public_key().as_bytes()),
            "03501e454bf00751f24b1b489aa925215d66af2234e3891c3b21a52bedb3cd711c"
        );
    }

    #[test]
    fn test_key_pair_type_mismatch() {
        let private_key = PrivateKey::new(vec![1u8; 32], KeyType::Secp256k1);
        let public_key = PublicKey::new(vec![2u8; 32], KeyType::Ed25519);
        assert!(KeyPair::new(private_key, public_key).is_err());
    }

    #[test]
    fn test_private_key_debug_hides_bytes() {
        let private_key = PrivateKey::new(vec![0xab; 32], KeyType::Secp256k1);
        assert!(!format!("{:?}", private_key).contains("ab"));
    }
}
