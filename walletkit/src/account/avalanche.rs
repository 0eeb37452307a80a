//! Avalanche account

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::address::{Address, ChainType, ADDRESS_BYTES};
use crate::config::Amount;
use crate::crypto::hash::sha256;
use crate::crypto::keys::{
    derive_key_pair, public_key_from_private, sign_digest, KeyType, PrivateKey, PublicKey, SIGNATURE_BYTES,
};
use crate::crypto::mnemonic::SEED_BYTES;
use crate::error::{Error, Result};
use crate::reader::ByteReader;

/// BIP-44 path of the account key (coin type 9000 is AVAX)
pub const DERIVATION_PATH: &str = "m/44'/9000'/0'/0/0";

const SERIALIZATION_VERSION: u8 = 1;
const SECRET_KEY_BYTES: usize = 32;
const PUBLIC_KEY_BYTES: usize = 33;
const SERIALIZATION_CHECKSUM_BYTES: usize = 4;

fn corrupt(reason: &str) -> Error {
    Error::CorruptSerialization(format!("account blob: {}", reason))
}

/// An account holding one key and an address on each Avalanche chain
///
/// Addresses are fixed at creation; balance limits are the only mutable state.
pub struct Account {
    private_key: PrivateKey,
    public_key: PublicKey,
    addresses: [Address; 3],
    balance_limits: HashMap<usize, Amount>,
}

impl Account {
    /// Create an account from a 64-byte BIP-39 seed
    pub fn create_with_seed(seed: &[u8]) -> Result<Self> {
        if seed.len() != SEED_BYTES {
            return Err(Error::KeyDerivation(format!(
                "seed must be {} bytes, got {}",
                SEED_BYTES,
                seed.len()
            )));
        }

        let key_pair = derive_key_pair(seed, DERIVATION_PATH)?;
        let account = Self::with_private_key(key_pair.private_key().clone())?;

        debug!(path = DERIVATION_PATH, "created avalanche account from seed");
        Ok(account)
    }

    /// Create an account from a blob produced by [`Account::serialize`]
    pub fn create_with_serialization(blob: &[u8]) -> Result<Self> {
        if blob.len() < SERIALIZATION_CHECKSUM_BYTES {
            return Err(corrupt("truncated"));
        }
        let (body, checksum) = blob.split_at(blob.len() - SERIALIZATION_CHECKSUM_BYTES);
        if sha256(body)[..SERIALIZATION_CHECKSUM_BYTES] != *checksum {
            return Err(corrupt("checksum mismatch"));
        }

        let mut reader = ByteReader::new(body, corrupt);

        if reader.u8()? != SERIALIZATION_VERSION {
            return Err(corrupt("unsupported version"));
        }

        let secret = reader.bytes(SECRET_KEY_BYTES)?.to_vec();
        let public_key = reader.bytes(PUBLIC_KEY_BYTES)?;

        let count = reader.u8()? as usize;
        if count != ChainType::ALL.len() {
            return Err(corrupt("unexpected address count"));
        }

        let mut stored = Vec::with_capacity(count);
        for _ in 0..count {
            let chain_type = ChainType::from_tag(reader.u8()?).ok_or_else(|| corrupt("unknown chain type"))?;
            if stored.iter().any(|address: &Address| address.chain_type() == chain_type) {
                return Err(corrupt("duplicate chain type"));
            }
            stored.push(Address::new(chain_type, reader.array::<ADDRESS_BYTES>()?));
        }
        reader.finish()?;

        let account = Self::with_private_key(PrivateKey::new(secret, KeyType::Secp256k1))
            .map_err(|_| corrupt("invalid secret key"))?;

        if account.public_key.as_bytes() != public_key {
            return Err(corrupt("public key does not match secret key"));
        }
        if stored.iter().any(|address| account.address(address.chain_type()) != *address) {
            return Err(corrupt("address does not match key"));
        }

        debug!("restored avalanche account from serialization");
        Ok(account)
    }

    fn with_private_key(private_key: PrivateKey) -> Result<Self> {
        let public_key = public_key_from_private(&private_key)?;
        let addresses = [
            Address::from_public_key(&public_key, ChainType::X)?,
            Address::from_public_key(&public_key, ChainType::C)?,
            Address::from_public_key(&public_key, ChainType::P)?,
        ];

        Ok(Self {
            private_key,
            public_key,
            addresses,
            balance_limits: HashMap::new(),
        })
    }

    /// The address on a chain
    pub fn address(&self, chain_type: ChainType) -> Address {
        self.addresses[chain_type.tag() as usize]
    }

    /// Every address of the account, in chain type order
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// True if the address belongs to this account on any chain
    pub fn has_address(&self, address: &Address) -> bool {
        self.addresses.iter().any(|own| own == address)
    }

    /// The compressed public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Sign a 32-byte digest with the account key
    pub fn sign_digest(&self, digest: &[u8]) -> Result<[u8; SIGNATURE_BYTES]> {
        sign_digest(&self.private_key, digest)
    }

    /// Serialize the account into a versioned, checksummed blob
    pub fn serialize(&self) -> Vec<u8> {
        let mut blob = Vec::with_capacity(
            1 + SECRET_KEY_BYTES
                + PUBLIC_KEY_BYTES
                + 1
                + self.addresses.len() * (1 + ADDRESS_BYTES)
                + SERIALIZATION_CHECKSUM_BYTES,
        );

        blob.push(SERIALIZATION_VERSION);
        blob.extend_from_slice(self.private_key.as_bytes());
        blob.extend_from_slice(self.public_key.as_bytes());
        blob.push(self.addresses.len() as u8);
        for address in &self.addresses {
            blob.push(address.chain_type().tag());
            blob.extend_from_slice(address.as_bytes());
        }

        let checksum = sha256(&blob);
        blob.extend_from_slice(&checksum[..SERIALIZATION_CHECKSUM_BYTES]);
        blob
    }

    /// The balance limit configured for an asset, if any
    pub fn balance_limit(&self, asset_index: usize) -> Option<Amount> {
        self.balance_limits.get(&asset_index).copied()
    }

    /// Configure or clear the balance limit of an asset
    pub fn set_balance_limit(&mut self, asset_index: usize, limit: Option<Amount>) {
        match limit {
            Some(limit) => {
                self.balance_limits.insert(asset_index, limit);
            }
            None => {
                self.balance_limits.remove(&asset_index);
            }
        }
    }

    /// Release the account; its key material is zeroized
    pub fn release(self) {
        debug!("released avalanche account");
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("addresses", &self.addresses)
            .field("balance_limits", &self.balance_limits)
            .finish_non_exhaustive()
    }
}
