//! Wallet connectors
//!
//! A connector is the per-network adapter that external signing requests go
//! through: message digests, raw digest signing, and building or inspecting
//! serialized transactions. Each network plugs in a [`ConnectorHandler`]; the
//! [`ConnectorRegistry`] dispatches to it and hands back a [`WalletConnector`].

mod avalanche;
mod registry;

pub use avalanche::*;
pub use registry::*;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::config::NetworkParams;
use crate::crypto::keys::PrivateKey;
use crate::error::{DispatchError, Error, Result};
use crate::transaction::{TransactionArguments, TransactionSerialization};

/// Networks a wallet manager can be created for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkType {
    Bitcoin,
    BitcoinCash,
    BitcoinSv,
    Litecoin,
    Dogecoin,
    Ethereum,
    Ripple,
    Hedera,
    Tezos,
    Stellar,
    Avalanche,
}

impl NetworkType {
    /// Every network type
    pub const ALL: [NetworkType; 11] = [
        NetworkType::Bitcoin,
        NetworkType::BitcoinCash,
        NetworkType::BitcoinSv,
        NetworkType::Litecoin,
        NetworkType::Dogecoin,
        NetworkType::Ethereum,
        NetworkType::Ripple,
        NetworkType::Hedera,
        NetworkType::Tezos,
        NetworkType::Stellar,
        NetworkType::Avalanche,
    ];

    /// Lowercase network name
    pub fn name(&self) -> &'static str {
        match self {
            NetworkType::Bitcoin => "bitcoin",
            NetworkType::BitcoinCash => "bitcoin-cash",
            NetworkType::BitcoinSv => "bitcoin-sv",
            NetworkType::Litecoin => "litecoin",
            NetworkType::Dogecoin => "dogecoin",
            NetworkType::Ethereum => "ethereum",
            NetworkType::Ripple => "ripple",
            NetworkType::Hedera => "hedera",
            NetworkType::Tezos => "tezos",
            NetworkType::Stellar => "stellar",
            NetworkType::Avalanche => "avalanche",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The wallet context a connector is bound to
#[derive(Debug)]
pub struct WalletManager {
    network_type: NetworkType,
    params: NetworkParams,
    account: Account,
}

impl WalletManager {
    /// Create a wallet manager for a network
    pub fn new(network_type: NetworkType, params: NetworkParams, account: Account) -> Self {
        Self {
            network_type,
            params,
            account,
        }
    }

    /// Get the network type
    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    /// Get the network parameters
    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// Get the account
    pub fn account(&self) -> &Account {
        &self.account
    }
}

/// Creates connectors for one network type
pub trait ConnectorHandler: Send + Sync {
    /// The network this handler serves
    fn network_type(&self) -> NetworkType;

    /// Create a connector bound to a wallet manager
    fn create(&self, manager: Arc<WalletManager>) -> Result<Box<dyn ChainConnector>>;
}

/// The per-network connector operations
///
/// Operations a network does not implement keep the default, which fails with
/// [`DispatchError::UnsupportedOperation`].
pub trait ChainConnector: Any + Send {
    /// The network this connector serves
    fn network_type(&self) -> NetworkType;

    /// Digest a message, optionally behind the network's signed-message prefix
    fn get_digest(&self, _message: &[u8], _add_prefix: bool) -> Result<Vec<u8>> {
        Err(unsupported(self.network_type(), "get_digest"))
    }

    /// Sign data with a private key
    fn sign(&self, _data: &[u8], _key: &PrivateKey) -> Result<Vec<u8>> {
        Err(unsupported(self.network_type(), "sign"))
    }

    /// Build a serialized transaction from key/value arguments
    fn create_transaction_from_arguments(&self, _arguments: &TransactionArguments) -> Result<TransactionSerialization> {
        Err(unsupported(self.network_type(), "create_transaction_from_arguments"))
    }

    /// Parse a serialized transaction and report its signature state
    fn create_transaction_from_serialization(&self, _data: &[u8]) -> Result<TransactionSerialization> {
        Err(unsupported(self.network_type(), "create_transaction_from_serialization"))
    }

    /// Drop any chain state before the connector goes away
    fn release(&mut self) {}

    /// Upcast for downcasting to the concrete connector
    fn as_any(&self) -> &dyn Any;
}

fn unsupported(network: NetworkType, operation: &'static str) -> Error {
    DispatchError::UnsupportedOperation { network, operation }.into()
}
