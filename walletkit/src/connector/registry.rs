//! Connector registry and connector instances

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{AvalancheHandler, ChainConnector, ConnectorHandler, NetworkType, WalletManager};
use crate::crypto::keys::PrivateKey;
use crate::error::{DispatchError, Result};
use crate::transaction::{TransactionArguments, TransactionSerialization};

/// Handlers keyed by network type
///
/// Populate it once, then share it read-only; `create` takes `&self`.
#[derive(Default)]
pub struct ConnectorRegistry {
    handlers: HashMap<NetworkType, Box<dyn ConnectorHandler>>,
}

impl ConnectorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in handler installed
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.handlers.insert(NetworkType::Avalanche, Box::new(AvalancheHandler));
        registry
    }

    /// Install the handler for a network type; a second handler for the same
    /// type is rejected
    pub fn register(&mut self, handler: Box<dyn ConnectorHandler>) -> Result<()> {
        let network_type = handler.network_type();
        if self.handlers.contains_key(&network_type) {
            warn!(network = %network_type, "rejected duplicate connector registration");
            return Err(DispatchError::AlreadyRegistered(network_type).into());
        }

        self.handlers.insert(network_type, handler);
        info!(network = %network_type, "registered connector handler");
        Ok(())
    }

    /// True if a handler is installed for the network type
    pub fn is_registered(&self, network_type: NetworkType) -> bool {
        self.handlers.contains_key(&network_type)
    }

    /// Create a connector for a network type bound to a wallet manager
    pub fn create(&self, network_type: NetworkType, manager: Arc<WalletManager>) -> Result<WalletConnector> {
        let handler = self.handlers.get(&network_type).ok_or_else(|| {
            warn!(network = %network_type, "no connector handler registered");
            DispatchError::UnsupportedNetwork(network_type)
        })?;

        if manager.network_type() != network_type {
            return Err(DispatchError::NetworkMismatch {
                requested: network_type,
                manager: manager.network_type(),
            }
            .into());
        }

        let inner = handler.create(Arc::clone(&manager))?;
        debug!(network = %network_type, "created connector");

        Ok(WalletConnector {
            network_type,
            manager,
            inner: Some(inner),
        })
    }
}

impl fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("networks", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Lifecycle of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorState {
    Created,
    Released,
}

/// A connector instance created through a [`ConnectorRegistry`]
pub struct WalletConnector {
    network_type: NetworkType,
    manager: Arc<WalletManager>,
    inner: Option<Box<dyn ChainConnector>>,
}

impl WalletConnector {
    /// Get the network type
    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    /// Get the wallet manager this connector is bound to
    pub fn manager(&self) -> &Arc<WalletManager> {
        &self.manager
    }

    /// Get the lifecycle state
    pub fn state(&self) -> ConnectorState {
        match self.inner {
            Some(_) => ConnectorState::Created,
            None => ConnectorState::Released,
        }
    }

    fn connector(&self) -> Result<&dyn ChainConnector> {
        self.inner
            .as_deref()
            .ok_or_else(|| DispatchError::Released(self.network_type).into())
    }

    /// Digest a message, optionally behind the network's signed-message prefix
    pub fn get_digest(&self, message: &[u8], add_prefix: bool) -> Result<Vec<u8>> {
        self.connector()?.get_digest(message, add_prefix)
    }

    /// Sign data with a private key
    pub fn sign(&self, data: &[u8], key: &PrivateKey) -> Result<Vec<u8>> {
        self.connector()?.sign(data, key)
    }

    /// Build a serialized transaction from parallel key and value lists
    pub fn create_transaction_from_arguments<K, V>(&self, keys: &[K], values: &[V]) -> Result<TransactionSerialization>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let connector = self.connector()?;
        let arguments = TransactionArguments::new(keys, values)?;
        connector.create_transaction_from_arguments(&arguments)
    }

    /// Parse a serialized transaction and report its signature state
    pub fn create_transaction_from_serialization(&self, data: &[u8]) -> Result<TransactionSerialization> {
        self.connector()?.create_transaction_from_serialization(data)
    }

    /// Release the connector; every later operation fails with
    /// [`DispatchError::Released`]
    pub fn release(&mut self) -> Result<()> {
        let mut inner = self
            .inner
            .take()
            .ok_or(DispatchError::Released(self.network_type))?;
        inner.release();
        debug!(network = %self.network_type, "released connector");
        Ok(())
    }

    /// Borrow the concrete connector, if it is of type `T` and not released
    pub fn downcast_ref<T: ChainConnector>(&self) -> Option<&T> {
        let inner: &dyn Any = self.inner.as_deref()?.as_any();
        inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for WalletConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConnector")
            .field("network_type", &self.network_type)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
