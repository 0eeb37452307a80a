//! Avalanche connector

use std::any::Any;
use std::sync::Arc;

use tracing::debug;

use super::{ChainConnector, ConnectorHandler, NetworkType, WalletManager};
use crate::crypto::hash::sha256;
use crate::crypto::keys::{sign_digest, PrivateKey};
use crate::error::Result;
use crate::transaction::{parse_transaction, BaseTx, TransactionArguments, TransactionSerialization};

/// Leading bytes of an Avalanche signed message; the message length follows
/// as a big-endian u32, then the message itself
pub const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x1AAvalanche Signed Message:\n";

/// Build the prefixed form of a message that `get_digest` hashes
pub fn signed_message(message: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(SIGNED_MESSAGE_PREFIX.len() + 4 + message.len());
    out.extend_from_slice(SIGNED_MESSAGE_PREFIX);
    out.extend_from_slice(&(message.len() as u32).to_be_bytes());
    out.extend_from_slice(message);
    out
}

/// Creates [`AvalancheConnector`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct AvalancheHandler;

impl ConnectorHandler for AvalancheHandler {
    fn network_type(&self) -> NetworkType {
        NetworkType::Avalanche
    }

    fn create(&self, manager: Arc<WalletManager>) -> Result<Box<dyn ChainConnector>> {
        manager.params().validate()?;
        Ok(Box::new(AvalancheConnector { manager }))
    }
}

/// The Avalanche X-chain connector
#[derive(Debug)]
pub struct AvalancheConnector {
    manager: Arc<WalletManager>,
}

impl AvalancheConnector {
    /// The wallet manager this connector is bound to
    pub fn manager(&self) -> &WalletManager {
        &self.manager
    }
}

impl ChainConnector for AvalancheConnector {
    fn network_type(&self) -> NetworkType {
        NetworkType::Avalanche
    }

    fn get_digest(&self, message: &[u8], add_prefix: bool) -> Result<Vec<u8>> {
        let digest = if add_prefix {
            sha256(&signed_message(message))
        } else {
            sha256(message)
        };
        Ok(digest.to_vec())
    }

    fn sign(&self, data: &[u8], key: &PrivateKey) -> Result<Vec<u8>> {
        Ok(sign_digest(key, data)?.to_vec())
    }

    fn create_transaction_from_arguments(&self, arguments: &TransactionArguments) -> Result<TransactionSerialization> {
        let tx = BaseTx::from_arguments(arguments, self.manager.account(), self.manager.params())?;
        debug!(
            outputs = tx.outputs.len(),
            inputs = tx.inputs.len(),
            "built avalanche transaction"
        );

        Ok(TransactionSerialization {
            serialization: tx.serialize(),
            signature_length: 0,
            is_signed: false,
        })
    }

    fn create_transaction_from_serialization(&self, data: &[u8]) -> Result<TransactionSerialization> {
        let parsed = parse_transaction(data)?;
        debug!(signed = parsed.is_signed, "parsed avalanche transaction");
        Ok(parsed)
    }

    fn release(&mut self) {
        debug!("releasing avalanche connector");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
