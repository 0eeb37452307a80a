//! WalletKit Core - Avalanche accounts, address codecs and wallet connectors
//!
//! This library provides the account and signing core of an Avalanche wallet:
//! the CB58 and Bech32 text codecs, a 32-byte hash type, seed-derived accounts
//! with X, C and P addresses, and the connector registry that routes
//! digest, signing and transaction requests to per-network handlers.

pub mod error;
pub mod config;
pub mod crypto;
pub mod account;
pub mod transaction;
pub mod connector;

mod reader;

// Re-export commonly used types for convenience
pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
