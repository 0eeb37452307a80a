//! Error types for the walletkit library

use thiserror::Error;

use crate::connector::NetworkType;

/// Errors raised by the CB58 and Bech32 text codecs and by text parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid checksum")]
    InvalidChecksum,

    #[error("invalid length: {0}")]
    InvalidLength(usize),

    #[error("missing separator")]
    MissingSeparator,

    #[error("wrong prefix: expected {expected}, found {found}")]
    WrongPrefix { expected: String, found: String },

    #[error("mixed case")]
    MixedCase,

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

/// Errors raised while signing through an account or a connector
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),
}

/// Errors raised by the connector registry and connector instances
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unsupported network: {0}")]
    UnsupportedNetwork(NetworkType),

    #[error("operation {operation} not supported on {network}")]
    UnsupportedOperation {
        network: NetworkType,
        operation: &'static str,
    },

    #[error("connector already registered for {0}")]
    AlreadyRegistered(NetworkType),

    #[error("wallet manager for {manager} cannot back a {requested} connector")]
    NetworkMismatch {
        requested: NetworkType,
        manager: NetworkType,
    },

    #[error("connector for {0} has been released")]
    Released(NetworkType),
}

/// Errors raised while building or parsing transactions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
}

/// Custom error type for walletkit operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Corrupt serialization: {0}")]
    CorruptSerialization(String),

    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Connector-facing error categories, as reported to external callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorErrorKind {
    /// The network cannot support a connector, or not this operation
    UnsupportedConnector,
    /// The digest is invalid or failed to be produced
    InvalidDigest,
    /// The signature is invalid or failed to be completed
    InvalidSignature,
    /// The serialization is invalid or failed to process
    InvalidSerialization,
}

impl Error {
    /// Classify this error for a connector caller, if it has a connector category
    pub fn connector_error(&self) -> Option<ConnectorErrorKind> {
        match self {
            Error::Dispatch(DispatchError::UnsupportedNetwork(_))
            | Error::Dispatch(DispatchError::UnsupportedOperation { .. })
            | Error::Dispatch(DispatchError::NetworkMismatch { .. }) => {
                Some(ConnectorErrorKind::UnsupportedConnector)
            }
            Error::Encoding(_) => Some(ConnectorErrorKind::InvalidDigest),
            Error::Signing(_) => Some(ConnectorErrorKind::InvalidSignature),
            Error::Transaction(_) | Error::CorruptSerialization(_) => {
                Some(ConnectorErrorKind::InvalidSerialization)
            }
            _ => None,
        }
    }
}

/// Result type for walletkit operations
pub type Result<T> = std::result::Result<T, Error>;
