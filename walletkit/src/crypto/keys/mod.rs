//! Key derivation and signing
//!
//! This module provides BIP-32 derivation of secp256k1 keys and the
//! recoverable ECDSA signatures Avalanche uses.

mod derivation;
mod signing;

pub use derivation::*;
pub use signing::*;
