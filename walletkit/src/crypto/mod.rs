//! Cryptographic primitives and text encodings
//!
//! This module provides mnemonic handling, key derivation and signing, the
//! 32-byte hash type, and the CB58 and Bech32 codecs used for identifiers and
//! addresses.

pub mod bech32;
pub mod cb58;
pub mod hash;
pub mod keys;
pub mod mnemonic;

pub use hash::{Hash, HASH_BYTES};
pub use keys::*;
pub use mnemonic::*;
