//! Transaction functionality
//!
//! This module provides the chain-neutral argument and serialization types and
//! the Avalanche X-chain transfer transaction.

pub mod types;
mod avalanche;

pub use types::*;
pub use avalanche::*;
