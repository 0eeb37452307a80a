//! Account management functionality
//!
//! This module provides the Avalanche account, which derives one key from a
//! seed and exposes an address on each of the X, C and P chains, along with
//! the address type and its text forms.

mod address;
mod avalanche;

pub use address::*;
pub use avalanche::*;
