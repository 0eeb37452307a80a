//! Common transaction types

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TransactionError};

/// A parsed transaction serialization and its signature state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSerialization {
    /// The serialized transaction, as given
    pub serialization: Vec<u8>,
    /// Total length of the signatures it carries
    pub signature_length: usize,
    /// Whether the transaction carries valid signatures
    pub is_signed: bool,
}

/// Ordered string key/value arguments for building a transaction
///
/// This is the request shape external callers use; each chain validates and
/// converts the values it needs.
#[derive(Debug, Clone, Default)]
pub struct TransactionArguments {
    entries: HashMap<String, String>,
    order: Vec<String>,
}

impl TransactionArguments {
    /// Pair up keys and values, rejecting length mismatches and duplicate keys
    pub fn new<K, V>(keys: &[K], values: &[V]) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if keys.len() != values.len() {
            return Err(TransactionError::InvalidArgument(format!(
                "{} keys but {} values",
                keys.len(),
                values.len()
            ))
            .into());
        }

        let mut arguments = Self::default();
        for (key, value) in keys.iter().zip(values) {
            let key = key.as_ref().to_string();
            if arguments.entries.contains_key(&key) {
                return Err(TransactionError::InvalidArgument(format!("duplicate key {:?}", key)).into());
            }
            arguments.order.push(key.clone());
            arguments.entries.insert(key, value.as_ref().to_string());
        }

        Ok(arguments)
    }

    /// Keys in the order they were given
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Raw value of a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Raw value of a key that must be present
    pub fn required(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| TransactionError::InvalidArgument(format!("missing required key {:?}", key)).into())
    }

    /// Parse a value that must be present
    pub fn parse_required<T: FromStr>(&self, key: &str) -> Result<T> {
        let value = self.required(key)?;
        value
            .parse()
            .map_err(|_| TransactionError::InvalidArgument(format!("invalid value {:?} for {:?}", value, key)).into())
    }

    /// Parse a value if present
    pub fn parse_optional<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            Some(_) => self.parse_required(key).map(Some),
            None => Ok(None),
        }
    }

    /// Fail on the first key outside the allowed set
    pub fn reject_unknown(&self, allowed: &[&str]) -> Result<()> {
        match self.keys().find(|key| !allowed.contains(key)) {
            Some(key) => Err(TransactionError::InvalidArgument(format!("unknown key {:?}", key)).into()),
            None => Ok(()),
        }
    }
}
