//! Network parameters
//!
//! Connectors and address formatting read the human-readable prefix, network
//! id, chain and asset ids and the base fee from a [`NetworkParams`] value,
//! either one of the presets or a JSON document.

use serde::{Deserialize, Serialize};

use crate::crypto::Hash;
use crate::error::{Error, Result};

/// Amount in nAVAX
pub type Amount = u64;

/// Parameters of one Avalanche network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkParams {
    /// Human-readable Bech32 prefix of X and P addresses
    pub hrp: String,
    /// Numeric network id
    pub network_id: u32,
    /// X-chain blockchain id (CB58)
    pub x_chain_id: String,
    /// AVAX asset id (CB58)
    pub avax_asset_id: String,
    /// Base transaction fee in nAVAX
    #[serde(default = "default_tx_fee")]
    pub tx_fee: Amount,
}

fn default_tx_fee() -> Amount {
    1_000_000
}

impl NetworkParams {
    /// Avalanche mainnet
    pub fn mainnet() -> Self {
        Self {
            hrp: "avax".to_string(),
            network_id: 1,
            x_chain_id: "2oYMBNV4eNHyqk2fjjV5nVQLDbtmNJzq5s3qs3Lo6ftnC6FByM".to_string(),
            avax_asset_id: "FvwEAhmxKfeiG8SnEvq42hc6whRyY3EFYAvebMqDNDGCgxN5Z".to_string(),
            tx_fee: default_tx_fee(),
        }
    }

    /// The Fuji test network
    pub fn fuji() -> Self {
        Self {
            hrp: "fuji".to_string(),
            network_id: 5,
            x_chain_id: "2JVSBoinj9C2J33VntvzYtVJNZdN2NKiwwKjcumHUWEb5DbBrm".to_string(),
            avax_asset_id: "U8iRqJoiJm8xZHAacmvYyZVwqQx6uDNtQeP3CQ6fcgQk3JqnK".to_string(),
            tx_fee: default_tx_fee(),
        }
    }

    /// Load parameters from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Check that the hrp is usable and the ids are valid CB58 hashes
    pub fn validate(&self) -> Result<()> {
        if self.hrp.is_empty() || !self.hrp.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()) {
            return Err(Error::Config(format!("invalid hrp: {:?}", self.hrp)));
        }
        self.x_chain()?;
        self.avax_asset()?;
        Ok(())
    }

    /// The X-chain blockchain id
    pub fn x_chain(&self) -> Result<Hash> {
        Hash::from_cb58(&self.x_chain_id).map_err(|e| Error::Config(format!("xChainId: {}", e)))
    }

    /// The AVAX asset id
    pub fn avax_asset(&self) -> Result<Hash> {
        Hash::from_cb58(&self.avax_asset_id).map_err(|e| Error::Config(format!("avaxAssetId: {}", e)))
    }
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self::mainnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        NetworkParams::mainnet().validate().unwrap();
        NetworkParams::fuji().validate().unwrap();

        assert_eq!(
            NetworkParams::mainnet().x_chain().unwrap().to_string(),
            "ed5f38341e436e5d46e2bb00b45d62ae97d1b050c64bc634ae10626739e35c4b"
        );
        assert_eq!(
            NetworkParams::mainnet().avax_asset().unwrap().to_string(),
            "21e67317cbc4be2aeb00677ad6462778a8f52274b9d605df2591b23027a87dff"
        );
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "hrp": "local",
            "networkId": 12345,
            "xChainId": "2JVSBoinj9C2J33VntvzYtVJNZdN2NKiwwKjcumHUWEb5DbBrm",
            "avaxAssetId": "U8iRqJoiJm8xZHAacmvYyZVwqQx6uDNtQeP3CQ6fcgQk3JqnK"
        }"#;

        let params = NetworkParams::from_json(json).unwrap();
        assert_eq!(params.hrp, "local");
        assert_eq!(params.network_id, 12345);
        assert_eq!(params.tx_fee, 1_000_000);
    }

    #[test]
    fn test_from_json_rejects_bad_ids() {
        let json = r#"{
            "hrp": "local",
            "networkId": 12345,
            "xChainId": "not-cb58",
            "avaxAssetId": "U8iRqJoiJm8xZHAacmvYyZVwqQx6uDNtQeP3CQ6fcgQk3JqnK"
        }"#;
        assert!(matches!(NetworkParams::from_json(json), Err(Error::Config(_))));

        assert!(matches!(NetworkParams::from_json("{}"), Err(Error::Config(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let params = NetworkParams::fuji();
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"networkId\":5"));
        assert_eq!(NetworkParams::from_json(&json).unwrap(), params);
    }
}
