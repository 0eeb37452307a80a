//! Avalanche X-chain transactions
//!
//! Only the secp256k1 transfer `BaseTx` is supported. Everything is encoded
//! big-endian with the Avalanche codec, version 0:
//!
//! ```text
//! codec u16 | type u32 | network_id u32 | blockchain_id [32]
//! outputs: u32 n, { asset_id [32], type u32, amount u64, locktime u64,
//!                   threshold u32, u32 m, m × address [20] }
//! inputs:  u32 n, { tx_id [32], output_index u32, asset_id [32], type u32,
//!                   amount u64, u32 k, k × signature index u32 }
//! memo:    u32 len, bytes
//! credentials (signed only): u32 n, { type u32, u32 m, m × signature [65] }
//! ```

use crate::account::{Account, Address, ChainType, ADDRESS_BYTES};
use crate::config::{Amount, NetworkParams};
use crate::crypto::hash::sha256;
use crate::crypto::keys::{recover_public_key, SIGNATURE_BYTES};
use crate::crypto::{Hash, HASH_BYTES};
use crate::error::{Result, TransactionError};
use crate::reader::ByteReader;

use super::types::{TransactionArguments, TransactionSerialization};

const CODEC_VERSION: u16 = 0;
const BASE_TX_TYPE_ID: u32 = 0;
const SECP256K1_TRANSFER_INPUT_TYPE_ID: u32 = 5;
const SECP256K1_TRANSFER_OUTPUT_TYPE_ID: u32 = 7;
const SECP256K1_CREDENTIAL_TYPE_ID: u32 = 9;

/// Largest memo a transaction may carry
pub const MAX_MEMO_BYTES: usize = 256;

/// Keys accepted when building a transaction from arguments
pub const ARGUMENT_KEYS: [&str; 11] = [
    "to",
    "amount",
    "utxoTxId",
    "utxoOutputIndex",
    "utxoAmount",
    "assetId",
    "blockchainId",
    "networkId",
    "fee",
    "memo",
    "changeAddress",
];

/// A secp256k1 transfer output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferableOutput {
    pub asset_id: Hash,
    pub amount: Amount,
    pub locktime: u64,
    pub threshold: u32,
    pub addresses: Vec<[u8; ADDRESS_BYTES]>,
}

/// A secp256k1 transfer input spending one UTXO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferableInput {
    pub tx_id: Hash,
    pub output_index: u32,
    pub asset_id: Hash,
    pub amount: Amount,
    pub signature_indices: Vec<u32>,
}

/// The signatures authorizing one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub signatures: Vec<[u8; SIGNATURE_BYTES]>,
}

/// An unsigned X-chain base transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTx {
    pub network_id: u32,
    pub blockchain_id: Hash,
    pub outputs: Vec<TransferableOutput>,
    pub inputs: Vec<TransferableInput>,
    pub memo: Vec<u8>,
}

/// A base transaction with one credential per input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    pub unsigned: BaseTx,
    pub credentials: Vec<Credential>,
}

fn invalid_argument(message: String) -> crate::error::Error {
    TransactionError::InvalidArgument(message).into()
}

fn invalid_transaction(message: &str) -> crate::error::Error {
    TransactionError::InvalidTransaction(message.to_string()).into()
}

impl TransferableOutput {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.asset_id.as_bytes());
        out.extend_from_slice(&SECP256K1_TRANSFER_OUTPUT_TYPE_ID.to_be_bytes());
        out.extend_from_slice(&self.amount.to_be_bytes());
        out.extend_from_slice(&self.locktime.to_be_bytes());
        out.extend_from_slice(&self.threshold.to_be_bytes());
        out.extend_from_slice(&(self.addresses.len() as u32).to_be_bytes());
        for address in &self.addresses {
            out.extend_from_slice(address);
        }
    }

    fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let asset_id = reader.hash()?;
        if reader.u32()? != SECP256K1_TRANSFER_OUTPUT_TYPE_ID {
            return Err(invalid_transaction("unsupported output type"));
        }
        let amount = reader.u64()?;
        let locktime = reader.u64()?;
        let threshold = reader.u32()?;
        let count = reader.count(ADDRESS_BYTES)?;
        let addresses = (0..count)
            .map(|_| reader.array::<ADDRESS_BYTES>())
            .collect::<Result<Vec<_>>>()?;

        if threshold as usize > addresses.len() {
            return Err(invalid_transaction("output threshold exceeds its addresses"));
        }

        Ok(Self {
            asset_id,
            amount,
            locktime,
            threshold,
            addresses,
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }
}

impl TransferableInput {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.tx_id.as_bytes());
        out.extend_from_slice(&self.output_index.to_be_bytes());
        out.extend_from_slice(self.asset_id.as_bytes());
        out.extend_from_slice(&SECP256K1_TRANSFER_INPUT_TYPE_ID.to_be_bytes());
        out.extend_from_slice(&self.amount.to_be_bytes());
        out.extend_from_slice(&(self.signature_indices.len() as u32).to_be_bytes());
        for index in &self.signature_indices {
            out.extend_from_slice(&index.to_be_bytes());
        }
    }

    fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let tx_id = reader.hash()?;
        let output_index = reader.u32()?;
        let asset_id = reader.hash()?;
        if reader.u32()? != SECP256K1_TRANSFER_INPUT_TYPE_ID {
            return Err(invalid_transaction("unsupported input type"));
        }
        let amount = reader.u64()?;
        let count = reader.count(4)?;
        let signature_indices = (0..count).map(|_| reader.u32()).collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tx_id,
            output_index,
            asset_id,
            amount,
            signature_indices,
        })
    }
}

impl Credential {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&SECP256K1_CREDENTIAL_TYPE_ID.to_be_bytes());
        out.extend_from_slice(&(self.signatures.len() as u32).to_be_bytes());
        for signature in &self.signatures {
            out.extend_from_slice(signature);
        }
    }

    fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        if reader.u32()? != SECP256K1_CREDENTIAL_TYPE_ID {
            return Err(invalid_transaction("unsupported credential type"));
        }
        let count = reader.count(SIGNATURE_BYTES)?;
        let signatures = (0..count)
            .map(|_| reader.array::<SIGNATURE_BYTES>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { signatures })
    }
}

impl BaseTx {
    /// Build a single-input transfer from generic key/value arguments
    ///
    /// Change, if any, goes to `changeAddress` or the account's X address.
    pub fn from_arguments(args: &TransactionArguments, account: &Account, params: &NetworkParams) -> Result<Self> {
        args.reject_unknown(&ARGUMENT_KEYS)?;

        let parse_address = |key: &str, text: &str| {
            Address::parse(text, ChainType::X, &params.hrp)
                .map_err(|e| invalid_argument(format!("invalid value for {:?}: {}", key, e)))
        };
        let parse_hash = |key: &str| -> Result<Option<Hash>> {
            args.get(key)
                .map(|text| {
                    Hash::from_cb58(text).map_err(|e| invalid_argument(format!("invalid value for {:?}: {}", key, e)))
                })
                .transpose()
        };

        let to = parse_address("to", args.required("to")?)?;
        let change_address = match args.get("changeAddress") {
            Some(text) => parse_address("changeAddress", text)?,
            None => account.address(ChainType::X),
        };

        let amount: Amount = args.parse_required("amount")?;
        let utxo_amount: Amount = args.parse_required("utxoAmount")?;
        let output_index: u32 = args.parse_required("utxoOutputIndex")?;
        let fee: Amount = args.parse_optional("fee")?.unwrap_or(params.tx_fee);
        let network_id: u32 = args.parse_optional("networkId")?.unwrap_or(params.network_id);

        let utxo_tx_id = parse_hash("utxoTxId")?.ok_or_else(|| invalid_argument("missing required key \"utxoTxId\"".to_string()))?;
        let asset_id = match parse_hash("assetId")? {
            Some(asset_id) => asset_id,
            None => params.avax_asset()?,
        };
        let blockchain_id = match parse_hash("blockchainId")? {
            Some(blockchain_id) => blockchain_id,
            None => params.x_chain()?,
        };

        let memo = args.get("memo").unwrap_or_default().as_bytes().to_vec();
        if memo.len() > MAX_MEMO_BYTES {
            return Err(invalid_argument(format!("memo exceeds {} bytes", MAX_MEMO_BYTES)));
        }

        if amount == 0 {
            return Err(invalid_argument("amount must be positive".to_string()));
        }
        let spent = amount
            .checked_add(fee)
            .ok_or_else(|| invalid_argument("amount plus fee overflows".to_string()))?;
        let change = utxo_amount
            .checked_sub(spent)
            .ok_or_else(|| invalid_argument(format!("utxo amount {} does not cover {}", utxo_amount, spent)))?;

        let output = |address: Address, amount: Amount| TransferableOutput {
            asset_id,
            amount,
            locktime: 0,
            threshold: 1,
            addresses: vec![*address.as_bytes()],
        };

        let mut outputs = vec![output(to, amount)];
        if change > 0 {
            outputs.push(output(change_address, change));
        }
        outputs.sort_by_key(TransferableOutput::to_bytes);

        Ok(Self {
            network_id,
            blockchain_id,
            outputs,
            inputs: vec![TransferableInput {
                tx_id: utxo_tx_id,
                output_index,
                asset_id,
                amount: utxo_amount,
                signature_indices: vec![0],
            }],
            memo,
        })
    }

    /// The unsigned serialization
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&CODEC_VERSION.to_be_bytes());
        out.extend_from_slice(&BASE_TX_TYPE_ID.to_be_bytes());
        out.extend_from_slice(&self.network_id.to_be_bytes());
        out.extend_from_slice(self.blockchain_id.as_bytes());

        out.extend_from_slice(&(self.outputs.len() as u32).to_be_bytes());
        for output in &self.outputs {
            output.write(&mut out);
        }

        out.extend_from_slice(&(self.inputs.len() as u32).to_be_bytes());
        for input in &self.inputs {
            input.write(&mut out);
        }

        out.extend_from_slice(&(self.memo.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.memo);
        out
    }

    /// The digest each credential signs
    pub fn signing_digest(&self) -> [u8; 32] {
        sha256(&self.serialize())
    }

    /// Sign every input with the account key
    pub fn sign(&self, account: &Account) -> Result<SignedTx> {
        let digest = self.signing_digest();
        let signature = account.sign_digest(&digest)?;
        let credentials = self
            .inputs
            .iter()
            .map(|input| Credential {
                signatures: vec![signature; input.signature_indices.len()],
            })
            .collect();

        Ok(SignedTx {
            unsigned: self.clone(),
            credentials,
        })
    }

    fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        if reader.u16()? != CODEC_VERSION {
            return Err(invalid_transaction("unsupported codec version"));
        }
        if reader.u32()? != BASE_TX_TYPE_ID {
            return Err(invalid_transaction("unsupported transaction type"));
        }
        let network_id = reader.u32()?;
        let blockchain_id = reader.hash()?;

        let count = reader.count(HASH_BYTES + 28)?;
        let outputs = (0..count)
            .map(|_| TransferableOutput::read(reader))
            .collect::<Result<Vec<_>>>()?;

        let count = reader.count(2 * HASH_BYTES + 20)?;
        let inputs = (0..count)
            .map(|_| TransferableInput::read(reader))
            .collect::<Result<Vec<_>>>()?;

        let length = reader.count(1)?;
        if length > MAX_MEMO_BYTES {
            return Err(invalid_transaction("memo too long"));
        }
        let memo = reader.bytes(length)?.to_vec();

        Ok(Self {
            network_id,
            blockchain_id,
            outputs,
            inputs,
            memo,
        })
    }
}

impl SignedTx {
    /// The signed serialization
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = self.unsigned.serialize();
        out.extend_from_slice(&(self.credentials.len() as u32).to_be_bytes());
        for credential in &self.credentials {
            credential.write(&mut out);
        }
        out
    }

    /// Total length of all signatures
    pub fn signature_length(&self) -> usize {
        self.credentials
            .iter()
            .map(|credential| credential.signatures.len() * SIGNATURE_BYTES)
            .sum()
    }
}

/// Parse a serialized transaction, signed or unsigned
///
/// A signed transaction must carry one credential per input, each holding one
/// signature per signature index of its input, and every signature must
/// recover a public key over the unsigned digest.
pub fn parse_transaction(data: &[u8]) -> Result<TransactionSerialization> {
    let mut reader = ByteReader::new(data, invalid_transaction);
    let unsigned = BaseTx::read(&mut reader)?;
    let unsigned_length = data.len() - reader.remaining();

    if reader.remaining() == 0 {
        return Ok(TransactionSerialization {
            serialization: data.to_vec(),
            signature_length: 0,
            is_signed: false,
        });
    }

    let count = reader.count(8)?;
    let credentials = (0..count)
        .map(|_| Credential::read(&mut reader))
        .collect::<Result<Vec<_>>>()?;
    reader.finish()?;

    if credentials.len() != unsigned.inputs.len() {
        return Err(invalid_transaction("credential count does not match inputs"));
    }
    let incomplete = unsigned
        .inputs
        .iter()
        .zip(&credentials)
        .any(|(input, credential)| credential.signatures.len() != input.signature_indices.len());
    if incomplete {
        return Err(invalid_transaction("credential signatures do not match input signature indices"));
    }

    let digest = sha256(&data[..unsigned_length]);
    for signature in credentials.iter().flat_map(|credential| &credential.signatures) {
        recover_public_key(&digest, signature).map_err(|_| invalid_transaction("unrecoverable signature"))?;
    }

    let signed = SignedTx { unsigned, credentials };
    let signature_length = signed.signature_length();

    Ok(TransactionSerialization {
        serialization: data.to_vec(),
        signature_length,
        is_signed: signature_length > 0,
    })
}
