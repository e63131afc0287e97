use crate::primitives::{Address, Bytes, B256, U256};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// A single log entry emitted by a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, RlpEncodable, RlpDecodable)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Transaction status: `0` for reverted/failed, `1` for success, matching
/// the post-Byzantium receipt encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ReceiptStatus {
    Failed = 0,
    Success = 1,
}

impl From<bool> for ReceiptStatus {
    fn from(success: bool) -> Self {
        if success {
            ReceiptStatus::Success
        } else {
            ReceiptStatus::Failed
        }
    }
}

/// Execution outcome of a single transaction, stored in the
/// `transactionReceipts` keyspace keyed by transaction hash.
///
/// Unlike [`Log`], this isn't RLP-derived: `to`/`contract_address` are
/// `Option<Address>`, which `alloy-rlp`'s derive doesn't encode, and nothing
/// needs a receipt's own hash — receipts are looked up by transaction hash,
/// never addressed by their own content hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_hash: B256,
    pub transaction_index: u64,
    pub block_hash: B256,
    pub block_number: u64,
    pub from: Address,
    pub to: Option<Address>,
    pub contract_address: Option<Address>,
    pub gas_used: u64,
    pub cumulative_gas_used: u64,
    pub status: u8,
    pub logs: Vec<Log>,
    pub logs_bloom: Bytes,
}
