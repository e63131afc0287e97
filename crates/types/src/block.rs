use crate::primitives::{rlp_hash, Address, Bytes, B256, U256};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// Block header. Field order matches what gets RLP-encoded for the block
/// hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, RlpEncodable, RlpDecodable)]
pub struct Header {
    pub parent_hash: B256,
    pub number: u64,
    pub timestamp: u64,
    pub state_root: B256,
    pub transactions_root: B256,
    pub receipts_root: B256,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub base_fee_per_gas: U256,
    pub miner: Address,
    pub extra_data: Bytes,
}

impl Header {
    /// keccak256 of the RLP-encoded header; identifies the block.
    pub fn hash(&self) -> B256 {
        rlp_hash(self)
    }
}

/// A sealed block: header plus the ordered list of transaction hashes it
/// includes. Transaction bodies live in the `transactions` keyspace, keyed
/// by hash, not inlined here.
#[derive(Debug, Clone, Serialize, Deserialize, RlpEncodable, RlpDecodable)]
pub struct Block {
    pub header: Header,
    pub transaction_hashes: Vec<B256>,
}

impl Block {
    pub fn hash(&self) -> B256 {
        self.header.hash()
    }

    pub fn number(&self) -> u64 {
        self.header.number
    }
}
