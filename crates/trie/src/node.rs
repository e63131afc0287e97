//! Trie node shapes. Nodes are content-addressed: a node's hash is
//! `keccak256` of its serialized bytes, and a parent node references a
//! child by that hash rather than embedding it — the same indirection the
//! teacher's engine code gets from `reth_primitives::keccak256` wherever it
//! needs a content hash, just applied to trie nodes instead of blocks.
//!
//! Nodes are serialized with `bincode` rather than RLP: nothing outside
//! this crate reads trie node bytes directly, so there's no wire-format
//! requirement to match Ethereum's canonical trie encoding, only the
//! requirement that the encoding be deterministic.

use alloy_primitives::B256;
use forgechain_types::primitives::keccak256;
use serde::{Deserialize, Serialize};

pub const EMPTY_ROOT: B256 = B256::ZERO;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Leaf { path: Vec<u8>, value: Vec<u8> },
    Extension { path: Vec<u8>, child: B256 },
    Branch { children: [B256; 16], value: Vec<u8> },
}

impl Node {
    pub fn hash(&self) -> B256 {
        keccak256(bincode::serialize(self).expect("node serialization is infallible"))
    }

    pub fn encode(&self) -> Vec<u8> {
        bincode::serialize(self).expect("node serialization is infallible")
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    /// Whether `children[i]` points at a child (as opposed to being the
    /// empty-child sentinel).
    pub fn has_child(hash: &B256) -> bool {
        *hash != EMPTY_ROOT
    }
}
