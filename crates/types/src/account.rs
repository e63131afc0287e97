use crate::primitives::{Address, B256, U256};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// World-state account: nonce, balance, and pointers into the storage trie
/// and code table.
///
/// `storage_root` starts out empty (the hash of an empty trie) and
/// `code_hash` starts out the hash of empty bytecode; forgechain does not
/// yet support contract storage or code, so both fields stay at their
/// defaults but are carried so the account's RLP shape matches a real
/// Ethereum account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, RlpEncodable, RlpDecodable)]
pub struct Account {
    pub nonce: u64,
    pub balance: U256,
    pub storage_root: B256,
    pub code_hash: B256,
}

impl Account {
    /// An account seeded at genesis with the given balance and zero nonce.
    pub fn with_balance(balance: U256) -> Self {
        Self { nonce: 0, balance, storage_root: B256::ZERO, code_hash: B256::ZERO }
    }
}

impl Default for Account {
    fn default() -> Self {
        Self { nonce: 0, balance: U256::ZERO, storage_root: B256::ZERO, code_hash: B256::ZERO }
    }
}

/// A `(address, balance, nonce)` tuple used to seed genesis accounts, per
/// the `initialAccounts` configuration option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub address: Address,
    pub balance: U256,
    #[serde(default)]
    pub nonce: u64,
}
