//! Adapts `forgechain-trie`'s `StateTrie` to revm's `Database` trait.

use crate::traits::BlockHashProvider;
use alloy_primitives::{Address, B256, U256};
use forgechain_storage::Database as StorageDatabase;
use forgechain_trie::StateTrie;
use revm::Database;
use revm_primitives::{AccountInfo, Bytecode};
use std::sync::Arc;

pub struct TrieDatabase<'a, D> {
    pub trie: &'a mut StateTrie<D>,
    pub block_hashes: Arc<dyn BlockHashProvider>,
}

impl<'a, D: StorageDatabase> Database for TrieDatabase<'a, D> {
    type Error = forgechain_trie::TrieError;

    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        let account = self.trie.get_account(&address)?;
        Ok(account.map(|account| AccountInfo {
            balance: account.balance,
            nonce: account.nonce,
            code_hash: account.code_hash,
            code: None,
        }))
    }

    fn code_by_hash(&mut self, _code_hash: B256) -> Result<Bytecode, Self::Error> {
        // Contract code isn't part of forgechain's account model yet; every
        // account is an EOA, so this is never asked for non-empty code.
        Ok(Bytecode::default())
    }

    fn storage(&mut self, _address: Address, _index: U256) -> Result<U256, Self::Error> {
        Ok(U256::ZERO)
    }

    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
        Ok(self.block_hashes.block_hash(number).unwrap_or_default())
    }
}
