//! Checkpointable Merkle-Patricia state trie over forgechain's `trie`
//! keyspace.

pub mod error;
pub mod nibbles;
pub mod node;
pub mod trie;

pub use error::TrieError;
pub use node::{Node, EMPTY_ROOT};
pub use trie::StateTrie;

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use forgechain_storage::MemoryDatabase;
    use forgechain_types::Account;
    use std::sync::Arc;

    fn trie() -> StateTrie<MemoryDatabase> {
        StateTrie::new(Arc::new(MemoryDatabase::new()))
    }

    #[test]
    fn empty_trie_has_empty_root() {
        let trie = trie();
        assert_eq!(trie.root(), EMPTY_ROOT);
    }

    #[test]
    fn set_then_get_account_round_trips() {
        let mut trie = trie();
        let address = Address::repeat_byte(0xaa);
        let account = Account::with_balance(U256::from(100u64));
        trie.set_account(&address, &account).unwrap();
        assert_eq!(trie.get_account(&address).unwrap(), Some(account));
    }

    #[test]
    fn distinct_accounts_diverge_into_separate_leaves() {
        let mut trie = trie();
        let a = Address::repeat_byte(0x01);
        let b = Address::repeat_byte(0x02);
        trie.set_account(&a, &Account::with_balance(U256::from(1u64))).unwrap();
        trie.set_account(&b, &Account::with_balance(U256::from(2u64))).unwrap();

        assert_eq!(trie.get_account(&a).unwrap().unwrap().balance, U256::from(1u64));
        assert_eq!(trie.get_account(&b).unwrap().unwrap().balance, U256::from(2u64));
    }

    #[test]
    fn overwriting_an_account_changes_the_root() {
        let mut trie = trie();
        let address = Address::repeat_byte(0x03);
        trie.set_account(&address, &Account::with_balance(U256::from(1u64))).unwrap();
        let first_root = trie.root();
        trie.set_account(&address, &Account::with_balance(U256::from(2u64))).unwrap();
        assert_ne!(trie.root(), first_root);
    }

    #[test]
    fn checkpoint_then_rollback_restores_the_prior_root() {
        let mut trie = trie();
        let address = Address::repeat_byte(0x04);
        trie.set_account(&address, &Account::with_balance(U256::from(1u64))).unwrap();
        let checkpointed_root = trie.root();

        trie.checkpoint();
        trie.set_account(&address, &Account::with_balance(U256::from(99u64))).unwrap();
        assert_ne!(trie.root(), checkpointed_root);

        trie.rollback();
        assert_eq!(trie.root(), checkpointed_root);
        assert_eq!(trie.get_account(&address).unwrap().unwrap().balance, U256::from(1u64));
    }

    #[test]
    fn checkpoint_then_commit_keeps_the_writes() {
        let mut trie = trie();
        let address = Address::repeat_byte(0x05);
        trie.checkpoint();
        trie.set_account(&address, &Account::with_balance(U256::from(7u64))).unwrap();
        let root_after_write = trie.root();
        trie.commit();
        assert_eq!(trie.root(), root_after_write);
    }

    #[test]
    fn remove_account_drops_it_from_the_trie() {
        let mut trie = trie();
        let address = Address::repeat_byte(0x06);
        trie.set_account(&address, &Account::with_balance(U256::from(5u64))).unwrap();
        trie.remove_account(&address).unwrap();
        assert_eq!(trie.get_account(&address).unwrap(), None);
        assert_eq!(trie.root(), EMPTY_ROOT);
    }
}
