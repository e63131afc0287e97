use forgechain_types::Transaction;
use std::collections::BTreeMap;

/// Per-account transactions, nonce-ordered: a transaction at nonce `n+1`
/// only becomes a candidate once `n` has been drained or confirmed.
#[derive(Default)]
pub struct AccountQueue {
    by_nonce: BTreeMap<u64, Transaction>,
}

impl AccountQueue {
    pub fn insert(&mut self, tx: Transaction) -> Option<Transaction> {
        self.by_nonce.insert(tx.nonce(), tx)
    }

    pub fn remove(&mut self, nonce: u64) -> Option<Transaction> {
        self.by_nonce.remove(&nonce)
    }

    pub fn get(&self, nonce: u64) -> Option<&Transaction> {
        self.by_nonce.get(&nonce)
    }

    pub fn is_empty(&self) -> bool {
        self.by_nonce.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_nonce.len()
    }

    pub fn lowest_nonce(&self) -> Option<u64> {
        self.by_nonce.keys().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.by_nonce.values()
    }
}
