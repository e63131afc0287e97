//! Typed put/get/delete wrappers over each keyspace. Everything above the
//! storage crate talks to these managers rather than to `Database` +
//! `Table` directly.

use crate::{
    database::{Database, WriteBatch},
    error::StoreError,
    tables::{Accounts, BlockLogsTable, BlockNumbers, Blocks, Transactions, TransactionReceipts},
};
use alloy_primitives::{Address, B256};
use forgechain_types::{Account, Block, BlockLogs, PersistedTransaction, Receipt};
use std::sync::Arc;

/// Blocks, addressed by hash, with a secondary number-to-hash index so
/// "find the current tip" and "recover on restart" don't need a full scan.
#[derive(Clone)]
pub struct BlockManager<D> {
    db: Arc<D>,
}

impl<D: Database> BlockManager<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    pub fn get(&self, hash: &B256) -> Result<Option<Block>, StoreError> {
        self.db.get::<Blocks>(hash)
    }

    pub fn get_by_number(&self, number: u64) -> Result<Option<Block>, StoreError> {
        match self.db.get::<BlockNumbers>(&number)? {
            Some(hash) => self.get(&hash),
            None => Ok(None),
        }
    }

    pub fn insert(&self, block: &Block) -> Result<(), StoreError> {
        let hash = block.hash();
        let mut batch = self.db.batch();
        batch.insert::<Blocks>(&hash, block)?;
        batch.insert::<BlockNumbers>(&block.number(), &hash)?;
        batch.commit()
    }

    /// The highest-numbered block stored, used to recover the tip on
    /// restart.
    pub fn latest(&self) -> Result<Option<Block>, StoreError> {
        let blocks = self.db.iter::<Blocks>()?;
        Ok(blocks.into_iter().map(|(_, block)| block).max_by_key(|block| block.number()))
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.db.is_empty::<Blocks>()
    }

    /// Drops both the block-by-hash entry and its number-to-hash index
    /// entry in one batch, so a revert can't leave the index pointing at a
    /// hash that no longer resolves.
    pub fn remove(&self, hash: &B256, number: u64) -> Result<(), StoreError> {
        let mut batch = self.db.batch();
        batch.remove::<Blocks>(hash)?;
        batch.remove::<BlockNumbers>(&number)?;
        batch.commit()
    }
}

/// Transactions, addressed by hash, persisted with the block context they
/// were included in.
#[derive(Clone)]
pub struct TransactionManager<D> {
    db: Arc<D>,
}

impl<D: Database> TransactionManager<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    pub fn get(&self, hash: &B256) -> Result<Option<PersistedTransaction>, StoreError> {
        self.db.get::<Transactions>(hash)
    }

    pub fn insert(&self, hash: &B256, tx: &PersistedTransaction) -> Result<(), StoreError> {
        self.db.insert::<Transactions>(hash, tx)
    }

    pub fn remove(&self, hash: &B256) -> Result<(), StoreError> {
        self.db.remove::<Transactions>(hash)
    }
}

/// Receipts, addressed by the hash of the transaction they belong to.
#[derive(Clone)]
pub struct ReceiptManager<D> {
    db: Arc<D>,
}

impl<D: Database> ReceiptManager<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    pub fn get(&self, transaction_hash: &B256) -> Result<Option<Receipt>, StoreError> {
        self.db.get::<TransactionReceipts>(transaction_hash)
    }

    pub fn insert(&self, transaction_hash: &B256, receipt: &Receipt) -> Result<(), StoreError> {
        self.db.insert::<TransactionReceipts>(transaction_hash, receipt)
    }

    pub fn remove(&self, transaction_hash: &B256) -> Result<(), StoreError> {
        self.db.remove::<TransactionReceipts>(transaction_hash)
    }
}

/// Per-block log bundles, addressed by block hash.
#[derive(Clone)]
pub struct BlockLogsManager<D> {
    db: Arc<D>,
}

impl<D: Database> BlockLogsManager<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    pub fn get(&self, block_hash: &B256) -> Result<Option<BlockLogs>, StoreError> {
        self.db.get::<BlockLogsTable>(block_hash)
    }

    pub fn insert(&self, block_hash: &B256, logs: &BlockLogs) -> Result<(), StoreError> {
        self.db.insert::<BlockLogsTable>(block_hash, logs)
    }
}

/// World-state accounts, addressed by address. Backs the account-balance
/// side of the trie rather than replacing it: the trie holds the
/// authoritative, checkpointable view, while this manager is the
/// committed, latest-only view the EVM reads from for gas/nonce checks
/// outside of a checkpointed run.
#[derive(Clone)]
pub struct AccountManager<D> {
    db: Arc<D>,
}

impl<D: Database> AccountManager<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    pub fn get(&self, address: &Address) -> Result<Option<Account>, StoreError> {
        self.db.get::<Accounts>(address)
    }

    pub fn insert(&self, address: &Address, account: &Account) -> Result<(), StoreError> {
        self.db.insert::<Accounts>(address, account)
    }
}
