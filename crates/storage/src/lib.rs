//! Typed, keyspace-oriented storage over the five (plus two supporting)
//! column families forgechain persists to: `blocks`, `blockLogs`,
//! `transactions`, `transactionReceipts`, `trie`, plus `accounts` and
//! `blockNumbers` for fast tip/account lookups.

pub mod database;
pub mod error;
pub mod managers;
pub mod memory;
pub mod rocks;
pub mod tables;

pub use database::{Database, WriteBatch};
pub use error::StoreError;
pub use managers::{AccountManager, BlockLogsManager, BlockManager, ReceiptManager, TransactionManager};
pub use memory::MemoryDatabase;
pub use rocks::RocksDatabase;
pub use tables::{
    Accounts, BlockLogsTable, BlockNumbers, Blocks, Table, Transactions, TransactionReceipts, Trie,
    ALL_COLUMN_FAMILIES,
};
