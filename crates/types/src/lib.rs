//! Shared data model for forgechain: accounts, transactions, blocks,
//! receipts, logs, snapshots, configuration, and the error types every
//! other forgechain crate builds on.

pub mod account;
pub mod block;
pub mod block_logs;
pub mod config;
pub mod error;
pub mod primitives;
pub mod receipt;
pub mod signer;
pub mod snapshot;
pub mod time;
pub mod transaction;

pub use account::{Account, GenesisAccount};
pub use block::{Block, Header};
pub use block_logs::{BlockLogEntry, BlockLogs};
pub use config::{Config, LogFormat, MiningMode};
pub use receipt::{Log, Receipt, ReceiptStatus};
pub use signer::LocalSigner;
pub use snapshot::Snapshot;
pub use time::TimeSource;
pub use transaction::{PersistedTransaction, Transaction, TxSigned};
