use alloy_primitives::B256;
use forgechain_evm::EvmError;
use forgechain_miner::MinerError;
use forgechain_pool::PoolError;
use forgechain_storage::StoreError;
use forgechain_trie::TrieError;
use forgechain_types::error::TransactionError;
use thiserror::Error;

/// Top-level error enum, grounded on `crates/node/src/error.rs`'s
/// outer-wraps-inner shape: one variant per subsystem, `#[from]` where the
/// inner error converts directly, `#[error(transparent)]` for passthrough.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Trie(#[from] TrieError),

    #[error(transparent)]
    Evm(#[from] EvmError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Miner(#[from] MinerError),

    #[error("chain is not in a state that allows this operation (current status: {status:?})")]
    InvalidState { status: crate::status::Status },

    #[error("unknown snapshot id {0}")]
    UnknownSnapshot(u64),

    #[error("unknown block hash {0}")]
    UnknownBlock(B256),

    /// Surfaced by `queue_transaction` in legacy-instamine mode when the
    /// miner drops the transaction it just raced against. `hash` is only
    /// populated when `vm_errors_on_rpc_response` is set.
    #[error("transaction failed: {error}")]
    TransactionFailed { hash: Option<B256>, error: String },
}
