use alloy_primitives::{Address, B256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("transaction {hash} nonce {given} is below account {address}'s current nonce {current}")]
    NonceTooLow { hash: B256, address: Address, given: u64, current: u64 },

    #[error("transaction {0} is already queued")]
    AlreadyKnown(B256),

    #[error("pool is at capacity ({0} pending transactions)")]
    PoolFull(usize),
}
