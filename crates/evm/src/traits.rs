use crate::{
    error::EvmError,
    outcome::{CallOutcome, ExecutionOutcome},
};
use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use forgechain_types::{Header, Transaction};

/// A call forgechain runs without creating a transaction (`eth_call`
/// equivalent).
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub from: Address,
    pub to: TxKind,
    pub value: U256,
    pub data: Bytes,
    pub gas_limit: u64,
}

/// Looks up ancestor block hashes for the `BLOCKHASH` opcode, the one
/// piece of chain context the EVM needs but doesn't own — forgechain's
/// `Blockchain` implements this over its `BlockManager`.
pub trait BlockHashProvider: Send + Sync {
    fn block_hash(&self, number: u64) -> Option<B256>;
}

/// The fixed external-collaborator interface forgechain's blockchain,
/// miner, and pool execute transactions through. A concrete executor owns
/// the state trie it reads and writes; callers never touch trie internals
/// directly.
pub trait Evm: Send {
    fn state_root(&self) -> B256;

    fn set_state_root(&mut self, root: B256);

    /// Begins a speculative run: writes made after this call can be
    /// undone with `rollback`.
    fn checkpoint(&mut self);

    /// Keeps the writes made since the matching `checkpoint`.
    fn commit(&mut self);

    /// Undoes the writes made since the matching `checkpoint`.
    fn rollback(&mut self);

    /// Executes a transaction against the current state, applying its
    /// effects if it succeeds. A transaction reverting is reported as
    /// `Ok(ExecutionOutcome { success: false, .. })`, not an `Err` — only
    /// a broken EVM/state invariant is an `Err`.
    fn run_tx(&mut self, header: &Header, tx: &Transaction) -> Result<ExecutionOutcome, EvmError>;

    /// Executes a call against the current state without persisting any
    /// effect, used by `simulateTransaction`.
    fn run_call(&mut self, header: &Header, call: &CallRequest) -> Result<CallOutcome, EvmError>;
}
