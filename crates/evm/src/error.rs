use thiserror::Error;

/// A `Transaction` failure is one specific transaction reverting or
/// running out of gas — the block keeps building, and the Miner turns it
/// into a `transaction-failure` event. Anything else means the EVM or its
/// backing state can't be trusted any more, and the caller must abort the
/// block.
#[derive(Debug, Error)]
pub enum EvmError {
    #[error("transaction execution failed: {0}")]
    Transaction(String),

    #[error("evm state access failed: {0}")]
    State(String),

    #[error(transparent)]
    Trie(#[from] forgechain_trie::TrieError),

    #[error("unknown hardfork identifier {0:?}")]
    UnknownHardfork(String),
}

impl EvmError {
    /// Whether this failure is scoped to a single transaction (keep
    /// building the block) or invalidates the whole run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EvmError::Transaction(_))
    }
}
