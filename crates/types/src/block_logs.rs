use crate::{primitives::B256, receipt::Log};
use serde::{Deserialize, Serialize};

/// One log together with the transaction that emitted it, so a consumer
/// never has to cross-reference a receipt to recover provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockLogEntry {
    pub transaction_index: u64,
    pub transaction_hash: B256,
    pub log: Log,
}

/// All logs emitted by a block's transactions, in transaction-then-log
/// order, stored in the `blockLogs` keyspace keyed by block hash. Kept
/// separate from `Block` so log-heavy consumers (an RPC log filter, say)
/// don't have to load full transaction bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockLogs {
    pub block_hash: B256,
    pub logs: Vec<BlockLogEntry>,
}

impl BlockLogs {
    pub fn new(block_hash: B256) -> Self {
        Self { block_hash, logs: Vec::new() }
    }

    /// Appends every log a single transaction emitted, tagging each with
    /// that transaction's index and hash.
    pub fn extend_from_transaction(
        &mut self,
        transaction_index: u64,
        transaction_hash: B256,
        logs: impl IntoIterator<Item = Log>,
    ) {
        self.logs.extend(logs.into_iter().map(|log| BlockLogEntry {
            transaction_index,
            transaction_hash,
            log,
        }));
    }
}
