use alloy_primitives::B256;
use forgechain_types::{Block, BlockLogs};

/// The event bus forgechain's `Blockchain` broadcasts on: `start`/`pause`/
/// `resume`/`stop` for lifecycle transitions, `step` for a
/// manually-triggered single-block mine, `block`/`blockLogs` once a block
/// lands, `pendingTransaction` as soon as a transaction is queued, and
/// `transaction-failure` when the miner drops one.
#[derive(Debug, Clone)]
pub enum Event {
    Start,
    Pause,
    Resume,
    Stop,
    Step,
    Block(Block),
    BlockLogs(BlockLogs),
    PendingTransaction(B256),
    TransactionFailure { hash: B256, error: String },
}
