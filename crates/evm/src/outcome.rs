use alloy_primitives::{Address, Bytes};
use forgechain_types::Log;

/// Result of running one transaction, enough for the Miner to build a
/// receipt and decide whether to keep the transaction in the block.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub gas_used: u64,
    pub output: Bytes,
    pub logs: Vec<Log>,
    pub contract_address: Option<Address>,
}

/// Result of a read-only call (`eth_call`-equivalent, used by
/// `simulateTransaction`): no state change, no receipt.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub success: bool,
    pub output: Bytes,
    pub gas_used: u64,
}
