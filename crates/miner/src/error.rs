use forgechain_evm::EvmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MinerError {
    #[error("block building aborted by a fatal EVM error: {0}")]
    Evm(#[from] EvmError),
}
