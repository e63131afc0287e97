use forgechain_blockchain::ChainError;
use thiserror::Error;

/// Grounded on `crates/network-libp2p/src/error.rs`'s shape: one variant
/// per failure source, `#[error(transparent)]` for passthrough.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The dispatch contract itself: not a string, `"constructor"`, not
    /// one of the declared methods, or parameters that don't decode into
    /// what the method expects.
    #[error("Invalid or unsupported method: {0}")]
    InvalidMethod(String),

    #[error("invalid parameters for {method}: {reason}")]
    InvalidParams { method: String, reason: String },

    #[error(transparent)]
    Chain(#[from] ChainError),
}
