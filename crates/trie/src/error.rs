use alloy_primitives::B256;
use forgechain_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrieError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("trie node {0} referenced but missing from storage")]
    MissingNode(B256),

    #[error("failed to decode trie node {hash}")]
    Decode {
        hash: B256,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to decode account value")]
    AccountDecode {
        #[source]
        source: bincode::Error,
    },
}
