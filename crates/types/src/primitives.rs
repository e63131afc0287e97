//! Re-exported chain primitives shared by every forgechain crate.

pub use alloy_primitives::{keccak256, Address, Bytes, TxKind, B256, U256};

/// Returns the keccak256 hash of an RLP-encoded value.
pub fn rlp_hash<T: alloy_rlp::Encodable>(value: &T) -> B256 {
    let mut buf = Vec::new();
    value.encode(&mut buf);
    keccak256(buf)
}
