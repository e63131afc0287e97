//! Nibble-path helpers for the Merkle-Patricia trie. Paths are kept as a
//! plain `Vec<u8>` of nibbles (one nibble per byte, not hex-prefix packed)
//! since nodes are RLP-encoded directly rather than matching a specific
//! wire-compatible trie format.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nibbles(pub Vec<u8>);

impl Nibbles {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut nibbles = Vec::with_capacity(bytes.len() * 2);
        for byte in bytes {
            nibbles.push(byte >> 4);
            nibbles.push(byte & 0x0f);
        }
        Self(nibbles)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the shared prefix between `self` and `other`.
    pub fn common_prefix_len(&self, other: &[u8]) -> usize {
        self.0.iter().zip(other.iter()).take_while(|(a, b)| a == b).count()
    }

    pub fn skip(&self, n: usize) -> Nibbles {
        Nibbles(self.0[n.min(self.0.len())..].to_vec())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}
