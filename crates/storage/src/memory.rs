//! In-process `Database` backed by a `HashMap`, used in tests so the suite
//! doesn't need a rocksdb file on disk for every case.

use crate::{
    database::{Database, WriteBatch},
    error::StoreError,
    tables::Table,
};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryDatabase {
    columns: RwLock<HashMap<&'static str, HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

fn encode<T: serde::Serialize>(column: &'static str, value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|source| StoreError::Serialization { column, source })
}

fn decode<T: serde::de::DeserializeOwned>(
    column: &'static str,
    bytes: &[u8],
) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|source| StoreError::Deserialization { column, source })
}

impl Database for MemoryDatabase {
    fn get<T: Table>(&self, key: &T::Key) -> Result<Option<T::Value>, StoreError> {
        let key_bytes = encode::<T::Key>(T::NAME, key)?;
        let columns = self.columns.read();
        match columns.get(T::NAME).and_then(|column| column.get(&key_bytes)) {
            Some(bytes) => Ok(Some(decode::<T::Value>(T::NAME, bytes)?)),
            None => Ok(None),
        }
    }

    fn insert<T: Table>(&self, key: &T::Key, value: &T::Value) -> Result<(), StoreError> {
        let key_bytes = encode::<T::Key>(T::NAME, key)?;
        let value_bytes = encode::<T::Value>(T::NAME, value)?;
        self.columns.write().entry(T::NAME).or_default().insert(key_bytes, value_bytes);
        Ok(())
    }

    fn remove<T: Table>(&self, key: &T::Key) -> Result<(), StoreError> {
        let key_bytes = encode::<T::Key>(T::NAME, key)?;
        if let Some(column) = self.columns.write().get_mut(T::NAME) {
            column.remove(&key_bytes);
        }
        Ok(())
    }

    fn iter<T: Table>(&self) -> Result<Vec<(T::Key, T::Value)>, StoreError> {
        let columns = self.columns.read();
        let Some(column) = columns.get(T::NAME) else { return Ok(Vec::new()) };
        column
            .iter()
            .map(|(k, v)| Ok((decode::<T::Key>(T::NAME, k)?, decode::<T::Value>(T::NAME, v)?)))
            .collect()
    }

    fn is_empty<T: Table>(&self) -> Result<bool, StoreError> {
        let columns = self.columns.read();
        Ok(columns.get(T::NAME).map(|column| column.is_empty()).unwrap_or(true))
    }

    fn batch(&self) -> Box<dyn WriteBatch + '_> {
        Box::new(MemoryWriteBatch { db: self, ops: Vec::new() })
    }
}

enum Op {
    Insert(&'static str, Vec<u8>, Vec<u8>),
    Remove(&'static str, Vec<u8>),
}

struct MemoryWriteBatch<'a> {
    db: &'a MemoryDatabase,
    ops: Vec<Op>,
}

impl<'a> WriteBatch for MemoryWriteBatch<'a> {
    fn insert<T: Table>(&mut self, key: &T::Key, value: &T::Value) -> Result<(), StoreError> {
        let key_bytes = encode::<T::Key>(T::NAME, key)?;
        let value_bytes = encode::<T::Value>(T::NAME, value)?;
        self.ops.push(Op::Insert(T::NAME, key_bytes, value_bytes));
        Ok(())
    }

    fn remove<T: Table>(&mut self, key: &T::Key) -> Result<(), StoreError> {
        let key_bytes = encode::<T::Key>(T::NAME, key)?;
        self.ops.push(Op::Remove(T::NAME, key_bytes));
        Ok(())
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut columns = self.db.columns.write();
        for op in self.ops {
            match op {
                Op::Insert(name, key, value) => {
                    columns.entry(name).or_default().insert(key, value);
                }
                Op::Remove(name, key) => {
                    if let Some(column) = columns.get_mut(name) {
                        column.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::Trie;
    use alloy_primitives::B256;

    #[test]
    fn insert_then_get_round_trips() {
        let db = MemoryDatabase::new();
        let key = B256::repeat_byte(0x11);
        db.insert::<Trie>(&key, &vec![1, 2, 3]).unwrap();
        assert_eq!(db.get::<Trie>(&key).unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn remove_clears_the_key() {
        let db = MemoryDatabase::new();
        let key = B256::repeat_byte(0x22);
        db.insert::<Trie>(&key, &vec![9]).unwrap();
        db.remove::<Trie>(&key).unwrap();
        assert_eq!(db.get::<Trie>(&key).unwrap(), None);
    }

    #[test]
    fn batch_commit_applies_all_writes_atomically() {
        let db = MemoryDatabase::new();
        let key_a = B256::repeat_byte(0x01);
        let key_b = B256::repeat_byte(0x02);
        let mut batch = db.batch();
        batch.insert::<Trie>(&key_a, &vec![1]).unwrap();
        batch.insert::<Trie>(&key_b, &vec![2]).unwrap();
        batch.commit().unwrap();

        assert_eq!(db.get::<Trie>(&key_a).unwrap(), Some(vec![1]));
        assert_eq!(db.get::<Trie>(&key_b).unwrap(), Some(vec![2]));
    }

    #[test]
    fn is_empty_reports_column_state() {
        let db = MemoryDatabase::new();
        assert!(db.is_empty::<Trie>().unwrap());
        db.insert::<Trie>(&B256::ZERO, &vec![0]).unwrap();
        assert!(!db.is_empty::<Trie>().unwrap());
    }
}
