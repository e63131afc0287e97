//! rocksdb-backed `Database`, with one column family per keyspace.

use crate::{
    database::{Database, WriteBatch},
    error::StoreError,
    tables::{Table, ALL_COLUMN_FAMILIES},
};
use rocksdb::{ColumnFamilyDescriptor, Options, DB};
use std::path::Path;
use tracing::info;

pub struct RocksDatabase {
    db: DB,
}

impl RocksDatabase {
    /// Opens (or creates) a rocksdb instance at `path` with every forgechain
    /// column family present, so a fresh node and a restarted one see the
    /// same set of keyspaces.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cf_descriptors = ALL_COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;
        info!(target: "forgechain::storage", path = %path.display(), "opened rocksdb database");
        Ok(Self { db })
    }

    fn cf(&self, name: &'static str) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db.cf_handle(name).ok_or(StoreError::UnregisteredColumn(name))
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

impl Database for RocksDatabase {
    fn get<T: Table>(&self, key: &T::Key) -> Result<Option<T::Value>, StoreError> {
        let cf = self.cf(T::NAME)?;
        let key_bytes = encode::<T::Key>(T::NAME, key)?;
        match self.db.get_cf(cf, key_bytes)? {
            Some(bytes) => Ok(Some(decode::<T::Value>(T::NAME, &bytes)?)),
            None => Ok(None),
        }
    }

    fn insert<T: Table>(&self, key: &T::Key, value: &T::Value) -> Result<(), StoreError> {
        let cf = self.cf(T::NAME)?;
        let key_bytes = encode::<T::Key>(T::NAME, key)?;
        let value_bytes = encode::<T::Value>(T::NAME, value)?;
        self.db.put_cf(cf, key_bytes, value_bytes)?;
        Ok(())
    }

    fn remove<T: Table>(&self, key: &T::Key) -> Result<(), StoreError> {
        let cf = self.cf(T::NAME)?;
        let key_bytes = encode::<T::Key>(T::NAME, key)?;
        self.db.delete_cf(cf, key_bytes)?;
        Ok(())
    }

    fn iter<T: Table>(&self) -> Result<Vec<(T::Key, T::Value)>, StoreError> {
        let cf = self.cf(T::NAME)?;
        let mut out = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (key_bytes, value_bytes) = item?;
            let key = decode::<T::Key>(T::NAME, &key_bytes)?;
            let value = decode::<T::Value>(T::NAME, &value_bytes)?;
            out.push((key, value));
        }
        Ok(out)
    }

    fn is_empty<T: Table>(&self) -> Result<bool, StoreError> {
        let cf = self.cf(T::NAME)?;
        Ok(self.db.iterator_cf(cf, rocksdb::IteratorMode::Start).next().is_none())
    }

    fn batch(&self) -> Box<dyn WriteBatch + '_> {
        Box::new(RocksWriteBatch { db: &self.db, batch: rocksdb::WriteBatch::default() })
    }
}

struct RocksWriteBatch<'a> {
    db: &'a DB,
    batch: rocksdb::WriteBatch,
}

impl<'a> WriteBatch for RocksWriteBatch<'a> {
    fn insert<T: Table>(&mut self, key: &T::Key, value: &T::Value) -> Result<(), StoreError> {
        let cf = self.db.cf_handle(T::NAME).ok_or(StoreError::UnregisteredColumn(T::NAME))?;
        let key_bytes = encode::<T::Key>(T::NAME, key)?;
        let value_bytes = encode::<T::Value>(T::NAME, value)?;
        self.batch.put_cf(cf, key_bytes, value_bytes);
        Ok(())
    }

    fn remove<T: Table>(&mut self, key: &T::Key) -> Result<(), StoreError> {
        let cf = self.db.cf_handle(T::NAME).ok_or(StoreError::UnregisteredColumn(T::NAME))?;
        let key_bytes = encode::<T::Key>(T::NAME, key)?;
        self.batch.delete_cf(cf, key_bytes);
        Ok(())
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.db.write(self.batch)?;
        Ok(())
    }
}
