use crate::{error::StoreError, tables::Table};

/// Storage-backend-agnostic key/value access. A batch groups writes
/// across multiple tables into one atomic commit, so a block's header,
/// transactions, and receipts land together or not at all.
pub trait Database: Send + Sync + 'static {
    fn get<T: Table>(&self, key: &T::Key) -> Result<Option<T::Value>, StoreError>;

    fn insert<T: Table>(&self, key: &T::Key, value: &T::Value) -> Result<(), StoreError>;

    fn remove<T: Table>(&self, key: &T::Key) -> Result<(), StoreError>;

    fn iter<T: Table>(&self) -> Result<Vec<(T::Key, T::Value)>, StoreError>;

    fn is_empty<T: Table>(&self) -> Result<bool, StoreError>;

    fn batch(&self) -> Box<dyn WriteBatch + '_>;
}

/// A set of writes applied to the database atomically on `commit`.
pub trait WriteBatch {
    fn insert<T: Table>(&mut self, key: &T::Key, value: &T::Value) -> Result<(), StoreError>;

    fn remove<T: Table>(&mut self, key: &T::Key) -> Result<(), StoreError>;

    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
