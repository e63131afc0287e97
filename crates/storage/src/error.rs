use thiserror::Error;

/// Storage-layer errors: one variant per failure source (backend,
/// (de)serialization, unknown column), `#[from]` for the variants that
/// wrap another crate's error type.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("rocksdb error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    #[error("failed to serialize value for column {column}")]
    Serialization {
        column: &'static str,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to deserialize value for column {column}")]
    Deserialization {
        column: &'static str,
        #[source]
        source: bincode::Error,
    },

    #[error("unregistered column family: {0}")]
    UnregisteredColumn(&'static str),
}
