//! Typed keyspaces: each marker type names one logical keyspace, and the
//! `tables!` macro wires up the column family name and the key/value types
//! so callers never pass a raw `Vec<u8>` around.

use forgechain_types::{Block, BlockLogs, PersistedTransaction, Receipt};
use serde::{de::DeserializeOwned, Serialize};

/// A single column family: a name plus the key/value types stored in it.
pub trait Table {
    const NAME: &'static str;
    type Key: Serialize + DeserializeOwned + Send + Sync;
    type Value: Serialize + DeserializeOwned + Send + Sync;
}

macro_rules! tables {
    ($($name:ident => $key:ty, $value:ty, $cf:literal;)*) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl Table for $name {
                const NAME: &'static str = $cf;
                type Key = $key;
                type Value = $value;
            }
        )*

        /// Every column family forgechain's database opens, in order. Used
        /// when constructing the rocksdb handle so all of them exist
        /// regardless of which keyspaces a given run actually touches.
        pub const ALL_COLUMN_FAMILIES: &[&str] = &[$($cf),*];
    };
}

use alloy_primitives::{Address, B256};

tables! {
    Blocks => B256, Block, "blocks";
    BlockLogsTable => B256, BlockLogs, "blockLogs";
    Transactions => B256, PersistedTransaction, "transactions";
    TransactionReceipts => B256, Receipt, "transactionReceipts";
    Trie => B256, Vec<u8>, "trie";
    Accounts => Address, forgechain_types::Account, "accounts";
    BlockNumbers => u64, B256, "blockNumbers";
}
