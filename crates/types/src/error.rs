use thiserror::Error;

/// Errors recovering a sender or building a signed transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("invalid transaction signature")]
    InvalidSignature,
    #[error("nonce {given} is lower than the account's current nonce {current}")]
    NonceTooLow { given: u64, current: u64 },
    #[error("sender balance {balance} is insufficient to cover value + gas cost {required}")]
    InsufficientFunds { balance: String, required: String },
    #[error("gas limit {given} is below the intrinsic cost {intrinsic}")]
    IntrinsicGasTooLow { given: u64, intrinsic: u64 },
}

/// Errors loading or validating a `Config`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path} as YAML")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
