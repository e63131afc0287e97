//! Layered configuration: built-in defaults, overridden by an optional YAML
//! file, overridden by CLI flags in turn.

use crate::{account::GenesisAccount, error::ConfigError, primitives::{Address, U256}};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// How the `Blockchain` decides when to mine a new block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MiningMode {
    /// Mine a block as soon as a transaction is queued.
    Instant,
    /// Mine on a fixed interval regardless of pending transactions.
    Interval,
}

impl Default for MiningMode {
    fn default() -> Self {
        MiningMode::Instant
    }
}

/// Full chain configuration. Every field has a built-in default; `merge`
/// lets a YAML file and then CLI flags override them in turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chain_id: u64,
    pub gas_limit: u64,
    pub base_fee_per_gas: U256,
    pub mining_mode: MiningMode,
    #[serde(with = "humantime_serde")]
    pub mining_interval: Duration,
    pub genesis_accounts: Vec<GenesisAccount>,
    pub default_balance: U256,
    pub account_count: u32,
    pub db_path: Option<String>,
    pub log_format: LogFormat,
    pub log_level: String,

    /// Account credited with block rewards; defaults to the zero address
    /// rather than being a hard requirement, since forgechain doesn't mint
    /// a block reward to spend.
    pub coinbase: Address,
    /// EVM rule-set identifier, passed through to the EVM collaborator
    /// (kept as a string here so this crate doesn't need to depend on
    /// `revm-primitives` just to hold a config value).
    pub hardfork: String,
    /// Disables the contract-code size cap when set.
    pub allow_unlimited_contract_size: bool,
    /// Unix-seconds genesis timestamp and initial clock adjustment; absent
    /// means seed from the wall clock.
    pub time: Option<i64>,
    /// Defers block and log broadcast one tick after a transaction's
    /// completion events, matching the ordering some callers rely on.
    pub legacy_instamine: bool,
    /// Attaches the transaction hash to a thrown VM error's `.result`, for
    /// callers that need it to correlate the failure.
    pub vm_errors_on_rpc_response: bool,
}

/// How structured logs are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Pretty
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain_id: 1337,
            gas_limit: 30_000_000,
            base_fee_per_gas: U256::from(1_000_000_000u64),
            mining_mode: MiningMode::default(),
            mining_interval: Duration::from_secs(0),
            genesis_accounts: Vec::new(),
            default_balance: U256::from(10_000u64) * U256::from(10u64).pow(U256::from(18u64)),
            account_count: 10,
            db_path: None,
            log_format: LogFormat::default(),
            log_level: "info".to_string(),
            coinbase: Address::ZERO,
            hardfork: "shanghai".to_string(),
            allow_unlimited_contract_size: false,
            time: None,
            legacy_instamine: false,
            vm_errors_on_rpc_response: false,
        }
    }
}

impl Config {
    /// Loads defaults, then merges a YAML file at `path` over them, if it
    /// exists. Unknown keys in the file are rejected by serde's normal
    /// behavior for typed deserialization.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gas_limit == 0 {
            return Err(ConfigError::Invalid("gas_limit must be non-zero".into()));
        }
        if self.mining_mode == MiningMode::Interval && self.mining_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "mining_interval must be non-zero when mining_mode is interval".into(),
            ));
        }
        Ok(())
    }
}
