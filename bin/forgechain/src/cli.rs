//! Command-line surface: `clap` with `derive`+`env`, so every flag can
//! also be set from the environment.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "forgechain", version, about = "An in-process, deterministic Ethereum-compatible blockchain simulator.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Starts the chain and keeps it running until interrupted.
    Run(RunArgs),
    /// Mints genesis against a fresh store and prints the seeded dev
    /// accounts, then exits.
    Accounts(RunArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliMiningMode {
    Instant,
    Interval,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliLogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
pub struct RunArgs {
    /// YAML config file, applied over the built-in defaults; every flag
    /// below is then applied over that.
    #[arg(long, env = "FORGECHAIN_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "FORGECHAIN_CHAIN_ID")]
    pub chain_id: Option<u64>,

    #[arg(long, env = "FORGECHAIN_GAS_LIMIT")]
    pub gas_limit: Option<u64>,

    /// Decimal wei amount.
    #[arg(long, env = "FORGECHAIN_BASE_FEE_PER_GAS")]
    pub base_fee_per_gas: Option<String>,

    #[arg(long, value_enum, env = "FORGECHAIN_MINING_MODE")]
    pub mining_mode: Option<CliMiningMode>,

    /// Humantime duration, e.g. `5s`. Only meaningful with `--mining-mode interval`.
    #[arg(long, env = "FORGECHAIN_MINING_INTERVAL")]
    pub mining_interval: Option<String>,

    /// Number of throwaway accounts to seed with `--default-balance` at genesis.
    #[arg(long, env = "FORGECHAIN_ACCOUNT_COUNT")]
    pub account_count: Option<u32>,

    /// Decimal wei amount.
    #[arg(long, env = "FORGECHAIN_DEFAULT_BALANCE")]
    pub default_balance: Option<String>,

    /// Persists to this path with the `rocksdb` backend; omitted means an
    /// in-memory store that's discarded on exit.
    #[arg(long, env = "FORGECHAIN_DB_PATH")]
    pub db_path: Option<String>,

    #[arg(long, value_enum, env = "FORGECHAIN_LOG_FORMAT")]
    pub log_format: Option<CliLogFormat>,

    #[arg(long, env = "FORGECHAIN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Account credited with block rewards.
    #[arg(long, env = "FORGECHAIN_COINBASE")]
    pub coinbase: Option<String>,

    /// EVM rule-set identifier consumed by the EVM collaborator, e.g. `shanghai`.
    #[arg(long, env = "FORGECHAIN_HARDFORK")]
    pub hardfork: Option<String>,

    #[arg(long, env = "FORGECHAIN_ALLOW_UNLIMITED_CONTRACT_SIZE")]
    pub allow_unlimited_contract_size: bool,

    /// Unix-seconds genesis timestamp and initial clock adjustment.
    #[arg(long, env = "FORGECHAIN_TIME")]
    pub time: Option<i64>,

    #[arg(long, env = "FORGECHAIN_LEGACY_INSTAMINE")]
    pub legacy_instamine: bool,

    #[arg(long, env = "FORGECHAIN_VM_ERRORS_ON_RPC_RESPONSE")]
    pub vm_errors_on_rpc_response: bool,
}
