use crate::cli::{CliLogFormat, CliMiningMode, RunArgs};
use alloy_primitives::{Address, U256};
use forgechain_types::{Config, LogFormat, MiningMode};
use std::str::FromStr;

/// Layers `args` over the defaults-then-file config the same way
/// `Config::from_file` layers a file over the built-in defaults — each
/// later source only overrides fields it actually sets.
pub fn build_config(args: &RunArgs) -> eyre::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(chain_id) = args.chain_id {
        config.chain_id = chain_id;
    }
    if let Some(gas_limit) = args.gas_limit {
        config.gas_limit = gas_limit;
    }
    if let Some(base_fee_per_gas) = &args.base_fee_per_gas {
        config.base_fee_per_gas = U256::from_str(base_fee_per_gas)?;
    }
    if let Some(mining_mode) = args.mining_mode {
        config.mining_mode = match mining_mode {
            CliMiningMode::Instant => MiningMode::Instant,
            CliMiningMode::Interval => MiningMode::Interval,
        };
    }
    if let Some(mining_interval) = &args.mining_interval {
        config.mining_interval = *mining_interval.parse::<humantime::Duration>()?;
    }
    if let Some(account_count) = args.account_count {
        config.account_count = account_count;
    }
    if let Some(default_balance) = &args.default_balance {
        config.default_balance = U256::from_str(default_balance)?;
    }
    if let Some(db_path) = &args.db_path {
        config.db_path = Some(db_path.clone());
    }
    if let Some(log_format) = args.log_format {
        config.log_format = match log_format {
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::Json => LogFormat::Json,
        };
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone();
    }
    if let Some(coinbase) = &args.coinbase {
        config.coinbase = Address::from_str(coinbase)?;
    }
    if let Some(hardfork) = &args.hardfork {
        config.hardfork = hardfork.clone();
    }
    config.allow_unlimited_contract_size |= args.allow_unlimited_contract_size;
    if let Some(time) = args.time {
        config.time = Some(time);
    }
    config.legacy_instamine |= args.legacy_instamine;
    config.vm_errors_on_rpc_response |= args.vm_errors_on_rpc_response;

    config.validate()?;
    Ok(config)
}

pub fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Json => subscriber.json().init(),
    }
}
