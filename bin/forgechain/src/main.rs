mod cli;
mod config;

use clap::Parser;
use cli::{Cli, Command, RunArgs};
use forgechain_blockchain::Blockchain;
use forgechain_pool::TransactionPool;
use forgechain_storage::{Database, MemoryDatabase, RocksDatabase};
use forgechain_types::Config;
use std::sync::Arc;
use tracing::info;

const DEFAULT_POOL_CAPACITY: usize = 4096;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let args: &RunArgs = match &cli.command {
        Command::Run(args) | Command::Accounts(args) => args,
    };
    let config = config::build_config(args)?;
    config::init_tracing(&config);

    match (&cli.command, &config.db_path) {
        (Command::Run(_), Some(path)) => run(Arc::new(RocksDatabase::open(path)?), config).await,
        (Command::Run(_), None) => run(Arc::new(MemoryDatabase::new()), config).await,
        (Command::Accounts(_), Some(path)) => {
            print_accounts(Arc::new(RocksDatabase::open(path)?), config).await
        }
        (Command::Accounts(_), None) => print_accounts(Arc::new(MemoryDatabase::new()), config).await,
    }
}

/// Starts the chain and blocks until interrupted, then shuts it down
/// cleanly rather than letting the process die mid-commit.
async fn run<D: Database + 'static>(db: Arc<D>, config: Config) -> eyre::Result<()> {
    let pool = Arc::new(TransactionPool::new(DEFAULT_POOL_CAPACITY));
    let chain = Blockchain::new(db, pool, config)?;

    chain.start().await?;
    for signer in chain.dev_accounts().await {
        info!(target: "forgechain", address = %signer.address(), "dev account");
    }

    tokio::signal::ctrl_c().await?;
    info!(target: "forgechain", "shutting down");
    chain.stop().await?;
    Ok(())
}

/// Mints genesis against a fresh store and prints the seeded dev accounts'
/// addresses and private keys, without starting the mining loop.
async fn print_accounts<D: Database + 'static>(db: Arc<D>, config: Config) -> eyre::Result<()> {
    let pool = Arc::new(TransactionPool::new(DEFAULT_POOL_CAPACITY));
    let chain = Blockchain::new(db, pool, config)?;

    chain.start().await?;
    for signer in chain.dev_accounts().await {
        println!("{}  ({})", signer.address(), signer.private_key_hex());
    }
    chain.stop().await?;
    Ok(())
}
