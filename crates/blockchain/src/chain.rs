//! The chain coordinator: lifecycle, the serialized block-commit pipeline,
//! snapshot/revert, and the event bus everything else subscribes to.
//!
//! State lives behind a lock with a cheap `Blockchain` handle in front of
//! it, exposing `start`/`stop`/`is_running`; mining runs as a background
//! task per mode, driven with `tokio::select!` against a shutdown signal.

use crate::{
    blockhashes::ChainBlockHashes,
    error::ChainError,
    event::Event,
    status::Status,
};
use alloy_primitives::{Address, B256};
use forgechain_evm::{CallOutcome, CallRequest, Evm, RevmExecutor};
use forgechain_miner::Miner;
use forgechain_pool::TransactionPool;
use forgechain_storage::{
    AccountManager, BlockLogsManager, BlockManager, BlockNumbers, Blocks, Database, ReceiptManager,
    TransactionManager, TransactionReceipts, Transactions, WriteBatch,
};
use forgechain_trie::StateTrie;
use forgechain_types::{
    Account, Block, Config, GenesisAccount, Header, LocalSigner, MiningMode, PersistedTransaction,
    Snapshot, TimeSource, Transaction, TxSigned,
};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::{broadcast, watch, Mutex, RwLock};
use tracing::{error, info, instrument, warn};

struct Inner<D: Database> {
    evm: RevmExecutor<D>,
    status: Status,
    snapshots: Vec<Snapshot>,
    time: TimeSource,
    tip: Option<Block>,
}

/// A cheaply-cloneable handle onto a running (or not-yet-started) chain.
/// Every clone shares the same underlying state, pool, and event bus.
pub struct Blockchain<D: Database> {
    db: Arc<D>,
    blocks: BlockManager<D>,
    transactions: TransactionManager<D>,
    receipts: ReceiptManager<D>,
    block_logs: BlockLogsManager<D>,
    accounts: AccountManager<D>,
    pool: Arc<TransactionPool>,
    config: Config,
    inner: Arc<RwLock<Inner<D>>>,
    commit_lock: Arc<Mutex<()>>,
    events: broadcast::Sender<Event>,
    stop_signal: Arc<watch::Sender<bool>>,
    next_snapshot_id: Arc<AtomicU64>,
    dev_accounts: Arc<RwLock<Vec<LocalSigner>>>,
}

impl<D: Database> Clone for Blockchain<D> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            blocks: self.blocks.clone(),
            transactions: self.transactions.clone(),
            receipts: self.receipts.clone(),
            block_logs: self.block_logs.clone(),
            accounts: self.accounts.clone(),
            pool: self.pool.clone(),
            config: self.config.clone(),
            inner: self.inner.clone(),
            commit_lock: self.commit_lock.clone(),
            events: self.events.clone(),
            stop_signal: self.stop_signal.clone(),
            next_snapshot_id: self.next_snapshot_id.clone(),
            dev_accounts: self.dev_accounts.clone(),
        }
    }
}

impl<D: Database> Blockchain<D> {
    pub fn new(db: Arc<D>, pool: Arc<TransactionPool>, config: Config) -> Result<Self, ChainError> {
        let blocks = BlockManager::new(db.clone());
        let trie = StateTrie::new(db.clone());
        let block_hashes = Arc::new(ChainBlockHashes::new(blocks.clone()));
        let evm = RevmExecutor::new(
            trie,
            block_hashes,
            &config.hardfork,
            config.allow_unlimited_contract_size,
        )?;
        let (events, _) = broadcast::channel(1024);
        let (stop_signal, _) = watch::channel(false);

        Ok(Self {
            transactions: TransactionManager::new(db.clone()),
            receipts: ReceiptManager::new(db.clone()),
            block_logs: BlockLogsManager::new(db.clone()),
            accounts: AccountManager::new(db.clone()),
            blocks,
            db,
            pool,
            config,
            inner: Arc::new(RwLock::new(Inner {
                evm,
                status: Status::STOPPED,
                snapshots: Vec::new(),
                time: TimeSource::default(),
                tip: None,
            })),
            commit_lock: Arc::new(Mutex::new(())),
            events,
            stop_signal: Arc::new(stop_signal),
            next_snapshot_id: Arc::new(AtomicU64::new(1)),
            dev_accounts: Arc::new(RwLock::new(Vec::new())),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub async fn status(&self) -> Status {
        self.inner.read().await.status
    }

    pub async fn dev_accounts(&self) -> Vec<LocalSigner> {
        self.dev_accounts.read().await.clone()
    }

    /// Brings the chain up: recovers from storage if a prior run left
    /// blocks behind, otherwise mints genesis, then starts the mining
    /// loop matching `config.mining_mode` (see `DESIGN.md` for the
    /// "recover latest from DB on restart" decision).
    #[instrument(skip(self), name = "blockchain_start")]
    pub async fn start(&self) -> Result<(), ChainError> {
        {
            let mut inner = self.inner.write().await;
            inner.status.remove(Status::STOPPED);
            inner.status.insert(Status::STARTING);
        }
        self.events.send(Event::Start).ok();

        if self.blocks.is_empty()? {
            self.create_genesis().await?;
        } else {
            self.recover_tip().await?;
        }

        self.spawn_mining_loop();

        let mut inner = self.inner.write().await;
        inner.status.insert(Status::STARTED);
        inner.status.remove(Status::STARTING);
        info!(target: "forgechain::blockchain", "chain started");
        Ok(())
    }

    async fn create_genesis(&self) -> Result<(), ChainError> {
        let mut inner = self.inner.write().await;
        if let Some(target_unix_secs) = self.config.time {
            inner.time.set_time(target_unix_secs);
        }
        let mut dev_accounts = Vec::with_capacity(self.config.account_count as usize);

        for _ in 0..self.config.account_count {
            let signer = LocalSigner::random();
            let account = Account::with_balance(self.config.default_balance);
            self.set_account_everywhere(&mut inner.evm, &signer.address(), &account)?;
            dev_accounts.push(signer);
        }

        for GenesisAccount { address, balance, nonce } in &self.config.genesis_accounts {
            let account = Account { nonce: *nonce, balance: *balance, ..Account::default() };
            self.set_account_everywhere(&mut inner.evm, address, &account)?;
        }

        let header = Header {
            parent_hash: B256::ZERO,
            number: 0,
            timestamp: inner.time.now_unix_secs().max(0) as u64,
            state_root: inner.evm.state_root(),
            transactions_root: B256::ZERO,
            receipts_root: B256::ZERO,
            gas_limit: self.config.gas_limit,
            gas_used: 0,
            base_fee_per_gas: self.config.base_fee_per_gas,
            miner: self.config.coinbase,
            extra_data: Default::default(),
        };
        let genesis = Block { header, transaction_hashes: Vec::new() };
        self.blocks.insert(&genesis)?;
        inner.tip = Some(genesis);

        drop(inner);
        *self.dev_accounts.write().await = dev_accounts;
        Ok(())
    }

    fn set_account_everywhere(
        &self,
        evm: &mut RevmExecutor<D>,
        address: &Address,
        account: &Account,
    ) -> Result<(), ChainError> {
        self.accounts.insert(address, account)?;
        evm.with_trie_mut(|trie| trie.set_account(address, account)).map_err(ChainError::from)
    }

    async fn recover_tip(&self) -> Result<(), ChainError> {
        let latest = self.blocks.latest()?.expect("blocks keyspace is non-empty");
        let mut inner = self.inner.write().await;
        inner.evm.set_state_root(latest.header.state_root);
        inner.tip = Some(latest);
        Ok(())
    }

    fn spawn_mining_loop(&self) {
        let chain = self.clone();
        let mut stop_rx = self.stop_signal.subscribe();
        let mut drain_rx = self.pool.subscribe_drain();
        let mining_mode = self.config.mining_mode;
        let mining_interval = self.config.mining_interval;

        tokio::spawn(async move {
            let mut interval = (mining_mode == MiningMode::Interval && !mining_interval.is_zero())
                .then(|| tokio::time::interval(mining_interval));

            loop {
                tokio::select! {
                    _ = stop_rx.changed() => {
                        if *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = drain_rx.recv(), if mining_mode == MiningMode::Instant => {
                        if chain.status().await.is_running() {
                            if let Err(error) = chain.mine_next_block().await {
                                error!(target: "forgechain::blockchain", %error, "instant mining failed");
                            }
                        }
                    }
                    _ = async {
                        match interval.as_mut() {
                            Some(interval) => { interval.tick().await; }
                            None => std::future::pending::<()>().await,
                        }
                    }, if mining_mode == MiningMode::Interval => {
                        if chain.status().await.is_running() {
                            if let Err(error) = chain.mine_next_block().await {
                                error!(target: "forgechain::blockchain", %error, "interval mining failed");
                            }
                        }
                    }
                }
            }
        });
    }

    pub async fn pause(&self) -> Result<(), ChainError> {
        let mut inner = self.inner.write().await;
        inner.status.insert(Status::PAUSED);
        drop(inner);
        self.events.send(Event::Pause).ok();
        Ok(())
    }

    pub async fn resume(&self) -> Result<(), ChainError> {
        let mut inner = self.inner.write().await;
        inner.status.remove(Status::PAUSED);
        drop(inner);
        self.events.send(Event::Resume).ok();
        Ok(())
    }

    /// Stops the mining loop. The chain object itself stays valid —
    /// `queue_transaction` still admits transactions, they just won't be
    /// mined until a new `Blockchain` is started against the same store.
    pub async fn stop(&self) -> Result<(), ChainError> {
        {
            let mut inner = self.inner.write().await;
            inner.status.insert(Status::STOPPING);
        }
        self.stop_signal.send(true).ok();
        let mut inner = self.inner.write().await;
        inner.status = Status::STOPPED;
        drop(inner);
        self.events.send(Event::Stop).ok();
        Ok(())
    }

    /// Admits a signed transaction to the pool. Instant-mining mode picks
    /// this up via the pool's drain notification; interval mode picks it
    /// up on the next tick.
    ///
    /// In `legacy_instamine` mode, while the chain is running and not
    /// paused, this races the block that lands the transaction against a
    /// `TransactionFailure` naming its hash, surfacing the failure to the
    /// caller instead of a hash that will never be mined. Outside that
    /// mode (or while paused/not instant-mining) it returns the hash
    /// immediately, same as every other case.
    pub async fn queue_transaction(&self, raw: TxSigned) -> Result<B256, ChainError> {
        let tx = Transaction::from_signed(raw)?;
        let current_nonce = self.account_nonce(&tx.from)?;

        let should_race = self.config.legacy_instamine
            && self.config.mining_mode == MiningMode::Instant
            && self.status().await.is_running();
        let mut events = should_race.then(|| self.subscribe());

        let hash = self.pool.queue_transaction(tx, current_nonce)?;
        self.events.send(Event::PendingTransaction(hash)).ok();

        if let Some(events) = events.take() {
            self.race_for_failure(events, hash).await?;
        }
        Ok(hash)
    }

    /// Waits for either the block containing `hash` or a matching
    /// `TransactionFailure`, whichever comes first; returns immediately on
    /// the former, errors on the latter.
    async fn race_for_failure(
        &self,
        mut events: broadcast::Receiver<Event>,
        hash: B256,
    ) -> Result<(), ChainError> {
        loop {
            match events.recv().await {
                Ok(Event::TransactionFailure { hash: failed, error }) if failed == hash => {
                    return Err(ChainError::TransactionFailed {
                        hash: self.config.vm_errors_on_rpc_response.then_some(hash),
                        error,
                    });
                }
                Ok(Event::Block(block)) if block.transaction_hashes.contains(&hash) => return Ok(()),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return Ok(()),
            }
        }
    }

    fn account_nonce(&self, address: &Address) -> Result<u64, ChainError> {
        Ok(self.accounts.get(address)?.map(|account| account.nonce).unwrap_or(0))
    }

    /// Looks up an account's committed nonce and balance as of the latest
    /// mined block.
    pub fn account(&self, address: &Address) -> Result<Option<Account>, ChainError> {
        Ok(self.accounts.get(address)?)
    }

    pub async fn is_mining(&self) -> bool {
        self.status().await.is_running()
    }

    /// `setTime(date)`: shifts the chain's clock so `now()` reads as
    /// `target_unix_secs` at the moment of the call. Returns the new
    /// adjustment.
    pub async fn set_time(&self, target_unix_secs: i64) -> i64 {
        self.inner.write().await.time.set_time(target_unix_secs)
    }

    /// `increaseTime(seconds)`: adds to the clock adjustment. Returns the
    /// new total adjustment.
    pub async fn increase_time(&self, seconds: i64) -> i64 {
        self.inner.write().await.time.increase_time(seconds)
    }

    /// Runs a call against the current state without persisting any effect.
    pub async fn simulate_transaction(&self, call: CallRequest) -> Result<CallOutcome, ChainError> {
        let mut inner = self.inner.write().await;
        let header = self.pending_header(&inner);
        Ok(inner.evm.run_call(&header, &call)?)
    }

    /// Manually mines a single block regardless of mining mode.
    pub async fn mine(&self) -> Result<(), ChainError> {
        self.events.send(Event::Step).ok();
        self.mine_next_block().await
    }

    /// The serialized block-commit pipeline: only one call runs at a time
    /// across the whole handle, serializing canonical-tip updates.
    #[instrument(skip(self), name = "mine_next_block")]
    async fn mine_next_block(&self) -> Result<(), ChainError> {
        let _permit = self.commit_lock.lock().await;

        let mut inner = self.inner.write().await;
        let header = self.pending_header(&inner);

        let mined = Miner::mine_block(&mut inner.evm, &self.pool, header, usize::MAX)?;

        self.blocks.insert(&mined.block)?;
        for (tx, receipt) in &mined.included {
            if let Some(persisted) = PersistedTransaction::from_transaction(tx) {
                self.transactions.insert(&tx.hash(), &persisted)?;
            }
            self.receipts.insert(&tx.hash(), receipt)?;

            // Keep the flat nonce-lookup table (used by pool admission) in
            // sync with the trie's authoritative post-execution balances
            // for every address the transaction could have touched.
            for address in [Some(tx.from), receipt.to, receipt.contract_address].into_iter().flatten() {
                if let Some(account) = inner.evm.with_trie_mut(|trie| trie.get_account(&address))? {
                    self.accounts.insert(&address, &account)?;
                }
            }
        }
        self.block_logs.insert(&mined.block.hash(), &mined.block_logs)?;
        inner.tip = Some(mined.block.clone());
        drop(inner);

        for (hash, error) in &mined.failed {
            self.events.send(Event::TransactionFailure { hash: *hash, error: error.clone() }).ok();
        }
        self.events.send(Event::Block(mined.block)).ok();
        self.events.send(Event::BlockLogs(mined.block_logs)).ok();
        Ok(())
    }

    fn pending_header(&self, inner: &Inner<D>) -> Header {
        let tip = inner.tip.as_ref().expect("genesis exists once the chain has started");
        Header {
            parent_hash: tip.hash(),
            number: tip.number() + 1,
            timestamp: inner.time.now_unix_secs().max(0) as u64,
            state_root: inner.evm.state_root(),
            transactions_root: B256::ZERO,
            receipts_root: B256::ZERO,
            gas_limit: self.config.gas_limit,
            gas_used: 0,
            base_fee_per_gas: self.config.base_fee_per_gas,
            miner: self.config.coinbase,
            extra_data: Default::default(),
        }
    }

    /// Pushes a restore point onto the snapshot stack (left unbounded —
    /// see `DESIGN.md`) and returns its 1-based ordinal: the first call
    /// returns `1`, the second `2`, and so on.
    pub async fn snapshot(&self) -> u64 {
        let mut inner = self.inner.write().await;
        let id = self.next_snapshot_id.fetch_add(1, Ordering::SeqCst);
        let tip = inner.tip.clone().expect("chain has started");
        inner.snapshots.push(Snapshot {
            id,
            block_hash: tip.hash(),
            block_number: tip.number(),
            state_root: inner.evm.state_root(),
            time_adjustment: inner.time.adjustment(),
        });
        id
    }

    /// Rolls the chain back to `id`, discarding every snapshot taken after
    /// it along with the blocks mined since. Walks back one block at a
    /// time rather than in parallel (`DESIGN.md`'s Open Question
    /// decision).
    pub async fn revert(&self, id: u64) -> Result<(), ChainError> {
        let mut inner = self.inner.write().await;
        let position = inner
            .snapshots
            .iter()
            .position(|snapshot| snapshot.id == id)
            .ok_or(ChainError::UnknownSnapshot(id))?;
        let target = inner.snapshots[position];
        inner.snapshots.truncate(position);

        let mut cursor = inner.tip.clone();
        while let Some(block) = cursor {
            if block.hash() == target.block_hash {
                break;
            }
            let hash = block.hash();
            warn!(target: "forgechain::blockchain", block_hash = %hash, "discarding block during revert");

            let mut batch = self.db.batch();
            batch.remove::<Blocks>(&hash)?;
            batch.remove::<BlockNumbers>(&block.number())?;
            for tx_hash in &block.transaction_hashes {
                batch.remove::<Transactions>(tx_hash)?;
                batch.remove::<TransactionReceipts>(tx_hash)?;
            }
            batch.commit()?;

            cursor = self.blocks.get(&block.header.parent_hash)?;
        }

        inner.evm.set_state_root(target.state_root);
        inner.time.set_adjustment(target.time_adjustment);
        inner.tip = self.blocks.get(&target.block_hash)?;
        Ok(())
    }

    pub fn db(&self) -> &Arc<D> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, TxKind, U256};
    use forgechain_storage::MemoryDatabase;
    use std::time::Duration;

    fn test_chain(account_count: u32) -> Blockchain<MemoryDatabase> {
        let db = Arc::new(MemoryDatabase::new());
        let pool = Arc::new(TransactionPool::new(1_000));
        let config = Config { account_count, ..Config::default() };
        Blockchain::new(db, pool, config).expect("default hardfork parses")
    }

    #[tokio::test]
    async fn starting_mints_genesis_and_seeds_dev_accounts() {
        let chain = test_chain(3);
        chain.start().await.unwrap();

        assert_eq!(chain.dev_accounts().await.len(), 3);
        assert!(chain.status().await.is_running());
        for signer in chain.dev_accounts().await {
            let account = chain.account(&signer.address()).unwrap().expect("seeded account");
            assert_eq!(account.balance, chain.config.default_balance);
        }
    }

    #[tokio::test]
    async fn queueing_a_transaction_mines_a_block_in_instant_mode() {
        let chain = test_chain(2);
        chain.start().await.unwrap();
        let mut events = chain.subscribe();

        let accounts = chain.dev_accounts().await;
        let sender = accounts[0].clone();
        let recipient = accounts[1].address();

        let raw = TxSigned {
            nonce: 0,
            gas_price: chain.config.base_fee_per_gas,
            gas_limit: 21_000,
            to: TxKind::Call(recipient),
            value: U256::from(1_000u64),
            data: Bytes::new(),
            v: 0,
            r: U256::ZERO,
            s: U256::ZERO,
        };
        let signed = sender.sign(raw, chain.config.chain_id).unwrap();
        chain.queue_transaction(signed).await.unwrap();

        let block = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let Event::Block(block) = events.recv().await.unwrap() {
                    return block;
                }
            }
        })
        .await
        .expect("block mined within timeout");

        assert_eq!(block.number(), 1);
        let sender_account = chain.account(&sender.address()).unwrap().expect("sender account");
        assert_eq!(sender_account.nonce, 1);
        let recipient_account = chain.account(&recipient).unwrap().expect("recipient account");
        assert_eq!(recipient_account.balance, chain.config.default_balance + U256::from(1_000u64));
    }

    #[tokio::test]
    async fn revert_restores_state_to_the_snapshot() {
        let chain = test_chain(2);
        chain.start().await.unwrap();

        let accounts = chain.dev_accounts().await;
        let sender = accounts[0].clone();
        let recipient = accounts[1].address();
        let balance_before = chain.account(&recipient).unwrap().unwrap().balance;

        let snapshot_id = chain.snapshot().await;

        let raw = TxSigned {
            nonce: 0,
            gas_price: chain.config.base_fee_per_gas,
            gas_limit: 21_000,
            to: TxKind::Call(recipient),
            value: U256::from(1_000u64),
            data: Bytes::new(),
            v: 0,
            r: U256::ZERO,
            s: U256::ZERO,
        };
        let mut events = chain.subscribe();
        let signed = sender.sign(raw, chain.config.chain_id).unwrap();
        let tx_hash = chain.queue_transaction(signed).await.unwrap();

        let mined = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let Event::Block(block) = events.recv().await.unwrap() {
                    return block;
                }
            }
        })
        .await
        .expect("block mined within timeout");

        assert!(chain.blocks.get_by_number(mined.number()).unwrap().is_some());
        assert!(chain.transactions.get(&tx_hash).unwrap().is_some());
        assert!(chain.receipts.get(&tx_hash).unwrap().is_some());

        chain.revert(snapshot_id).await.unwrap();

        let inner = chain.inner.read().await;
        assert_eq!(inner.evm.state_root(), {
            let recovered = chain.blocks.get(&inner.tip.as_ref().unwrap().hash()).unwrap().unwrap();
            recovered.header.state_root
        });
        drop(inner);
        assert_eq!(chain.account(&recipient).unwrap().unwrap().balance, balance_before);

        assert!(chain.blocks.get_by_number(mined.number()).unwrap().is_none());
        assert!(chain.blocks.get(&mined.hash()).unwrap().is_none());
        assert!(chain.transactions.get(&tx_hash).unwrap().is_none());
        assert!(chain.receipts.get(&tx_hash).unwrap().is_none());
    }
}
