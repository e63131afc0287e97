//! Priced, nonce-ordered transaction pool: pull the best candidate per
//! account, drain it once mined or mark it invalid, and keep accumulating.
//! Ordering is highest-gas-price-first with no gas/byte block-size capping
//! here — that's the Miner's job.

use crate::{account_queue::AccountQueue, error::PoolError};
use alloy_primitives::{Address, B256, U256};
use forgechain_types::Transaction;
use parking_lot::Mutex;
use std::collections::{BinaryHeap, HashMap};
use tokio::sync::broadcast;
use tracing::{debug, trace};

struct AccountState {
    confirmed_nonce: u64,
    queue: AccountQueue,
}

struct Inner {
    accounts: HashMap<Address, AccountState>,
    by_hash: HashMap<B256, Address>,
    pending_count: usize,
}

/// One account's next-in-line transaction, ordered for the drain heap by
/// gas price (ties broken by nonce, lower first, so FIFO holds within an
/// account at equal price).
struct Candidate {
    address: Address,
    nonce: u64,
    gas_price: U256,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.gas_price == other.gas_price && self.nonce == other.nonce
    }
}
impl Eq for Candidate {}
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.gas_price.cmp(&other.gas_price).then_with(|| other.nonce.cmp(&self.nonce))
    }
}

/// Capacity forgechain's pool holds before rejecting new transactions. A
/// bound here matches the ambient expectation that a long-running node
/// doesn't grow its mempool unbounded (distinct from the blockchain's
/// intentionally-unbounded snapshot stack, see `DESIGN.md`).
const DEFAULT_MAX_PENDING: usize = 10_000;

pub struct TransactionPool {
    inner: Mutex<Inner>,
    drain_tx: broadcast::Sender<()>,
    max_pending: usize,
}

impl Default for TransactionPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PENDING)
    }
}

impl TransactionPool {
    pub fn new(max_pending: usize) -> Self {
        let (drain_tx, _) = broadcast::channel(64);
        Self {
            inner: Mutex::new(Inner {
                accounts: HashMap::new(),
                by_hash: HashMap::new(),
                pending_count: 0,
            }),
            drain_tx,
            max_pending,
        }
    }

    /// A receiver woken whenever the pool gains at least one executable
    /// transaction — what drives instant-mining mode.
    pub fn subscribe_drain(&self) -> broadcast::Receiver<()> {
        self.drain_tx.subscribe()
    }

    /// Admits `tx` to the pool. `current_nonce` is the account's nonce in
    /// the latest committed state, supplied by the caller (forgechain's
    /// `Blockchain` reads it from the trie) rather than tracked here, so
    /// the pool never has a stale view of what's actually confirmed.
    pub fn queue_transaction(
        &self,
        tx: Transaction,
        current_nonce: u64,
    ) -> Result<B256, PoolError> {
        let mut inner = self.inner.lock();
        if inner.pending_count >= self.max_pending {
            return Err(PoolError::PoolFull(self.max_pending));
        }
        if inner.by_hash.contains_key(&tx.hash()) {
            return Err(PoolError::AlreadyKnown(tx.hash()));
        }
        if tx.nonce() < current_nonce {
            return Err(PoolError::NonceTooLow {
                hash: tx.hash(),
                address: tx.from,
                given: tx.nonce(),
                current: current_nonce,
            });
        }

        let hash = tx.hash();
        let address = tx.from;
        let nonce = tx.nonce();

        let state = inner
            .accounts
            .entry(address)
            .or_insert_with(|| AccountState { confirmed_nonce: current_nonce, queue: AccountQueue::default() });
        state.confirmed_nonce = state.confirmed_nonce.max(current_nonce);
        state.queue.insert(tx);
        inner.by_hash.insert(hash, address);
        inner.pending_count += 1;

        let became_executable = nonce == inner.accounts[&address].confirmed_nonce;
        drop(inner);

        debug!(target: "forgechain::pool", %hash, %address, nonce, became_executable, "queued transaction");
        if became_executable {
            let _ = self.drain_tx.send(());
        }
        Ok(hash)
    }

    /// Removes a transaction the Miner discovered was invalid at execution
    /// time (e.g. insufficient balance once earlier transactions in the
    /// same block landed), per `batch.rs`'s `mark_invalid`.
    pub fn mark_invalid(&self, hash: &B256) {
        let mut inner = self.inner.lock();
        if let Some(address) = inner.by_hash.remove(hash) {
            if let Some(state) = inner.accounts.get_mut(&address) {
                if let Some(tx) = state.queue.iter().find(|tx| tx.hash() == *hash) {
                    let nonce = tx.nonce();
                    state.queue.remove(nonce);
                    inner.pending_count = inner.pending_count.saturating_sub(1);
                }
            }
        }
    }

    /// Pulls up to `max` executable transactions in gas-price order,
    /// removing them from the pool. An account's transaction only becomes
    /// a candidate once every lower nonce for that account has already
    /// been drained in this call (or was already executable).
    pub fn drain(&self, max: usize) -> Vec<Transaction> {
        let mut inner = self.inner.lock();
        let mut heap = BinaryHeap::new();

        for (address, state) in inner.accounts.iter() {
            if let Some(tx) = state.queue.get(state.confirmed_nonce) {
                heap.push(Candidate { address: *address, nonce: tx.nonce(), gas_price: tx.gas_price() });
            }
        }

        let mut drained = Vec::with_capacity(max.min(inner.pending_count));
        while drained.len() < max {
            let Some(candidate) = heap.pop() else { break };
            let Some(state) = inner.accounts.get_mut(&candidate.address) else { continue };
            let Some(tx) = state.queue.remove(candidate.nonce) else { continue };

            inner.by_hash.remove(&tx.hash());
            inner.pending_count = inner.pending_count.saturating_sub(1);
            state.confirmed_nonce = candidate.nonce + 1;

            if let Some(next) = state.queue.get(state.confirmed_nonce) {
                heap.push(Candidate {
                    address: candidate.address,
                    nonce: next.nonce(),
                    gas_price: next.gas_price(),
                });
            }

            trace!(target: "forgechain::pool", hash = %tx.hash(), "drained transaction");
            drained.push(tx);
        }

        drained
    }

    pub fn len(&self) -> usize {
        self.inner.lock().pending_count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the pool currently has at least one transaction ready to
    /// execute without a nonce gap.
    pub fn has_executable(&self) -> bool {
        let inner = self.inner.lock();
        inner.accounts.values().any(|state| state.queue.get(state.confirmed_nonce).is_some())
    }
}
