//! `revm`-backed `Evm` implementation, grounded on the per-transaction
//! execution loop in `execution/engine/src/payload_builder.rs`:
//! `evm.transact()`, `EVMError::Transaction` treated as a per-tx failure
//! that doesn't abort the run, anything else treated as fatal, successful
//! state diffs written back to the backing store.

use crate::{
    db::TrieDatabase,
    error::EvmError,
    outcome::{CallOutcome, ExecutionOutcome},
    traits::{BlockHashProvider, CallRequest, Evm},
};
use alloy_primitives::{Address, TxKind as AlloyTxKind, B256, U256};
use forgechain_storage::Database as StorageDatabase;
use forgechain_trie::StateTrie;
use forgechain_types::{Account, Header, Log, Transaction};
use revm::{
    primitives::{BlockEnv, EVMError, ExecutionResult, SpecId, TransactTo, TxEnv},
    Evm as RevmEvm,
};
use std::sync::Arc;
use tracing::warn;

pub struct RevmExecutor<D> {
    trie: StateTrie<D>,
    block_hashes: Arc<dyn BlockHashProvider>,
    spec_id: SpecId,
    limit_contract_code_size: Option<usize>,
}

impl<D: StorageDatabase> RevmExecutor<D> {
    /// Builds an executor honoring `hardfork` (a config-supplied rule-set
    /// identifier, e.g. `"shanghai"`) and `allow_unlimited_contract_size`.
    pub fn new(
        trie: StateTrie<D>,
        block_hashes: Arc<dyn BlockHashProvider>,
        hardfork: &str,
        allow_unlimited_contract_size: bool,
    ) -> Result<Self, EvmError> {
        let spec_id = spec_id_from_str(hardfork)?;
        let limit_contract_code_size = allow_unlimited_contract_size.then_some(usize::MAX);
        Ok(Self { trie, block_hashes, spec_id, limit_contract_code_size })
    }

    pub fn into_trie(self) -> StateTrie<D> {
        self.trie
    }

    /// Direct access to the backing trie for callers that need to seed or
    /// inspect accounts outside of a transaction (genesis setup, chiefly).
    pub fn with_trie_mut<R>(&mut self, f: impl FnOnce(&mut StateTrie<D>) -> R) -> R {
        f(&mut self.trie)
    }

    fn block_env(header: &Header) -> BlockEnv {
        BlockEnv {
            number: U256::from(header.number),
            coinbase: header.miner,
            timestamp: U256::from(header.timestamp),
            gas_limit: U256::from(header.gas_limit),
            basefee: header.base_fee_per_gas,
            ..Default::default()
        }
    }

    fn tx_env(tx: &Transaction) -> TxEnv {
        TxEnv {
            caller: tx.from,
            transact_to: to_transact_to(tx.to()),
            value: tx.value(),
            data: tx.raw.data.clone(),
            gas_limit: tx.gas_limit(),
            gas_price: tx.gas_price(),
            nonce: Some(tx.nonce()),
            ..Default::default()
        }
    }

    /// Applies revm's post-execution state diff back into the trie. Only
    /// nonce/balance/code-hash are modeled — contract storage writes are
    /// dropped, since forgechain accounts don't carry a storage slot map.
    fn apply_state(
        &mut self,
        state: revm::primitives::HashMap<Address, revm::primitives::Account>,
    ) -> Result<(), EvmError> {
        for (address, account) in state {
            if !account.is_touched() {
                continue;
            }
            let updated = Account {
                nonce: account.info.nonce,
                balance: account.info.balance,
                storage_root: B256::ZERO,
                code_hash: account.info.code_hash,
            };
            self.trie.set_account(&address, &updated)?;
        }
        Ok(())
    }
}

/// Accepts the hardfork names forgechain's config layer is documented to
/// take; unknown names are rejected rather than silently falling back to
/// a default, since a config typo should surface at startup.
fn spec_id_from_str(hardfork: &str) -> Result<SpecId, EvmError> {
    match hardfork.to_ascii_lowercase().as_str() {
        "frontier" => Ok(SpecId::FRONTIER),
        "homestead" => Ok(SpecId::HOMESTEAD),
        "byzantium" => Ok(SpecId::BYZANTIUM),
        "constantinople" => Ok(SpecId::CONSTANTINOPLE),
        "petersburg" => Ok(SpecId::PETERSBURG),
        "istanbul" => Ok(SpecId::ISTANBUL),
        "berlin" => Ok(SpecId::BERLIN),
        "london" => Ok(SpecId::LONDON),
        "merge" | "paris" => Ok(SpecId::MERGE),
        "shanghai" => Ok(SpecId::SHANGHAI),
        "cancun" => Ok(SpecId::CANCUN),
        other => Err(EvmError::UnknownHardfork(other.to_string())),
    }
}

fn to_transact_to(to: AlloyTxKind) -> TransactTo {
    match to {
        AlloyTxKind::Call(address) => TransactTo::Call(address),
        AlloyTxKind::Create => TransactTo::Create,
    }
}

fn logs_from(result: &ExecutionResult) -> Vec<Log> {
    result
        .logs()
        .iter()
        .map(|log| Log {
            address: log.address,
            topics: log.topics().to_vec(),
            data: log.data.data.clone(),
        })
        .collect()
}

impl<D: StorageDatabase> Evm for RevmExecutor<D> {
    fn state_root(&self) -> B256 {
        self.trie.root()
    }

    fn set_state_root(&mut self, root: B256) {
        self.trie.set_root(root);
    }

    fn checkpoint(&mut self) {
        self.trie.checkpoint();
    }

    fn commit(&mut self) {
        self.trie.commit();
    }

    fn rollback(&mut self) {
        self.trie.rollback();
    }

    fn run_tx(&mut self, header: &Header, tx: &Transaction) -> Result<ExecutionOutcome, EvmError> {
        let block_env = Self::block_env(header);
        let tx_env = Self::tx_env(tx);
        let block_hashes = self.block_hashes.clone();

        let limit_contract_code_size = self.limit_contract_code_size;
        let result = {
            let mut db = TrieDatabase { trie: &mut self.trie, block_hashes };
            let mut evm = RevmEvm::builder()
                .with_db(&mut db)
                .with_block_env(block_env)
                .with_tx_env(tx_env)
                .with_spec_id(self.spec_id)
                .modify_cfg_env(|cfg| cfg.limit_contract_code_size = limit_contract_code_size)
                .build();
            evm.transact()
        };

        let result_and_state = match result {
            Ok(result_and_state) => result_and_state,
            Err(EVMError::Transaction(err)) => {
                warn!(target: "forgechain::evm", tx_hash = %tx.hash(), error = %err, "transaction execution failed");
                return Err(EvmError::Transaction(err.to_string()));
            }
            Err(other) => return Err(EvmError::State(other.to_string())),
        };

        self.apply_state(result_and_state.state)?;

        let success = result_and_state.result.is_success();
        let gas_used = result_and_state.result.gas_used();
        let output = result_and_state.result.output().cloned().unwrap_or_default();
        let logs = logs_from(&result_and_state.result);
        let contract_address = match (tx.to(), success) {
            (AlloyTxKind::Create, true) => Some(tx.from.create(tx.nonce())),
            _ => None,
        };

        Ok(ExecutionOutcome { success, gas_used, output, logs, contract_address })
    }

    fn run_call(&mut self, header: &Header, call: &CallRequest) -> Result<CallOutcome, EvmError> {
        self.trie.checkpoint();
        let block_env = Self::block_env(header);
        let tx_env = TxEnv {
            caller: call.from,
            transact_to: to_transact_to(call.to),
            value: call.value,
            data: call.data.clone(),
            gas_limit: call.gas_limit,
            ..Default::default()
        };
        let block_hashes = self.block_hashes.clone();
        let limit_contract_code_size = self.limit_contract_code_size;

        let result = {
            let mut db = TrieDatabase { trie: &mut self.trie, block_hashes };
            let mut evm = RevmEvm::builder()
                .with_db(&mut db)
                .with_block_env(block_env)
                .with_tx_env(tx_env)
                .with_spec_id(self.spec_id)
                .modify_cfg_env(|cfg| cfg.limit_contract_code_size = limit_contract_code_size)
                .build();
            evm.transact()
        };
        self.trie.rollback();

        match result {
            Ok(result_and_state) => Ok(CallOutcome {
                success: result_and_state.result.is_success(),
                output: result_and_state.result.output().cloned().unwrap_or_default(),
                gas_used: result_and_state.result.gas_used(),
            }),
            Err(EVMError::Transaction(err)) => Err(EvmError::Transaction(err.to_string())),
            Err(other) => Err(EvmError::State(other.to_string())),
        }
    }
}
