//! Assembles a block from the pool's executable transactions, grounded on
//! `execute_consensus_output`/`build_block_from_batch_payload` in
//! `execution/engine/src/payload_builder.rs`: execute each transaction in
//! turn, accumulate gas/receipts, and treat a single transaction reverting
//! as a `transaction-failure` to report rather than an abort — only an
//! error from the EVM itself aborts the whole block.

use crate::error::MinerError;
use alloy_primitives::B256;
use forgechain_evm::Evm;
use forgechain_pool::TransactionPool;
use forgechain_types::{primitives::keccak256, Block, BlockLogs, Header, Receipt, ReceiptStatus, Transaction};
use tracing::{info, warn};

/// Everything produced by mining one block: the sealed block, its
/// receipts/logs keyed by transaction, and the transactions that were
/// pulled from the pool but didn't make it in.
pub struct MinedBlock {
    pub block: Block,
    pub included: Vec<(Transaction, Receipt)>,
    pub block_logs: BlockLogs,
    pub failed: Vec<(B256, String)>,
}

pub struct Miner;

impl Miner {
    /// Builds `header` into a sealed block by draining up to
    /// `max_transactions` executable transactions from `pool` and running
    /// each one through `evm`. `header`'s `number`, `parent_hash`,
    /// `timestamp`, `gas_limit`, `base_fee_per_gas`, and `miner` must
    /// already be set; `state_root`, `transactions_root`, `receipts_root`,
    /// and `gas_used` are computed here.
    pub fn mine_block<E: Evm>(
        evm: &mut E,
        pool: &TransactionPool,
        mut header: Header,
        max_transactions: usize,
    ) -> Result<MinedBlock, MinerError> {
        let drained = pool.drain(max_transactions);
        let mut included = Vec::with_capacity(drained.len());
        let mut failed = Vec::new();
        let mut transaction_hashes = Vec::with_capacity(drained.len());
        let mut block_logs = BlockLogs::new(B256::ZERO); // block hash filled in once the header is final
        let mut cumulative_gas_used = 0u64;

        for mut tx in drained {
            evm.checkpoint();
            match evm.run_tx(&header, &tx) {
                Ok(outcome) => {
                    evm.commit();
                    cumulative_gas_used += outcome.gas_used;
                    let index = transaction_hashes.len() as u64;
                    tx.set_block_context(B256::ZERO, header.number, index); // block hash patched below
                    transaction_hashes.push(tx.hash());

                    let receipt = Receipt {
                        transaction_hash: tx.hash(),
                        transaction_index: index,
                        block_hash: B256::ZERO,
                        block_number: header.number,
                        from: tx.from,
                        to: match tx.to() {
                            alloy_primitives::TxKind::Call(address) => Some(address),
                            alloy_primitives::TxKind::Create => None,
                        },
                        contract_address: outcome.contract_address,
                        gas_used: outcome.gas_used,
                        cumulative_gas_used,
                        status: ReceiptStatus::from(outcome.success) as u8,
                        logs: outcome.logs.clone(),
                        logs_bloom: Default::default(),
                    };
                    block_logs.extend_from_transaction(index, tx.hash(), outcome.logs.clone());
                    included.push((tx, receipt));
                }
                Err(error) if !error.is_fatal() => {
                    evm.rollback();
                    warn!(target: "forgechain::miner", tx_hash = %tx.hash(), %error, "transaction excluded from block");
                    failed.push((tx.hash(), error.to_string()));
                }
                Err(fatal) => {
                    evm.rollback();
                    return Err(fatal.into());
                }
            }
        }

        header.gas_used = cumulative_gas_used;
        header.state_root = evm.state_root();
        header.transactions_root = merkle_ish_root(&transaction_hashes);
        header.receipts_root = merkle_ish_root(
            &included.iter().map(|(_, receipt)| receipt.transaction_hash).collect::<Vec<_>>(),
        );

        let block_hash = header.hash();
        block_logs.block_hash = block_hash;
        for (tx, receipt) in included.iter_mut() {
            tx.block_hash = Some(block_hash);
            receipt.block_hash = block_hash;
        }

        let block = Block { header, transaction_hashes };
        info!(
            target: "forgechain::miner",
            block_hash = %block_hash,
            number = block.number(),
            included = included.len(),
            failed = failed.len(),
            "mined block"
        );

        Ok(MinedBlock { block, included, block_logs, failed })
    }
}

/// A simple ordered-hash commitment: `keccak256` of the concatenated
/// element hashes. Not a canonical Ethereum trie root — nothing outside
/// forgechain needs to verify these against mainnet tooling, only that
/// the same transaction set always produces the same root.
fn merkle_ish_root(hashes: &[B256]) -> B256 {
    if hashes.is_empty() {
        return B256::ZERO;
    }
    let mut buf = Vec::with_capacity(hashes.len() * 32);
    for hash in hashes {
        buf.extend_from_slice(hash.as_slice());
    }
    keccak256(buf)
}
