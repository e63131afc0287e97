pub mod account_queue;
pub mod error;
pub mod pool;

pub use error::PoolError;
pub use pool::TransactionPool;

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes, TxKind, U256};
    use forgechain_types::{Transaction, TxSigned};

    fn tx(from_seed: u8, nonce: u64, gas_price: u64) -> Transaction {
        let raw = TxSigned {
            nonce,
            gas_price: U256::from(gas_price),
            gas_limit: 21_000,
            to: TxKind::Call(Address::ZERO),
            value: U256::ZERO,
            data: Bytes::new(),
            v: 0,
            r: U256::ZERO,
            s: U256::ZERO,
        };
        // Bypass signature recovery in these pool-only tests: construct
        // directly instead of going through `Transaction::from_signed`,
        // since the pool never looks at the signature itself.
        Transaction {
            hash: raw.hash(),
            from: Address::repeat_byte(from_seed),
            raw,
            receipt: None,
            logs: Vec::new(),
            block_hash: None,
            block_number: None,
            transaction_index: None,
        }
    }

    #[test]
    fn a_transaction_at_the_current_nonce_is_immediately_executable() {
        let pool = TransactionPool::new(100);
        pool.queue_transaction(tx(1, 0, 10), 0).unwrap();
        assert!(pool.has_executable());
    }

    #[test]
    fn a_gapped_transaction_is_not_executable_until_its_predecessor_arrives() {
        let pool = TransactionPool::new(100);
        pool.queue_transaction(tx(1, 1, 10), 0).unwrap();
        assert!(!pool.has_executable());
        pool.queue_transaction(tx(1, 0, 10), 0).unwrap();
        assert!(pool.has_executable());
    }

    #[test]
    fn queueing_a_transaction_below_the_current_nonce_is_rejected() {
        let pool = TransactionPool::new(100);
        let result = pool.queue_transaction(tx(1, 0, 10), 5);
        assert!(result.is_err());
    }

    #[test]
    fn drain_prefers_higher_gas_price_across_accounts() {
        let pool = TransactionPool::new(100);
        pool.queue_transaction(tx(1, 0, 10), 0).unwrap();
        pool.queue_transaction(tx(2, 0, 50), 0).unwrap();

        let drained = pool.drain(1);
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].from, Address::repeat_byte(2));
    }

    #[test]
    fn drain_respects_nonce_order_within_an_account() {
        let pool = TransactionPool::new(100);
        pool.queue_transaction(tx(1, 0, 10), 0).unwrap();
        pool.queue_transaction(tx(1, 1, 10), 0).unwrap();

        let drained = pool.drain(2);
        assert_eq!(drained[0].nonce(), 0);
        assert_eq!(drained[1].nonce(), 1);
    }

    #[test]
    fn mark_invalid_removes_the_transaction_without_draining_it() {
        let pool = TransactionPool::new(100);
        let hash = pool.queue_transaction(tx(1, 0, 10), 0).unwrap();
        pool.mark_invalid(&hash);
        assert!(pool.is_empty());
    }

    #[tokio::test]
    async fn queueing_an_executable_transaction_notifies_subscribers() {
        let pool = TransactionPool::new(100);
        let mut rx = pool.subscribe_drain();
        pool.queue_transaction(tx(1, 0, 10), 0).unwrap();
        tokio::time::timeout(std::time::Duration::from_millis(100), rx.recv())
            .await
            .expect("drain notification within timeout")
            .expect("channel open");
    }
}
