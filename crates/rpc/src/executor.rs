//! A safe dispatch shim: a method name plus positional parameters,
//! arbitrary input from JSON-RPC, checked against a fixed set of declared
//! methods before anything runs.
//!
//! A reflection-based host would need to explicitly reject `"constructor"`
//! and walk-the-prototype-chain attacks; a `match` over a closed set of
//! string literals gets the same guarantee for free — there is no
//! prototype chain to walk, and any name that isn't one of the arms below
//! falls through to the same `InvalidMethod` rejection.

use crate::{error::RpcError, params::CallParams};
use forgechain_storage::Database;
use forgechain_types::TxSigned;
use serde_json::{json, Value};
use tracing::warn;

/// Method names this dispatch shim accepts: the full public control
/// surface of `Blockchain` (`isMining`/`mine`/`pause`/`resume`/`snapshot`/
/// `revert`/`increaseTime`/`setTime`/`queueTransaction`/
/// `simulateTransaction`/`stop`).
pub const METHODS: &[&str] = &[
    "isMining",
    "mine",
    "pause",
    "resume",
    "stop",
    "snapshot",
    "revert",
    "increaseTime",
    "setTime",
    "queueTransaction",
    "simulateTransaction",
];

/// Wraps a [`forgechain_blockchain::Blockchain`] handle and dispatches
/// named, positional-parameter calls against it.
pub struct Executor<D: Database> {
    chain: forgechain_blockchain::Blockchain<D>,
}

impl<D: Database> Executor<D> {
    pub fn new(chain: forgechain_blockchain::Blockchain<D>) -> Self {
        Self { chain }
    }

    /// Runs `method` with `params`, rejecting anything not in [`METHODS`]
    /// — including the literal name `"constructor"` — before touching the
    /// chain at all.
    pub async fn dispatch(&self, method: &str, params: &[Value]) -> Result<Value, RpcError> {
        match method {
            "isMining" => Ok(json!(self.chain.is_mining().await)),

            "mine" => {
                self.chain.mine().await?;
                Ok(Value::Null)
            }

            "pause" => {
                self.chain.pause().await?;
                Ok(Value::Null)
            }

            "resume" => {
                self.chain.resume().await?;
                Ok(Value::Null)
            }

            "stop" => {
                self.chain.stop().await?;
                Ok(Value::Null)
            }

            "snapshot" => Ok(json!(self.chain.snapshot().await)),

            "revert" => {
                let id = param::<u64>(method, params, 0)?;
                self.chain.revert(id).await?;
                Ok(json!(true))
            }

            "increaseTime" => {
                let seconds = param::<i64>(method, params, 0)?;
                Ok(json!(self.chain.increase_time(seconds).await))
            }

            "setTime" => {
                let target = param::<i64>(method, params, 0)?;
                Ok(json!(self.chain.set_time(target).await))
            }

            "queueTransaction" => {
                let tx = param::<TxSigned>(method, params, 0)?;
                let hash = self.chain.queue_transaction(tx).await?;
                Ok(json!(hash))
            }

            "simulateTransaction" => {
                let call = param::<CallParams>(method, params, 0)?;
                let outcome = self.chain.simulate_transaction(call.into()).await?;
                Ok(json!({
                    "success": outcome.success,
                    "output": outcome.output,
                    "gasUsed": outcome.gas_used,
                }))
            }

            other => {
                warn!(target: "forgechain::rpc", method = other, "rejected dispatch of unknown method");
                Err(RpcError::InvalidMethod(other.to_string()))
            }
        }
    }
}

fn param<T: serde::de::DeserializeOwned>(
    method: &str,
    params: &[Value],
    index: usize,
) -> Result<T, RpcError> {
    let value = params.get(index).ok_or_else(|| RpcError::InvalidParams {
        method: method.to_string(),
        reason: format!("missing parameter {index}"),
    })?;
    serde_json::from_value(value.clone()).map_err(|source| RpcError::InvalidParams {
        method: method.to_string(),
        reason: source.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgechain_storage::MemoryDatabase;
    use forgechain_types::Config;
    use forgechain_pool::TransactionPool;
    use std::sync::Arc;

    fn test_executor() -> Executor<MemoryDatabase> {
        let db = Arc::new(MemoryDatabase::new());
        let pool = Arc::new(TransactionPool::new(100));
        let chain = forgechain_blockchain::Blockchain::new(db, pool, Config::default())
            .expect("default hardfork parses");
        Executor::new(chain)
    }

    #[tokio::test]
    async fn unknown_methods_are_rejected() {
        let executor = test_executor();
        let result = executor.dispatch("dropTable", &[]).await;
        assert!(matches!(result, Err(RpcError::InvalidMethod(name)) if name == "dropTable"));
    }

    #[tokio::test]
    async fn constructor_is_rejected_like_any_other_unknown_method() {
        let executor = test_executor();
        let result = executor.dispatch("constructor", &[]).await;
        assert!(matches!(result, Err(RpcError::InvalidMethod(_))));
    }

    #[tokio::test]
    async fn is_mining_reflects_chain_status() {
        let executor = test_executor();
        executor.chain.start().await.unwrap();
        let result = executor.dispatch("isMining", &[]).await.unwrap();
        assert_eq!(result, json!(true));
    }

    #[tokio::test]
    async fn revert_with_a_missing_parameter_is_rejected() {
        let executor = test_executor();
        executor.chain.start().await.unwrap();
        let result = executor.dispatch("revert", &[]).await;
        assert!(matches!(result, Err(RpcError::InvalidParams { .. })));
    }
}
