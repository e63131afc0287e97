//! Wire-shaped request parameters, kept distinct from the domain types in
//! `forgechain-evm`/`forgechain-types` so the RPC boundary can evolve
//! (field renames, optional defaults) without touching execution code.

use alloy_primitives::{Address, Bytes, TxKind, U256};
use forgechain_evm::CallRequest;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallParams {
    pub from: Address,
    pub to: Option<Address>,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
    #[serde(default = "default_call_gas")]
    pub gas_limit: u64,
}

fn default_call_gas() -> u64 {
    30_000_000
}

impl From<CallParams> for CallRequest {
    fn from(params: CallParams) -> Self {
        CallRequest {
            from: params.from,
            to: match params.to {
                Some(address) => TxKind::Call(address),
                None => TxKind::Create,
            },
            value: params.value,
            data: params.data,
            gas_limit: params.gas_limit,
        }
    }
}
