//! The RPC-facing dispatch shim. `forgechain-rpc` doesn't speak JSON-RPC
//! over a socket itself — it's the `Executor` surface a transport layer
//! calls into, narrowed to a fixed whitelist of method names.

pub mod error;
pub mod executor;
pub mod params;

pub use error::RpcError;
pub use executor::Executor;
pub use params::CallParams;
