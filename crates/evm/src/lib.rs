//! EVM execution behind a fixed trait, so the rest of forgechain never
//! touches `revm` directly.

pub mod db;
pub mod error;
pub mod executor;
pub mod outcome;
pub mod traits;

pub use error::EvmError;
pub use executor::RevmExecutor;
pub use outcome::{CallOutcome, ExecutionOutcome};
pub use traits::{BlockHashProvider, CallRequest, Evm};
