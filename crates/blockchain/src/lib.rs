//! The in-process chain: lifecycle, the serialized block-commit pipeline,
//! snapshot/revert, and the event bus everything above it subscribes to.

pub mod blockhashes;
pub mod chain;
pub mod error;
pub mod event;
pub mod status;

pub use chain::Blockchain;
pub use error::ChainError;
pub use event::Event;
pub use status::Status;
