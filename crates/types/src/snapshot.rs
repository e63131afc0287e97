use crate::primitives::B256;

/// A point the chain can be rolled back to: the tip at the time `snapshot`
/// was called, plus the time adjustment in effect then. `Blockchain` keeps
/// these in an ordered stack; `revert` pops back to (and discards) the
/// most recent one.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub id: u64,
    pub block_hash: B256,
    pub block_number: u64,
    pub state_root: B256,
    pub time_adjustment: i64,
}
