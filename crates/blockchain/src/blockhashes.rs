use alloy_primitives::B256;
use forgechain_evm::BlockHashProvider;
use forgechain_storage::{BlockManager, Database};

/// The EVM's `BLOCKHASH` lookup, backed by forgechain's own block store —
/// an external collaborator with a fixed interface, same as the EVM itself.
pub struct ChainBlockHashes<D> {
    blocks: BlockManager<D>,
}

impl<D: Database> ChainBlockHashes<D> {
    pub fn new(blocks: BlockManager<D>) -> Self {
        Self { blocks }
    }
}

impl<D: Database> BlockHashProvider for ChainBlockHashes<D> {
    fn block_hash(&self, number: u64) -> Option<B256> {
        self.blocks.get_by_number(number).ok().flatten().map(|block| block.hash())
    }
}
