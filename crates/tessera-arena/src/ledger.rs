//! Optional record of outstanding allocations.
//!
//! The occupancy map alone cannot tell a valid free from a double free or a
//! free with the wrong length. When tracking is enabled the arena keeps a
//! [`Ledger`] of `offset -> length` for every live block and checks each free
//! against it before touching the map.

use indexmap::IndexMap;

use crate::error::ArenaError;

/// Live blocks keyed by arena offset.
#[derive(Clone, Debug, Default)]
pub(crate) struct Ledger {
    blocks: IndexMap<usize, usize>,
}

impl Ledger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a freshly reserved block.
    pub(crate) fn record(&mut self, offset: usize, len: usize) {
        let previous = self.blocks.insert(offset, len);
        debug_assert!(
            previous.is_none(),
            "offset {offset} reserved while still outstanding"
        );
    }

    /// Remove the block at `offset` if its length is exactly `len`.
    pub(crate) fn release(&mut self, offset: usize, len: usize) -> Result<(), ArenaError> {
        match self.blocks.get(&offset) {
            Some(&recorded) if recorded == len => {
                self.blocks.swap_remove(&offset);
                Ok(())
            }
            _ => Err(ArenaError::UnknownBlock { offset, len }),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Outstanding `(offset, len)` pairs sorted by offset.
    pub(crate) fn blocks(&self) -> Vec<(usize, usize)> {
        let mut blocks: Vec<_> = self.blocks.iter().map(|(&o, &l)| (o, l)).collect();
        blocks.sort_unstable();
        blocks
    }
}
