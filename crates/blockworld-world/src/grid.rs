//! The authoritative set of placed blocks.

use std::collections::BTreeMap;

use blockworld_common::{BlockPos, BlockType};
use serde::{Deserialize, Serialize};

/// A typed unit cube at one lattice position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    /// Lattice position
    pub pos: BlockPos,
    /// Kind of block
    pub block_type: BlockType,
}

impl Block {
    /// Creates a new block.
    #[must_use]
    pub fn new(pos: BlockPos, block_type: impl Into<BlockType>) -> Self {
        Self {
            pos,
            block_type: block_type.into(),
        }
    }
}

/// Mapping from lattice position to block type.
///
/// Holds at most one block per position. Iteration is ordered by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldGrid {
    blocks: BTreeMap<BlockPos, BlockType>,
}

impl WorldGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a block, replacing any block already at `pos`.
    ///
    /// Returns the replaced block, if there was one.
    pub fn insert(&mut self, pos: BlockPos, block_type: impl Into<BlockType>) -> Option<Block> {
        self.blocks
            .insert(pos, block_type.into())
            .map(|previous| Block::new(pos, previous))
    }

    /// Removes the block at `pos`. Returns whether one was there.
    pub fn remove(&mut self, pos: BlockPos) -> bool {
        self.blocks.remove(&pos).is_some()
    }

    /// Type of the block at `pos`.
    #[must_use]
    pub fn get(&self, pos: BlockPos) -> Option<&BlockType> {
        self.blocks.get(&pos)
    }

    /// Whether a block occupies `pos`.
    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.blocks.contains_key(&pos)
    }

    /// Owned snapshot of every block, ordered by position.
    ///
    /// Later mutations of the grid do not affect a snapshot already taken.
    #[must_use]
    pub fn all(&self) -> Vec<Block> {
        self.iter()
            .map(|(pos, ty)| Block::new(pos, ty.clone()))
            .collect()
    }

    /// Borrowing iterator over `(position, type)` pairs, ordered by position.
    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, &BlockType)> + '_ {
        self.blocks.iter().map(|(pos, ty)| (*pos, ty))
    }

    /// Removes every block.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the grid has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Extend<Block> for WorldGrid {
    fn extend<I: IntoIterator<Item = Block>>(&mut self, iter: I) {
        for block in iter {
            self.insert(block.pos, block.block_type);
        }
    }
}

impl FromIterator<Block> for WorldGrid {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        let mut grid = Self::new();
        grid.extend(iter);
        grid
    }
}
