//! Initial world generation.

use blockworld_common::{BlockPos, BlockType};

use crate::grid::{Block, WorldGrid};

/// Platform generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Width and length of the platform in blocks
    pub size: u32,
    /// Number of layers, going down from y = 0
    pub depth: u32,
    /// Type of every generated block
    pub ground_type: BlockType,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size: 20,
            depth: 2,
            ground_type: BlockType::new("grass"),
        }
    }
}

/// Generates the flat starting platform.
#[derive(Debug, Clone, Default)]
pub struct WorldGenerator {
    config: GeneratorConfig,
}

impl WorldGenerator {
    /// Creates a new generator with the given config.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Blocks of the platform: x and z in `0..size`, y in `0, -1, ..`.
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        let size = clamp_i32(self.config.size);
        let depth = clamp_i32(self.config.depth);
        (0..size).flat_map(move |z| {
            (0..depth).flat_map(move |y| {
                (0..size).map(move |x| {
                    Block::new(BlockPos::new(x, -y, z), self.config.ground_type.clone())
                })
            })
        })
    }

    /// Builds a fresh grid holding the platform.
    #[must_use]
    pub fn generate(&self) -> WorldGrid {
        self.blocks().collect()
    }
}

fn clamp_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
