//! Ordered palette of selectable block types.

use blockworld_common::{BlockType, PaletteError};
use serde::{Deserialize, Serialize};

/// Maximum palette length, one entry per digit hotkey.
pub const MAX_PALETTE_LEN: usize = 10;

/// Block types selectable in the default palette, in hotkey order.
pub const DEFAULT_BLOCK_TYPES: [&str; MAX_PALETTE_LEN] = [
    "grass",
    "stone",
    "brick",
    "wood",
    "tnt",
    "DiamondBlock",
    "PumpkinHead",
    "IronBlock",
    "CraftingTable",
    "furnace",
];

/// Fixed, ordered, non-empty list of block types.
///
/// The order is stable and is what digit hotkeys and scroll steps index into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BlockType>", into = "Vec<BlockType>")]
pub struct Palette {
    types: Vec<BlockType>,
}

impl Palette {
    /// Creates a palette, rejecting empty, oversized or duplicated lists.
    pub fn new<I, T>(types: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = T>,
        T: Into<BlockType>,
    {
        let types: Vec<BlockType> = types.into_iter().map(Into::into).collect();
        if types.is_empty() {
            return Err(PaletteError::Empty);
        }
        if types.len() > MAX_PALETTE_LEN {
            return Err(PaletteError::TooLarge {
                len: types.len(),
                max: MAX_PALETTE_LEN,
            });
        }
        for (i, ty) in types.iter().enumerate() {
            if types[..i].contains(ty) {
                return Err(PaletteError::Duplicate(ty.to_string()));
            }
        }
        Ok(Self { types })
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false; palettes are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Entry at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BlockType> {
        self.types.get(index)
    }

    /// Position of `ty` in the palette.
    #[must_use]
    pub fn index_of(&self, ty: &BlockType) -> Option<usize> {
        self.types.iter().position(|t| t == ty)
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.types.iter()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            types: DEFAULT_BLOCK_TYPES.iter().copied().map(BlockType::from).collect(),
        }
    }
}

impl std::ops::Index<usize> for Palette {
    type Output = BlockType;

    fn index(&self, index: usize) -> &Self::Output {
        &self.types[index]
    }
}

impl TryFrom<Vec<BlockType>> for Palette {
    type Error = PaletteError;

    fn try_from(types: Vec<BlockType>) -> Result<Self, Self::Error> {
        Self::new(types)
    }
}

impl From<Palette> for Vec<BlockType> {
    fn from(palette: Palette) -> Self {
        palette.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_order() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 10);
        assert_eq!(palette.get(0), Some(&BlockType::new("grass")));
        assert_eq!(palette.get(9), Some(&BlockType::new("furnace")));
        assert_eq!(palette.index_of(&BlockType::new("wood")), Some(3));
        assert!(palette.get(10).is_none());
    }

    #[test]
    fn test_palette_validation() {
        assert_eq!(Palette::new(Vec::<&str>::new()), Err(PaletteError::Empty));
        assert_eq!(
            Palette::new(["a", "b", "a"]),
            Err(PaletteError::Duplicate("a".to_string()))
        );
        let too_many: Vec<String> = (0..11).map(|i| format!("t{i}")).collect();
        assert_eq!(
            Palette::new(too_many),
            Err(PaletteError::TooLarge { len: 11, max: 10 })
        );
        assert!(Palette::new(["stone"]).is_ok());
    }
}
