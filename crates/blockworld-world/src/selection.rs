//! Currently selected block type.

use blockworld_common::BlockType;

use crate::palette::Palette;

/// Emitted whenever a selection request is accepted.
///
/// Carries what a preview display needs to refresh itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    /// Index before the change
    pub previous: usize,
    /// Index after the change
    pub current: usize,
    /// Type now selected
    pub block_type: BlockType,
}

/// Index into a palette, always in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    palette: Palette,
    index: usize,
}

impl SelectionState {
    /// Starts with the first palette entry selected.
    #[must_use]
    pub fn new(palette: Palette) -> Self {
        Self { palette, index: 0 }
    }

    /// Selects `index` if it is inside the palette, otherwise does nothing.
    pub fn select_by_index(&mut self, index: usize) -> Option<SelectionChanged> {
        if index >= self.palette.len() {
            return None;
        }
        Some(self.set(index))
    }

    /// Moves the selection by `delta`, wrapping around both ends.
    pub fn step(&mut self, delta: i64) -> Option<SelectionChanged> {
        let len = i64::try_from(self.palette.len()).ok()?;
        let current = i64::try_from(self.index).ok()?;
        let next = (current + delta.rem_euclid(len)).rem_euclid(len);
        Some(self.set(usize::try_from(next).ok()?))
    }

    /// Selected type.
    #[must_use]
    pub fn current(&self) -> &BlockType {
        // index is kept < palette.len() and palettes are never empty
        &self.palette[self.index]
    }

    /// Selected index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The palette being indexed.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    fn set(&mut self, index: usize) -> SelectionChanged {
        let previous = self.index;
        self.index = index;
        SelectionChanged {
            previous,
            current: index,
            block_type: self.current().clone(),
        }
    }
}
