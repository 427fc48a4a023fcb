//! Error types for the block world.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for block world operations.
#[derive(Debug, Error)]
pub enum BlockWorldError {
    /// Save/load errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Palette construction errors
    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A texture or other backing asset could not be used.
///
/// Always recovered inside the block registry by fallback substitution.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Asset file does not exist
    #[error("Asset not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Asset exists but could not be decoded
    #[error("Failed to decode asset {}: {reason}", path.display())]
    Decode {
        /// Path of the asset
        path: PathBuf,
        /// Decoder message
        reason: String,
    },
}

/// A single persisted record that could not be read or written.
///
/// Recovered by skipping the record; never aborts a save or a load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Line does not split into exactly four comma-separated fields
    #[error("Expected 4 fields, found {found}")]
    FieldCount {
        /// Number of fields present
        found: usize,
    },

    /// A coordinate field is not a base-10 integer
    #[error("Invalid {axis} coordinate: {value:?}")]
    InvalidCoordinate {
        /// Axis name (`x`, `y` or `z`)
        axis: char,
        /// Offending text
        value: String,
    },

    /// Type field is empty
    #[error("Missing block type")]
    EmptyBlockType,

    /// Block type cannot be written as a record field
    #[error("Block type {0:?} cannot be persisted")]
    UnpersistableBlockType(String),

    /// A position component is NaN or infinite
    #[error("Non-finite coordinate")]
    NonFiniteCoordinate,

    /// A position component does not fit the lattice range
    #[error("Coordinate out of range")]
    CoordinateOutOfRange,
}

/// Save/load failures that are reported to the caller.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// There is no saved world at the given location
    #[error("No saved world at {}", path.display())]
    SourceNotFound {
        /// Location that was looked up
        path: PathBuf,
    },

    /// Reading or writing the save failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid palette definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// Palette has no entries
    #[error("Palette is empty")]
    Empty,

    /// Palette has more entries than there are digit hotkeys
    #[error("Palette has {len} entries, at most {max} are allowed")]
    TooLarge {
        /// Number of entries given
        len: usize,
        /// Maximum number of entries
        max: usize,
    },

    /// The same type appears twice
    #[error("Duplicate palette entry: {0}")]
    Duplicate(String),
}

/// Result type alias for block world operations.
pub type BlockWorldResult<T> = Result<T, BlockWorldError>;
