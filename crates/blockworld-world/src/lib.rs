//! # Block World Core
//!
//! The voxel world model of the block world sandbox.
//!
//! This crate handles:
//! - The authoritative grid of placed blocks
//! - Place/remove edits driven by hit-test results
//! - Palette selection
//! - Block type to texture resolution with fallbacks
//! - Text save/load of the grid
//!
//! Windowing, rendering and input devices live outside this crate. They are
//! reached through the [`SceneHook`] and [`Raycast`] traits.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod edit;
pub mod generation;
pub mod grid;
pub mod palette;
pub mod persistence;
pub mod registry;
pub mod selection;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::edit::*;
    pub use crate::generation::*;
    pub use crate::grid::*;
    pub use crate::palette::*;
    pub use crate::persistence::{LoadReport, MalformedLine, SavedWorld, DEFAULT_SAVE_FILE};
    pub use crate::registry::*;
    pub use crate::selection::*;
}

pub use prelude::*;
