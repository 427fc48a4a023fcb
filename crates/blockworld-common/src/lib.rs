//! # Block World Common
//!
//! Common types shared by every block world crate:
//! - Lattice coordinates and face normals
//! - Block type identifiers
//! - The error taxonomy used by the world core and the host

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod block_type;
pub mod coords;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::block_type::*;
    pub use crate::coords::*;
    pub use crate::error::*;
}

pub use prelude::*;
