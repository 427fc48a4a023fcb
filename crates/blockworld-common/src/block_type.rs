//! Block type identifiers.

use serde::{Deserialize, Serialize};

/// Identifier of a kind of block, e.g. `"grass"` or `"CraftingTable"`.
///
/// The set of identifiers is open: a saved world may name a type that the
/// current palette does not know about, and it is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockType(String);

impl BlockType {
    /// Creates a block type from its identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier can be written as the last field of a
    /// persisted `x,y,z,type` record and read back unchanged.
    #[must_use]
    pub fn is_persistable(&self) -> bool {
        !self.0.is_empty()
            && self.0.trim() == self.0
            && !self.0.contains(',')
            && !self.0.contains(['\n', '\r'])
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for BlockType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for BlockType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
