//! Block registry: maps block types to render attributes.
//!
//! Texture problems never surface as errors here. A type whose texture is
//! missing or undecodable resolves to the fallback type's attributes, and if
//! the fallback is unusable too, to a built-in placeholder.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use blockworld_common::{AssetError, BlockType};
use tracing::{debug, warn};

use crate::palette::Palette;

/// Built-in texture used when nothing else is available.
pub const PLACEHOLDER_TEXTURE: &str = "white_cube";

/// Type whose attributes stand in for unknown or broken types.
pub const DEFAULT_FALLBACK_TYPE: &str = "wood";

/// Texture file extension looked up in the asset directory.
pub const TEXTURE_EXTENSION: &str = "png";

/// Reference to the texture a renderer should bind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextureRef {
    /// Texture file on disk
    Asset(PathBuf),
    /// Texture the renderer provides by name
    Builtin(&'static str),
}

/// Everything a renderer needs to draw a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderAttributes {
    /// Texture to apply to all faces
    pub texture: TextureRef,
}

impl RenderAttributes {
    /// Attributes backed by a texture file.
    #[must_use]
    pub fn asset(path: impl Into<PathBuf>) -> Self {
        Self {
            texture: TextureRef::Asset(path.into()),
        }
    }

    /// Neutral built-in placeholder.
    #[must_use]
    pub const fn placeholder() -> Self {
        Self {
            texture: TextureRef::Builtin(PLACEHOLDER_TEXTURE),
        }
    }

    /// Whether these are the placeholder attributes.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.texture == TextureRef::Builtin(PLACEHOLDER_TEXTURE)
    }
}

/// Loads the texture backing a block type.
pub trait TextureSource {
    /// Resolves the texture for `ty` or reports why it is unusable.
    fn load(&self, ty: &BlockType) -> Result<TextureRef, AssetError>;
}

/// Texture source reading `<root>/<type>.png`.
///
/// Only the image header is decoded, enough to reject missing or corrupt
/// files up front.
#[derive(Debug, Clone)]
pub struct AssetDirTextures {
    root: PathBuf,
}

impl AssetDirTextures {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path the texture for `ty` is expected at.
    #[must_use]
    pub fn path_for(&self, ty: &BlockType) -> PathBuf {
        self.root.join(format!("{ty}.{TEXTURE_EXTENSION}"))
    }
}

impl TextureSource for AssetDirTextures {
    fn load(&self, ty: &BlockType) -> Result<TextureRef, AssetError> {
        let path = self.path_for(ty);
        if !path.is_file() {
            return Err(AssetError::NotFound(path));
        }
        match image::image_dimensions(&path) {
            Ok((width, height)) => {
                debug!("Texture {} is {}x{}", path.display(), width, height);
                Ok(TextureRef::Asset(path))
            },
            Err(e) => Err(AssetError::Decode {
                path,
                reason: e.to_string(),
            }),
        }
    }
}

/// Resolved render attributes for every usable block type.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    attributes: HashMap<BlockType, RenderAttributes>,
    fallback_type: BlockType,
    fallback: RenderAttributes,
    /// Types already reported as falling back; each is warned about once
    fallen_back: RefCell<HashSet<BlockType>>,
}

impl BlockRegistry {
    /// Loads textures for every palette entry and the fallback type.
    pub fn load<S: TextureSource + ?Sized>(
        palette: &Palette,
        fallback_type: &BlockType,
        source: &S,
    ) -> Self {
        let mut attributes = HashMap::with_capacity(palette.len() + 1);
        let mut fallen_back = HashSet::new();
        let wanted = palette
            .iter()
            .chain((palette.index_of(fallback_type).is_none()).then_some(fallback_type));

        for ty in wanted {
            match source.load(ty) {
                Ok(texture) => {
                    attributes.insert(ty.clone(), RenderAttributes { texture });
                },
                Err(e) => {
                    warn!("Texture for '{}' unavailable: {}", ty, e);
                    fallen_back.insert(ty.clone());
                },
            }
        }

        let fallback = if let Some(attrs) = attributes.get(fallback_type) {
            attrs.clone()
        } else {
            warn!(
                "Fallback type '{}' has no texture, using '{}'",
                fallback_type, PLACEHOLDER_TEXTURE
            );
            RenderAttributes::placeholder()
        };

        Self {
            attributes,
            fallback_type: fallback_type.clone(),
            fallback,
            fallen_back: RefCell::new(fallen_back),
        }
    }

    /// Registry with no textures at all; every type renders as the placeholder.
    #[must_use]
    pub fn placeholder_only() -> Self {
        Self {
            attributes: HashMap::new(),
            fallback_type: BlockType::new(DEFAULT_FALLBACK_TYPE),
            fallback: RenderAttributes::placeholder(),
            fallen_back: RefCell::default(),
        }
    }

    /// Returns render attributes for `ty`. Never fails.
    ///
    /// The first fallback for a type is logged as a warning, later ones only
    /// at debug level.
    #[must_use]
    pub fn resolve(&self, ty: &BlockType) -> RenderAttributes {
        if let Some(attrs) = self.attributes.get(ty) {
            return attrs.clone();
        }
        let substitute = if self.fallback.is_placeholder() {
            PLACEHOLDER_TEXTURE
        } else {
            self.fallback_type.as_str()
        };
        if self.fallen_back.borrow_mut().insert(ty.clone()) {
            warn!("No texture for '{}', defaulting to '{}'", ty, substitute);
        } else {
            debug!("No texture for '{}', defaulting to '{}'", ty, substitute);
        }
        self.fallback.clone()
    }

    /// Types that have resolved to the fallback so far, sorted.
    #[must_use]
    pub fn fallen_back_types(&self) -> Vec<BlockType> {
        let mut types: Vec<BlockType> = self.fallen_back.borrow().iter().cloned().collect();
        types.sort();
        types
    }

    /// Whether `ty` has its own texture.
    #[must_use]
    pub fn has_texture(&self, ty: &BlockType) -> bool {
        self.attributes.contains_key(ty)
    }

    /// The type used as fallback.
    #[must_use]
    pub fn fallback_type(&self) -> &BlockType {
        &self.fallback_type
    }
}
