//! Texture handles and the loading seam used to attach presentation data to entities.
//!
//! The simulation never looks inside a texture; it only stores [`TextureHandle`]s
//! on sprites so that a renderer can draw them later.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::TextureError;

pub mod cache;

pub use cache::{SpriteTextures, TextureCache};

/// Stable identifier for a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    /// Handed out for every texture that failed to load.
    pub const PLACEHOLDER: TextureHandle = TextureHandle(0);

    pub fn is_placeholder(self) -> bool {
        self == Self::PLACEHOLDER
    }
}

impl Default for TextureHandle {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}

/// A backend capable of turning a concrete path into texture data.
pub trait TextureLoader {
    type Texture;

    fn load(&mut self, path: &Path) -> Result<Self::Texture, TextureError>;
}

/// Loads raw texture bytes from the filesystem, leaving decoding to the renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsTextureLoader;

impl TextureLoader for FsTextureLoader {
    type Texture = Vec<u8>;

    fn load(&mut self, path: &Path) -> Result<Self::Texture, TextureError> {
        fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => TextureError::NotFound(path.to_path_buf()),
            _ => TextureError::LoadFailed {
                path: path.to_path_buf(),
                source,
            },
        })
    }
}
