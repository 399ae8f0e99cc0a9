use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::asset::AssetResolver;
use crate::constants::texture;
use crate::map::mechanism::MechanismKind;
use crate::texture::{TextureHandle, TextureLoader};

/// An owned texture cache.
///
/// Each distinct path is handed to the loader at most once. Repeated requests
/// return the same handle, and failed loads stay mapped to the placeholder so
/// they are not retried.
pub struct TextureCache<L: TextureLoader> {
    loader: L,
    handles: HashMap<PathBuf, TextureHandle>,
    /// Texture data, indexed by `handle - 1`.
    textures: Vec<L::Texture>,
}

impl<L: TextureLoader> TextureCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            handles: HashMap::new(),
            textures: Vec::new(),
        }
    }

    /// Returns the handle for `path`, loading it on first request.
    pub fn get_texture(&mut self, path: impl AsRef<Path>) -> TextureHandle {
        let path = path.as_ref();
        if let Some(&handle) = self.handles.get(path) {
            return handle;
        }

        let handle = match self.loader.load(path) {
            Ok(texture) => {
                self.textures.push(texture);
                let handle = TextureHandle(self.textures.len() as u32);
                debug!(path = %path.display(), handle = handle.0, "Texture loaded");
                handle
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Texture failed to load, using placeholder");
                TextureHandle::PLACEHOLDER
            }
        };

        self.handles.insert(path.to_path_buf(), handle);
        handle
    }

    /// Looks up loaded texture data. The placeholder has none.
    pub fn texture(&self, handle: TextureHandle) -> Option<&L::Texture> {
        (handle.0 as usize).checked_sub(1).and_then(|index| self.textures.get(index))
    }

    /// Number of distinct paths requested so far.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

/// The handles attached to spawned entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteTextures {
    pub player: TextureHandle,
    pub enemy: TextureHandle,
    pub key: TextureHandle,
    pub spike: TextureHandle,
    pub trigger: TextureHandle,
    pub door: TextureHandle,
    pub trap: TextureHandle,
    pub bridge: TextureHandle,
    pub lever: TextureHandle,
}

impl SpriteTextures {
    /// Resolves and loads every sprite texture through `cache`.
    pub fn load<L: TextureLoader>(cache: &mut TextureCache<L>, resolver: &AssetResolver) -> Self {
        let mut get = |logical: &str| cache.get_texture(resolver.resolve(logical));
        Self {
            player: get(texture::PLAYER),
            enemy: get(texture::ENEMY),
            key: get(texture::KEY),
            spike: get(texture::SPIKE),
            trigger: get(texture::TRIGGER),
            door: get(texture::DOOR),
            trap: get(texture::TRAP),
            bridge: get(texture::BRIDGE),
            lever: get(texture::LEVER),
        }
    }

    /// Texture drawn on a mechanism's target tile.
    pub fn target(&self, kind: MechanismKind) -> TextureHandle {
        match kind {
            MechanismKind::Door => self.door,
            MechanismKind::Trap => self.trap,
            MechanismKind::Bridge => self.bridge,
            MechanismKind::Lever => self.lever,
        }
    }
}
