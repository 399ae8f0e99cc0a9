//! Logical-to-concrete asset path resolution.

use std::env;
use std::path::{Path, PathBuf};

use tracing::{trace, warn};

/// Environment variable holding extra search roots, separated like `PATH`.
pub const ASSET_PATH_ENV: &str = "TILEMAZE_ASSETS";

/// Resolves logical asset paths (`sprites/player.png`) against a list of search roots.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    roots: Vec<PathBuf>,
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::new(["assets"])
    }
}

impl AssetResolver {
    pub fn new<P: Into<PathBuf>>(roots: impl IntoIterator<Item = P>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Roots from [`ASSET_PATH_ENV`], followed by the default `assets` directory.
    pub fn from_env() -> Self {
        let mut roots: Vec<PathBuf> = env::var_os(ASSET_PATH_ENV)
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();
        roots.push(PathBuf::from("assets"));
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Returns the first root that contains `logical`.
    ///
    /// Falls back to the logical path itself, with a warning, when no root has it.
    pub fn resolve(&self, logical: impl AsRef<Path>) -> PathBuf {
        let logical = logical.as_ref();
        if let Some(found) = self.roots.iter().map(|root| root.join(logical)).find(|path| path.is_file()) {
            trace!(logical = %logical.display(), resolved = %found.display(), "Asset resolved");
            return found;
        }

        warn!(logical = %logical.display(), "Asset not found in any search root");
        logical.to_path_buf()
    }
}
