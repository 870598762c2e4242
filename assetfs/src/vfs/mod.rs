//! Overlay filesystems built from mounted resource pools.
//!
//! # Overview
//!
//! A mount is a [`ResourcePool`] registered with an overlay. Mount order is
//! priority: the earliest mount wins ties.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           VirtualFileSystem             │
//! │                                         │
//! │  mounts: [base.dir, patch.pak, ...]     │
//! │  resolve(path, pool): exact, then       │
//! │    segment-by-segment case-insensitive  │
//! └────────────────┬────────────────────────┘
//!                  │ wrapped by
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │         FastVirtualFileSystem           │
//! │                                         │
//! │  index: HashMap<folded path, mount>     │
//! │  built eagerly on every mount           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Precedence Rules
//!
//! - `resource_type` and `file_content` are first-match per mount. A file in a
//!   later mount is still returned by `file_content` when an earlier mount
//!   holds a directory at the same path.
//! - `directory_content` is the lower-cased union of every mount that
//!   resolves the path as a directory.
//!
//! The asymmetry is kept for compatibility with existing asset layouts.
//!
//! # Example
//!
//! ```ignore
//! use assetfs::vfs::{AssetFileSystem, FastVirtualFileSystem};
//! use assetfs::pool::ResourcePool;
//!
//! let mut vfs = FastVirtualFileSystem::new();
//! vfs.mount_backend("dir", "./mods/hd_textures")?;
//! vfs.mount_backend("pak", "./data/base.pak?textures")?;
//!
//! let mut stream = vfs.file_content("Textures/Grass.dds").expect("asset");
//! ```

mod indexed;
mod overlay;
mod registry;

pub use indexed::FastVirtualFileSystem;
pub use overlay::{resolve, Resolved, VirtualFileSystem};
pub use registry::{backend_tags, open_backend};

use std::sync::Arc;

use thiserror::Error;

use crate::path::{Path, PathError};
use crate::pool::{PackError, ResourcePool};

/// Errors raised when building an overlay.
///
/// Lookups never fail for absence; only mounting can fail.
#[derive(Debug, Error)]
pub enum VfsError {
    /// The backend tag is not in the registry.
    #[error("Unsupported backend '{0}'")]
    UnsupportedBackend(String),

    /// A pack archive could not be opened.
    #[error("Failed to open pack archive: {0}")]
    Pack(#[from] PackError),

    /// A location could not be turned into a path.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// An overlay of mounted pools that is itself a [`ResourcePool`].
pub trait AssetFileSystem: ResourcePool {
    /// Append a pool to the mount list and return its mount slot.
    fn mount(&mut self, pool: Arc<dyn ResourcePool>) -> usize;

    /// Number of mounted pools.
    fn mount_count(&self) -> usize;

    /// Every file under `base` whose overlay path satisfies `predicate`.
    ///
    /// Paths are `base` joined with lower-cased child names. Order is
    /// unspecified.
    fn search_file_paths(&self, predicate: &dyn Fn(&Path) -> bool, base: &Path) -> Vec<Path>;

    /// Open a backend by tag and mount it.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::UnsupportedBackend`] for an unknown tag, or the
    /// backend's own error if it cannot be opened.
    fn mount_backend(&mut self, tag: &str, location: &str) -> Result<usize, VfsError> {
        let pool = open_backend(tag, location)?;
        Ok(self.mount(pool))
    }
}
