//! Resource pools: the backends behind the virtual filesystem.
//!
//! Every backend implements the minimal [`ResourcePool`] contract: a type
//! query, a content query and a non-recursive directory listing, all keyed by
//! relative, `/`-separated path strings.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │   CachedResourcePool     │  memoizes type + listing
//! │   └── OffsetResourcePool │  rebases under a sub-path
//! │       └── FileResourcePool / PackResourcePool / MemoryResourcePool
//! └──────────────────────────┘
//! ```
//!
//! Decorators hold an `Arc<dyn ResourcePool>` to their inner pool, so one
//! backend can be shared between several mounts.
//!
//! # Failure model
//!
//! "Missing" and "inaccessible" are the same thing at this boundary: pools
//! answer [`ResourceType::NonExistent`], `None` or an empty listing, and never
//! surface backend I/O errors.

mod cached;
mod file;
mod memory;
mod offset;
mod pack;

pub use cached::CachedResourcePool;
pub use file::FileResourcePool;
pub use memory::MemoryResourcePool;
pub use offset::OffsetResourcePool;
pub use pack::{PackError, PackResourcePool, PackWriter, DEFAULT_PARTITION, PACK_MAGIC};

use std::fmt;
use std::io::Read;
use std::sync::Arc;

/// A readable byte stream positioned at offset zero.
///
/// The caller owns the stream and must drop it before asking the same pool
/// for another one; single-handle backends refuse overlapping streams.
pub type ContentStream = Box<dyn Read + Send>;

/// Kind of resource found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// Nothing is there, or it could not be accessed.
    NonExistent,
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

impl ResourceType {
    /// Check if the resource exists.
    pub fn exists(&self) -> bool {
        !matches!(self, ResourceType::NonExistent)
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, ResourceType::File)
    }

    /// Check if this is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, ResourceType::Directory)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::NonExistent => write!(f, "missing"),
            ResourceType::File => write!(f, "file"),
            ResourceType::Directory => write!(f, "directory"),
        }
    }
}

/// Capability surface every backend and decorator provides.
///
/// Paths are relative and `/`-separated. Case sensitivity is a property of
/// the backend; callers must not assume either.
pub trait ResourcePool: Send + Sync {
    /// Query what kind of resource lives at `path`.
    ///
    /// Never fails: missing and inaccessible both report
    /// [`ResourceType::NonExistent`].
    fn resource_type(&self, path: &str) -> ResourceType;

    /// Open the file at `path` for reading.
    ///
    /// Returns `None` when `path` is not a file, or when a single-handle
    /// backend still has a previous stream outstanding.
    fn file_content(&self, path: &str) -> Option<ContentStream>;

    /// List the immediate children of `path` in backend-native casing.
    ///
    /// Returns an empty list for files and missing paths.
    fn directory_content(&self, path: &str) -> Vec<String>;
}

impl<P: ResourcePool + ?Sized> ResourcePool for Arc<P> {
    fn resource_type(&self, path: &str) -> ResourceType {
        (**self).resource_type(path)
    }

    fn file_content(&self, path: &str) -> Option<ContentStream> {
        (**self).file_content(path)
    }

    fn directory_content(&self, path: &str) -> Vec<String> {
        (**self).directory_content(path)
    }
}

impl<P: ResourcePool + ?Sized> ResourcePool for Box<P> {
    fn resource_type(&self, path: &str) -> ResourceType {
        (**self).resource_type(path)
    }

    fn file_content(&self, path: &str) -> Option<ContentStream> {
        (**self).file_content(path)
    }

    fn directory_content(&self, path: &str) -> Vec<String> {
        (**self).directory_content(path)
    }
}
