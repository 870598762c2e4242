//! assetfs - Layered virtual filesystem for game assets
//!
//! This library loads assets from loose directory trees, packed archives and
//! in-memory pools through one case-tolerant path interface.
//!
//! # Modules
//!
//! - [`path`]: normalized path values with POSIX, drive and scheme roots
//! - [`pool`]: the [`ResourcePool`](pool::ResourcePool) contract, backends and decorators
//! - [`vfs`]: the linear and indexed overlays that combine mounted pools
//! - [`config`]: INI configuration describing a mount set
//! - [`logging`]: tracing subscriber setup for binaries

pub mod config;
pub mod logging;
pub mod path;
pub mod pool;
pub mod vfs;

pub use path::{Path, PathError};
pub use pool::{ContentStream, ResourcePool, ResourceType};
pub use vfs::{AssetFileSystem, FastVirtualFileSystem, VfsError, VirtualFileSystem};
