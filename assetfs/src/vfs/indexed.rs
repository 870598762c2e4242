//! Eagerly indexed overlay.
//!
//! Trades a full traversal of every pool at mount time for single hash
//! lookups afterwards. Results are the same as [`VirtualFileSystem`]'s for
//! the same mounts and queries, provided no single pool holds two names that
//! differ only in case. Such pools can make `search_file_paths` report a file
//! the linear walk cannot reach.
//!
//! # Index rules
//!
//! Keys are case-folded paths, so one entry answers every spelling.
//!
//! - A file is indexed only if no earlier mount already indexed its key and
//!   no mount so far holds a directory there. The earliest mount wins.
//! - A directory found by any mount claims its key, which blocks files from
//!   later mounts at the same key.
//! - Directories are never indexed; directory queries always fall back.
//!
//! The index is never invalidated. Backing data must not change while the
//! overlay is alive.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use super::overlay::{resolve, Resolved, VirtualFileSystem};
use super::AssetFileSystem;
use crate::path::Path;
use crate::pool::{ContentStream, ResourcePool, ResourceType};

/// A [`VirtualFileSystem`] with a mount-time file index.
#[derive(Default)]
pub struct FastVirtualFileSystem {
    base: VirtualFileSystem,

    /// Folded file path -> owning mount slot.
    index: HashMap<Path, usize>,

    /// Folded directory paths seen in any mount.
    claimed_directories: HashSet<Path>,
}

impl FastVirtualFileSystem {
    /// Create an overlay with no mounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files in the index.
    pub fn indexed_file_count(&self) -> usize {
        self.index.len()
    }

    /// Mounted pools in priority order.
    pub fn mounts(&self) -> &[Arc<dyn ResourcePool>] {
        self.base.mounts()
    }

    fn index_key(path: &Path) -> Path {
        path.ancestor(path.parts().len()).case_folded()
    }

    /// Traverse one pool breadth-first and merge its files into the index.
    fn index_mount(&mut self, slot: usize) {
        let started = Instant::now();
        let pool = Arc::clone(&self.base.mounts()[slot]);

        let mut files = Vec::new();
        let mut directories = Vec::new();
        let mut pending = VecDeque::from([Path::empty()]);

        while let Some(dir) = pending.pop_front() {
            for name in pool.directory_content(&dir.to_posix_string()) {
                let child = dir.child(&name);
                match pool.resource_type(&child.to_posix_string()) {
                    ResourceType::Directory => {
                        directories.push(child.case_folded());
                        pending.push_back(child);
                    }
                    ResourceType::File => files.push(child.case_folded()),
                    ResourceType::NonExistent => {}
                }
            }
        }

        self.claimed_directories.extend(directories);

        let mut added = 0;
        for key in files {
            if self.claimed_directories.contains(&key) || self.index.contains_key(&key) {
                continue;
            }
            self.index.insert(key, slot);
            added += 1;
        }

        info!(
            mount = slot,
            files = added,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Indexed mount"
        );
    }

    /// Index hit confirmed against the owning pool.
    fn lookup(&self, path: &Path) -> Option<(usize, Resolved)> {
        let slot = *self.index.get(&Self::index_key(path))?;
        let pool = &self.base.mounts()[slot];
        let resolved = resolve(path, pool.as_ref())?;
        resolved.resource_type.is_file().then_some((slot, resolved))
    }

    /// Whether a strict ancestor of `key` below `depth` segments is a file.
    fn hidden_by_file(&self, key: &Path, depth: usize) -> bool {
        (depth + 1..key.parts().len()).any(|count| self.index.contains_key(&key.ancestor(count)))
    }
}

impl ResourcePool for FastVirtualFileSystem {
    fn resource_type(&self, path: &str) -> ResourceType {
        let parsed = Path::new(path);
        match self.lookup(&parsed) {
            Some((_, resolved)) => resolved.resource_type,
            None => self.base.resource_type(path),
        }
    }

    fn file_content(&self, path: &str) -> Option<ContentStream> {
        let parsed = Path::new(path);
        if let Some((slot, resolved)) = self.lookup(&parsed) {
            let stream = self.base.mounts()[slot].file_content(&resolved.path.to_posix_string());
            if stream.is_some() {
                return stream;
            }
        }
        self.base.file_content(path)
    }

    fn directory_content(&self, path: &str) -> Vec<String> {
        self.base.directory_content(path)
    }
}

impl AssetFileSystem for FastVirtualFileSystem {
    fn mount(&mut self, pool: Arc<dyn ResourcePool>) -> usize {
        let slot = self.base.mount(pool);
        self.index_mount(slot);
        slot
    }

    fn mount_count(&self) -> usize {
        self.base.mount_count()
    }

    fn search_file_paths(&self, predicate: &dyn Fn(&Path) -> bool, base: &Path) -> Vec<Path> {
        let folded_base = Self::index_key(base);
        let depth = folded_base.parts().len();

        self.index
            .keys()
            .filter(|key| key.parts().len() > depth && key.starts_with_folded(&folded_base))
            .filter(|key| !self.hidden_by_file(key, depth))
            .filter_map(|key| {
                let relative = key.relative_to(&folded_base).ok()?;
                base.ancestor(depth).combine(&relative).ok()
            })
            .filter(|path| predicate(path))
            .collect()
    }
}
