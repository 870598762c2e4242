//! Linear-scan overlay with case-insensitive fallback.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::AssetFileSystem;
use crate::path::Path;
use crate::pool::{ContentStream, ResourcePool, ResourceType};

/// A path as one specific pool spells it, with its type.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Backend-cased path.
    pub path: Path,
    /// What the pool holds there.
    pub resource_type: ResourceType,
}

/// Resolve `path` against a single pool.
///
/// The path is first tried verbatim. If the pool reports nothing there, each
/// segment is matched case-insensitively against the listing of the
/// directory resolved so far, taking the first match. Returns `None` when a
/// segment has no match or the path is rooted.
pub fn resolve(path: &Path, pool: &dyn ResourcePool) -> Option<Resolved> {
    if !path.root().is_none() {
        return None;
    }

    let resource_type = pool.resource_type(&path.to_posix_string());
    if resource_type.exists() {
        return Some(Resolved {
            path: path.clone(),
            resource_type,
        });
    }

    let mut resolved = Path::empty();
    for segment in path.parts() {
        let wanted = segment.to_lowercase();
        let child = pool
            .directory_content(&resolved.to_posix_string())
            .into_iter()
            .find(|name| name.to_lowercase() == wanted)?;
        resolved = resolved.child(&child);
    }

    let resource_type = pool.resource_type(&resolved.to_posix_string());
    resource_type.exists().then_some(Resolved {
        path: resolved,
        resource_type,
    })
}

/// Ordered overlay of mounted pools.
///
/// Mounting is O(1). Lookups cost one backend query per mount on the exact
/// path, plus a listing per path segment for each mount that misses.
#[derive(Default)]
pub struct VirtualFileSystem {
    mounts: Vec<Arc<dyn ResourcePool>>,
}

impl VirtualFileSystem {
    /// Create an overlay with no mounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounted pools in priority order.
    pub fn mounts(&self) -> &[Arc<dyn ResourcePool>] {
        &self.mounts
    }

    fn walk(&self, dir: &Path, predicate: &dyn Fn(&Path) -> bool, found: &mut Vec<Path>) {
        for name in self.directory_content(&dir.to_posix_string()) {
            let child = dir.child(&name);
            match self.resource_type(&child.to_posix_string()) {
                ResourceType::Directory => self.walk(&child, predicate, found),
                ResourceType::File if predicate(&child) => found.push(child),
                _ => {}
            }
        }
    }
}

impl ResourcePool for VirtualFileSystem {
    fn resource_type(&self, path: &str) -> ResourceType {
        let path = Path::new(path);
        self.mounts
            .iter()
            .find_map(|pool| resolve(&path, pool.as_ref()))
            .map(|resolved| resolved.resource_type)
            .unwrap_or(ResourceType::NonExistent)
    }

    fn file_content(&self, path: &str) -> Option<ContentStream> {
        let path = Path::new(path);
        self.mounts.iter().enumerate().find_map(|(slot, pool)| {
            let resolved = resolve(&path, pool.as_ref())?;
            if !resolved.resource_type.is_file() {
                return None;
            }

            let stream = pool.file_content(&resolved.path.to_posix_string());
            if stream.is_none() {
                debug!(mount = slot, path = %resolved.path, "Mount resolved file but refused content");
            }
            stream
        })
    }

    fn directory_content(&self, path: &str) -> Vec<String> {
        let path = Path::new(path);
        let mut names = BTreeSet::new();

        for pool in &self.mounts {
            let Some(resolved) = resolve(&path, pool.as_ref()) else {
                continue;
            };
            if resolved.resource_type.is_directory() {
                names.extend(
                    pool.directory_content(&resolved.path.to_posix_string())
                        .into_iter()
                        .map(|name| name.to_lowercase()),
                );
            }
        }

        names.into_iter().collect()
    }
}

impl AssetFileSystem for VirtualFileSystem {
    fn mount(&mut self, pool: Arc<dyn ResourcePool>) -> usize {
        self.mounts.push(pool);
        let slot = self.mounts.len() - 1;
        info!(mount = slot, "Mounted resource pool");
        slot
    }

    fn mount_count(&self) -> usize {
        self.mounts.len()
    }

    fn search_file_paths(&self, predicate: &dyn Fn(&Path) -> bool, base: &Path) -> Vec<Path> {
        let mut found = Vec::new();
        self.walk(base, predicate, &mut found);
        found
    }
}
