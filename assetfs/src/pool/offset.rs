//! Decorator exposing a subtree of another pool as its root.

use std::sync::Arc;

use tracing::debug;

use super::{ContentStream, ResourcePool, ResourceType};
use crate::path::Path;

/// Rebases every request under a fixed offset before delegating.
///
/// Used to mount `textures/` of one archive as the root namespace of a
/// separate mount while sharing the underlying backend.
///
/// Leading `..` segments climb out of the offset into the rest of the
/// parent pool; the offset does not confine requests.
pub struct OffsetResourcePool {
    parent: Arc<dyn ResourcePool>,
    offset: Path,
}

impl OffsetResourcePool {
    /// Wrap `parent`, rebasing requests under `offset`.
    pub fn new(parent: Arc<dyn ResourcePool>, offset: impl Into<Path>) -> Self {
        Self {
            parent,
            offset: offset.into(),
        }
    }

    /// The offset applied to every request.
    pub fn offset(&self) -> &Path {
        &self.offset
    }

    fn rebase(&self, path: &str) -> Option<String> {
        match self.offset.combine(&Path::new(path)) {
            Ok(full) => Some(full.to_posix_string()),
            Err(e) => {
                debug!(error = %e, "Rejected rooted path at offset pool boundary");
                None
            }
        }
    }
}

impl ResourcePool for OffsetResourcePool {
    fn resource_type(&self, path: &str) -> ResourceType {
        self.rebase(path)
            .map(|p| self.parent.resource_type(&p))
            .unwrap_or(ResourceType::NonExistent)
    }

    fn file_content(&self, path: &str) -> Option<ContentStream> {
        self.parent.file_content(&self.rebase(path)?)
    }

    fn directory_content(&self, path: &str) -> Vec<String> {
        self.rebase(path)
            .map(|p| self.parent.directory_content(&p))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::MemoryResourcePool;

    fn parent() -> Arc<dyn ResourcePool> {
        let mut pool = MemoryResourcePool::new(true);
        pool.insert("data/textures/grass.dds", "grass");
        pool.insert("data/models/tree.obj", "tree");
        pool.insert("readme.txt", "top");
        Arc::new(pool)
    }

    #[test]
    fn test_offset_rebases_requests() {
        let pool = OffsetResourcePool::new(parent(), "data");

        assert_eq!(pool.resource_type(""), ResourceType::Directory);
        assert_eq!(pool.resource_type("textures/grass.dds"), ResourceType::File);
        assert_eq!(pool.resource_type("readme.txt"), ResourceType::NonExistent);
        assert_eq!(
            pool.directory_content(""),
            vec!["models".to_string(), "textures".to_string()]
        );
        assert!(pool.file_content("models/tree.obj").is_some());
    }

    #[test]
    fn test_parent_segments_climb_out_of_offset() {
        let pool = OffsetResourcePool::new(parent(), "data");

        assert_eq!(pool.resource_type("../readme.txt"), ResourceType::File);
        assert_eq!(pool.resource_type("textures/../../readme.txt"), ResourceType::File);
    }

    #[test]
    fn test_offset_shares_parent() {
        let shared = parent();
        let textures = OffsetResourcePool::new(Arc::clone(&shared), "data/textures");
        let models = OffsetResourcePool::new(shared, "data/models");

        assert_eq!(textures.resource_type("grass.dds"), ResourceType::File);
        assert_eq!(models.resource_type("tree.obj"), ResourceType::File);
        assert_eq!(textures.resource_type("tree.obj"), ResourceType::NonExistent);
    }

    #[test]
    fn test_rooted_request_is_missing() {
        let pool = OffsetResourcePool::new(parent(), "data");
        assert_eq!(pool.resource_type("/textures"), ResourceType::NonExistent);
        assert!(pool.directory_content("pak:/").is_empty());
        assert!(pool.file_content("/readme.txt").is_none());
    }
}
