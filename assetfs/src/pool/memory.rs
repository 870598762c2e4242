//! In-memory resource pool.
//!
//! Holds file contents in a map. Intended as a test double and for injecting
//! generated assets, with a selectable case sensitivity so callers can
//! exercise both kinds of backend.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use std::sync::Arc;

use super::{ContentStream, ResourcePool, ResourceType};
use crate::path::Path;

/// A map-backed [`ResourcePool`].
///
/// Directories are implied by the files inserted beneath them and can also
/// be added explicitly to model empty directories.
///
/// # Example
///
/// ```
/// use assetfs::pool::{MemoryResourcePool, ResourcePool, ResourceType};
///
/// let mut pool = MemoryResourcePool::new(true);
/// pool.insert("textures/Grass.dds", b"DDS ".to_vec());
///
/// assert_eq!(pool.resource_type("textures"), ResourceType::Directory);
/// assert_eq!(pool.resource_type("textures/grass.dds"), ResourceType::NonExistent);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryResourcePool {
    /// Keyed by normalized posix path (folded when case-insensitive).
    files: BTreeMap<String, Arc<Vec<u8>>>,

    /// Directory key -> child names as inserted.
    directories: BTreeMap<String, BTreeSet<String>>,

    case_sensitive: bool,
}

impl MemoryResourcePool {
    /// Create an empty pool.
    pub fn new(case_sensitive: bool) -> Self {
        let mut directories = BTreeMap::new();
        directories.insert(String::new(), BTreeSet::new());
        Self {
            files: BTreeMap::new(),
            directories,
            case_sensitive,
        }
    }

    /// Whether lookups compare names case-sensitively.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Insert a file, creating its parent directories.
    pub fn insert(&mut self, path: &str, content: impl Into<Vec<u8>>) {
        let path = Path::new(path);
        let Some((name, parents)) = path.parts().split_last() else {
            return;
        };

        let parent = self.add_directories(parents);
        self.add_child(parent, name);
        let key = self.key(&path.to_posix_string());
        self.files.insert(key, Arc::new(content.into()));
    }

    /// Add an (possibly empty) directory and its parents.
    pub fn add_directory(&mut self, path: &str) {
        let path = Path::new(path);
        self.add_directories(path.parts());
    }

    /// Number of files held.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn add_directories(&mut self, segments: &[String]) -> String {
        let mut current = String::new();
        for segment in segments {
            let parent = self.key(&current);
            self.add_child(parent, segment);

            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            let key = self.key(&current);
            self.directories.entry(key).or_default();
        }
        self.key(&current)
    }

    /// Record `name` under `parent`, keeping the first spelling when names
    /// compare case-insensitively.
    fn add_child(&mut self, parent: String, name: &str) {
        let case_sensitive = self.case_sensitive;
        let children = self.directories.entry(parent).or_default();
        let known = if case_sensitive {
            children.contains(name)
        } else {
            let folded = name.to_lowercase();
            children.iter().any(|c| c.to_lowercase() == folded)
        };
        if !known {
            children.insert(name.to_string());
        }
    }

    fn key(&self, path: &str) -> String {
        let normalized = Path::new(path);
        let mut key = normalized.to_posix_string();
        if normalized.is_directory_hint() {
            key.pop();
        }
        if self.case_sensitive {
            key
        } else {
            key.to_lowercase()
        }
    }
}

impl ResourcePool for MemoryResourcePool {
    fn resource_type(&self, path: &str) -> ResourceType {
        let key = self.key(path);
        if self.files.contains_key(&key) {
            ResourceType::File
        } else if self.directories.contains_key(&key) {
            ResourceType::Directory
        } else {
            ResourceType::NonExistent
        }
    }

    fn file_content(&self, path: &str) -> Option<ContentStream> {
        let data = self.files.get(&self.key(path))?;
        Some(Box::new(Cursor::new(data.as_ref().clone())))
    }

    fn directory_content(&self, path: &str) -> Vec<String> {
        self.directories
            .get(&self.key(path))
            .map(|children| children.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_all(pool: &MemoryResourcePool, path: &str) -> Option<Vec<u8>> {
        let mut stream = pool.file_content(path)?;
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        Some(buf)
    }

    #[test]
    fn test_insert_creates_parents() {
        let mut pool = MemoryResourcePool::new(true);
        pool.insert("a/b/content.txt", "x");

        assert_eq!(pool.resource_type(""), ResourceType::Directory);
        assert_eq!(pool.resource_type("a"), ResourceType::Directory);
        assert_eq!(pool.resource_type("a/b"), ResourceType::Directory);
        assert_eq!(pool.resource_type("a/b/content.txt"), ResourceType::File);
        assert_eq!(pool.directory_content("a"), vec!["b".to_string()]);
        assert_eq!(pool.file_count(), 1);
    }

    #[test]
    fn test_case_sensitive_lookup() {
        let mut pool = MemoryResourcePool::new(true);
        pool.insert("B.txt", "bytes");

        assert_eq!(pool.resource_type("B.txt"), ResourceType::File);
        assert_eq!(pool.resource_type("b.txt"), ResourceType::NonExistent);
        assert!(pool.file_content("b.txt").is_none());
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut pool = MemoryResourcePool::new(false);
        pool.insert("Data/B.txt", "bytes");

        assert_eq!(pool.resource_type("data/b.TXT"), ResourceType::File);
        assert_eq!(read_all(&pool, "DATA/b.txt").unwrap(), b"bytes");
        // Listing keeps the inserted casing.
        assert_eq!(pool.directory_content("data"), vec!["B.txt".to_string()]);
    }

    #[test]
    fn test_case_insensitive_listing_has_one_spelling() {
        let mut pool = MemoryResourcePool::new(false);
        pool.insert("A/x", "1");
        pool.insert("a/y", "2");
        pool.insert("a/X", "3");

        assert_eq!(pool.directory_content(""), vec!["A".to_string()]);
        assert_eq!(pool.directory_content("a"), vec!["x".to_string(), "y".to_string()]);
        assert_eq!(read_all(&pool, "A/x").unwrap(), b"3");
        assert_eq!(pool.file_count(), 2);
    }

    #[test]
    fn test_listing_of_file_or_missing_is_empty() {
        let mut pool = MemoryResourcePool::new(true);
        pool.insert("a.txt", "x");

        assert!(pool.directory_content("a.txt").is_empty());
        assert!(pool.directory_content("missing").is_empty());
        assert!(pool.file_content("").is_none());
    }

    #[test]
    fn test_explicit_empty_directory() {
        let mut pool = MemoryResourcePool::new(true);
        pool.add_directory("empty/inner");

        assert_eq!(pool.resource_type("empty/inner"), ResourceType::Directory);
        assert!(pool.directory_content("empty/inner").is_empty());
        assert_eq!(pool.directory_content(""), vec!["empty".to_string()]);
    }

    #[test]
    fn test_trailing_separator_is_a_hint_only() {
        let mut pool = MemoryResourcePool::new(true);
        pool.insert("dir/file", "x");

        assert_eq!(pool.resource_type("dir/"), ResourceType::Directory);
    }
}
