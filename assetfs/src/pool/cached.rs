//! Memoizing decorator for type queries and directory listings.
//!
//! # Precondition
//!
//! Entries are never invalidated or evicted. Wrap only backends whose data is
//! immutable for the lifetime of the cache: shipped asset directories and
//! archives, not a working tree that is edited while mounted.

use std::sync::Arc;

use dashmap::DashMap;

use super::{ContentStream, ResourcePool, ResourceType};

/// Caches `resource_type` and `directory_content` per distinct path string.
///
/// Content requests always go to the parent, but a cached non-file type
/// short-circuits them without touching the backend.
pub struct CachedResourcePool {
    parent: Arc<dyn ResourcePool>,
    types: DashMap<String, ResourceType>,
    listings: DashMap<String, Vec<String>>,
}

impl CachedResourcePool {
    /// Wrap `parent` with unbounded, non-invalidating caches.
    pub fn new(parent: Arc<dyn ResourcePool>) -> Self {
        Self {
            parent,
            types: DashMap::new(),
            listings: DashMap::new(),
        }
    }

    /// Number of cached type entries.
    pub fn cached_types(&self) -> usize {
        self.types.len()
    }

    /// Number of cached listings.
    pub fn cached_listings(&self) -> usize {
        self.listings.len()
    }
}

impl ResourcePool for CachedResourcePool {
    fn resource_type(&self, path: &str) -> ResourceType {
        if let Some(cached) = self.types.get(path) {
            return *cached;
        }

        let resource_type = self.parent.resource_type(path);
        self.types.insert(path.to_string(), resource_type);
        resource_type
    }

    fn file_content(&self, path: &str) -> Option<ContentStream> {
        if !self.resource_type(path).is_file() {
            return None;
        }
        self.parent.file_content(path)
    }

    fn directory_content(&self, path: &str) -> Vec<String> {
        if let Some(cached) = self.listings.get(path) {
            return cached.clone();
        }

        let listing = self.parent.directory_content(path);
        self.listings.insert(path.to_string(), listing.clone());
        listing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::MemoryResourcePool;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls reaching the wrapped pool.
    struct CountingPool {
        inner: MemoryResourcePool,
        type_calls: AtomicUsize,
        content_calls: AtomicUsize,
        listing_calls: AtomicUsize,
    }

    impl CountingPool {
        fn new() -> Self {
            let mut inner = MemoryResourcePool::new(true);
            inner.insert("dir/file.txt", "data");
            Self {
                inner,
                type_calls: AtomicUsize::new(0),
                content_calls: AtomicUsize::new(0),
                listing_calls: AtomicUsize::new(0),
            }
        }
    }

    impl ResourcePool for CountingPool {
        fn resource_type(&self, path: &str) -> ResourceType {
            self.type_calls.fetch_add(1, Ordering::Relaxed);
            self.inner.resource_type(path)
        }

        fn file_content(&self, path: &str) -> Option<ContentStream> {
            self.content_calls.fetch_add(1, Ordering::Relaxed);
            self.inner.file_content(path)
        }

        fn directory_content(&self, path: &str) -> Vec<String> {
            self.listing_calls.fetch_add(1, Ordering::Relaxed);
            self.inner.directory_content(path)
        }
    }

    #[test]
    fn test_type_queries_are_memoized() {
        let counting = Arc::new(CountingPool::new());
        let cached = CachedResourcePool::new(counting.clone());

        for _ in 0..3 {
            assert_eq!(cached.resource_type("dir/file.txt"), ResourceType::File);
            assert_eq!(cached.resource_type("missing"), ResourceType::NonExistent);
        }

        assert_eq!(counting.type_calls.load(Ordering::Relaxed), 2);
        assert_eq!(cached.cached_types(), 2);
    }

    #[test]
    fn test_listings_are_memoized() {
        let counting = Arc::new(CountingPool::new());
        let cached = CachedResourcePool::new(counting.clone());

        for _ in 0..3 {
            assert_eq!(cached.directory_content("dir"), vec!["file.txt".to_string()]);
        }

        assert_eq!(counting.listing_calls.load(Ordering::Relaxed), 1);
        assert_eq!(cached.cached_listings(), 1);
    }

    #[test]
    fn test_content_short_circuits_non_files() {
        let counting = Arc::new(CountingPool::new());
        let cached = CachedResourcePool::new(counting.clone());

        assert!(cached.file_content("dir").is_none());
        assert!(cached.file_content("missing").is_none());
        assert_eq!(counting.content_calls.load(Ordering::Relaxed), 0);

        assert!(cached.file_content("dir/file.txt").is_some());
        assert!(cached.file_content("dir/file.txt").is_some());
        assert_eq!(counting.content_calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_distinct_strings_are_distinct_entries() {
        let counting = Arc::new(CountingPool::new());
        let cached = CachedResourcePool::new(counting.clone());

        cached.resource_type("dir");
        cached.resource_type("dir/");
        assert_eq!(cached.cached_types(), 2);
    }
}
