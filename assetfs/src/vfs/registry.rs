//! Backend tag registry.
//!
//! Maps the backend tags used in configuration files to pool constructors.
//! The table is fixed at compile time.

use std::sync::Arc;

use super::VfsError;
use crate::pool::{CachedResourcePool, FileResourcePool, PackResourcePool, ResourcePool};

type BackendFactory = fn(&str) -> Result<Arc<dyn ResourcePool>, VfsError>;

const BACKENDS: &[(&str, BackendFactory)] = &[
    ("dir", open_directory),
    ("directory", open_directory),
    ("folder", open_directory),
    ("pak", open_pack),
    ("pack", open_pack),
    ("archive", open_pack),
];

fn open_directory(location: &str) -> Result<Arc<dyn ResourcePool>, VfsError> {
    let files: Arc<dyn ResourcePool> = Arc::new(FileResourcePool::new(location)?);
    Ok(Arc::new(CachedResourcePool::new(files)))
}

fn open_pack(location: &str) -> Result<Arc<dyn ResourcePool>, VfsError> {
    Ok(Arc::new(PackResourcePool::open(location)?))
}

/// Construct the pool registered for `tag`.
///
/// Tags are matched case-insensitively. Directory backends come wrapped in a
/// [`CachedResourcePool`].
///
/// # Errors
///
/// Returns [`VfsError::UnsupportedBackend`] if no backend is registered for
/// `tag`.
pub fn open_backend(tag: &str, location: &str) -> Result<Arc<dyn ResourcePool>, VfsError> {
    let (_, factory) = BACKENDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(tag))
        .ok_or_else(|| VfsError::UnsupportedBackend(tag.to_string()))?;
    factory(location)
}

/// All registered tags.
pub fn backend_tags() -> impl Iterator<Item = &'static str> {
    BACKENDS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{PackWriter, ResourceType};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_directory_tags() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("hello.txt"), "hi").unwrap();
        let location = temp.path().to_string_lossy().to_string();

        for tag in ["dir", "Directory", "FOLDER"] {
            let pool = open_backend(tag, &location).unwrap();
            assert_eq!(pool.resource_type("hello.txt"), ResourceType::File);
        }
    }

    #[test]
    fn test_pack_tags() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("base.pak");
        let mut writer = PackWriter::new();
        writer.add_file("textures", "grass.dds", b"DDS ".to_vec());
        writer.write_to(&archive).unwrap();

        let location = format!("{}?textures", archive.to_string_lossy());
        for tag in ["pak", "pack", "Archive"] {
            let pool = open_backend(tag, &location).unwrap();
            assert_eq!(pool.resource_type("grass.dds"), ResourceType::File);
        }
    }

    #[test]
    fn test_unknown_tag() {
        let result = open_backend("zip", "anything");
        assert!(matches!(result, Err(VfsError::UnsupportedBackend(tag)) if tag == "zip"));
    }

    #[test]
    fn test_pack_open_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.pak");
        let result = open_backend("pak", &missing.to_string_lossy());
        assert!(matches!(result, Err(VfsError::Pack(_))));
    }

    #[test]
    fn test_backend_tags_listed() {
        let tags: Vec<_> = backend_tags().collect();
        assert!(tags.contains(&"dir"));
        assert!(tags.contains(&"pak"));
    }
}
