//! Resource pool over a real directory tree.

use std::fs::{self, File};
use std::path::PathBuf;

use tracing::debug;

use super::{ContentStream, ResourcePool, ResourceType};
use crate::path::{Path, PathError};

/// Loose-directory backend rooted at a fixed base path.
///
/// The base is made absolute once at construction. Every request is rebased
/// under it and answered from the host filesystem; I/O failures are logged at
/// `debug` and reported as missing.
///
/// Case sensitivity is whatever the host volume provides.
///
/// This is not a sandbox. A request with leading `..` segments is combined
/// onto the base like any other and can reach files outside it.
#[derive(Debug, Clone)]
pub struct FileResourcePool {
    base: Path,
}

impl FileResourcePool {
    /// Create a pool rooted at `location`.
    ///
    /// # Errors
    ///
    /// Fails only if `location` is relative and the working directory cannot
    /// be determined.
    pub fn new(location: &str) -> Result<Self, PathError> {
        let base = Path::new(location).absolute()?;
        if !std::path::Path::new(&base.to_native_string()).is_dir() {
            debug!(base = %base, "Directory pool base is not a directory");
        }
        Ok(Self { base })
    }

    /// The absolute base path.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Map a pool-relative path onto the host filesystem.
    fn host_path(&self, path: &str) -> Option<PathBuf> {
        match self.base.combine(&Path::new(path)) {
            Ok(full) => Some(PathBuf::from(full.to_native_string())),
            Err(e) => {
                debug!(error = %e, "Rejected rooted path at directory pool boundary");
                None
            }
        }
    }
}

impl ResourcePool for FileResourcePool {
    fn resource_type(&self, path: &str) -> ResourceType {
        let Some(host) = self.host_path(path) else {
            return ResourceType::NonExistent;
        };

        match fs::metadata(&host) {
            Ok(meta) if meta.is_dir() => ResourceType::Directory,
            Ok(meta) if meta.is_file() => ResourceType::File,
            Ok(_) => ResourceType::NonExistent,
            Err(e) => {
                debug!(path = %host.display(), error = %e, "Metadata lookup failed");
                ResourceType::NonExistent
            }
        }
    }

    fn file_content(&self, path: &str) -> Option<ContentStream> {
        let host = self.host_path(path)?;

        // Opening a directory succeeds on some hosts, so check first.
        if !fs::metadata(&host).map(|m| m.is_file()).unwrap_or(false) {
            return None;
        }

        match File::open(&host) {
            Ok(file) => Some(Box::new(file)),
            Err(e) => {
                debug!(path = %host.display(), error = %e, "Failed to open file");
                None
            }
        }
    }

    fn directory_content(&self, path: &str) -> Vec<String> {
        let Some(host) = self.host_path(path) else {
            return Vec::new();
        };

        let entries = match fs::read_dir(&host) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %host.display(), error = %e, "Failed to list directory");
                return Vec::new();
            }
        };

        let mut files = Vec::new();
        let mut directories = Vec::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(path = %host.display(), error = %e, "Failed to read directory entry");
                    return Vec::new();
                }
            };

            let Ok(name) = entry.file_name().into_string() else {
                debug!(path = %entry.path().display(), "Skipping non-UTF-8 entry name");
                continue;
            };

            // Follow links so a linked directory lists as a directory.
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => directories.push(name),
                Ok(meta) if meta.is_file() => files.push(name),
                _ => {}
            }
        }

        files.extend(directories);
        files
    }
}
