//! Single-file packed archive backend.
//!
//! An archive bundles any number of named partitions, each an independent
//! file namespace, into one file:
//!
//! ```text
//! ┌────────┬──────────────┬─────────────────────┬──────────────────┐
//! │ "APAK" │ index length │ index (bincode)     │ file data ...    │
//! │ 4 B    │ u64 LE       │ partition -> files  │ concatenated     │
//! └────────┴──────────────┴─────────────────────┴──────────────────┘
//! ```
//!
//! A location string selects a partition with a `?name` suffix
//! (`assets.pak?textures`); without one the default (unnamed) partition is
//! used.
//!
//! # Single handle
//!
//! A [`PackResourcePool`] owns exactly one open file handle. A content stream
//! borrows it through a seek window and returns it when dropped. While a
//! stream is alive, further content requests on the same pool return `None`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Take, Write};
use std::path::{Path as StdPath, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{ContentStream, ResourcePool, ResourceType};
use crate::path::Path;

/// Magic bytes at the start of every archive.
pub const PACK_MAGIC: &[u8; 4] = b"APAK";

/// Magic plus the index length field.
const HEADER_LEN: u64 = 12;

/// Name of the partition used when a location has no `?name` selector.
pub const DEFAULT_PARTITION: &str = "";

/// Errors opening or writing an archive.
#[derive(Debug, Error)]
pub enum PackError {
    /// I/O error reading or writing the archive file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with [`PACK_MAGIC`].
    #[error("Not a pack archive: {0}")]
    BadMagic(PathBuf),

    /// The index could not be encoded or decoded.
    #[error("Corrupt pack index: {0}")]
    Index(String),

    /// The requested partition is not in the archive.
    #[error("Partition '{partition}' not found in {archive}")]
    MissingPartition { archive: PathBuf, partition: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PackEntry {
    offset: u64,
    length: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PackIndex {
    partitions: BTreeMap<String, BTreeMap<String, PackEntry>>,
}

/// Normalized lookup key for a path inside a partition.
fn entry_key(path: &str) -> String {
    let path = Path::new(path);
    let mut key = path.to_posix_string();
    if path.is_directory_hint() {
        key.pop();
    }
    key
}

/// Read-only, case-sensitive view of one archive partition.
pub struct PackResourcePool {
    archive: PathBuf,
    partition: String,
    files: HashMap<String, PackEntry>,
    directories: HashMap<String, BTreeSet<String>>,
    data_start: u64,
    handle: Arc<Mutex<Option<File>>>,
}

impl PackResourcePool {
    /// Open an archive from a location string (`<path>[?<partition>]`).
    pub fn open(location: &str) -> Result<Self, PackError> {
        match location.rsplit_once('?') {
            Some((archive, partition)) => Self::open_partition(archive, partition),
            None => Self::open_partition(location, DEFAULT_PARTITION),
        }
    }

    /// Open a named partition of the archive at `archive`.
    pub fn open_partition(
        archive: impl AsRef<StdPath>,
        partition: &str,
    ) -> Result<Self, PackError> {
        let archive = archive.as_ref().to_path_buf();
        let mut file = File::open(&archive)?;

        let mut header = [0u8; HEADER_LEN as usize];
        file.read_exact(&mut header)?;
        if &header[..4] != PACK_MAGIC {
            return Err(PackError::BadMagic(archive));
        }

        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&header[4..]);
        let index_len = u64::from_le_bytes(len_bytes);

        let mut index_bytes = Vec::new();
        (&mut file).take(index_len).read_to_end(&mut index_bytes)?;
        if index_bytes.len() as u64 != index_len {
            return Err(PackError::Index(format!(
                "index truncated: expected {} bytes, found {}",
                index_len,
                index_bytes.len()
            )));
        }

        let mut index: PackIndex = bincode::deserialize(&index_bytes)
            .map_err(|e| PackError::Index(e.to_string()))?;

        let files = index
            .partitions
            .remove(partition)
            .ok_or_else(|| PackError::MissingPartition {
                archive: archive.clone(),
                partition: partition.to_string(),
            })?;

        let mut directories: HashMap<String, BTreeSet<String>> = HashMap::new();
        directories.insert(String::new(), BTreeSet::new());
        for path in files.keys() {
            let mut parent = String::new();
            for segment in Path::new(path).parts() {
                directories
                    .entry(parent.clone())
                    .or_default()
                    .insert(segment.clone());
                if !parent.is_empty() {
                    parent.push('/');
                }
                parent.push_str(segment);
            }
        }

        info!(
            archive = %archive.display(),
            partition = %partition,
            files = files.len(),
            "Opened pack archive"
        );

        Ok(Self {
            archive,
            partition: partition.to_string(),
            files: files.into_iter().collect(),
            directories,
            data_start: HEADER_LEN + index_len,
            handle: Arc::new(Mutex::new(Some(file))),
        })
    }

    /// Path of the archive file.
    pub fn archive(&self) -> &StdPath {
        &self.archive
    }

    /// Name of the mounted partition.
    pub fn partition(&self) -> &str {
        &self.partition
    }

    /// Number of files in the partition.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl ResourcePool for PackResourcePool {
    fn resource_type(&self, path: &str) -> ResourceType {
        let key = entry_key(path);
        if self.files.contains_key(&key) {
            ResourceType::File
        } else if self.directories.contains_key(&key) {
            ResourceType::Directory
        } else {
            ResourceType::NonExistent
        }
    }

    fn file_content(&self, path: &str) -> Option<ContentStream> {
        let entry = *self.files.get(&entry_key(path))?;
        let Some(start) = self.data_start.checked_add(entry.offset) else {
            debug!(
                archive = %self.archive.display(),
                path = %path,
                offset = entry.offset,
                "Entry offset out of range"
            );
            return None;
        };

        let mut slot = self.handle.lock();
        let Some(mut file) = slot.take() else {
            warn!(
                archive = %self.archive.display(),
                path = %path,
                "Pack handle busy: previous stream still open"
            );
            return None;
        };

        if let Err(e) = file.seek(SeekFrom::Start(start)) {
            debug!(archive = %self.archive.display(), error = %e, "Seek failed");
            *slot = Some(file);
            return None;
        }
        drop(slot);

        Some(Box::new(PackStream {
            window: Some(file.take(entry.length)),
            slot: Arc::clone(&self.handle),
        }))
    }

    fn directory_content(&self, path: &str) -> Vec<String> {
        self.directories
            .get(&entry_key(path))
            .map(|children| children.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Seek window over the shared handle; hands the handle back on drop.
struct PackStream {
    window: Option<Take<File>>,
    slot: Arc<Mutex<Option<File>>>,
}

impl Read for PackStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.window.as_mut() {
            Some(window) => window.read(buf),
            None => Ok(0),
        }
    }
}

impl Drop for PackStream {
    fn drop(&mut self) {
        if let Some(window) = self.window.take() {
            *self.slot.lock() = Some(window.into_inner());
        }
    }
}

/// Builds pack archives.
///
/// # Example
///
/// ```no_run
/// use assetfs::pool::PackWriter;
///
/// let mut writer = PackWriter::new();
/// writer.add_file("", "readme.txt", "hello");
/// writer.add_file("textures", "grass.dds", vec![0u8; 16]);
/// writer.write_to(std::path::Path::new("assets.pak"))?;
/// # Ok::<(), assetfs::pool::PackError>(())
/// ```
#[derive(Debug, Default)]
pub struct PackWriter {
    partitions: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
}

impl PackWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to a partition, replacing any previous content.
    pub fn add_file(
        &mut self,
        partition: &str,
        path: &str,
        content: impl Into<Vec<u8>>,
    ) -> &mut Self {
        self.partitions
            .entry(partition.to_string())
            .or_default()
            .insert(entry_key(path), content.into());
        self
    }

    /// Add every file under `root` to a partition, keyed relative to `root`.
    ///
    /// Returns the number of files added.
    pub fn add_directory_tree(&mut self, partition: &str, root: &StdPath) -> io::Result<usize> {
        self.partitions.entry(partition.to_string()).or_default();
        self.add_tree_recursive(partition, root, &Path::empty())
    }

    fn add_tree_recursive(
        &mut self,
        partition: &str,
        real_dir: &StdPath,
        virtual_dir: &Path,
    ) -> io::Result<usize> {
        let mut added = 0;

        for entry in std::fs::read_dir(real_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let virtual_path = virtual_dir.child(&name);
            let real_path = entry.path();

            if real_path.is_dir() {
                added += self.add_tree_recursive(partition, &real_path, &virtual_path)?;
            } else if real_path.is_file() {
                let content = std::fs::read(&real_path)?;
                self.add_file(partition, &virtual_path.to_posix_string(), content);
                added += 1;
            }
        }

        Ok(added)
    }

    /// Total number of files across all partitions.
    pub fn file_count(&self) -> usize {
        self.partitions.values().map(BTreeMap::len).sum()
    }

    /// Write the archive to `path`.
    pub fn write_to(&self, path: &StdPath) -> Result<(), PackError> {
        let mut index = PackIndex::default();
        let mut offset = 0u64;
        for (partition, files) in &self.partitions {
            let entries = index.partitions.entry(partition.clone()).or_default();
            for (file_path, content) in files {
                let length = content.len() as u64;
                entries.insert(file_path.clone(), PackEntry { offset, length });
                offset += length;
            }
        }

        let index_bytes =
            bincode::serialize(&index).map_err(|e| PackError::Index(e.to_string()))?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            writer.write_all(PACK_MAGIC)?;
            writer.write_all(&(index_bytes.len() as u64).to_le_bytes())?;
            writer.write_all(&index_bytes)?;
            for files in self.partitions.values() {
                for content in files.values() {
                    writer.write_all(content)?;
                }
            }
            writer.flush()?;
        }
        std::fs::rename(&temp_path, path)?;

        info!(
            path = %path.display(),
            partitions = self.partitions.len(),
            files = self.file_count(),
            "Wrote pack archive"
        );

        Ok(())
    }
}
