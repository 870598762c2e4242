//! INI configuration for a mount set.
//!
//! ```ini
//! [vfs]
//! indexed = true
//!
//! [logging]
//! level = info
//! file = /tmp/assetfs.log
//!
//! [mount.base]
//! backend = dir
//! location = ./data
//! offset = textures
//! ```
//!
//! Mount sections are applied in file order, so the first `[mount.*]` section
//! has the highest priority.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ini::{Ini, ParseOption};
use thiserror::Error;
use tracing::debug;

use crate::pool::{OffsetResourcePool, ResourcePool};
use crate::vfs::{open_backend, AssetFileSystem, FastVirtualFileSystem, VfsError, VirtualFileSystem};

const MOUNT_PREFIX: &str = "mount.";

/// Default log level when none is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A required key is absent.
    #[error("Missing key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },

    /// A value could not be interpreted.
    #[error("Invalid value '{value}' for '{key}' in section [{section}]")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    /// A mount could not be opened.
    #[error("Failed to mount '{name}': {source}")]
    Mount {
        name: String,
        #[source]
        source: VfsError,
    },
}

/// One `[mount.NAME]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountConfig {
    /// Section suffix, used only for reporting.
    pub name: String,
    /// Registry tag, e.g. `dir` or `pak`.
    pub backend: String,
    /// Backend-specific location string.
    pub location: String,
    /// Optional sub-path to rebase the pool under.
    pub offset: Option<String>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive.
    pub level: String,
    /// Optional log file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

/// Parsed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsConfig {
    /// Use the indexed overlay.
    pub indexed: bool,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Mounts in priority order.
    pub mounts: Vec<MountConfig>,
}

impl Default for VfsConfig {
    fn default() -> Self {
        Self {
            indexed: true,
            logging: LoggingConfig::default(),
            mounts: Vec::new(),
        }
    }
}

impl VfsConfig {
    /// Default location: `<config dir>/assetfs/config.ini`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("assetfs").join("config.ini"))
    }

    /// Load from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_ini_str(&text)
    }

    /// Parse INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        // Escapes stay off so Windows locations keep their backslashes.
        let options = ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, options)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = Self::default();

        if let Some(vfs) = ini.section(Some("vfs")) {
            if let Some(value) = vfs.get("indexed") {
                config.indexed = parse_bool("vfs", "indexed", value)?;
            }
        }

        if let Some(logging) = ini.section(Some("logging")) {
            if let Some(level) = logging.get("level") {
                config.logging.level = level.trim().to_string();
            }
            config.logging.file = logging
                .get("file")
                .map(str::trim)
                .filter(|file| !file.is_empty())
                .map(PathBuf::from);
        }

        for (section, properties) in ini.iter() {
            let Some(name) = section.and_then(|s| s.strip_prefix(MOUNT_PREFIX)) else {
                continue;
            };
            let section = format!("{MOUNT_PREFIX}{name}");
            let required = |key: &str| {
                properties
                    .get(key)
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
                    .ok_or_else(|| ConfigError::MissingKey {
                        section: section.clone(),
                        key: key.to_string(),
                    })
            };

            config.mounts.push(MountConfig {
                name: name.to_string(),
                backend: required("backend")?,
                location: required("location")?,
                offset: properties
                    .get("offset")
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty()),
            });
        }

        Ok(config)
    }

    /// Open every mount and assemble the configured overlay.
    pub fn build(&self) -> Result<Box<dyn AssetFileSystem>, ConfigError> {
        let mut vfs: Box<dyn AssetFileSystem> = if self.indexed {
            Box::new(FastVirtualFileSystem::new())
        } else {
            Box::new(VirtualFileSystem::new())
        };

        for mount in &self.mounts {
            let pool = mount.open().map_err(|source| ConfigError::Mount {
                name: mount.name.clone(),
                source,
            })?;
            vfs.mount(pool);
        }

        Ok(vfs)
    }
}

impl MountConfig {
    /// Open the backend, rebased under `offset` when set.
    pub fn open(&self) -> Result<Arc<dyn ResourcePool>, VfsError> {
        let pool = open_backend(&self.backend, &self.location)?;
        let Some(offset) = &self.offset else {
            return Ok(pool);
        };
        Ok(Arc::new(OffsetResourcePool::new(pool, offset.as_str())))
    }
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::ResourceType;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = VfsConfig::from_ini_str("").unwrap();
        assert!(config.indexed);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
        assert!(config.mounts.is_empty());
    }

    #[test]
    fn test_parse_full() {
        let config = VfsConfig::from_ini_str(
            r#"
[vfs]
indexed = no

[logging]
level = assetfs=debug
file = /tmp/assetfs.log

[mount.mods]
backend = dir
location = ./mods

[mount.base]
backend = pak
location = ./base.pak?textures
offset = hd
"#,
        )
        .unwrap();

        assert!(!config.indexed);
        assert_eq!(config.logging.level, "assetfs=debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/assetfs.log")));
        assert_eq!(config.mounts.len(), 2);
        assert_eq!(config.mounts[0].name, "mods");
        assert_eq!(config.mounts[1].location, "./base.pak?textures");
        assert_eq!(config.mounts[1].offset.as_deref(), Some("hd"));
        assert!(config.mounts[0].offset.is_none());
    }

    #[test]
    fn test_missing_location() {
        let result = VfsConfig::from_ini_str("[mount.a]\nbackend = dir\n");
        assert!(matches!(
            result,
            Err(ConfigError::MissingKey { ref key, .. }) if key == "location"
        ));
    }

    #[test]
    fn test_invalid_bool() {
        let result = VfsConfig::from_ini_str("[vfs]\nindexed = maybe\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = VfsConfig::load(&temp.path().join("nope.ini"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_build_mounts_in_order() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("first");
        let second = temp.path().join("second");
        fs::create_dir_all(first.join("textures")).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::write(first.join("textures/grass.dds"), "first").unwrap();
        fs::write(second.join("grass.dds"), "second").unwrap();
        fs::write(second.join("rock.dds"), "rock").unwrap();

        let text = format!(
            "[mount.first]\nbackend = dir\nlocation = {}\noffset = textures\n\n\
             [mount.second]\nbackend = folder\nlocation = {}\n",
            first.display(),
            second.display()
        );
        let config = VfsConfig::from_ini_str(&text).unwrap();
        let vfs = config.build().unwrap();

        assert_eq!(vfs.mount_count(), 2);
        let mut content = String::new();
        vfs.file_content("grass.dds")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "first");
        assert_eq!(vfs.resource_type("ROCK.dds"), ResourceType::File);
    }

    #[test]
    fn test_build_reports_bad_backend() {
        let config = VfsConfig::from_ini_str("[mount.x]\nbackend = zip\nlocation = a.zip\n").unwrap();
        assert!(matches!(
            config.build(),
            Err(ConfigError::Mount { ref name, source: VfsError::UnsupportedBackend(_) }) if name == "x"
        ));
    }
}
