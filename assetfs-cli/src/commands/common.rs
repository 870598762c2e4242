//! Common helpers shared across CLI commands.

use std::path::Path;

use assetfs::config::VfsConfig;
use assetfs::vfs::AssetFileSystem;
use tracing::debug;

use crate::error::CliError;

/// Log levels selected by repeated `-v` flags.
const VERBOSITY_LEVELS: &[&str] = &["debug", "trace"];

/// Load configuration.
///
/// An explicit path must exist. Without one, the default location is used
/// when present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<VfsConfig, CliError> {
    if let Some(path) = explicit {
        return Ok(VfsConfig::load(path)?);
    }

    match VfsConfig::default_path() {
        Some(path) if path.exists() => Ok(VfsConfig::load(&path)?),
        _ => {
            debug!("No config file found, using defaults");
            Ok(VfsConfig::default())
        }
    }
}

/// Assemble the configured overlay.
pub fn open_vfs(config: &VfsConfig) -> Result<Box<dyn AssetFileSystem>, CliError> {
    Ok(config.build()?)
}

/// Effective log filter for a configured level and a `-v` count.
///
/// Without `-v` the configured level is used unchanged.
pub fn log_level(configured: &str, verbose: u8) -> String {
    match verbose {
        0 => configured.to_string(),
        n => {
            let index = usize::from(n).min(VERBOSITY_LEVELS.len()) - 1;
            VERBOSITY_LEVELS[index].to_string()
        }
    }
}
