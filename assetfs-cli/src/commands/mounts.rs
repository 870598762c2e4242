//! `mounts`: print the configured mount table.

use assetfs::config::VfsConfig;
use assetfs::vfs::backend_tags;

use crate::error::CliError;

/// Print mounts in priority order.
pub fn run(config: &VfsConfig) -> Result<(), CliError> {
    let overlay = if config.indexed { "indexed" } else { "linear" };
    println!("Overlay: {}", overlay);
    println!();

    if config.mounts.is_empty() {
        println!("No mounts configured.");
        println!(
            "Known backends: {}",
            backend_tags().collect::<Vec<_>>().join(", ")
        );
        return Ok(());
    }

    println!("{:<4} {:<16} {:<8} LOCATION", "SLOT", "NAME", "BACKEND");
    for (slot, mount) in config.mounts.iter().enumerate() {
        let location = match &mount.offset {
            Some(offset) => format!("{} (offset {})", mount.location, offset),
            None => mount.location.clone(),
        };
        println!(
            "{:<4} {:<16} {:<8} {}",
            slot, mount.name, mount.backend, location
        );
    }

    Ok(())
}
