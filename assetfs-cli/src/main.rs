//! assetfs CLI - Command-line interface
//!
//! Inspects the overlay described by a mount configuration: list directories,
//! read files, search by glob, and build pack archives.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use commands::common::{load_config, log_level, open_vfs};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "assetfs", version, about = "Inspect layered game asset mounts")]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List a directory of the overlay
    Ls {
        /// Overlay path (empty for the root)
        #[arg(default_value = "")]
        path: String,
    },

    /// Show what kind of resource a path is
    Stat {
        /// Overlay path
        path: String,
    },

    /// Write a file's content to stdout
    Cat {
        /// Overlay path
        path: String,
    },

    /// Find files by case-insensitive glob
    Find {
        /// Glob, matched against the file name unless it contains '/'
        pattern: String,

        /// Directory to search under
        #[arg(short, long, default_value = "")]
        base: String,
    },

    /// Build a pack archive from a directory
    Pack {
        /// Archive to write
        output: PathBuf,

        /// Directory to pack
        source: PathBuf,

        /// Partition name (default partition when omitted)
        #[arg(short, long)]
        partition: Option<String>,
    },

    /// Show the configured mount table
    Mounts,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    let _guard = assetfs::logging::init(
        &log_level(&config.logging.level, cli.verbose),
        config.logging.file.as_deref(),
    )?;

    match cli.command {
        Commands::Ls { path } => commands::browse::run_ls(open_vfs(&config)?.as_ref(), &path),
        Commands::Stat { path } => {
            commands::browse::run_stat(open_vfs(&config)?.as_ref(), &path)
        }
        Commands::Cat { path } => commands::browse::run_cat(open_vfs(&config)?.as_ref(), &path),
        Commands::Find { pattern, base } => {
            commands::find::run(open_vfs(&config)?.as_ref(), &pattern, &base)
        }
        Commands::Pack {
            output,
            source,
            partition,
        } => commands::pack::run(&output, &source, partition.as_deref()).map(|_| ()),
        Commands::Mounts => commands::mounts::run(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["assetfs", "ls", "textures", "-vv", "--config", "x.ini"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("x.ini")));
        assert!(matches!(cli.command, Commands::Ls { ref path } if path == "textures"));
    }

    #[test]
    fn test_find_defaults_to_root() {
        let cli = Cli::parse_from(["assetfs", "find", "*.dds"]);
        assert!(matches!(cli.command, Commands::Find { ref base, .. } if base.is_empty()));
    }
}
