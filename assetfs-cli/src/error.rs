//! CLI error types.

use std::fmt;
use std::io;

use assetfs::config::ConfigError;
use assetfs::logging::LoggingError;
use assetfs::pool::PackError;

/// Errors that can occur while running a command.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded or applied.
    Config(ConfigError),

    /// Logging could not be initialized.
    Logging(LoggingError),

    /// The requested path does not exist in the overlay.
    NotFound(String),

    /// The path exists but is the wrong kind of resource.
    WrongType { path: String, expected: &'static str },

    /// Invalid glob pattern.
    Pattern(String),

    /// Pack archive could not be written.
    Pack(PackError),

    /// Local I/O failed.
    Io(io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::NotFound(path) => write!(f, "No such asset: {}", path),
            CliError::WrongType { path, expected } => {
                write!(f, "'{}' is not a {}", path, expected)
            }
            CliError::Pattern(msg) => write!(f, "Invalid pattern: {}", msg),
            CliError::Pack(e) => write!(f, "Failed to write pack archive: {}", e),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Pack(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::NotFound(_) | CliError::WrongType { .. } | CliError::Pattern(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<PackError> for CliError {
    fn from(e: PackError) -> Self {
        CliError::Pack(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_cli_error_display() {
        let err = CliError::NotFound("textures/grass.dds".to_string());
        assert_eq!(err.to_string(), "No such asset: textures/grass.dds");

        let err = CliError::WrongType {
            path: "textures".to_string(),
            expected: "file",
        };
        assert_eq!(err.to_string(), "'textures' is not a file");
    }

    #[test]
    fn test_cli_error_source() {
        let err = CliError::from(io::Error::other("disk gone"));
        assert!(err.source().is_some());
        assert!(CliError::Pattern("[".to_string()).source().is_none());
    }
}
