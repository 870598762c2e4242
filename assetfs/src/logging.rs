//! Tracing subscriber setup.
//!
//! Library code only emits events through `tracing`; binaries call [`init`]
//! once at startup. `RUST_LOG` overrides the configured level when set.

use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("Failed to open log file: {0}")]
    File(#[from] InitError),

    #[error("Invalid log file path: {0}")]
    FilePath(String),

    #[error("Failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Install the global subscriber.
///
/// Events go to stderr, and additionally to `file` through a non-blocking
/// writer when one is given. Keep the returned guard alive for the life of
/// the process or buffered file output is lost.
pub fn init(level: &str, file: Option<&Path>) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let (file_layer, guard) = match file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

fn file_appender(path: &Path) -> Result<RollingFileAppender, LoggingError> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LoggingError::FilePath(path.display().to_string()))?;
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    Ok(RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bad_filter_is_rejected() {
        // A valid RUST_LOG takes precedence over the configured level.
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert!(matches!(
            init("assetfs=loudest", None),
            Err(LoggingError::Filter(_))
        ));
    }

    #[test]
    fn test_file_appender_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("assetfs.log");

        let appender = file_appender(&path);
        assert!(appender.is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_file_appender_needs_a_name() {
        assert!(matches!(
            file_appender(Path::new("/")),
            Err(LoggingError::FilePath(_))
        ));
    }
}
