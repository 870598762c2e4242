//! `find`: search the overlay with a glob.

use assetfs::vfs::AssetFileSystem;
use assetfs::Path;
use glob::{MatchOptions, Pattern};

use crate::error::CliError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Case-insensitive glob over overlay paths.
///
/// A pattern without `/` is matched against the file name alone; otherwise
/// against the whole path.
#[derive(Debug)]
pub struct AssetMatcher {
    pattern: Pattern,
    whole_path: bool,
}

impl AssetMatcher {
    /// Compile a glob.
    pub fn new(glob: &str) -> Result<Self, CliError> {
        let pattern = Pattern::new(glob).map_err(|e| CliError::Pattern(e.to_string()))?;
        Ok(Self {
            pattern,
            whole_path: glob.contains('/'),
        })
    }

    /// Check a path against the glob.
    pub fn matches(&self, path: &Path) -> bool {
        if self.whole_path {
            self.pattern
                .matches_with(&path.to_posix_string(), MATCH_OPTIONS)
        } else {
            path.file_name()
                .is_some_and(|name| self.pattern.matches_with(name, MATCH_OPTIONS))
        }
    }
}

/// Print every file under `base` matching `glob`, sorted.
pub fn run(vfs: &dyn AssetFileSystem, glob: &str, base: &str) -> Result<(), CliError> {
    let matcher = AssetMatcher::new(glob)?;
    let mut found: Vec<String> = vfs
        .search_file_paths(&|path: &Path| matcher.matches(path), &Path::new(base))
        .iter()
        .map(Path::to_posix_string)
        .collect();
    found.sort();

    for path in &found {
        println!("{}", path);
    }
    tracing::debug!(matches = found.len(), "Search complete");

    Ok(())
}
