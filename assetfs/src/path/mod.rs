//! Path algebra for the virtual filesystem.
//!
//! A [`Path`] is an immutable, normalized value: a [`Root`], an ordered list of
//! segments and a trailing-separator flag. Paths are parsed once at
//! construction and never mutated afterwards.
//!
//! # Parsing
//!
//! ```text
//! "/d/e/f/"      root "/"      segments [d, e, f]   trailing
//! "c:/a/b"       root "c:"     segments [a, b]
//! "def:"         root "def:/"  segments []
//! "a\\b/./c"     root ""       segments [a, b, c]
//! ```
//!
//! Both `/` and `\` separate segments. Normalization drops `.` and empty
//! segments and folds `..` against the previous real segment. A `..` that has
//! nothing to fold against is kept, so relative paths may climb above their
//! own origin.
//!
//! # Example
//!
//! ```
//! use assetfs::path::Path;
//!
//! let base = Path::new("a/b");
//! let joined = base.combine(&Path::new("c/d/")).unwrap();
//! assert_eq!(joined.to_posix_string(), "a/b/c/d/");
//!
//! let relative = Path::new("a/b/c/d").relative_to(&base).unwrap();
//! assert_eq!(relative.to_posix_string(), "c/d");
//! ```

mod types;

pub use types::{PathError, Root, HOST_CASE_SENSITIVE};

use std::fmt;
use std::hash::{Hash, Hasher};

const PARENT: &str = "..";
const CURRENT: &str = ".";

/// A normalized, immutable filesystem path.
///
/// Equality through `==` follows the host convention (see
/// [`HOST_CASE_SENSITIVE`]); use [`Path::equals`] to choose explicitly.
#[derive(Debug, Clone, Default)]
pub struct Path {
    root: Root,
    segments: Vec<String>,
    trailing: bool,
}

impl Path {
    /// Parse and normalize a path string.
    pub fn new(text: &str) -> Self {
        let (root, rest) = Root::split(text);
        let segments = normalize(rest.split(['/', '\\']));
        let trailing = !segments.is_empty() && rest.ends_with(['/', '\\']);

        Self {
            root,
            segments,
            trailing,
        }
    }

    /// The empty relative path.
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_parts(root: Root, segments: Vec<String>, trailing: bool) -> Self {
        let trailing = trailing && !segments.is_empty();
        Self {
            root,
            segments,
            trailing,
        }
    }

    /// The root marker.
    pub fn root(&self) -> &Root {
        &self.root
    }

    /// The normalized segments.
    pub fn parts(&self) -> &[String] {
        &self.segments
    }

    /// Check if this is the empty relative path.
    pub fn is_empty(&self) -> bool {
        self.root.is_none() && self.segments.is_empty()
    }

    /// Whether the path was written with a trailing separator.
    pub fn is_directory_hint(&self) -> bool {
        self.trailing
    }

    /// The first `count` segments, without a trailing separator.
    pub fn ancestor(&self, count: usize) -> Path {
        let segments = self.segments.iter().take(count).cloned().collect();
        Self::from_parts(self.root.clone(), segments, false)
    }

    /// The last segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Append `other` and renormalize.
    ///
    /// The result keeps this path's root and takes the trailing-separator flag
    /// of `other`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidCombination`] if `other` carries a root.
    pub fn combine(&self, other: &Path) -> Result<Path, PathError> {
        if !other.root.is_none() {
            return Err(PathError::InvalidCombination {
                base: self.to_posix_string(),
                fragment: other.to_posix_string(),
            });
        }

        let segments = normalize(
            self.segments
                .iter()
                .chain(other.segments.iter())
                .map(String::as_str),
        );

        Ok(Self::from_parts(self.root.clone(), segments, other.trailing))
    }

    /// Append a single name exactly as given.
    ///
    /// Unlike [`Path::combine`], `name` is not parsed, so a backend-reported
    /// name such as `notes:v2.txt` stays one segment instead of turning into
    /// a root.
    pub fn child(&self, name: &str) -> Path {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self::from_parts(self.root.clone(), segments, false)
    }

    /// Anchor a relative path at the process working directory.
    ///
    /// Rooted paths are returned unchanged.
    pub fn absolute(&self) -> Result<Path, PathError> {
        if !self.root.is_none() {
            return Ok(self.clone());
        }

        let cwd = std::env::current_dir()?;
        Path::new(&cwd.to_string_lossy()).combine(self)
    }

    /// Express this path relative to `base`.
    ///
    /// Emits one `..` per segment of `base` beyond the common prefix, followed
    /// by the rest of this path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::RootMismatch`] if the roots differ.
    pub fn relative_to(&self, base: &Path) -> Result<Path, PathError> {
        if !self.root.equals(&base.root, HOST_CASE_SENSITIVE) {
            return Err(PathError::RootMismatch {
                path: self.to_posix_string(),
                base: base.to_posix_string(),
            });
        }

        let common = self
            .segments
            .iter()
            .zip(base.segments.iter())
            .take_while(|(a, b)| segment_eq(a, b, HOST_CASE_SENSITIVE))
            .count();

        let segments = std::iter::repeat(PARENT.to_string())
            .take(base.segments.len() - common)
            .chain(self.segments[common..].iter().cloned())
            .collect();

        Ok(Self::from_parts(Root::None, segments, self.trailing))
    }

    /// Structural comparison with explicit case sensitivity.
    pub fn equals(&self, other: &Path, case_sensitive: bool) -> bool {
        self.trailing == other.trailing
            && self.root.equals(&other.root, case_sensitive)
            && self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| segment_eq(a, b, case_sensitive))
    }

    /// A copy with every segment lower-cased.
    pub fn case_folded(&self) -> Path {
        Self {
            root: self.root.clone(),
            segments: self.segments.iter().map(|s| s.to_lowercase()).collect(),
            trailing: self.trailing,
        }
    }

    /// Check if `base` is a case-insensitive segment prefix of this path.
    pub fn starts_with_folded(&self, base: &Path) -> bool {
        self.root.equals(&base.root, false)
            && base.segments.len() <= self.segments.len()
            && base
                .segments
                .iter()
                .zip(self.segments.iter())
                .all(|(a, b)| segment_eq(a, b, false))
    }

    /// Render with `/` separators.
    pub fn to_posix_string(&self) -> String {
        self.render('/')
    }

    /// Render with the host's native separator.
    pub fn to_native_string(&self) -> String {
        self.render(std::path::MAIN_SEPARATOR)
    }

    fn render(&self, sep: char) -> String {
        let mut out = self.root.prefix(sep);
        let mut first = true;
        for segment in &self.segments {
            if !first {
                out.push(sep);
            }
            out.push_str(segment);
            first = false;
        }
        if self.trailing {
            out.push(sep);
        }
        out
    }
}

/// Fold raw segments into normalized form.
fn normalize<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for segment in raw {
        match segment {
            "" | CURRENT => {}
            PARENT => match out.last() {
                Some(last) if last != PARENT => {
                    out.pop();
                }
                _ => out.push(PARENT.to_string()),
            },
            other => out.push(other.to_string()),
        }
    }
    out
}

fn segment_eq(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a == b || a.to_lowercase() == b.to_lowercase()
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, HOST_CASE_SENSITIVE)
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let folded;
        let path = if HOST_CASE_SENSITIVE {
            self
        } else {
            folded = self.case_folded();
            &folded
        };

        // Root is hashed through its rendering so case folding applies to it too.
        let root = path.root.to_string();
        if HOST_CASE_SENSITIVE {
            root.hash(state);
        } else {
            root.to_lowercase().hash(state);
        }
        path.segments.hash(state);
        path.trailing.hash(state);
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_posix_string())
    }
}

impl From<&str> for Path {
    fn from(text: &str) -> Self {
        Path::new(text)
    }
}

impl From<String> for Path {
    fn from(text: String) -> Self {
        Path::new(&text)
    }
}

impl From<&String> for Path {
    fn from(text: &String) -> Self {
        Path::new(text)
    }
}
