//! Root markers and error types for the path algebra.

use std::fmt;

use thiserror::Error;

/// Whether the host filesystem compares names case-sensitively.
///
/// Windows and macOS default to case-insensitive volumes; everything else is
/// treated as case-sensitive. This drives the default `PartialEq` and `Hash`
/// of [`Path`](super::Path).
pub const HOST_CASE_SENSITIVE: bool = !cfg!(any(windows, target_os = "macos"));

/// Errors raised by misuse of the path algebra.
///
/// These are caller programming errors. They are never downgraded by the
/// pools or overlays.
#[derive(Debug, Error)]
pub enum PathError {
    /// A rooted fragment cannot be appended onto another path.
    #[error("Cannot combine rooted path '{fragment}' onto '{base}'")]
    InvalidCombination { base: String, fragment: String },

    /// Relative paths can only be computed between paths sharing a root.
    #[error("Root of '{path}' does not match root of '{base}'")]
    RootMismatch { path: String, base: String },

    /// The process working directory could not be determined.
    #[error("Cannot determine working directory: {0}")]
    WorkingDirectory(#[from] std::io::Error),
}

/// The anchor of a [`Path`](super::Path).
#[derive(Debug, Clone, Default)]
pub enum Root {
    /// Relative path, no anchor.
    #[default]
    None,
    /// POSIX root `/`.
    Posix,
    /// Drive-letter root such as `c:`.
    Drive(char),
    /// Named scheme root such as `pak:/`.
    Scheme(String),
}

impl Root {
    /// Check if this is the relative (empty) root.
    pub fn is_none(&self) -> bool {
        matches!(self, Root::None)
    }

    /// Compare two roots, optionally ignoring case.
    pub fn equals(&self, other: &Root, case_sensitive: bool) -> bool {
        match (self, other) {
            (Root::None, Root::None) | (Root::Posix, Root::Posix) => true,
            (Root::Drive(a), Root::Drive(b)) => {
                if case_sensitive {
                    a == b
                } else {
                    a.eq_ignore_ascii_case(b)
                }
            }
            (Root::Scheme(a), Root::Scheme(b)) => {
                if case_sensitive {
                    a == b
                } else {
                    a.to_lowercase() == b.to_lowercase()
                }
            }
            _ => false,
        }
    }

    /// Prefix written before the first segment, using `sep` as separator.
    pub(crate) fn prefix(&self, sep: char) -> String {
        match self {
            Root::None => String::new(),
            Root::Posix => sep.to_string(),
            Root::Drive(letter) => format!("{}:{}", letter, sep),
            Root::Scheme(name) => format!("{}:{}", name, sep),
        }
    }

    /// Split a root marker off the front of `text`.
    ///
    /// Returns the root and the remainder to be split into segments. At most
    /// one separator directly after a drive or scheme colon is consumed.
    pub(crate) fn split(text: &str) -> (Root, &str) {
        if let Some(rest) = text.strip_prefix(['/', '\\']) {
            return (Root::Posix, rest);
        }

        let Some(colon) = text.find(':') else {
            return (Root::None, text);
        };

        let name = &text[..colon];
        if name.is_empty() || !name.chars().all(is_scheme_char) {
            return (Root::None, text);
        }

        let rest = &text[colon + 1..];
        let rest = rest.strip_prefix(['/', '\\']).unwrap_or(rest);

        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_alphabetic() => (Root::Drive(letter), rest),
            _ => (Root::Scheme(name.to_string()), rest),
        }
    }
}

fn is_scheme_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Root::None => Ok(()),
            Root::Posix => write!(f, "/"),
            Root::Drive(letter) => write!(f, "{}:", letter),
            Root::Scheme(name) => write!(f, "{}:/", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_posix_root() {
        let (root, rest) = Root::split("/d/e/f/");
        assert!(matches!(root, Root::Posix));
        assert_eq!(rest, "d/e/f/");
    }

    #[test]
    fn test_split_drive_root() {
        let (root, rest) = Root::split("c:/a/b");
        assert!(matches!(root, Root::Drive('c')));
        assert_eq!(rest, "a/b");

        let (root, rest) = Root::split("D:\\x");
        assert!(matches!(root, Root::Drive('D')));
        assert_eq!(rest, "x");
    }

    #[test]
    fn test_split_scheme_root() {
        let (root, rest) = Root::split("def:");
        assert!(matches!(root, Root::Scheme(ref n) if n == "def"));
        assert_eq!(rest, "");

        let (root, rest) = Root::split("pak:/textures");
        assert!(matches!(root, Root::Scheme(ref n) if n == "pak"));
        assert_eq!(rest, "textures");
    }

    #[test]
    fn test_split_colon_inside_segment_is_not_a_root() {
        let (root, rest) = Root::split("a/b:c");
        assert!(root.is_none());
        assert_eq!(rest, "a/b:c");
    }

    #[test]
    fn test_root_display() {
        assert_eq!(Root::None.to_string(), "");
        assert_eq!(Root::Posix.to_string(), "/");
        assert_eq!(Root::Drive('c').to_string(), "c:");
        assert_eq!(Root::Scheme("def".into()).to_string(), "def:/");
    }

    #[test]
    fn test_root_equals_case() {
        assert!(Root::Drive('C').equals(&Root::Drive('c'), false));
        assert!(!Root::Drive('C').equals(&Root::Drive('c'), true));
        assert!(Root::Scheme("PAK".into()).equals(&Root::Scheme("pak".into()), false));
        assert!(!Root::Posix.equals(&Root::None, false));
    }
}
