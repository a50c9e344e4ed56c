//! Virtual path handling.
//!
//! Virtual paths use Unix conventions on every platform: absolute, forward
//! slash separated, no trailing slash except for the root. [`VfsPath::new`]
//! rejects malformed input and cleans everything else lexically.
//!
//! # Examples
//!
//! ```
//! use ovfs_core::VfsPath;
//!
//! let path = VfsPath::new("static//css/./app.css").unwrap();
//! assert_eq!(path.as_str(), "/static/css/app.css");
//! assert_eq!(path.file_name(), "app.css");
//! assert_eq!(path.parent().unwrap().as_str(), "/static/css");
//! ```

use crate::error::{Result, VfsError};
use std::fmt;

/// A validated, cleaned virtual filesystem path.
///
/// Cleaning follows the usual lexical rules: repeated separators collapse,
/// `.` segments vanish, `..` removes the previous segment and never climbs
/// above `/`. A relative input is rooted at `/`.
///
/// ```
/// use ovfs_core::VfsPath;
///
/// assert_eq!(VfsPath::new("/a/b/../c/").unwrap().as_str(), "/a/c");
/// assert_eq!(VfsPath::new("/../..").unwrap().as_str(), "/");
/// assert!(VfsPath::new("/a\0b").unwrap_err().is_invalid_path());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VfsPath(String);

impl VfsPath {
    /// Validates and cleans `path`.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::InvalidPath` if the path contains a NUL byte or
    /// any other control character.
    pub fn new(path: &str) -> Result<Self> {
        if path.contains('\0') {
            return Err(VfsError::InvalidPath {
                path: path.escape_debug().to_string(),
                reason: "contains NUL byte",
            });
        }
        if path.chars().any(char::is_control) {
            return Err(VfsError::InvalidPath {
                path: path.escape_debug().to_string(),
                reason: "contains control character",
            });
        }

        Ok(Self(clean(path)))
    }

    /// The root path `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Returns the last segment, or `/` for the root.
    ///
    /// ```
    /// use ovfs_core::VfsPath;
    ///
    /// assert_eq!(VfsPath::new("/docs/a.txt").unwrap().file_name(), "a.txt");
    /// assert_eq!(VfsPath::root().file_name(), "/");
    /// ```
    #[must_use]
    pub fn file_name(&self) -> &str {
        if self.is_root() {
            return "/";
        }
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the parent directory, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        self.0.rfind('/').map(|pos| {
            if pos == 0 {
                Self::root()
            } else {
                Self(self.0[..pos].to_string())
            }
        })
    }

    /// Appends `segment` and re-cleans the result.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::InvalidPath` if `segment` is malformed.
    pub fn join(&self, segment: &str) -> Result<Self> {
        Self::new(&format!("{}/{segment}", self.0))
    }

    /// Iterates over the non-empty segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Returns the remainder of this path under `root`, without a leading
    /// slash.
    ///
    /// Matching is segment-wise: `/a` owns `/a/b` but not `/ab`. Returns
    /// `Some("")` when the paths are equal.
    ///
    /// ```
    /// use ovfs_core::VfsPath;
    ///
    /// let root = VfsPath::new("/app").unwrap();
    /// let path = VfsPath::new("/app/js/lib.js").unwrap();
    ///
    /// assert_eq!(path.strip_root(&root), Some("js/lib.js"));
    /// assert_eq!(root.strip_root(&root), Some(""));
    /// assert_eq!(VfsPath::new("/apple").unwrap().strip_root(&root), None);
    /// ```
    #[must_use]
    pub fn strip_root(&self, root: &Self) -> Option<&str> {
        if root.is_root() {
            return Some(&self.0[1..]);
        }
        let rest = self.0.strip_prefix(root.as_str())?;
        if rest.is_empty() {
            Some(rest)
        } else {
            rest.strip_prefix('/')
        }
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VfsPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn clean(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            s => stack.push(s),
        }
    }

    if stack.is_empty() {
        return "/".to_string();
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in stack {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    cleaned
}
