//! Error types for the virtual filesystem.
//!
//! Every variant carries the offending path so callers can report it without
//! re-deriving context. Classification goes through the `is_xxx()` predicates
//! rather than message text.
//!
//! # Examples
//!
//! ```
//! use ovfs_core::VfsError;
//!
//! let error = VfsError::NotFound {
//!     path: "/static/missing.txt".to_string(),
//! };
//!
//! assert!(error.is_not_found());
//! assert!(!error.is_invalid_path());
//! ```

use std::io;
use thiserror::Error;

/// Errors that can occur during VFS operations.
///
/// Host I/O errors are classified on conversion (see [`VfsError::from_io`]),
/// so a missing file on disk and a missing node in the tree both surface as
/// [`VfsError::NotFound`].
#[derive(Error, Debug)]
pub enum VfsError {
    /// Neither the embedded tree nor the physical fallback has the path
    #[error("file does not exist: {path}")]
    NotFound {
        /// The path that was not found
        path: String,
    },

    /// No registered mount owns the path
    #[error("no mount found for path: {path}")]
    MountNotFound {
        /// The path that matched no mount
        path: String,
    },

    /// Directory operation on a file, or a traversal through a file
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory
        path: String,
    },

    /// File operation on a directory
    #[error("is a directory: {path}")]
    IsADirectory {
        /// The path that is a directory
        path: String,
    },

    /// Path is malformed and was rejected before lookup
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The rejected path
        path: String,
        /// Why the path was rejected
        reason: &'static str,
    },

    /// Glob pattern could not be compiled
    #[error("invalid glob pattern {pattern:?}")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
        /// Underlying pattern error
        #[source]
        source: glob::PatternError,
    },

    /// A mount with the same virtual root is already registered
    #[error("mount already exists: {path}")]
    MountConflict {
        /// The duplicate virtual root
        path: String,
    },

    /// Physical root does not exist or is not a directory
    #[error("physical root is not a directory: {path}")]
    PhysicalRootInvalid {
        /// The physical path given to the mount
        path: String,
    },

    /// Build-time insertion under a parent that is not in the tree yet
    #[error("parent directory not in tree: {path}")]
    ParentNotFound {
        /// The missing parent path
        path: String,
    },

    /// Build-time insertion of a name that already exists
    #[error("node already exists: {path}")]
    AlreadyExists {
        /// The duplicate node path
        path: String,
    },

    /// Build-time insertion outside the mount's virtual root
    #[error("path {path} is outside mount {mount}")]
    OutsideMount {
        /// The path being inserted
        path: String,
        /// The mount's virtual root
        mount: String,
    },

    /// File handle was used after `close`
    #[error("file already closed: {path}")]
    Closed {
        /// The handle's path
        path: String,
    },

    /// Any other host I/O error, surfaced as-is
    #[error("i/o error on {path}")]
    Io {
        /// The path being accessed
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Mount configuration could not be read or parsed
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },
}

impl VfsError {
    /// Classifies a host I/O error for `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ovfs_core::VfsError;
    /// use std::io;
    ///
    /// let err = VfsError::from_io("/a.txt", io::Error::from(io::ErrorKind::NotFound));
    /// assert!(err.is_not_found());
    ///
    /// let err = VfsError::from_io("/a.txt", io::Error::from(io::ErrorKind::PermissionDenied));
    /// assert!(!err.is_not_found());
    /// ```
    #[must_use]
    pub fn from_io(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::NotADirectory => Self::NotADirectory { path },
            io::ErrorKind::IsADirectory => Self::IsADirectory { path },
            _ => Self::Io { path, source },
        }
    }

    /// Returns `true` if the path does not exist or no mount owns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ovfs_core::VfsError;
    ///
    /// let error = VfsError::MountNotFound {
    ///     path: "/nowhere".to_string(),
    /// };
    ///
    /// assert!(error.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::MountNotFound { .. })
    }

    /// Returns `true` if this is a not-a-directory error.
    #[must_use]
    pub const fn is_not_directory(&self) -> bool {
        matches!(self, Self::NotADirectory { .. })
    }

    /// Returns `true` if this is an is-a-directory error.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::IsADirectory { .. })
    }

    /// Returns `true` if the input path or pattern was malformed.
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. } | Self::InvalidPattern { .. })
    }

    /// Returns `true` if a mount with the same virtual root already exists.
    #[must_use]
    pub const fn is_mount_conflict(&self) -> bool {
        matches!(self, Self::MountConflict { .. })
    }

    /// Returns `true` if a physical root was missing or not a directory.
    #[must_use]
    pub const fn is_physical_root_invalid(&self) -> bool {
        matches!(self, Self::PhysicalRootInvalid { .. })
    }

    /// Converts into an [`io::Error`] with the closest matching kind.
    ///
    /// Used by the [`Read`](std::io::Read) and [`Seek`](std::io::Seek)
    /// implementations of [`File`](crate::File).
    #[must_use]
    pub fn into_io(self) -> io::Error {
        let kind = match &self {
            Self::NotFound { .. } | Self::MountNotFound { .. } => io::ErrorKind::NotFound,
            Self::NotADirectory { .. } => io::ErrorKind::NotADirectory,
            Self::IsADirectory { .. } => io::ErrorKind::IsADirectory,
            Self::InvalidPath { .. } | Self::InvalidPattern { .. } => io::ErrorKind::InvalidInput,
            Self::AlreadyExists { .. } | Self::MountConflict { .. } => io::ErrorKind::AlreadyExists,
            _ => io::ErrorKind::Other,
        };
        match self {
            Self::Io { source, .. } => source,
            other => io::Error::new(kind, other),
        }
    }
}

/// Type alias for VFS operation results.
pub type Result<T> = std::result::Result<T, VfsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        let error = VfsError::NotFound {
            path: "/test".to_string(),
        };
        assert!(error.is_not_found());
        assert!(!error.is_not_directory());
        assert!(!error.is_invalid_path());

        let error = VfsError::MountNotFound {
            path: "/test".to_string(),
        };
        assert!(error.is_not_found());
    }

    #[test]
    fn test_is_not_directory() {
        let error = VfsError::NotADirectory {
            path: "/file.txt".to_string(),
        };
        assert!(!error.is_not_found());
        assert!(error.is_not_directory());
        assert!(!error.is_directory());
    }

    #[test]
    fn test_is_invalid_path() {
        let error = VfsError::InvalidPath {
            path: "/a\0b".to_string(),
            reason: "contains NUL byte",
        };
        assert!(error.is_invalid_path());
        assert!(error.to_string().contains("contains NUL byte"));
    }

    #[test]
    fn test_from_io_classification() {
        let err = VfsError::from_io("/x", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());

        let err = VfsError::from_io("/x", io::Error::from(io::ErrorKind::NotADirectory));
        assert!(err.is_not_directory());

        let err = VfsError::from_io("/x", io::Error::from(io::ErrorKind::IsADirectory));
        assert!(err.is_directory());

        let err = VfsError::from_io("/x", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, VfsError::Io { .. }));
    }

    #[test]
    fn test_into_io_keeps_source() {
        let err = VfsError::Io {
            path: "/x".to_string(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.into_io().kind(), io::ErrorKind::PermissionDenied);

        let err = VfsError::NotFound {
            path: "/x".to_string(),
        };
        assert_eq!(err.into_io().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mount_error_predicates() {
        assert!(
            VfsError::MountConflict {
                path: "/a".to_string()
            }
            .is_mount_conflict()
        );
        assert!(
            VfsError::PhysicalRootInvalid {
                path: "/nonexistent".to_string()
            }
            .is_physical_root_invalid()
        );
    }
}
