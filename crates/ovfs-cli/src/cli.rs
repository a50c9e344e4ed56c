//! CLI-specific types.
//!
//! Strong types for output selection and process exit status, shared by
//! every command.
//!
//! # Examples
//!
//! ```
//! use ovfs_cli::cli::{ExitCode, OutputFormat};
//!
//! let format = OutputFormat::Pretty;
//! assert_eq!(format.as_str(), "pretty");
//!
//! let code = ExitCode::SUCCESS;
//! assert_eq!(code.as_i32(), 0);
//! ```

use clap::ValueEnum;
use ovfs_core::VfsError;
use std::fmt;

/// CLI output format.
///
/// All formats carry the same information with different presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON output for machine parsing
    Json,
    /// Compact single-line output for scripts
    Text,
    /// Pretty-printed output with colors for human reading
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Returns the string representation of the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CLI exit code with semantic meaning.
///
/// ```
/// use ovfs_cli::cli::ExitCode;
///
/// assert!(ExitCode::SUCCESS.is_success());
/// assert_eq!(ExitCode::NOT_FOUND.as_i32(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// General error (exit code 1).
    pub const ERROR: Self = Self(1);

    /// Invalid input or arguments (exit code 2).
    pub const INVALID_INPUT: Self = Self(2);

    /// Path or mount not found (exit code 3).
    pub const NOT_FOUND: Self = Self(3);

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Picks the exit code for a failed command.
    ///
    /// The error chain is searched for a [`VfsError`]; anything else is a
    /// general error.
    ///
    /// ```
    /// use anyhow::Context;
    /// use ovfs_cli::cli::ExitCode;
    /// use ovfs_core::VfsError;
    ///
    /// let err = Err::<(), _>(VfsError::NotFound { path: "/x".into() })
    ///     .context("failed to read /x")
    ///     .unwrap_err();
    /// assert_eq!(ExitCode::from_error(&err), ExitCode::NOT_FOUND);
    /// ```
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        let Some(vfs_error) = err.chain().find_map(|e| e.downcast_ref::<VfsError>()) else {
            return Self::ERROR;
        };

        if vfs_error.is_not_found() {
            Self::NOT_FOUND
        } else if vfs_error.is_invalid_path()
            || vfs_error.is_not_directory()
            || vfs_error.is_directory()
            || vfs_error.is_mount_conflict()
            || vfs_error.is_physical_root_invalid()
            || matches!(vfs_error, VfsError::Config { .. })
        {
            Self::INVALID_INPUT
        } else {
            Self::ERROR
        }
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
