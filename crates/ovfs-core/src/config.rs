//! Mount configuration.
//!
//! Mount tables are stored in TOML:
//!
//! ```toml
//! [[mounts]]
//! virtual_path = "/static"
//! physical_path = "./public"
//!
//! [[mounts]]
//! virtual_path = "/views"
//! physical_path = "/srv/app/views"
//! ```
//!
//! Relative physical paths resolve against the current working directory
//! when the mount is registered.

use crate::error::{Result, VfsError};
use crate::path::VfsPath;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A set of mounts to register at startup.
///
/// # Examples
///
/// ```
/// use ovfs_core::VfsConfig;
///
/// let config = VfsConfig::from_toml_str(r#"
///     [[mounts]]
///     virtual_path = "/static"
///     physical_path = "./public"
/// "#).unwrap();
///
/// assert_eq!(config.mounts.len(), 1);
/// assert_eq!(config.mounts[0].virtual_path, "/static");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct VfsConfig {
    /// Mounts in declaration order.
    #[serde(default)]
    pub mounts: Vec<MountConfig>,
}

/// One virtual-to-physical binding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MountConfig {
    /// Virtual root, cleaned on registration.
    pub virtual_path: String,

    /// Physical directory backing the mount.
    pub physical_path: PathBuf,
}

impl MountConfig {
    /// Creates a mount entry.
    #[must_use]
    pub fn new(virtual_path: impl Into<String>, physical_path: impl Into<PathBuf>) -> Self {
        Self {
            virtual_path: virtual_path.into(),
            physical_path: physical_path.into(),
        }
    }
}

impl VfsConfig {
    /// Parses a TOML mount table and validates it.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::Config` if the document is malformed or fails
    /// [`validate`](Self::validate).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| VfsError::Config {
            message: format!("failed to parse mount configuration: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses the mount table at `path`.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::NotFound` or `VfsError::Io` if the file cannot be
    /// read, and `VfsError::Config` if it is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| VfsError::from_io(path.display().to_string(), e))?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), mounts = config.mounts.len(), "loaded mount configuration");
        Ok(config)
    }

    /// Serializes the mount table back to TOML.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::Config` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| VfsError::Config {
            message: format!("failed to serialize mount configuration: {e}"),
        })
    }

    /// Validates the mount table.
    ///
    /// Physical paths are not checked here; that happens when each mount is
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::Config` if a path is empty or two entries clean to
    /// the same virtual root, and `VfsError::InvalidPath` if a virtual path
    /// is malformed.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (index, mount) in self.mounts.iter().enumerate() {
            if mount.virtual_path.trim().is_empty() {
                return Err(VfsError::Config {
                    message: format!("mounts[{index}].virtual_path must not be empty"),
                });
            }
            if mount.physical_path.as_os_str().is_empty() {
                return Err(VfsError::Config {
                    message: format!("mounts[{index}].physical_path must not be empty"),
                });
            }

            let vpath = VfsPath::new(&mount.virtual_path)?;
            if !seen.insert(vpath.clone()) {
                return Err(VfsError::Config {
                    message: format!("duplicate mount for virtual path '{vpath}'"),
                });
            }
        }
        Ok(())
    }
}
