//! Mount registry and dispatch.
//!
//! A [`Vfs`] owns every [`Mount`] and routes each virtual path to the mount
//! with the longest matching virtual root. Mounts are kept ordered by
//! descending root length at registration time, so resolution is a
//! deterministic scan that never depends on hash iteration order.
//!
//! # Examples
//!
//! ```
//! use ovfs_core::Vfs;
//! # use tempfile::TempDir;
//! # let app = TempDir::new().unwrap();
//! # let vendor = TempDir::new().unwrap();
//! # std::fs::write(vendor.path().join("lib.js"), "vendored").unwrap();
//!
//! let mut vfs = Vfs::new();
//! vfs.add_mount("/app", app.path()).unwrap();
//! vfs.add_mount("/app/vendor", vendor.path()).unwrap();
//!
//! let mount = vfs.find_mount("/app/vendor/lib.js").unwrap();
//! assert_eq!(mount.virtual_root().as_str(), "/app/vendor");
//! assert_eq!(vfs.read_file("/app/vendor/lib.js").unwrap(), b"vendored");
//! ```

use crate::builder::EmbeddedFile;
use crate::config::VfsConfig;
use crate::error::{Result, VfsError};
use crate::file::File;
use crate::mount::Mount;
use crate::node::Metadata;
use crate::path::VfsPath;
use std::cmp::Ordering;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, trace};

/// Registry of all mounts.
///
/// Built once at startup, then only read. All read operations take `&self`,
/// so a built `Vfs` can be shared across threads without locking.
#[derive(Debug, Default)]
pub struct Vfs {
    mounts: Vec<Mount>,
}

impl Vfs {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { mounts: Vec::new() }
    }

    /// Creates a registry with every mount listed in `config`.
    ///
    /// # Errors
    ///
    /// Returns the first configuration or mount error.
    pub fn from_config(config: &VfsConfig) -> Result<Self> {
        config.validate()?;
        let mut vfs = Self::new();
        for mount in &config.mounts {
            vfs.add_mount(&mount.virtual_path, &mount.physical_path)?;
        }
        Ok(vfs)
    }

    /// Registers a mount of `physical_path` at `virtual_path`.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::MountConflict` if the cleaned virtual path is
    /// already registered (the existing mount is left intact) and
    /// `VfsError::PhysicalRootInvalid` if the physical path is not an
    /// existing directory.
    pub fn add_mount(
        &mut self,
        virtual_path: &str,
        physical_path: impl AsRef<Path>,
    ) -> Result<&mut Mount> {
        let vroot = VfsPath::new(virtual_path)?;
        if self.mounts.iter().any(|m| *m.virtual_root() == vroot) {
            return Err(VfsError::MountConflict {
                path: vroot.to_string(),
            });
        }

        let mount = Mount::new(vroot.as_str(), physical_path)?;
        debug!(
            virtual_root = %mount.virtual_root(),
            physical_root = %mount.physical_root().display(),
            "mount added"
        );

        let index = self
            .mounts
            .partition_point(|m| resolution_order(m.virtual_root(), mount.virtual_root()).is_lt());
        self.mounts.insert(index, mount);
        Ok(&mut self.mounts[index])
    }

    /// Returns the mount owning `path`: the one with the longest virtual root
    /// that equals `path` or is a segment-wise prefix of it.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::MountNotFound` if no mount owns the path and
    /// `VfsError::InvalidPath` for malformed input.
    pub fn find_mount(&self, path: &str) -> Result<&Mount> {
        let vpath = VfsPath::new(path)?;
        let mount = self
            .mounts
            .iter()
            .find(|m| m.owns(&vpath))
            .ok_or_else(|| VfsError::MountNotFound {
                path: vpath.to_string(),
            })?;
        trace!(path = %vpath, mount = %mount.virtual_root(), "resolved mount");
        Ok(mount)
    }

    /// Mounts in resolution order (longest virtual root first).
    #[must_use]
    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    /// Opens `path` through its owning mount.
    ///
    /// # Errors
    ///
    /// See [`Mount::open`]; additionally `VfsError::MountNotFound`.
    pub fn open(&self, path: &str) -> Result<File<'_>> {
        self.find_mount(path)?.open(path)
    }

    /// Returns metadata for `path`, following symlinks on disk.
    ///
    /// # Errors
    ///
    /// See [`Mount::stat`]; additionally `VfsError::MountNotFound`.
    pub fn stat(&self, path: &str) -> Result<Metadata> {
        self.find_mount(path)?.stat(path)
    }

    /// Returns metadata for `path` without following a final symlink.
    ///
    /// # Errors
    ///
    /// See [`Mount::lstat`]; additionally `VfsError::MountNotFound`.
    pub fn lstat(&self, path: &str) -> Result<Metadata> {
        self.find_mount(path)?.lstat(path)
    }

    /// Reads the whole file at `path`.
    ///
    /// # Errors
    ///
    /// See [`Mount::read_file`]; additionally `VfsError::MountNotFound`.
    pub fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        self.find_mount(path)?.read_file(path)
    }

    /// Lists the directory at `path`, sorted by name.
    ///
    /// # Errors
    ///
    /// See [`Mount::read_dir`]; additionally `VfsError::MountNotFound`.
    pub fn read_dir(&self, path: &str) -> Result<Vec<Metadata>> {
        self.find_mount(path)?.read_dir(path)
    }

    /// Returns the virtual paths matching `pattern`.
    ///
    /// # Errors
    ///
    /// See [`Mount::glob`]; additionally `VfsError::MountNotFound`.
    pub fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        self.find_mount(pattern)?.glob(pattern)
    }

    /// Returns `true` if `path` resolves to an existing entry.
    #[must_use]
    pub fn is_exists(&self, path: &str) -> bool {
        self.stat(path).is_ok()
    }

    /// Adds an empty directory node to the mount owning `path`.
    ///
    /// # Errors
    ///
    /// See [`Mount::add_dir`]; additionally `VfsError::MountNotFound`.
    pub fn add_dir(&mut self, path: &str, mod_time: SystemTime) -> Result<()> {
        self.find_mount_mut(path)?.add_dir(path, mod_time)
    }

    /// Adds a file node to the mount owning `path`.
    ///
    /// # Errors
    ///
    /// See [`Mount::add_file`]; additionally `VfsError::MountNotFound`.
    pub fn add_file(&mut self, path: &str, file: EmbeddedFile) -> Result<()> {
        self.find_mount_mut(path)?.add_file(path, file)
    }

    fn find_mount_mut(&mut self, path: &str) -> Result<&mut Mount> {
        let vpath = VfsPath::new(path)?;
        self.mounts
            .iter_mut()
            .find(|m| m.owns(&vpath))
            .ok_or_else(|| VfsError::MountNotFound {
                path: vpath.to_string(),
            })
    }
}

/// Longest root first; equal lengths in lexical order.
fn resolution_order(a: &VfsPath, b: &VfsPath) -> Ordering {
    b.as_str()
        .len()
        .cmp(&a.as_str().len())
        .then_with(|| a.cmp(b))
}
