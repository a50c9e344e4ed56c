//! A single virtual-to-physical binding.
//!
//! A [`Mount`] answers every query by looking in its embedded tree first and
//! falling back to its physical root only on a genuine tree miss. Invalid
//! input and type mismatches found in the tree are returned as-is and never
//! retried against the disk.

use crate::builder::EmbeddedFile;
use crate::error::{Result, VfsError};
use crate::file::{self, File};
use crate::node::{Metadata, Node};
use crate::path::VfsPath;
use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::trace;

/// Binding of a virtual root to a physical directory and an embedded tree.
///
/// # Examples
///
/// ```
/// use ovfs_core::{EmbeddedFile, Mount, VfsPath};
/// # use tempfile::TempDir;
/// # let dir = TempDir::new().unwrap();
///
/// let mut mount = Mount::new("/static", dir.path()).unwrap();
/// mount.add_file("/static/app.css", EmbeddedFile::new("body{}")).unwrap();
///
/// assert_eq!(mount.read_file("/static/app.css").unwrap(), b"body{}");
///
/// let physical = mount.to_physical_path(&VfsPath::new("/static/img/logo.png").unwrap()).unwrap();
/// assert_eq!(physical, dir.path().join("img").join("logo.png"));
/// ```
#[derive(Debug)]
pub struct Mount {
    vroot: VfsPath,
    proot: PathBuf,
    tree: Node,
}

impl Mount {
    /// Creates a mount with an empty tree.
    ///
    /// `virtual_path` is cleaned; `physical_path` is made absolute against
    /// the current directory.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::InvalidPath` for a malformed virtual path and
    /// `VfsError::PhysicalRootInvalid` if the physical path does not exist or
    /// is not a directory.
    pub fn new(virtual_path: &str, physical_path: impl AsRef<Path>) -> Result<Self> {
        let vroot = VfsPath::new(virtual_path)?;
        let physical_path = physical_path.as_ref();
        let invalid = || VfsError::PhysicalRootInvalid {
            path: physical_path.display().to_string(),
        };

        let proot = std::path::absolute(physical_path).map_err(|_| invalid())?;
        let meta = fs::metadata(&proot).map_err(|_| invalid())?;
        if !meta.is_dir() {
            return Err(invalid());
        }

        let tree = Node::dir(vroot.clone(), meta.modified().unwrap_or(UNIX_EPOCH));
        Ok(Self { vroot, proot, tree })
    }

    /// Virtual root this mount answers for.
    #[must_use]
    pub const fn virtual_root(&self) -> &VfsPath {
        &self.vroot
    }

    /// Absolute physical directory this mount falls back to.
    #[must_use]
    pub fn physical_root(&self) -> &Path {
        &self.proot
    }

    /// Root node of the embedded tree.
    #[must_use]
    pub const fn tree(&self) -> &Node {
        &self.tree
    }

    /// Returns `true` if `path` equals the virtual root or lies beneath it.
    #[must_use]
    pub fn owns(&self, path: &VfsPath) -> bool {
        path.strip_root(&self.vroot).is_some()
    }

    /// Looks `path` up in the embedded tree only.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::NotFound` on a tree miss, `VfsError::NotADirectory`
    /// if the lookup passes through a file, and `VfsError::InvalidPath` for
    /// malformed input.
    pub fn find_node(&self, path: &str) -> Result<&Node> {
        self.tree.find(&VfsPath::new(path)?)
    }

    /// Opens `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::NotFound` if neither the tree nor the disk has the
    /// path, and any tree or I/O error otherwise.
    pub fn open(&self, path: &str) -> Result<File<'_>> {
        let vpath = VfsPath::new(path)?;
        if let Some(node) = self.lookup(&vpath)? {
            return Ok(File::memory(vpath, node));
        }
        let physical = self.fallback(&vpath)?;
        File::disk(vpath, physical)
    }

    /// Returns metadata for `path`, following symlinks on disk.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn stat(&self, path: &str) -> Result<Metadata> {
        self.stat_with(path, true)
    }

    /// Returns metadata for `path` without following a final symlink on disk.
    ///
    /// Tree nodes have no symlinks, so embedded entries behave as in
    /// [`stat`](Self::stat).
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn lstat(&self, path: &str) -> Result<Metadata> {
        self.stat_with(path, false)
    }

    /// Reads the whole content of the file at `path`.
    ///
    /// Gzip nodes are decompressed; use [`File::raw_bytes`] for the stored
    /// payload.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::IsADirectory` if `path` is a directory, plus the
    /// errors of [`open`](Self::open).
    pub fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let mut file = self.open(path)?;
        if file.stat()?.is_dir() {
            return Err(VfsError::IsADirectory {
                path: file.path().to_string(),
            });
        }

        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|e| VfsError::from_io(file.path().as_str(), e))?;
        file.close()?;
        Ok(content)
    }

    /// Lists the directory at `path`, sorted by name.
    ///
    /// Tree directories and disk directories produce the same ordering.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::NotADirectory` if `path` is a file, plus the errors
    /// of [`open`](Self::open).
    pub fn read_dir(&self, path: &str) -> Result<Vec<Metadata>> {
        let vpath = VfsPath::new(path)?;
        if let Some(node) = self.lookup(&vpath)? {
            if !node.is_dir() {
                return Err(VfsError::NotADirectory {
                    path: vpath.to_string(),
                });
            }
            return Ok(node.child_infos());
        }
        let physical = self.fallback(&vpath)?;
        file::read_dir_sorted(&vpath, &physical)
    }

    /// Returns `true` if `path` exists in the tree or on disk.
    #[must_use]
    pub fn is_exists(&self, path: &str) -> bool {
        self.stat(path).is_ok()
    }

    /// Returns the virtual paths whose base name matches `pattern`.
    ///
    /// The directory part of `pattern` is looked up in the tree first; on a
    /// tree miss the whole pattern is evaluated against the physical root.
    /// Results are virtual paths in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::InvalidPattern` if the pattern does not compile and
    /// `VfsError::InvalidPath` for malformed input.
    pub fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        let vpattern = VfsPath::new(pattern)?;
        let dir = vpattern.parent().unwrap_or_else(VfsPath::root);
        let invalid = |source| VfsError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        };

        let mut matches = Vec::new();
        if let Some(node) = self.lookup(&dir)? {
            let matcher = glob::Pattern::new(vpattern.file_name()).map_err(invalid)?;
            for child in node.children() {
                if matcher.matches(child.name()) {
                    matches.push(child.path().to_string());
                }
            }
            return Ok(matches);
        }

        let Some(relative) = vpattern.strip_root(&self.vroot) else {
            return Ok(matches);
        };
        let root = glob::Pattern::escape(&self.proot.to_string_lossy());
        let physical_pattern = format!("{root}/{relative}");
        for entry in glob::glob(&physical_pattern).map_err(invalid)? {
            match entry {
                Ok(physical) => {
                    if let Some(vpath) = self.to_virtual_path(&physical) {
                        matches.push(vpath.to_string());
                    }
                }
                Err(err) => trace!(error = %err, "skipping unreadable glob entry"),
            }
        }
        matches.sort();
        matches.dedup();
        Ok(matches)
    }

    /// Adds an empty directory node at `path`.
    ///
    /// The parent directory must already be in the tree.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::ParentNotFound` if the parent is missing,
    /// `VfsError::OutsideMount` if `path` is not below the virtual root,
    /// `VfsError::AlreadyExists` for a duplicate name, and
    /// `VfsError::PhysicalRootInvalid` if the physical root has vanished.
    pub fn add_dir(&mut self, path: &str, mod_time: SystemTime) -> Result<()> {
        let vpath = VfsPath::new(path)?;
        let parent = self.parent_for_insert(&vpath)?;
        parent.add_child(Node::dir(vpath, mod_time))
    }

    /// Adds a file node at `path`.
    ///
    /// # Errors
    ///
    /// Same as [`add_dir`](Self::add_dir).
    pub fn add_file(&mut self, path: &str, file: EmbeddedFile) -> Result<()> {
        let vpath = VfsPath::new(path)?;
        let parent = self.parent_for_insert(&vpath)?;
        parent.add_child(file.into_node(vpath))
    }

    /// Translates a virtual path under this mount into its physical path.
    ///
    /// Returns `None` if `path` is not owned by this mount.
    #[must_use]
    pub fn to_physical_path(&self, path: &VfsPath) -> Option<PathBuf> {
        let relative = path.strip_root(&self.vroot)?;
        let mut physical = self.proot.clone();
        physical.extend(relative.split('/').filter(|s| !s.is_empty()));
        Some(physical)
    }

    /// Translates a physical path under the physical root back into the
    /// virtual path space.
    ///
    /// Inverse of [`to_physical_path`](Self::to_physical_path). Returns
    /// `None` if `physical` is outside the physical root, is not valid
    /// UTF-8, or contains `.`/`..` components.
    #[must_use]
    pub fn to_virtual_path(&self, physical: &Path) -> Option<VfsPath> {
        let relative = physical.strip_prefix(&self.proot).ok()?;
        let mut virtual_path = self.vroot.to_string();
        for component in relative.components() {
            let Component::Normal(segment) = component else {
                return None;
            };
            virtual_path.push('/');
            virtual_path.push_str(segment.to_str()?);
        }
        VfsPath::new(&virtual_path).ok()
    }

    /// Tree lookup that turns a miss into `None` and keeps every other error.
    ///
    /// A tree with nothing embedded misses everywhere, its root included, so
    /// disk-only mounts list the physical root.
    fn lookup(&self, path: &VfsPath) -> Result<Option<&Node>> {
        if !self.tree.has_children() {
            return Ok(None);
        }
        match self.tree.find(path) {
            Ok(node) => Ok(Some(node)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn fallback(&self, path: &VfsPath) -> Result<PathBuf> {
        let physical = self.to_physical_path(path).ok_or_else(|| VfsError::NotFound {
            path: path.to_string(),
        })?;
        trace!(path = %path, physical = %physical.display(), "tree miss, using physical root");
        Ok(physical)
    }

    fn stat_with(&self, path: &str, follow_links: bool) -> Result<Metadata> {
        let vpath = VfsPath::new(path)?;
        if let Some(node) = self.lookup(&vpath)? {
            return Ok(node.metadata());
        }
        let physical = self.fallback(&vpath)?;
        let meta = if follow_links {
            fs::metadata(&physical)
        } else {
            fs::symlink_metadata(&physical)
        }
        .map_err(|e| VfsError::from_io(vpath.as_str(), e))?;
        Ok(Metadata::from_fs(vpath.file_name(), &meta))
    }

    fn parent_for_insert(&mut self, path: &VfsPath) -> Result<&mut Node> {
        if !self.proot.is_dir() {
            return Err(VfsError::PhysicalRootInvalid {
                path: self.proot.display().to_string(),
            });
        }
        if *path == self.vroot {
            return Err(VfsError::AlreadyExists {
                path: path.to_string(),
            });
        }

        let outside = || VfsError::OutsideMount {
            path: path.to_string(),
            mount: self.vroot.to_string(),
        };
        let parent = path.parent().ok_or_else(outside)?;
        let found = self.tree.find_node_mut(&parent)?;
        found.ok_or_else(outside)
    }
}
