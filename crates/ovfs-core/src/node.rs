//! In-memory resource tree.
//!
//! A [`Node`] is one embedded file or directory. Trees are assembled during
//! the build phase through [`Node::add_child`] and are read-only afterwards.

use crate::error::{Result, VfsError};
use crate::path::VfsPath;
use std::collections::HashMap;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

/// File information shared by tree nodes and disk entries.
///
/// # Examples
///
/// ```
/// use ovfs_core::{Node, VfsPath};
/// use std::time::SystemTime;
///
/// let node = Node::file(VfsPath::new("/a.txt").unwrap(), b"hello".to_vec(), SystemTime::now());
/// let info = node.metadata();
///
/// assert_eq!(info.name(), "a.txt");
/// assert_eq!(info.size(), 5);
/// assert!(info.is_file());
/// assert!(!info.is_gzip());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    name: String,
    size: u64,
    mod_time: SystemTime,
    is_dir: bool,
    is_gzip: bool,
}

impl Metadata {
    /// Builds metadata from host file information.
    #[must_use]
    pub fn from_fs(name: impl Into<String>, meta: &fs::Metadata) -> Self {
        Self {
            name: name.into(),
            size: meta.len(),
            mod_time: meta.modified().unwrap_or(UNIX_EPOCH),
            is_dir: meta.is_dir(),
            is_gzip: false,
        }
    }

    /// Base name of the entry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content length in bytes; the uncompressed length for gzip nodes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Last modification time.
    #[must_use]
    pub const fn mod_time(&self) -> SystemTime {
        self.mod_time
    }

    /// Returns `true` for directories.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Returns `true` for regular files.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        !self.is_dir
    }

    /// Returns `true` if the stored bytes are gzip-encoded.
    #[must_use]
    pub const fn is_gzip(&self) -> bool {
        self.is_gzip
    }
}

/// One embedded file or directory.
///
/// Children are keyed by name and sorted only when listed, so insertion
/// order never leaks into directory listings.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    path: VfsPath,
    is_dir: bool,
    size: u64,
    mod_time: SystemTime,
    data: Option<Vec<u8>>,
    gzip: bool,
    children: HashMap<String, Self>,
}

impl Node {
    /// Creates an empty directory node.
    #[must_use]
    pub fn dir(path: VfsPath, mod_time: SystemTime) -> Self {
        Self {
            name: path.file_name().to_string(),
            path,
            is_dir: true,
            size: 0,
            mod_time,
            data: None,
            gzip: false,
            children: HashMap::new(),
        }
    }

    /// Creates a plain file node.
    #[must_use]
    pub fn file(path: VfsPath, data: Vec<u8>, mod_time: SystemTime) -> Self {
        let size = data.len() as u64;
        Self {
            name: path.file_name().to_string(),
            path,
            is_dir: false,
            size,
            mod_time,
            data: Some(data),
            gzip: false,
            children: HashMap::new(),
        }
    }

    /// Creates a file node holding gzip-encoded bytes.
    ///
    /// `size` is the uncompressed length reported by [`Metadata::size`].
    #[must_use]
    pub fn gzip_file(path: VfsPath, data: Vec<u8>, size: u64, mod_time: SystemTime) -> Self {
        Self {
            size,
            gzip: true,
            ..Self::file(path, data, mod_time)
        }
    }

    /// Base name of the node.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute virtual path of the node.
    #[must_use]
    pub const fn path(&self) -> &VfsPath {
        &self.path
    }

    /// Returns `true` for directory nodes.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Content length; the uncompressed length for gzip nodes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` if [`raw_bytes`](Self::raw_bytes) is gzip-encoded.
    #[must_use]
    pub const fn is_gzip(&self) -> bool {
        self.gzip
    }

    /// Stored bytes exactly as embedded; empty for directories.
    #[must_use]
    pub fn raw_bytes(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }

    /// Metadata of this node.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        Metadata {
            name: self.name.clone(),
            size: self.size,
            mod_time: self.mod_time,
            is_dir: self.is_dir,
            is_gzip: self.gzip,
        }
    }

    /// Immediate children sorted by name.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        let mut children: Vec<_> = self.children.values().collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    /// Metadata of the immediate children, sorted by name.
    ///
    /// ```
    /// use ovfs_core::{Node, VfsPath};
    /// use std::time::SystemTime;
    ///
    /// let now = SystemTime::now();
    /// let mut docs = Node::dir(VfsPath::new("/docs").unwrap(), now);
    /// docs.add_child(Node::file(VfsPath::new("/docs/b.txt").unwrap(), vec![], now)).unwrap();
    /// docs.add_child(Node::file(VfsPath::new("/docs/a.txt").unwrap(), vec![], now)).unwrap();
    ///
    /// let names: Vec<_> = docs.child_infos().iter().map(|i| i.name().to_string()).collect();
    /// assert_eq!(names, ["a.txt", "b.txt"]);
    /// ```
    #[must_use]
    pub fn child_infos(&self) -> Vec<Metadata> {
        self.children().into_iter().map(Self::metadata).collect()
    }

    /// Total number of nodes in this subtree, itself included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(Self::node_count).sum::<usize>()
    }

    /// Returns `true` if this node has at least one child.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Attaches `child` to this directory.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::NotADirectory` if this node is a file and
    /// `VfsError::AlreadyExists` if a child with the same name exists; the
    /// existing child is left untouched.
    pub fn add_child(&mut self, child: Self) -> Result<()> {
        if !self.is_dir {
            return Err(VfsError::NotADirectory {
                path: self.path.to_string(),
            });
        }
        if self.children.contains_key(&child.name) {
            return Err(VfsError::AlreadyExists {
                path: child.path.to_string(),
            });
        }
        self.children.insert(child.name.clone(), child);
        Ok(())
    }

    /// Looks up `path` in this subtree.
    ///
    /// Returns the node itself when `path` equals its own path.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::NotFound` when a segment is absent or `path` lies
    /// outside this subtree, and `VfsError::NotADirectory` when the walk has
    /// to pass through a file.
    pub fn find(&self, path: &VfsPath) -> Result<&Self> {
        let not_found = || VfsError::NotFound {
            path: path.to_string(),
        };
        let relative = path.strip_root(&self.path).ok_or_else(not_found)?;

        let mut current = self;
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            if !current.is_dir {
                return Err(VfsError::NotADirectory {
                    path: current.path.to_string(),
                });
            }
            current = current.children.get(segment).ok_or_else(not_found)?;
        }
        Ok(current)
    }

    /// Locates the directory `dir` for attaching a new child.
    ///
    /// Returns `Ok(None)` if `dir` lies outside this subtree entirely.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::ParentNotFound` if a segment is missing and
    /// `VfsError::NotADirectory` if a segment is a file.
    pub fn find_node_mut(&mut self, dir: &VfsPath) -> Result<Option<&mut Self>> {
        let Some(relative) = dir.strip_root(&self.path) else {
            return Ok(None);
        };

        let mut current = self;
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            if !current.is_dir {
                return Err(VfsError::NotADirectory {
                    path: current.path.to_string(),
                });
            }
            current = current
                .children
                .get_mut(segment)
                .ok_or_else(|| VfsError::ParentNotFound {
                    path: dir.to_string(),
                })?;
        }
        if !current.is_dir {
            return Err(VfsError::NotADirectory {
                path: dir.to_string(),
            });
        }
        Ok(Some(current))
    }
}
