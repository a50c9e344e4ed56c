//! Builder pattern for constructing virtual filesystems.
//!
//! Provides a fluent API for registering mounts and embedding resources
//! during the build phase. Errors are collected along the way and the first
//! one is returned from [`VfsBuilder::build`].
//!
//! # Examples
//!
//! ```
//! use ovfs_core::{EmbeddedFile, VfsBuilder};
//! # use tempfile::TempDir;
//! # let public = TempDir::new().unwrap();
//!
//! let vfs = VfsBuilder::new()
//!     .mount("/static", public.path())
//!     .add_dir("/static/css")
//!     .add_file("/static/css/app.css", EmbeddedFile::new("body{}"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(vfs.read_file("/static/css/app.css").unwrap(), b"body{}");
//! ```

use crate::error::{Result, VfsError};
use crate::node::Node;
use crate::path::VfsPath;
use crate::vfs::Vfs;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Payload of an embedded file.
///
/// Holds either plain bytes or gzip-encoded bytes together with the
/// uncompressed length.
///
/// # Examples
///
/// ```
/// use ovfs_core::EmbeddedFile;
///
/// let file = EmbeddedFile::new("hello world").compress().unwrap();
///
/// assert!(file.is_gzip());
/// assert_eq!(file.size(), 11);
/// assert_eq!(&file.bytes()[..2], &[0x1f, 0x8b]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedFile {
    bytes: Vec<u8>,
    mod_time: SystemTime,
    gzip: bool,
    size: u64,
}

impl EmbeddedFile {
    /// Creates a plain file stamped with the current time.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            size: bytes.len() as u64,
            bytes,
            mod_time: SystemTime::now(),
            gzip: false,
        }
    }

    /// Creates a file from bytes that are already gzip-encoded.
    ///
    /// `original_size` is the uncompressed length reported by `stat`.
    #[must_use]
    pub fn gzipped(bytes: impl Into<Vec<u8>>, original_size: u64) -> Self {
        Self {
            gzip: true,
            size: original_size,
            ..Self::new(bytes)
        }
    }

    /// Sets the modification time.
    #[must_use]
    pub fn with_mod_time(mut self, mod_time: SystemTime) -> Self {
        self.mod_time = mod_time;
        self
    }

    /// Gzip-encodes plain bytes. Already compressed files are returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoder fails.
    pub fn compress(self) -> io::Result<Self> {
        if self.gzip {
            return Ok(self);
        }
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.bytes)?;
        Ok(Self {
            bytes: encoder.finish()?,
            gzip: true,
            ..self
        })
    }

    /// Stored bytes, compressed if [`is_gzip`](Self::is_gzip).
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns `true` if the stored bytes are gzip-encoded.
    #[must_use]
    pub const fn is_gzip(&self) -> bool {
        self.gzip
    }

    /// Uncompressed length.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Modification time.
    #[must_use]
    pub const fn mod_time(&self) -> SystemTime {
        self.mod_time
    }

    pub(crate) fn into_node(self, path: VfsPath) -> Node {
        if self.gzip {
            Node::gzip_file(path, self.bytes, self.size, self.mod_time)
        } else {
            Node::file(path, self.bytes, self.mod_time)
        }
    }
}

/// Builder for constructing a virtual filesystem.
///
/// Every step records its error instead of failing immediately, so a
/// builder chain reads top to bottom and reports the first problem at
/// [`build`](Self::build).
///
/// ```
/// use ovfs_core::{EmbeddedFile, VfsBuilder};
///
/// let result = VfsBuilder::new()
///     .add_file("/nowhere/a.txt", EmbeddedFile::new("a"))
///     .build();
///
/// assert!(result.unwrap_err().is_not_found());
/// ```
#[derive(Debug, Default)]
pub struct VfsBuilder {
    vfs: Vfs,
    errors: Vec<VfsError>,
    gzip_extensions: Vec<String>,
}

impl VfsBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vfs: Vfs::new(),
            errors: Vec::new(),
            gzip_extensions: Vec::new(),
        }
    }

    /// Registers a mount of `physical_path` at `virtual_path`.
    #[must_use]
    pub fn mount(mut self, virtual_path: &str, physical_path: impl AsRef<Path>) -> Self {
        if let Err(e) = self.vfs.add_mount(virtual_path, physical_path) {
            self.errors.push(e);
        }
        self
    }

    /// Adds an empty directory stamped with the current time.
    #[must_use]
    pub fn add_dir(mut self, path: &str) -> Self {
        if let Err(e) = self.vfs.add_dir(path, SystemTime::now()) {
            self.errors.push(e);
        }
        self
    }

    /// Adds a file.
    #[must_use]
    pub fn add_file(mut self, path: &str, file: EmbeddedFile) -> Self {
        if let Err(e) = self.vfs.add_file(path, file) {
            self.errors.push(e);
        }
        self
    }

    /// Sets the file extensions that [`embed_dir`](Self::embed_dir)
    /// gzip-compresses. Matching ignores ASCII case. Empty by default.
    #[must_use]
    pub fn with_gzip_extensions<S: Into<String>>(
        mut self,
        extensions: impl IntoIterator<Item = S>,
    ) -> Self {
        self.gzip_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Embeds every directory and regular file under `physical_dir` at
    /// `virtual_path`, which must lie inside a registered mount.
    ///
    /// `virtual_path` is created if missing; its parent must exist.
    /// Entries are embedded in lexical order. Symlinks are skipped.
    ///
    /// ```
    /// use ovfs_core::VfsBuilder;
    /// # use tempfile::TempDir;
    /// # let root = TempDir::new().unwrap();
    /// # let assets = TempDir::new().unwrap();
    /// # std::fs::create_dir(assets.path().join("css")).unwrap();
    /// # std::fs::write(assets.path().join("css/app.css"), "body{}").unwrap();
    ///
    /// let vfs = VfsBuilder::new()
    ///     .mount("/static", root.path())
    ///     .with_gzip_extensions(["css"])
    ///     .embed_dir("/static", assets.path())
    ///     .build()
    ///     .unwrap();
    ///
    /// let info = vfs.stat("/static/css/app.css").unwrap();
    /// assert!(info.is_gzip());
    /// assert_eq!(vfs.read_file("/static/css/app.css").unwrap(), b"body{}");
    /// ```
    #[must_use]
    pub fn embed_dir(mut self, virtual_path: &str, physical_dir: impl AsRef<Path>) -> Self {
        if let Err(e) = self.embed_dir_inner(virtual_path, physical_dir.as_ref()) {
            self.errors.push(e);
        }
        self
    }

    /// Number of mounts registered so far.
    #[must_use]
    pub fn mount_count(&self) -> usize {
        self.vfs.mounts().len()
    }

    /// Consumes the builder and returns the constructed VFS.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while building, if any.
    pub fn build(self) -> Result<Vfs> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        Ok(self.vfs)
    }

    fn embed_dir_inner(&mut self, virtual_path: &str, physical_dir: &Path) -> Result<()> {
        let base = VfsPath::new(virtual_path)?;
        let dir_meta = fs::metadata(physical_dir)
            .map_err(|e| VfsError::from_io(physical_dir.display().to_string(), e))?;
        if !dir_meta.is_dir() {
            return Err(VfsError::NotADirectory {
                path: physical_dir.display().to_string(),
            });
        }

        let base_missing = match self.vfs.find_mount(base.as_str())?.find_node(base.as_str()) {
            Ok(node) if node.is_dir() => false,
            Ok(_) => {
                return Err(VfsError::NotADirectory {
                    path: base.to_string(),
                });
            }
            Err(e) if e.is_not_found() => true,
            Err(e) => return Err(e),
        };
        if base_missing {
            self.vfs
                .add_dir(base.as_str(), dir_meta.modified().unwrap_or(UNIX_EPOCH))?;
        }

        let mut embedded = 0_usize;
        for entry in WalkDir::new(physical_dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .unwrap_or(physical_dir)
                    .display()
                    .to_string();
                VfsError::from_io(path, io::Error::from(e))
            })?;
            let Ok(relative) = entry.path().strip_prefix(physical_dir) else {
                continue;
            };
            let target = join_relative(&base, relative)?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                let mod_time = entry_mod_time(&entry)?;
                self.vfs.add_dir(target.as_str(), mod_time)?;
            } else if file_type.is_file() {
                let mod_time = entry_mod_time(&entry)?;
                let bytes = fs::read(entry.path())
                    .map_err(|e| VfsError::from_io(entry.path().display().to_string(), e))?;
                let mut file = EmbeddedFile::new(bytes).with_mod_time(mod_time);
                if self.should_gzip(entry.path()) {
                    file = file
                        .compress()
                        .map_err(|e| VfsError::from_io(target.as_str(), e))?;
                }
                self.vfs.add_file(target.as_str(), file)?;
            } else {
                trace!(path = %entry.path().display(), "skipping non-regular entry");
                continue;
            }
            embedded += 1;
        }

        debug!(
            virtual_path = %base,
            physical_dir = %physical_dir.display(),
            entries = embedded,
            "embedded directory"
        );
        Ok(())
    }

    fn should_gzip(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| {
                self.gzip_extensions
                    .iter()
                    .any(|g| g.eq_ignore_ascii_case(ext))
            })
    }
}

fn join_relative(base: &VfsPath, relative: &Path) -> Result<VfsPath> {
    let mut joined = base.to_string();
    for component in relative.components() {
        let Component::Normal(segment) = component else {
            continue;
        };
        let segment = segment.to_str().ok_or_else(|| VfsError::InvalidPath {
            path: relative.display().to_string(),
            reason: "not valid UTF-8",
        })?;
        joined.push('/');
        joined.push_str(segment);
    }
    VfsPath::new(&joined)
}

fn entry_mod_time(entry: &walkdir::DirEntry) -> Result<SystemTime> {
    let meta = entry.metadata().map_err(|e| {
        VfsError::from_io(entry.path().display().to_string(), io::Error::from(e))
    })?;
    Ok(meta.modified().unwrap_or(UNIX_EPOCH))
}
