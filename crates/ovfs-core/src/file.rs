//! Open file handles.
//!
//! A [`File`] reads either an embedded [`Node`] or a real file on disk. Both
//! origins share one type and one contract: [`Read`], [`Seek`],
//! [`File::readdir`], [`File::stat`] and [`File::close`].
//!
//! Handles carry their own cursor and are not meant to be shared between
//! callers; distinct handles over the same node read the same borrowed bytes.
//!
//! # Examples
//!
//! ```
//! use ovfs_core::{EmbeddedFile, VfsBuilder};
//! use std::io::{Read, Seek, SeekFrom};
//! # use tempfile::TempDir;
//! # let dir = TempDir::new().unwrap();
//!
//! let vfs = VfsBuilder::new()
//!     .mount("/", dir.path())
//!     .add_file("/hello.txt", EmbeddedFile::new("hello world"))
//!     .build()
//!     .unwrap();
//!
//! let mut file = vfs.open("/hello.txt").unwrap();
//! file.seek(SeekFrom::Start(6)).unwrap();
//!
//! let mut rest = String::new();
//! file.read_to_string(&mut rest).unwrap();
//! assert_eq!(rest, "world");
//!
//! file.close().unwrap();
//! ```

use crate::error::{Result, VfsError};
use crate::node::{Metadata, Node};
use crate::path::VfsPath;
use flate2::read::MultiGzDecoder;
use std::borrow::Cow;
use std::fs;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::trace;

/// An open, seekable read cursor over an embedded node or a disk file.
#[derive(Debug)]
pub struct File<'a> {
    path: VfsPath,
    inner: Option<Inner<'a>>,
}

#[derive(Debug)]
enum Inner<'a> {
    Memory(MemoryFile<'a>),
    Disk(DiskFile),
}

#[derive(Debug)]
struct MemoryFile<'a> {
    node: &'a Node,
    content: Option<Cow<'a, [u8]>>,
    pos: u64,
    dir_cursor: usize,
}

#[derive(Debug)]
struct DiskFile {
    physical: PathBuf,
    file: Option<fs::File>,
    entries: Option<Vec<Metadata>>,
    dir_cursor: usize,
}

impl<'a> File<'a> {
    pub(crate) const fn memory(path: VfsPath, node: &'a Node) -> Self {
        Self {
            path,
            inner: Some(Inner::Memory(MemoryFile {
                node,
                content: None,
                pos: 0,
                dir_cursor: 0,
            })),
        }
    }

    /// Opens `physical` on disk; directories get no OS file descriptor.
    pub(crate) fn disk(path: VfsPath, physical: PathBuf) -> Result<Self> {
        let meta = fs::metadata(&physical).map_err(|e| VfsError::from_io(path.as_str(), e))?;
        let file = if meta.is_dir() {
            None
        } else {
            Some(fs::File::open(&physical).map_err(|e| VfsError::from_io(path.as_str(), e))?)
        };

        Ok(Self {
            path,
            inner: Some(Inner::Disk(DiskFile {
                physical,
                file,
                entries: None,
                dir_cursor: 0,
            })),
        })
    }

    /// Virtual path this handle was opened with.
    #[must_use]
    pub const fn path(&self) -> &VfsPath {
        &self.path
    }

    /// Returns `true` if the handle is served from the embedded tree.
    #[must_use]
    pub const fn is_embedded(&self) -> bool {
        matches!(self.inner, Some(Inner::Memory(_)))
    }

    /// Returns `true` if the underlying bytes are gzip-encoded.
    ///
    /// Always `false` for disk-backed handles.
    #[must_use]
    pub fn is_gzip(&self) -> bool {
        match &self.inner {
            Some(Inner::Memory(m)) => m.node.is_gzip(),
            _ => false,
        }
    }

    /// Stored bytes of an embedded file, exactly as embedded.
    ///
    /// For gzip nodes this is the compressed payload, suitable for passing
    /// straight to a client that accepts gzip. Returns `None` for
    /// directories, disk-backed handles, and closed handles.
    #[must_use]
    pub fn raw_bytes(&self) -> Option<&'a [u8]> {
        match &self.inner {
            Some(Inner::Memory(m)) if !m.node.is_dir() => Some(m.node.raw_bytes()),
            _ => None,
        }
    }

    /// Returns metadata for the open entry.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::Closed` after [`close`](Self::close), or an I/O
    /// error if the disk entry can no longer be inspected.
    pub fn stat(&self) -> Result<Metadata> {
        match self.inner()? {
            Inner::Memory(m) => Ok(m.node.metadata()),
            Inner::Disk(d) => {
                let meta = fs::metadata(&d.physical)
                    .map_err(|e| VfsError::from_io(self.path.as_str(), e))?;
                Ok(Metadata::from_fs(self.path.file_name(), &meta))
            }
        }
    }

    /// Reads up to `n` directory entries, in ascending name order.
    ///
    /// `n == 0` returns every remaining entry. Successive calls continue
    /// where the previous one stopped; an exhausted directory yields an
    /// empty vector.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::NotADirectory` if the handle is open on a file,
    /// `VfsError::Closed` after [`close`](Self::close), or an I/O error from
    /// listing the disk directory.
    pub fn readdir(&mut self, n: usize) -> Result<Vec<Metadata>> {
        let path = &self.path;
        let inner = self.inner.as_mut().ok_or_else(|| VfsError::Closed {
            path: path.to_string(),
        })?;

        let (entries, cursor) = match inner {
            Inner::Memory(m) => {
                if !m.node.is_dir() {
                    return Err(VfsError::NotADirectory {
                        path: path.to_string(),
                    });
                }
                (m.node.child_infos(), &mut m.dir_cursor)
            }
            Inner::Disk(d) => {
                if d.file.is_some() {
                    return Err(VfsError::NotADirectory {
                        path: path.to_string(),
                    });
                }
                if d.entries.is_none() {
                    d.entries = Some(read_dir_sorted(path, &d.physical)?);
                }
                (d.entries.clone().unwrap_or_default(), &mut d.dir_cursor)
            }
        };

        let start = (*cursor).min(entries.len());
        let end = if n == 0 {
            entries.len()
        } else {
            start.saturating_add(n).min(entries.len())
        };
        *cursor = end;
        Ok(entries[start..end].to_vec())
    }

    /// Releases the handle.
    ///
    /// Disk-backed handles close their OS file descriptor here. Any further
    /// use of the handle fails with `VfsError::Closed`.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::Closed` if the handle was already closed.
    pub fn close(&mut self) -> Result<()> {
        self.inner.take().map(drop).ok_or_else(|| VfsError::Closed {
            path: self.path.to_string(),
        })
    }

    fn inner(&self) -> Result<&Inner<'a>> {
        self.inner.as_ref().ok_or_else(|| VfsError::Closed {
            path: self.path.to_string(),
        })
    }
}

impl<'a> MemoryFile<'a> {
    /// Content as seen by readers, decompressing gzip nodes on first use.
    fn content(&mut self, path: &VfsPath) -> io::Result<&[u8]> {
        if self.node.is_dir() {
            return Err(VfsError::IsADirectory {
                path: path.to_string(),
            }
            .into_io());
        }
        if self.content.is_none() {
            let raw: &'a [u8] = self.node.raw_bytes();
            let content = if self.node.is_gzip() {
                // The recorded size is advisory; only the payload bounds the hint
                let mut decoded = Vec::with_capacity(raw.len());
                MultiGzDecoder::new(raw).read_to_end(&mut decoded)?;
                Cow::Owned(decoded)
            } else {
                Cow::Borrowed(raw)
            };
            self.content = Some(content);
        }
        Ok(self.content.as_deref().unwrap_or_default())
    }
}

impl Read for File<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let path = &self.path;
        match self.inner.as_mut() {
            None => Err(VfsError::Closed {
                path: path.to_string(),
            }
            .into_io()),
            Some(Inner::Memory(m)) => {
                let pos = usize::try_from(m.pos).unwrap_or(usize::MAX);
                let content = m.content(path)?;
                let remaining = content.get(pos..).unwrap_or_default();
                let n = remaining.len().min(buf.len());
                buf[..n].copy_from_slice(&remaining[..n]);
                m.pos += n as u64;
                Ok(n)
            }
            Some(Inner::Disk(d)) => match d.file.as_mut() {
                Some(file) => file.read(buf),
                None => Err(VfsError::IsADirectory {
                    path: path.to_string(),
                }
                .into_io()),
            },
        }
    }
}

impl Seek for File<'_> {
    /// Memory-backed handles reject positions before the start or past the
    /// end of the content; disk-backed handles follow the host OS.
    fn seek(&mut self, from: SeekFrom) -> io::Result<u64> {
        let path = &self.path;
        match self.inner.as_mut() {
            None => Err(VfsError::Closed {
                path: path.to_string(),
            }
            .into_io()),
            Some(Inner::Memory(m)) => {
                let len = m.content(path)?.len() as u64;
                let target = match from {
                    SeekFrom::Start(offset) => Some(offset),
                    SeekFrom::End(offset) => len.checked_add_signed(offset),
                    SeekFrom::Current(offset) => m.pos.checked_add_signed(offset),
                };
                match target {
                    Some(target) if target <= len => {
                        m.pos = target;
                        Ok(target)
                    }
                    _ => Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("seek out of range for {path} (length {len})"),
                    )),
                }
            }
            Some(Inner::Disk(d)) => match d.file.as_mut() {
                Some(file) => file.seek(from),
                None => Err(VfsError::IsADirectory {
                    path: path.to_string(),
                }
                .into_io()),
            },
        }
    }
}

/// Lists a disk directory as metadata records sorted by name.
///
/// Entries whose names cannot be addressed as a virtual path segment (not
/// UTF-8, or containing control characters) are skipped, so every listed
/// name can be opened again.
pub(crate) fn read_dir_sorted(path: &VfsPath, physical: &Path) -> Result<Vec<Metadata>> {
    let io_err = |e| VfsError::from_io(path.as_str(), e);

    let mut entries = Vec::new();
    for entry in fs::read_dir(physical).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                trace!(dir = %path, name = ?raw, "skipping non UTF-8 entry");
                continue;
            }
        };
        if let Err(err) = path.join(&name) {
            trace!(dir = %path, name = ?name, error = %err, "skipping unaddressable entry");
            continue;
        }

        // Follow symlinks like stat; fall back to the link itself when dangling
        let meta = match fs::metadata(entry.path()) {
            Ok(meta) => meta,
            Err(_) => entry.metadata().map_err(io_err)?,
        };
        entries.push(Metadata::from_fs(name, &meta));
    }
    entries.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(entries)
}
