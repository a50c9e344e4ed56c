//! Depth-first traversal of the virtual tree.

use crate::error::Result;
use crate::node::Metadata;
use crate::path::VfsPath;
use crate::vfs::Vfs;

/// What [`Vfs::walk`] does after visiting an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Descend into the entry if it is a directory.
    Continue,
    /// Do not descend into this directory.
    SkipDir,
}

impl Vfs {
    /// Visits `root` and everything below it, depth first, children in
    /// lexical order.
    ///
    /// Every child path is resolved through [`Vfs::find_mount`] again, so a
    /// nested mount shadows the entry it is mounted on. Children are
    /// examined with `lstat`; symlinked directories on disk are reported but
    /// not followed.
    ///
    /// Children come from the parent's listing only. A nested mount root is
    /// reached only if its parent lists an entry of that name, so mounting
    /// `/app/vendor` over an outer root without a `vendor` entry leaves it
    /// out of `walk("/app")`; walk it directly instead. Disk entries whose
    /// names are not valid virtual path segments are never listed.
    ///
    /// # Errors
    ///
    /// Returns the first error from resolution, listing, or `visitor`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ovfs_core::{EmbeddedFile, VfsBuilder, WalkAction};
    /// # use tempfile::TempDir;
    /// # let temp = TempDir::new().unwrap();
    ///
    /// let vfs = VfsBuilder::new()
    ///     .mount("/", temp.path())
    ///     .add_dir("/docs")
    ///     .add_file("/docs/a.txt", EmbeddedFile::new("a"))
    ///     .add_dir("/private")
    ///     .add_file("/private/key", EmbeddedFile::new("k"))
    ///     .build()
    ///     .unwrap();
    ///
    /// let mut seen = Vec::new();
    /// vfs.walk("/", |path, info| {
    ///     seen.push(path.to_string());
    ///     if info.is_dir() && path.as_str() == "/private" {
    ///         return Ok(WalkAction::SkipDir);
    ///     }
    ///     Ok(WalkAction::Continue)
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(seen, ["/", "/docs", "/docs/a.txt", "/private"]);
    /// ```
    pub fn walk<F>(&self, root: &str, mut visitor: F) -> Result<()>
    where
        F: FnMut(&VfsPath, &Metadata) -> Result<WalkAction>,
    {
        let root = VfsPath::new(root)?;
        let info = self.stat(root.as_str())?;
        self.walk_entry(&root, &info, &mut visitor)
    }

    /// Returns every directory under `root`, `root` included, in walk order.
    ///
    /// # Errors
    ///
    /// Same as [`walk`](Self::walk).
    pub fn dirs(&self, root: &str) -> Result<Vec<VfsPath>> {
        let mut dirs = Vec::new();
        self.walk(root, |path, info| {
            if info.is_dir() {
                dirs.push(path.clone());
            }
            Ok(WalkAction::Continue)
        })?;
        Ok(dirs)
    }

    fn walk_entry<F>(&self, path: &VfsPath, info: &Metadata, visitor: &mut F) -> Result<()>
    where
        F: FnMut(&VfsPath, &Metadata) -> Result<WalkAction>,
    {
        let action = visitor(path, info)?;
        if !info.is_dir() || action == WalkAction::SkipDir {
            return Ok(());
        }

        for child in self.read_dir(path.as_str())? {
            let child_path = path.join(child.name())?;
            let child_info = self.lstat(child_path.as_str())?;
            self.walk_entry(&child_path, &child_info, visitor)?;
        }
        Ok(())
    }
}
