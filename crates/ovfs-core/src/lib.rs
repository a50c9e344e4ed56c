//! Read-only virtual filesystem overlay.
//!
//! Unifies in-memory trees of embedded resources with a fallback to the real
//! filesystem, addressed through one slash-separated virtual path space with
//! independently mounted sub-trees.
//!
//! # Features
//!
//! - **Tree-first resolution**: embedded content always wins over disk
//! - **Longest-prefix mounts**: overlapping mount roots resolve deterministically
//! - **Gzip-aware files**: pre-compressed payloads are exposed untouched or
//!   decompressed on read
//! - **Uniform handles**: memory and disk files share one [`File`] type
//! - **Thread-safe reads**: a built [`Vfs`] is `Send + Sync` and never mutated
//!
//! # Examples
//!
//! ```
//! use ovfs_core::{EmbeddedFile, VfsBuilder};
//! # use tempfile::TempDir;
//! # let public = TempDir::new().unwrap();
//! # std::fs::write(public.path().join("robots.txt"), "User-agent: *").unwrap();
//!
//! let vfs = VfsBuilder::new()
//!     .mount("/static", public.path())
//!     .add_dir("/static/css")
//!     .add_file("/static/css/app.css", EmbeddedFile::new("body{}"))
//!     .build()
//!     .unwrap();
//!
//! // Served from the embedded tree
//! assert_eq!(vfs.read_file("/static/css/app.css").unwrap(), b"body{}");
//!
//! // Served from disk
//! assert_eq!(vfs.read_file("/static/robots.txt").unwrap(), b"User-agent: *");
//!
//! // Absent from both
//! assert!(vfs.read_file("/static/missing.txt").unwrap_err().is_not_found());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod config;
pub mod error;
pub mod file;
pub mod mount;
pub mod node;
pub mod path;
pub mod vfs;
pub mod walk;

pub use builder::{EmbeddedFile, VfsBuilder};
pub use config::{MountConfig, VfsConfig};
pub use error::{Result, VfsError};
pub use file::File;
pub use mount::Mount;
pub use node::{Metadata, Node};
pub use path::VfsPath;
pub use vfs::Vfs;
pub use walk::WalkAction;
