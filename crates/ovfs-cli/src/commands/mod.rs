//! Command implementations for the ovfs CLI.
//!
//! Each command module resolves its paths through the shared [`Vfs`],
//! builds a serializable report, and prints it in the requested format.
//!
//! [`Vfs`]: ovfs_core::Vfs

pub mod cat;
pub mod common;
pub mod completions;
pub mod find;
pub mod ls;
pub mod mounts;
pub mod stat;
