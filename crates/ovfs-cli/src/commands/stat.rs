//! Stat command implementation.

use super::common::EntryInfo;
use crate::cli::{ExitCode, OutputFormat};
use anyhow::{Context, Result};
use ovfs_core::{Vfs, VfsPath};
use tracing::info;

/// Describes the entry at `path`.
///
/// With `no_follow`, a symlink on disk is described itself rather than its
/// target.
///
/// # Errors
///
/// Returns an error if `path` cannot be resolved.
pub fn collect(vfs: &Vfs, path: &str, no_follow: bool) -> Result<EntryInfo> {
    let vpath = VfsPath::new(path)?;
    let info = if no_follow {
        vfs.lstat(vpath.as_str())
    } else {
        vfs.stat(vpath.as_str())
    }
    .with_context(|| format!("failed to stat {vpath}"))?;
    Ok(EntryInfo::new(&vpath, &info))
}

/// Runs the stat command.
///
/// # Errors
///
/// Returns an error if resolution or formatting fails.
pub fn run(
    vfs: &Vfs,
    path: &str,
    no_follow: bool,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    info!(path, no_follow, "stat");
    let entry = collect(vfs, path, no_follow)?;

    let formatted = crate::formatters::format_output(&entry, output_format)
        .context("failed to format entry")?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}
