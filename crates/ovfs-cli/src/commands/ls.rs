//! Ls command implementation.
//!
//! Lists a directory through the overlay: from the embedded tree when the
//! directory is embedded, from disk otherwise.

use super::common::EntryInfo;
use crate::cli::{ExitCode, OutputFormat};
use anyhow::{Context, Result};
use ovfs_core::{Vfs, VfsPath};
use tracing::info;

/// Lists `path`, sorted by name.
///
/// # Errors
///
/// Returns an error if `path` cannot be resolved or is not a directory.
pub fn collect(vfs: &Vfs, path: &str) -> Result<Vec<EntryInfo>> {
    let dir = VfsPath::new(path)?;
    let entries = vfs
        .read_dir(dir.as_str())
        .with_context(|| format!("failed to list {dir}"))?;

    entries
        .iter()
        .map(|info| -> Result<EntryInfo> {
            Ok(EntryInfo::new(&dir.join(info.name())?, info))
        })
        .collect()
}

/// Runs the ls command.
///
/// # Errors
///
/// Returns an error if listing or formatting fails.
pub fn run(vfs: &Vfs, path: &str, output_format: OutputFormat) -> Result<ExitCode> {
    info!(path, "listing directory");
    let entries = collect(vfs, path)?;

    let formatted = crate::formatters::format_output(&entries, output_format)
        .context("failed to format listing")?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}
