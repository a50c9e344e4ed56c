//! Mounts command implementation.
//!
//! Lists registered mounts in resolution order.

use crate::cli::{ExitCode, OutputFormat};
use anyhow::{Context, Result};
use ovfs_core::{Mount, Vfs};
use serde::Serialize;
use tracing::info;

/// One registered mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountInfo {
    /// Virtual root
    pub virtual_root: String,
    /// Absolute physical root
    pub physical_root: String,
    /// Number of embedded nodes below the virtual root
    pub embedded_nodes: usize,
}

impl From<&Mount> for MountInfo {
    fn from(mount: &Mount) -> Self {
        Self {
            virtual_root: mount.virtual_root().to_string(),
            physical_root: mount.physical_root().display().to_string(),
            // The tree root stands for the mount point itself
            embedded_nodes: mount.tree().node_count() - 1,
        }
    }
}

/// Describes every mount, longest virtual root first.
#[must_use]
pub fn collect(vfs: &Vfs) -> Vec<MountInfo> {
    vfs.mounts().iter().map(MountInfo::from).collect()
}

/// Runs the mounts command.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn run(vfs: &Vfs, output_format: OutputFormat) -> Result<ExitCode> {
    let mounts = collect(vfs);
    info!(count = mounts.len(), "listing mounts");

    let formatted = crate::formatters::format_output(&mounts, output_format)
        .context("failed to format mount list")?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}
