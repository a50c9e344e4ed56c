//! Find command implementation.
//!
//! Walks the virtual tree and reports every path whose base name matches a
//! glob pattern.

use crate::cli::{ExitCode, OutputFormat};
use anyhow::{Context, Result};
use ovfs_core::{Vfs, VfsError, WalkAction};
use serde::Serialize;
use tracing::info;

/// Result of a find.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindReport {
    /// Where the walk started
    pub root: String,
    /// Base-name pattern
    pub pattern: String,
    /// Matching virtual paths in walk order
    pub matches: Vec<String>,
}

/// Walks `root` and collects paths whose base name matches `pattern`.
///
/// # Errors
///
/// Returns an error if the pattern is malformed or the walk fails.
pub fn collect(vfs: &Vfs, root: &str, pattern: &str) -> Result<FindReport> {
    let matcher = glob::Pattern::new(pattern).map_err(|source| VfsError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut matches = Vec::new();
    vfs.walk(root, |path, info| {
        if !path.is_root() && matcher.matches(info.name()) {
            matches.push(path.to_string());
        }
        Ok(WalkAction::Continue)
    })
    .with_context(|| format!("failed to walk {root}"))?;

    Ok(FindReport {
        root: root.to_string(),
        pattern: pattern.to_string(),
        matches,
    })
}

/// Runs the find command.
///
/// Exits with [`ExitCode::NOT_FOUND`] when nothing matched.
///
/// # Errors
///
/// Returns an error if the walk or formatting fails.
pub fn run(vfs: &Vfs, root: &str, pattern: &str, output_format: OutputFormat) -> Result<ExitCode> {
    info!(root, pattern, "searching");
    let report = collect(vfs, root, pattern)?;

    let formatted = crate::formatters::format_output(&report, output_format)
        .context("failed to format search results")?;
    println!("{formatted}");

    if report.matches.is_empty() {
        Ok(ExitCode::NOT_FOUND)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
