//! Cat command implementation.
//!
//! Streams file content to stdout. Gzip entries are decompressed unless the
//! stored payload is requested with `--raw`.

use crate::cli::ExitCode;
use anyhow::{Context, Result};
use ovfs_core::{Vfs, VfsError};
use std::io::{self, Write};
use tracing::{debug, info};

/// Copies the content of `path` into `out` and returns the byte count.
///
/// With `raw`, an embedded gzip entry is written exactly as stored.
///
/// # Errors
///
/// Returns an error if `path` cannot be opened, is a directory, or the copy
/// fails.
pub fn write_content<W: Write>(vfs: &Vfs, path: &str, raw: bool, out: &mut W) -> Result<u64> {
    let mut file = vfs
        .open(path)
        .with_context(|| format!("failed to open {path}"))?;
    if file.stat()?.is_dir() {
        return Err(VfsError::IsADirectory {
            path: file.path().to_string(),
        })
        .context("cannot print a directory");
    }

    let written = match file.raw_bytes() {
        Some(bytes) if raw && file.is_gzip() => {
            debug!(path, "writing stored gzip payload");
            out.write_all(bytes)?;
            bytes.len() as u64
        }
        _ => io::copy(&mut file, out).with_context(|| format!("failed to read {path}"))?,
    };
    file.close()?;
    Ok(written)
}

/// Runs the cat command.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
pub fn run(vfs: &Vfs, path: &str, raw: bool) -> Result<ExitCode> {
    info!(path, raw, "printing file");
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_content(vfs, path, raw, &mut out)?;
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}
