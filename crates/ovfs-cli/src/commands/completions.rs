//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, elvish, and
//! `PowerShell`.

use crate::cli::ExitCode;
use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};
use tracing::info;

/// Writes the completion script for `shell` into `out`.
pub fn generate_completions<W: Write>(shell: Shell, cmd: &mut Command, out: &mut W) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
///
/// # Errors
///
/// Infallible today; returns `Result` like every other command.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    info!("generating {shell} completions");
    generate_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}
