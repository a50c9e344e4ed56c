//! ovfs command-line tool.
//!
//! Inspects a virtual filesystem assembled from `--mount` flags or a TOML
//! mount table. Every path argument is a virtual path.
//!
//! # Examples
//!
//! ```bash
//! # List the root of a mount
//! ovfs --mount /static=./public ls /static
//!
//! # Print a file
//! ovfs --mount /static=./public cat /static/index.html
//!
//! # Use a mount table
//! ovfs --config mounts.toml find '*.css'
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use ovfs_cli::cli::{ExitCode, OutputFormat};
use ovfs_cli::{commands, loader};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Read-only virtual filesystem inspector.
#[derive(Parser, Debug)]
#[command(name = "ovfs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// TOML mount table
    #[arg(short, long, global = true, env = "OVFS_CONFIG")]
    config: Option<PathBuf>,

    /// Mount in VIRTUAL=PHYSICAL form (repeatable)
    #[arg(short, long = "mount", global = true, num_args = 1)]
    mounts: Vec<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered mounts.
    Mounts,

    /// List a directory.
    Ls {
        /// Virtual directory path
        #[arg(default_value = "/")]
        path: String,
    },

    /// Show metadata for a path.
    Stat {
        /// Virtual path
        path: String,

        /// Do not follow a symlink in the final component
        #[arg(long)]
        no_follow: bool,
    },

    /// Print file content to stdout.
    ///
    /// Gzip-encoded embedded files are decompressed unless `--raw` is given.
    Cat {
        /// Virtual file path
        path: String,

        /// Write the stored bytes without decompressing
        #[arg(long)]
        raw: bool,
    },

    /// Find entries whose name matches a glob pattern.
    Find {
        /// Base-name pattern, e.g. `*.css`
        pattern: String,

        /// Directory to start from
        #[arg(long, default_value = "/")]
        root: String,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("error: {err:#}");
        std::process::exit(ExitCode::ERROR.as_i32());
    }

    let exit_code = execute_command(cli).unwrap_or_else(|err| {
        eprintln!("error: {err:#}");
        ExitCode::from_error(&err)
    });

    std::process::exit(exit_code.as_i32());
}

/// Initializes logging to stderr.
///
/// Defaults to `warn` so command output on stdout stays clean; `RUST_LOG`
/// overrides it and `--verbose` forces `debug`.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

/// Routes a parsed command to its handler.
fn execute_command(cli: Cli) -> Result<ExitCode> {
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        return commands::completions::run(shell, &mut cmd);
    }

    let vfs = loader::load_vfs(cli.config.as_deref(), &cli.mounts)?;
    let format = cli.format;

    match cli.command {
        Commands::Mounts => commands::mounts::run(&vfs, format),
        Commands::Ls { path } => commands::ls::run(&vfs, &path, format),
        Commands::Stat { path, no_follow } => commands::stat::run(&vfs, &path, no_follow, format),
        Commands::Cat { path, raw } => commands::cat::run(&vfs, &path, raw),
        Commands::Find { pattern, root } => commands::find::run(&vfs, &root, &pattern, format),
        Commands::Completions { .. } => Ok(ExitCode::SUCCESS),
    }
}
