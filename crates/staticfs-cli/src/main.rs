//! staticfs command line.
//!
//! Embeds a directory tree into a Rust module that serves it as a read-only
//! in-memory filesystem.
//!
//! # Architecture
//!
//! The CLI is organized around subcommands:
//! - `generate` - Write the embedding module for a directory
//! - `inspect` - Show how each file would be stored, without writing
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! # Embed ./assets into src/assets_data.rs
//! staticfs generate assets --output src/assets_data.rs
//!
//! # Use options from a file, overriding the variable name
//! staticfs generate assets --config staticfs.toml --variable web
//!
//! # See which files would be compressed
//! staticfs --format text inspect assets
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use staticfs_cli::commands::{self, generate::GenerateArgs};
use staticfs_core::cli::{ExitCode, LogFormat, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// staticfs - embed a directory tree in a Rust module.
#[derive(Parser, Debug)]
#[command(name = "staticfs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log line format on stderr (text, json)
    #[arg(long = "log-format", global = true, default_value = "text")]
    log_format: String,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed a directory into a Rust module.
    ///
    /// Every file is stored either verbatim or gzip-compressed, whichever
    /// is smaller. The module is written atomically; on failure no output
    /// file is left behind.
    Generate(GenerateArgs),

    /// Show how each file of a directory would be embedded.
    ///
    /// Walks the directory and prints one row per entry with its storage
    /// kind and sizes. Nothing is written.
    Inspect {
        /// Directory to inspect
        source: PathBuf,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format = cli.log_format.parse::<LogFormat>()?;
    init_logging(cli.verbose, log_format)?;

    let output_format = cli.format.parse::<OutputFormat>()?;

    let exit_code = execute_command(cli.command, output_format)?;
    std::process::exit(exit_code.as_i32());
}

/// Initializes logging on stderr.
///
/// `--verbose` forces the `debug` level; otherwise `RUST_LOG` applies,
/// defaulting to `warn` so stdout reports stay uncluttered.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
fn init_logging(verbose: bool, format: LogFormat) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("failed to initialize logging")
}

/// Routes a command to its handler and returns the exit code.
fn execute_command(command: Commands, output_format: OutputFormat) -> Result<ExitCode> {
    match command {
        Commands::Generate(args) => commands::generate::run(&args, output_format),
        Commands::Inspect { source } => commands::inspect::run(&source, output_format),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}
