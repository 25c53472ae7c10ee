//! Command implementations for the staticfs CLI.
//!
//! Each command module parses its arguments, runs the operation, and formats
//! output according to the requested format. Generation failures are printed
//! to stderr and turned into an [`ExitCode`] rather than propagated.

use colored::Colorize;
use staticfs_core::Error;
use staticfs_core::cli::ExitCode;
use std::error::Error as _;

pub mod completions;
pub mod generate;
pub mod inspect;

/// Prints `err` and its causes to stderr and returns the matching exit code.
pub(crate) fn report_failure(err: &Error) -> ExitCode {
    eprintln!("{} {err}", "error:".red().bold());
    let mut cause = err.source();
    while let Some(inner) = cause {
        eprintln!("  {} {inner}", "caused by:".dimmed());
        cause = inner.source();
    }
    ExitCode::for_error(err)
}
