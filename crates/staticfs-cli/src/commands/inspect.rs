//! Inspect command implementation.
//!
//! Walks a directory and shows how each file would be embedded, without
//! writing anything.

use super::report_failure;
use crate::formatters::format_output;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use staticfs_codegen::Snapshot;
use staticfs_codegen::snapshot::Entry;
use staticfs_core::cli::{ExitCode, OutputFormat};
use staticfs_vfs::OsFs;
use std::path::{Path, PathBuf};
use tracing::info;

/// One row of the inspection table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectEntry {
    /// Path inside the embedded tree
    pub path: String,
    /// `dir`, `raw` or `compressed`
    pub kind: &'static str,
    /// Original content length; 0 for directories
    pub size: u64,
    /// Embedded payload length; 0 for directories
    pub stored: usize,
    /// Modification time from the source
    pub modified: Option<DateTime<Utc>>,
}

/// What `staticfs inspect` prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    /// Inspected directory
    pub source: PathBuf,
    /// Number of directories, the root included
    pub dirs: usize,
    /// Number of files
    pub files: usize,
    /// Total original size
    pub source_bytes: u64,
    /// Total embedded size
    pub stored_bytes: u64,
    /// Every entry in walk order
    pub entries: Vec<InspectEntry>,
}

impl InspectReport {
    /// Summarises a snapshot taken from `source`.
    #[must_use]
    pub fn new(source: &Path, snapshot: &Snapshot) -> Self {
        let entries = snapshot
            .entries()
            .iter()
            .map(|entry| match entry {
                Entry::Dir(dir) => InspectEntry {
                    path: dir.path.clone(),
                    kind: "dir",
                    size: 0,
                    stored: 0,
                    modified: dir.modified,
                },
                Entry::File(file) => InspectEntry {
                    path: file.path.clone(),
                    kind: file.representation.kind.as_str(),
                    size: file.size,
                    stored: file.representation.payload_size,
                    modified: file.modified,
                },
            })
            .collect();

        Self {
            source: source.to_path_buf(),
            dirs: snapshot.toc().dir_count,
            files: snapshot.toc().file_count,
            source_bytes: snapshot.source_bytes(),
            stored_bytes: snapshot.stored_bytes(),
            entries,
        }
    }
}

/// Runs the inspect command.
///
/// # Errors
///
/// Returns an error if the report cannot be formatted.
pub fn run(source: &Path, output_format: OutputFormat) -> Result<ExitCode> {
    info!("Inspecting {}", source.display());

    let snapshot = match Snapshot::capture(&OsFs::new(source)) {
        Ok(snapshot) => snapshot,
        Err(err) => return Ok(report_failure(&err)),
    };

    let report = InspectReport::new(source, &snapshot);
    let output =
        format_output(&report, output_format).context("failed to format inspection report")?;
    println!("{output}");

    Ok(ExitCode::SUCCESS)
}
