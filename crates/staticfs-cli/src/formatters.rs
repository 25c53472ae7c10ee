//! Output formatters for CLI commands.
//!
//! Reports of every command go through [`format_output`] so JSON, text and
//! pretty modes look the same across commands. Reports are flat objects
//! whose values are scalars or lists of flat objects (table rows).

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::{Map, Value};
use staticfs_core::cli::OutputFormat;

/// Format data according to the specified output format.
///
/// # Errors
///
/// Returns an error if the data cannot be serialized.
///
/// # Examples
///
/// ```
/// use serde::Serialize;
/// use staticfs_cli::formatters::format_output;
/// use staticfs_core::cli::OutputFormat;
///
/// #[derive(Serialize)]
/// struct Summary {
///     files: usize,
///     output: String,
/// }
///
/// let summary = Summary {
///     files: 3,
///     output: "assets_data.rs".to_string(),
/// };
///
/// let output = format_output(&summary, OutputFormat::Json)?;
/// assert!(output.contains("\"files\": 3"));
///
/// let output = format_output(&summary, OutputFormat::Text)?;
/// assert_eq!(output, "files\t3\noutput\tassets_data.rs");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// Renders a scalar without quotes; nested values fall back to compact JSON.
fn plain(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Column names of a list of flat objects, in first-seen order.
fn columns(rows: &[Value]) -> Option<Vec<&str>> {
    let mut names: Vec<&str> = Vec::new();
    for row in rows {
        let Value::Object(fields) = row else {
            return None;
        };
        for key in fields.keys() {
            if !names.contains(&key.as_str()) {
                names.push(key);
            }
        }
    }
    Some(names)
}

fn cell(row: &Value, column: &str) -> String {
    row.get(column).map_or_else(|| "-".to_string(), plain)
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON with 2-space indentation.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be serialized.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize, Value, cell, columns, plain};

    /// Format data as tab-separated text.
    ///
    /// Scalar fields become `key<TAB>value` lines; a list of objects becomes a
    /// header line followed by one line per row. No colors, so the output can
    /// be piped to `cut` or `awk`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be converted to a JSON value.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let Value::Object(fields) = &value else {
            return Ok(plain(&value));
        };

        let mut lines = Vec::new();
        let mut tables = Vec::new();
        for (key, field) in fields {
            match field {
                Value::Array(rows) if columns(rows).is_some() => tables.push(rows),
                _ => lines.push(format!("{key}\t{}", plain(field))),
            }
        }

        for rows in tables {
            let Some(names) = columns(rows) else { continue };
            if names.is_empty() {
                continue;
            }
            lines.push(String::new());
            lines.push(names.join("\t"));
            for row in rows {
                let cells: Vec<String> = names.iter().map(|name| cell(row, name)).collect();
                lines.push(cells.join("\t"));
            }
        }
        Ok(lines.join("\n"))
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Map, Result, Serialize, Value, cell, columns};

    /// Format data as colorized, aligned output.
    ///
    /// Scalar fields are listed with aligned labels; lists of objects are
    /// drawn as tables with a bold header.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be converted to a JSON value.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        match &value {
            Value::Object(fields) => Ok(format_object(fields)),
            other => Ok(colorize(other)),
        }
    }

    fn colorize(value: &Value) -> String {
        match value {
            Value::Null => "-".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.green().to_string(),
            other => other.to_string(),
        }
    }

    fn format_object(fields: &Map<String, Value>) -> String {
        let width = fields.keys().map(String::len).max().unwrap_or(0);
        let mut out = Vec::new();
        let mut tables = Vec::new();

        for (key, field) in fields {
            match field {
                Value::Array(rows) if !rows.is_empty() && columns(rows).is_some() => {
                    tables.push((key, rows));
                }
                _ => out.push(format!(
                    "{}: {}",
                    format!("{key:>width$}").blue().bold(),
                    colorize(field)
                )),
            }
        }

        for (key, rows) in tables {
            out.push(String::new());
            out.push(key.bold().underline().to_string());
            out.push(format_table(rows));
        }
        out.join("\n")
    }

    fn format_table(rows: &[Value]) -> String {
        let names = columns(rows).unwrap_or_default();
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| names.iter().map(|name| cell(row, name)).collect())
            .collect();
        let widths: Vec<usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = names
            .iter()
            .zip(&widths)
            .map(|(name, width)| format!("{name:<width$}"))
            .collect();
        let mut lines = vec![header.join("  ").trim_end().bold().to_string()];

        for (row, source) in cells.iter().zip(rows) {
            let rendered: Vec<String> = row
                .iter()
                .zip(&widths)
                .zip(&names)
                .map(|((text, width), name)| {
                    let padded = format!("{text:<width$}");
                    match source.get(*name) {
                        Some(Value::Number(_)) => padded.cyan().to_string(),
                        Some(Value::String(s)) if s == "compressed" => padded.green().to_string(),
                        Some(Value::Null) => padded.dimmed().to_string(),
                        _ => padded,
                    }
                })
                .collect();
            lines.push(rendered.join("  ").trim_end().to_string());
        }
        lines.join("\n")
    }
}
