//! Generate command implementation.
//!
//! Embeds a host directory into a Rust module:
//! 1. Loads options from `--config` (if any) and overlays the flags
//! 2. Walks the directory and decides raw or compressed per file
//! 3. Writes the module atomically and prints a summary

use super::report_failure;
use crate::formatters::format_output;
use anyhow::{Context, Result};
use clap::Args;
use staticfs_codegen::generate;
use staticfs_core::GenerateOptions;
use staticfs_core::cli::{ExitCode, OutputFormat};
use staticfs_vfs::OsFs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments of `staticfs generate`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Directory to embed
    pub source: PathBuf,

    /// TOML file with generation options; flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file (default: `<variable_name>_data.rs`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Module wrapping the generated items (default: `main`)
    #[arg(long = "package")]
    pub package_name: Option<String>,

    /// `cfg` predicate gating the module, e.g. `feature = "embed"`
    #[arg(long)]
    pub build_tags: Option<String>,

    /// Name of the generated filesystem value (default: `assets`)
    #[arg(long = "variable")]
    pub variable_name: Option<String>,

    /// Doc comment of the generated value
    #[arg(long = "comment")]
    pub variable_comment: Option<String>,
}

impl GenerateArgs {
    /// Options given as flags, without any configuration file.
    #[must_use]
    pub fn flag_options(&self) -> GenerateOptions {
        GenerateOptions {
            filename: self.output.clone(),
            package_name: self.package_name.clone(),
            build_tags: self.build_tags.clone(),
            variable_name: self.variable_name.clone(),
            variable_comment: self.variable_comment.clone(),
        }
    }

    /// Options from the configuration file with the flags laid over them.
    ///
    /// # Errors
    ///
    /// Returns [`staticfs_core::Error::Config`] if the file cannot be loaded.
    pub fn options(&self) -> staticfs_core::Result<GenerateOptions> {
        let base = match &self.config {
            Some(path) => {
                debug!(config = %path.display(), "loading generation options");
                GenerateOptions::from_toml_file(path)?
            }
            None => GenerateOptions::default(),
        };
        Ok(base.merge(self.flag_options()))
    }
}

/// Runs the generate command.
///
/// Generation failures are reported on stderr and mapped to an exit code;
/// only failures to print the report are returned as errors.
///
/// # Errors
///
/// Returns an error if the report cannot be formatted.
///
/// # Examples
///
/// ```no_run
/// use staticfs_cli::commands::generate::{self, GenerateArgs};
/// use staticfs_core::cli::OutputFormat;
///
/// let args = GenerateArgs {
///     source: "assets".into(),
///     ..GenerateArgs::default()
/// };
/// let code = generate::run(&args, OutputFormat::Pretty)?;
/// assert!(code.is_success());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn run(args: &GenerateArgs, output_format: OutputFormat) -> Result<ExitCode> {
    info!("Generating module from {}", args.source.display());

    let options = match args.options() {
        Ok(options) => options,
        Err(err) => return Ok(report_failure(&err)),
    };

    let report = match generate(&OsFs::new(&args.source), &options) {
        Ok(report) => report,
        Err(err) => return Ok(report_failure(&err)),
    };

    let output =
        format_output(&report, output_format).context("failed to format generation report")?;
    println!("{output}");

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args_for(source: &TempDir, out: &TempDir) -> GenerateArgs {
        GenerateArgs {
            source: source.path().to_path_buf(),
            output: Some(out.path().join("assets_data.rs")),
            ..GenerateArgs::default()
        }
    }

    #[test]
    fn test_flag_options() {
        let args = GenerateArgs {
            source: "assets".into(),
            package_name: Some("web".to_string()),
            variable_name: Some("pages".to_string()),
            ..GenerateArgs::default()
        };
        let options = args.flag_options();
        assert_eq!(options.package_name.as_deref(), Some("web"));
        assert_eq!(options.variable_name.as_deref(), Some("pages"));
        assert!(options.filename.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("staticfs.toml");
        fs::write(&config, "package_name = \"web\"\nvariable_name = \"pages\"\n").unwrap();

        let args = GenerateArgs {
            source: dir.path().to_path_buf(),
            config: Some(config),
            variable_name: Some("assets".to_string()),
            ..GenerateArgs::default()
        };
        let options = args.options().unwrap();
        assert_eq!(options.package_name.as_deref(), Some("web"));
        assert_eq!(options.variable_name.as_deref(), Some("assets"));
    }

    #[test]
    fn test_missing_config_file() {
        let args = GenerateArgs {
            source: "assets".into(),
            config: Some("/nonexistent/staticfs.toml".into()),
            ..GenerateArgs::default()
        };
        assert!(args.options().unwrap_err().is_config_error());
    }

    #[test]
    fn test_run_writes_module() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(source.path().join("index.html"), "<html></html>").unwrap();

        let code = run(&args_for(&source, &out), OutputFormat::Json).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let text = fs::read_to_string(out.path().join("assets_data.rs")).unwrap();
        assert!(text.contains("\"/index.html\""));
    }

    #[test]
    fn test_run_invalid_variable_name() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let args = GenerateArgs {
            variable_name: Some("not valid".to_string()),
            ..args_for(&source, &out)
        };

        let code = run(&args, OutputFormat::Text).unwrap();
        assert_eq!(code, ExitCode::INVALID_INPUT);
        assert!(!out.path().join("assets_data.rs").exists());
    }

    #[test]
    fn test_run_missing_source() {
        let out = TempDir::new().unwrap();
        let args = GenerateArgs {
            source: out.path().join("missing"),
            output: Some(out.path().join("assets_data.rs")),
            ..GenerateArgs::default()
        };

        let code = run(&args, OutputFormat::Text).unwrap();
        assert_eq!(code, ExitCode::SOURCE_ERROR);
    }
}
