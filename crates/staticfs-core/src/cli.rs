//! Value types shared by the `staticfs` command line.
//!
//! The CLI crate parses flags into these types so that command handlers never
//! deal with raw strings or integers for output selection and exit status.
//!
//! # Examples
//!
//! ```
//! use staticfs_core::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "json".parse().unwrap();
//! assert_eq!(format, OutputFormat::Json);
//!
//! assert!(ExitCode::SUCCESS.is_success());
//! assert_eq!(ExitCode::SOURCE_ERROR.as_i32(), 3);
//! ```

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// How command results are printed.
///
/// # Examples
///
/// ```
/// use staticfs_core::cli::OutputFormat;
///
/// let format: OutputFormat = "Pretty".parse().unwrap();
/// assert_eq!(format, OutputFormat::Pretty);
/// assert_eq!(format.to_string(), "pretty");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Indented JSON
    Json,
    /// Compact single-line output for scripts
    Text,
    /// Colored, human-oriented output
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Returns the flag spelling of the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::InvalidOptions {
                field: "format".to_string(),
                reason: format!("'{s}' is not one of: json, text, pretty"),
            }),
        }
    }
}

/// Format of diagnostic log lines written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogFormat {
    /// Human-readable `tracing` output
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(Error::InvalidOptions {
                field: "log-format".to_string(),
                reason: format!("'{s}' is not one of: text, json"),
            }),
        }
    }
}

/// Process exit status of the `staticfs` binary.
///
/// # Examples
///
/// ```
/// use staticfs_core::Error;
/// use staticfs_core::cli::ExitCode;
///
/// let err = Error::source_read("/a", "permission denied");
/// assert_eq!(ExitCode::for_error(&err), ExitCode::SOURCE_ERROR);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// Unclassified failure (exit code 1).
    pub const ERROR: Self = Self(1);

    /// Invalid flags, options or configuration (exit code 2).
    pub const INVALID_INPUT: Self = Self(2);

    /// The source tree could not be read (exit code 3).
    pub const SOURCE_ERROR: Self = Self(3);

    /// The generated module could not be written (exit code 4).
    pub const OUTPUT_ERROR: Self = Self(4);

    /// Creates an exit code from an integer value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Maps a generation error to the exit code reported for it.
    #[must_use]
    pub const fn for_error(error: &Error) -> Self {
        match error {
            Error::SourceRead { .. } => Self::SOURCE_ERROR,
            Error::OutputWrite { .. } => Self::OUTPUT_ERROR,
            Error::InvalidOptions { .. } | Error::Config { .. } => Self::INVALID_INPUT,
            Error::Template { .. } => Self::ERROR,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_round_trip_names() {
        for format in [OutputFormat::Json, OutputFormat::Text, OutputFormat::Pretty] {
            assert_eq!(format.as_str().parse::<OutputFormat>().unwrap(), format);
        }
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    }

    #[test]
    fn test_output_format_invalid() {
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(err.is_invalid_options());
        assert!("".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Pretty);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_exit_code_constants() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::ERROR.as_i32(), 1);
        assert_eq!(ExitCode::INVALID_INPUT.as_i32(), 2);
        assert_eq!(ExitCode::SOURCE_ERROR.as_i32(), 3);
        assert_eq!(ExitCode::OUTPUT_ERROR.as_i32(), 4);
        assert_eq!(ExitCode::default(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_exit_code_for_error() {
        let output = Error::OutputWrite {
            path: "x.rs".into(),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(ExitCode::for_error(&output), ExitCode::OUTPUT_ERROR);

        let options = Error::InvalidOptions {
            field: "variable_name".to_string(),
            reason: "bad".to_string(),
        };
        assert_eq!(ExitCode::for_error(&options), ExitCode::INVALID_INPUT);

        let template = Error::Template {
            message: "bad".to_string(),
        };
        assert_eq!(ExitCode::for_error(&template), ExitCode::ERROR);
    }

    #[test]
    fn test_exit_code_conversions() {
        let value: i32 = ExitCode::OUTPUT_ERROR.into();
        assert_eq!(value, 4);
        assert_eq!(ExitCode::from_i32(42).to_string(), "42");
        assert!(!ExitCode::from_i32(42).is_success());
    }
}
