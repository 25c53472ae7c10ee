//! Error types for staticfs generation.
//!
//! This module provides the error hierarchy used while snapshotting a source
//! tree and writing the generated module. Every variant carries the context
//! needed to report the failure without a backtrace.
//!
//! # Examples
//!
//! ```
//! use staticfs_core::{Error, Result};
//!
//! fn check_name(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(Error::InvalidOptions {
//!             field: "variable_name".to_string(),
//!             reason: "must not be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_name("").unwrap_err();
//! assert!(err.is_invalid_options());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for staticfs generation.
///
/// Generation errors are fatal: a run that returns any of these has not
/// written an output file.
#[derive(Error, Debug)]
pub enum Error {
    /// Opening, stating, listing or reading an entry of the source tree failed.
    ///
    /// Raised by the walker and by the per-file encoder. The whole generation
    /// run is aborted and no output is written.
    #[error("Failed to read source entry {path}: {source}")]
    SourceRead {
        /// Slash-separated path of the entry inside the source tree
        path: String,
        /// Underlying filesystem error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Persisting the generated module failed.
    #[error("Failed to write generated output {}: {source}", path.display())]
    OutputWrite {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Template registration or rendering failed.
    #[error("Template error: {message}")]
    Template {
        /// Description of the template failure
        message: String,
    },

    /// A generation option has an unusable value.
    ///
    /// Raised when a name that ends up as a Rust identifier is not one, or
    /// when an option contains characters that cannot be rendered.
    #[error("Invalid option {field}: {reason}")]
    InvalidOptions {
        /// The option that failed validation
        field: String,
        /// Detailed reason for the validation failure
        reason: String,
    },

    /// Configuration file could not be loaded.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
        /// Underlying parse or I/O error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Creates a [`Error::SourceRead`] for the given source path.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::Error;
    /// use std::io;
    ///
    /// let err = Error::source_read("/a.txt", io::Error::from(io::ErrorKind::NotFound));
    /// assert!(err.is_source_read());
    /// assert!(err.to_string().contains("/a.txt"));
    /// ```
    pub fn source_read(
        path: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::SourceRead {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Returns `true` if this is a source read error.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::Error;
    ///
    /// let err = Error::SourceRead {
    ///     path: "/index.html".to_string(),
    ///     source: "permission denied".into(),
    /// };
    /// assert!(err.is_source_read());
    /// ```
    #[must_use]
    pub const fn is_source_read(&self) -> bool {
        matches!(self, Self::SourceRead { .. })
    }

    /// Returns `true` if this is an output write error.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::Error;
    /// use std::io;
    ///
    /// let err = Error::OutputWrite {
    ///     path: "assets_data.rs".into(),
    ///     source: io::Error::from(io::ErrorKind::PermissionDenied),
    /// };
    /// assert!(err.is_output_write());
    /// ```
    #[must_use]
    pub const fn is_output_write(&self) -> bool {
        matches!(self, Self::OutputWrite { .. })
    }

    /// Returns `true` if this is a template error.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::Template { .. })
    }

    /// Returns `true` if this is an invalid options error.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::Error;
    ///
    /// let err = Error::InvalidOptions {
    ///     field: "package_name".to_string(),
    ///     reason: "not an identifier".to_string(),
    /// };
    /// assert!(err.is_invalid_options());
    /// ```
    #[must_use]
    pub const fn is_invalid_options(&self) -> bool {
        matches!(self, Self::InvalidOptions { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

/// Result type alias for staticfs operations.
///
/// # Examples
///
/// ```
/// use staticfs_core::{Error, Result};
///
/// fn non_empty(value: &str) -> Result<&str> {
///     if value.is_empty() {
///         return Err(Error::Template {
///             message: "empty".to_string(),
///         });
///     }
///     Ok(value)
/// }
///
/// assert!(non_empty("x").is_ok());
/// assert!(non_empty("").is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_source_read_detection() {
        let err = Error::source_read("/missing", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_source_read());
        assert!(!err.is_output_write());
    }

    #[test]
    fn test_output_write_detection() {
        let err = Error::OutputWrite {
            path: PathBuf::from("out.rs"),
            source: io::Error::other("disk full"),
        };
        assert!(err.is_output_write());
        assert!(!err.is_source_read());
    }

    #[test]
    fn test_template_error_detection() {
        let err = Error::Template {
            message: "unknown template".to_string(),
        };
        assert!(err.is_template_error());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_config_error_detection() {
        let err = Error::Config {
            message: "bad toml".to_string(),
            source: None,
        };
        assert!(err.is_config_error());
        assert!(!err.is_invalid_options());
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidOptions {
            field: "variable_name".to_string(),
            reason: "not an identifier".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("variable_name"));
        assert!(display.contains("not an identifier"));
    }

    #[test]
    fn test_source_chain_preserved() {
        use std::error::Error as _;

        let err = Error::source_read("/a", io::Error::other("boom"));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "boom");
    }
}
