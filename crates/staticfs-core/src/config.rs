//! Generation options for staticfs.
//!
//! [`GenerateOptions`] is what callers fill in (every field optional); it can
//! be deserialized from a TOML file and overridden field by field.
//! [`GenerateOptions::resolve`] applies the defaults and validates the names
//! that end up as Rust identifiers in the generated module.
//!
//! # Examples
//!
//! ```
//! use staticfs_core::GenerateOptions;
//!
//! let resolved = GenerateOptions::default().resolve().unwrap();
//! assert_eq!(resolved.package_name, "main");
//! assert_eq!(resolved.variable_name, "assets");
//! assert_eq!(resolved.static_ident(), "ASSETS");
//! assert_eq!(resolved.filename.to_str(), Some("assets_data.rs"));
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default module name wrapping the generated items.
pub const DEFAULT_PACKAGE_NAME: &str = "main";

/// Default name of the generated filesystem value.
pub const DEFAULT_VARIABLE_NAME: &str = "assets";

// Strict and reserved keywords; a generated `mod`/`static` may not use them.
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "gen", "macro",
    "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Options for code generation.
///
/// All fields are optional; [`GenerateOptions::resolve`] fills in the
/// defaults. The struct deserializes from TOML with every key optional:
///
/// ```toml
/// filename = "src/web_assets.rs"
/// package_name = "web"
/// build_tags = 'feature = "embed"'
/// variable_name = "web_assets"
/// ```
///
/// # Examples
///
/// ```
/// use staticfs_core::GenerateOptions;
///
/// let options = GenerateOptions::default()
///     .with_package_name("web")
///     .with_variable_name("pages");
///
/// let resolved = options.resolve().unwrap();
/// assert_eq!(resolved.filename.to_str(), Some("pages_data.rs"));
/// assert_eq!(
///     resolved.variable_comment,
///     "pages statically implements the virtual filesystem provided to staticfs."
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateOptions {
    /// Output file of the generated Rust code (including extension).
    ///
    /// Default: lowercase `variable_name` followed by `_data.rs`.
    pub filename: Option<PathBuf>,

    /// Name of the module wrapping the generated items.
    ///
    /// Default: `main`
    pub package_name: Option<String>,

    /// Optional `cfg` predicate gating the generated module,
    /// e.g. `feature = "embed"` or `not(debug_assertions)`.
    pub build_tags: Option<String>,

    /// Name of the generated filesystem value. The static itself is the
    /// upper-cased form (`assets` becomes `ASSETS`).
    ///
    /// Default: `assets`
    pub variable_name: Option<String>,

    /// Doc comment of the generated static. May span several lines.
    ///
    /// Default: `"{variable_name} statically implements the virtual filesystem provided to staticfs."`
    pub variable_comment: Option<String>,
}

impl GenerateOptions {
    /// Creates options with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads options from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or is not valid
    /// TOML for this structure (unknown keys are rejected).
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::GenerateOptions;
    /// # use std::io::Write;
    ///
    /// # let mut file = tempfile::NamedTempFile::new().unwrap();
    /// # writeln!(file, "variable_name = \"web\"").unwrap();
    /// # let path = file.path();
    /// let options = GenerateOptions::from_toml_file(path)?;
    /// assert_eq!(options.variable_name.as_deref(), Some("web"));
    /// # Ok::<(), staticfs_core::Error>(())
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}", path.display()),
            source: Some(Box::new(e)),
        })?;
        Self::from_toml_str(&text).map_err(|e| match e {
            Error::Config { message, source } => Error::Config {
                message: format!("{}: {message}", path.display()),
                source,
            },
            other => other,
        })
    }

    /// Parses options from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text is not valid TOML for this structure.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::GenerateOptions;
    ///
    /// let options = GenerateOptions::from_toml_str("package_name = \"web\"")?;
    /// assert_eq!(options.package_name.as_deref(), Some("web"));
    /// # Ok::<(), staticfs_core::Error>(())
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            message: "invalid generation options".to_string(),
            source: Some(Box::new(e)),
        })
    }

    /// Sets the output filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Sets the wrapping module name.
    #[must_use]
    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    /// Sets the `cfg` predicate gating the generated module.
    #[must_use]
    pub fn with_build_tags(mut self, tags: impl Into<String>) -> Self {
        self.build_tags = Some(tags.into());
        self
    }

    /// Sets the generated value name.
    #[must_use]
    pub fn with_variable_name(mut self, name: impl Into<String>) -> Self {
        self.variable_name = Some(name.into());
        self
    }

    /// Sets the doc comment of the generated value.
    #[must_use]
    pub fn with_variable_comment(mut self, comment: impl Into<String>) -> Self {
        self.variable_comment = Some(comment.into());
        self
    }

    /// Overlays every field that is set in `other` onto `self`.
    ///
    /// Used to apply command-line flags on top of a configuration file.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::GenerateOptions;
    ///
    /// let file = GenerateOptions::default()
    ///     .with_package_name("web")
    ///     .with_variable_name("pages");
    /// let flags = GenerateOptions::default().with_variable_name("assets");
    ///
    /// let merged = file.merge(flags);
    /// assert_eq!(merged.package_name.as_deref(), Some("web"));
    /// assert_eq!(merged.variable_name.as_deref(), Some("assets"));
    /// ```
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            filename: other.filename.or(self.filename),
            package_name: other.package_name.or(self.package_name),
            build_tags: other.build_tags.or(self.build_tags),
            variable_name: other.variable_name.or(self.variable_name),
            variable_comment: other.variable_comment.or(self.variable_comment),
        }
    }

    /// Applies defaults and validates the result.
    ///
    /// Empty strings are treated like unset fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] if `package_name` or `variable_name`
    /// is not a valid Rust identifier, or if `build_tags` spans several lines
    /// or has unbalanced parentheses.
    pub fn resolve(&self) -> Result<ResolvedOptions> {
        let package_name = non_empty(self.package_name.as_deref())
            .unwrap_or(DEFAULT_PACKAGE_NAME)
            .to_string();
        validate_identifier("package_name", &package_name)?;

        let variable_name = non_empty(self.variable_name.as_deref())
            .unwrap_or(DEFAULT_VARIABLE_NAME)
            .to_string();
        validate_identifier("variable_name", &variable_name)?;

        let build_tags = non_empty(self.build_tags.as_deref()).map(str::trim).map(String::from);
        if let Some(tags) = &build_tags {
            validate_build_tags(tags)?;
        }

        let filename = self
            .filename
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(format!("{}_data.rs", variable_name.to_lowercase())));

        let variable_comment = non_empty(self.variable_comment.as_deref()).map_or_else(
            || {
                format!(
                    "{variable_name} statically implements the virtual filesystem provided to staticfs."
                )
            },
            String::from,
        );

        Ok(ResolvedOptions {
            filename,
            package_name,
            build_tags,
            variable_name,
            variable_comment,
        })
    }
}

/// Generation options with every default applied.
///
/// Produced by [`GenerateOptions::resolve`]; consumed by the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOptions {
    /// Output file of the generated Rust code.
    pub filename: PathBuf,
    /// Name of the module wrapping the generated items.
    pub package_name: String,
    /// `cfg` predicate gating the generated module.
    pub build_tags: Option<String>,
    /// Name of the generated filesystem value.
    pub variable_name: String,
    /// Doc comment of the generated value.
    pub variable_comment: String,
}

impl ResolvedOptions {
    /// Returns the identifier of the generated static (upper-cased
    /// `variable_name`).
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_core::GenerateOptions;
    ///
    /// let resolved = GenerateOptions::default()
    ///     .with_variable_name("webAssets")
    ///     .resolve()
    ///     .unwrap();
    /// assert_eq!(resolved.static_ident(), "WEBASSETS");
    /// ```
    #[must_use]
    pub fn static_ident(&self) -> String {
        self.variable_name.to_uppercase()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn validate_identifier(field: &str, value: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidOptions {
        field: field.to_string(),
        reason: format!("'{value}' {reason}"),
    };

    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("is empty"));
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(invalid("must start with an ASCII letter or '_'"));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("may only contain ASCII letters, digits and '_'"));
    }
    if value == "_" || RUST_KEYWORDS.contains(&value) {
        return Err(invalid("is a reserved Rust keyword"));
    }
    Ok(())
}

fn validate_build_tags(tags: &str) -> Result<()> {
    if tags.contains(['\n', '\r']) {
        return Err(Error::InvalidOptions {
            field: "build_tags".to_string(),
            reason: "must be a single line".to_string(),
        });
    }

    let mut depth = 0i32;
    for c in tags.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            break;
        }
    }
    if depth != 0 {
        return Err(Error::InvalidOptions {
            field: "build_tags".to_string(),
            reason: format!("unbalanced parentheses in '{tags}'"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let resolved = GenerateOptions::default().resolve().unwrap();
        assert_eq!(resolved.package_name, "main");
        assert_eq!(resolved.variable_name, "assets");
        assert_eq!(resolved.filename, PathBuf::from("assets_data.rs"));
        assert!(resolved.build_tags.is_none());
        assert_eq!(
            resolved.variable_comment,
            "assets statically implements the virtual filesystem provided to staticfs."
        );
    }

    #[test]
    fn test_filename_derived_from_lowercase_variable_name() {
        let resolved = GenerateOptions::default()
            .with_variable_name("WebAssets")
            .resolve()
            .unwrap();
        assert_eq!(resolved.filename, PathBuf::from("webassets_data.rs"));
        assert_eq!(resolved.static_ident(), "WEBASSETS");
    }

    #[test]
    fn test_explicit_values_kept() {
        let resolved = GenerateOptions::default()
            .with_filename("out/gen.rs")
            .with_package_name("web")
            .with_build_tags("  feature = \"embed\"  ")
            .with_variable_name("pages")
            .with_variable_comment("Pages.\n\nServed at /.")
            .resolve()
            .unwrap();

        assert_eq!(resolved.filename, PathBuf::from("out/gen.rs"));
        assert_eq!(resolved.package_name, "web");
        assert_eq!(resolved.build_tags.as_deref(), Some("feature = \"embed\""));
        assert_eq!(resolved.variable_comment, "Pages.\n\nServed at /.");
    }

    #[test]
    fn test_empty_strings_use_defaults() {
        let options = GenerateOptions {
            filename: Some(PathBuf::new()),
            package_name: Some(String::new()),
            build_tags: Some("   ".to_string()),
            variable_name: Some(String::new()),
            variable_comment: Some(String::new()),
        };
        let resolved = options.resolve().unwrap();
        assert_eq!(resolved, GenerateOptions::default().resolve().unwrap());
    }

    #[test]
    fn test_invalid_identifiers_rejected() {
        for bad in ["1assets", "my-assets", "with space", "fn", "self", "_", "данные"] {
            let err = GenerateOptions::default()
                .with_variable_name(bad)
                .resolve()
                .unwrap_err();
            assert!(err.is_invalid_options(), "{bad} should be rejected");
        }

        let err = GenerateOptions::default()
            .with_package_name("mod")
            .resolve()
            .unwrap_err();
        assert!(err.is_invalid_options());
    }

    #[test]
    fn test_valid_identifiers_accepted() {
        for good in ["assets", "_private", "Assets2", "web_assets"] {
            assert!(
                GenerateOptions::default()
                    .with_variable_name(good)
                    .resolve()
                    .is_ok(),
                "{good} should be accepted"
            );
        }
    }

    #[test]
    fn test_build_tags_validation() {
        assert!(
            GenerateOptions::default()
                .with_build_tags("all(unix, not(debug_assertions))")
                .resolve()
                .is_ok()
        );
        assert!(
            GenerateOptions::default()
                .with_build_tags("all(unix")
                .resolve()
                .unwrap_err()
                .is_invalid_options()
        );
        assert!(
            GenerateOptions::default()
                .with_build_tags("unix)(")
                .resolve()
                .unwrap_err()
                .is_invalid_options()
        );
        assert!(
            GenerateOptions::default()
                .with_build_tags("unix\nwindows")
                .resolve()
                .unwrap_err()
                .is_invalid_options()
        );
    }

    #[test]
    fn test_from_toml_str() {
        let options = GenerateOptions::from_toml_str(
            r#"
            filename = "src/web.rs"
            package_name = "web"
            build_tags = 'feature = "embed"'
            "#,
        )
        .unwrap();

        assert_eq!(options.filename, Some(PathBuf::from("src/web.rs")));
        assert_eq!(options.package_name.as_deref(), Some("web"));
        assert_eq!(options.build_tags.as_deref(), Some("feature = \"embed\""));
        assert!(options.variable_name.is_none());
    }

    #[test]
    fn test_from_toml_str_rejects_unknown_keys() {
        let err = GenerateOptions::from_toml_str("unknown = 1").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_from_toml_file_missing() {
        let err = GenerateOptions::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("not/here.toml"));
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("staticfs.toml");
        fs::write(&path, "variable_name = \"pages\"\n").unwrap();

        let options = GenerateOptions::from_toml_file(&path).unwrap();
        assert_eq!(options.variable_name.as_deref(), Some("pages"));
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = GenerateOptions::default()
            .with_filename("a.rs")
            .with_build_tags("unix");
        let flags = GenerateOptions::default().with_filename("b.rs");

        let merged = base.merge(flags);
        assert_eq!(merged.filename, Some(PathBuf::from("b.rs")));
        assert_eq!(merged.build_tags.as_deref(), Some("unix"));
    }
}
