//! Core types for the embedded filesystem.
//!
//! This module defines the error type shared by every filesystem in this
//! crate, the [`Metadata`] returned by `stat`, and the path cleaning used by
//! every lookup.
//!
//! # Examples
//!
//! ```
//! use staticfs_vfs::clean_path;
//!
//! assert_eq!(clean_path("css/../js/./app.js"), "/js/app.js");
//! assert_eq!(clean_path(""), "/");
//! ```

use chrono::{DateTime, Utc};
use std::io;
use thiserror::Error;

/// Permission bits reported for every embedded file.
pub const FILE_MODE: u32 = 0o444;

/// Permission bits reported for every embedded directory.
pub const DIR_MODE: u32 = 0o755;

/// Errors that can occur during filesystem operations.
///
/// All error variants include contextual information and implement
/// `is_xxx()` methods for easy error classification.
///
/// # Examples
///
/// ```
/// use staticfs_vfs::VfsError;
///
/// let error = VfsError::NotFound {
///     path: "/missing.txt".to_string(),
/// };
///
/// assert!(error.is_not_found());
/// ```
#[derive(Error, Debug)]
pub enum VfsError {
    /// No node exists at the path
    #[error("open {path}: file does not exist")]
    NotFound {
        /// The cleaned path that was looked up
        path: String,
    },

    /// The operation is not supported by this kind of node
    /// (reading a directory, listing a file, seeking inside a directory)
    #[error("cannot {operation} {name}")]
    InvalidOperation {
        /// What was attempted, e.g. `read from directory`
        operation: &'static str,
        /// Name of the node the operation was attempted on
        name: String,
    },

    /// A directory listing with a positive count has no entries left
    #[error("end of directory listing")]
    EndOfListing,

    /// The handle was closed before the operation
    #[error("{name}: file already closed")]
    Closed {
        /// Name of the closed node
        name: String,
    },

    /// Embedded compressed content failed to decode
    #[error("corrupt embedded content in {name}: {source}")]
    Corrupt {
        /// Name of the node whose payload is corrupt
        name: String,
        /// Decoder error
        #[source]
        source: io::Error,
    },

    /// I/O error from a host-backed filesystem
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed
        path: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A host directory entry whose name is not valid UTF-8
    #[error("{dir}: entry name {name:?} is not valid UTF-8")]
    InvalidName {
        /// Cleaned path of the directory holding the entry
        dir: String,
        /// The name with invalid sequences replaced, for display only
        name: String,
    },

    /// The node set does not form a consistent tree
    #[error("invalid embedded tree: {reason}")]
    InvalidTree {
        /// Which invariant was violated
        reason: String,
    },
}

impl VfsError {
    /// Returns `true` if this is a not found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_vfs::VfsError;
    ///
    /// let error = VfsError::NotFound {
    ///     path: "/test.txt".to_string(),
    /// };
    ///
    /// assert!(error.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the operation is unsupported for the node kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_vfs::VfsError;
    ///
    /// let error = VfsError::InvalidOperation {
    ///     operation: "read from directory",
    ///     name: "css".to_string(),
    /// };
    ///
    /// assert!(error.is_invalid_operation());
    /// assert_eq!(error.to_string(), "cannot read from directory css");
    /// ```
    #[must_use]
    pub const fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation { .. })
    }

    /// Returns `true` if this is the end-of-listing signal.
    #[must_use]
    pub const fn is_end_of_listing(&self) -> bool {
        matches!(self, Self::EndOfListing)
    }

    /// Returns `true` if the handle was already closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    /// Returns `true` if a host entry name cannot be represented as a path.
    #[must_use]
    pub const fn is_invalid_name(&self) -> bool {
        matches!(self, Self::InvalidName { .. })
    }

    /// Returns `true` if the node set violates a tree invariant.
    #[must_use]
    pub const fn is_invalid_tree(&self) -> bool {
        matches!(self, Self::InvalidTree { .. })
    }

    /// Wraps a host I/O error, turning `NotFound` into [`VfsError::NotFound`].
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    fn kind(&self) -> io::ErrorKind {
        match self {
            Self::NotFound { .. } => io::ErrorKind::NotFound,
            Self::InvalidOperation { .. } => io::ErrorKind::Unsupported,
            Self::EndOfListing => io::ErrorKind::UnexpectedEof,
            Self::Closed { .. } => io::ErrorKind::Other,
            Self::Corrupt { .. } | Self::InvalidName { .. } | Self::InvalidTree { .. } => {
                io::ErrorKind::InvalidData
            }
            Self::Io { source, .. } => source.kind(),
        }
    }
}

impl From<VfsError> for io::Error {
    /// Keeps the [`VfsError`] as the inner error so callers of `Read`/`Seek`
    /// can downcast it back.
    fn from(error: VfsError) -> Self {
        Self::new(error.kind(), error)
    }
}

/// Description of a file or directory, as returned by `stat` and `read_dir`.
///
/// # Examples
///
/// ```
/// use staticfs_vfs::{FILE_MODE, Metadata};
///
/// let meta = Metadata::file("index.html", 512, None);
/// assert_eq!(meta.name(), "index.html");
/// assert_eq!(meta.size(), 512);
/// assert_eq!(meta.mode(), FILE_MODE);
/// assert!(!meta.is_dir());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    name: String,
    size: u64,
    mode: u32,
    modified: Option<DateTime<Utc>>,
    is_dir: bool,
}

impl Metadata {
    /// Describes a read-only file.
    #[must_use]
    pub fn file(name: impl Into<String>, size: u64, modified: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            size,
            mode: FILE_MODE,
            modified,
            is_dir: false,
        }
    }

    /// Describes a directory. Directories report a size of 0.
    #[must_use]
    pub fn dir(name: impl Into<String>, modified: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            mode: DIR_MODE,
            modified,
            is_dir: true,
        }
    }

    /// Base name of the node (`/` for the root).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content length in bytes; the uncompressed length for compressed files.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Permission bits: [`FILE_MODE`] or [`DIR_MODE`].
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }

    /// Modification time taken from the source tree, if it had one.
    #[must_use]
    pub const fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    /// Whether the node is a directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// Builds a UTC timestamp from Unix seconds and nanoseconds.
///
/// Generated modules call this for every node; out-of-range values yield
/// `None`, the same as a source entry without a modification time.
///
/// # Examples
///
/// ```
/// use staticfs_vfs::timestamp;
///
/// let t = timestamp(1_700_000_000, 5).unwrap();
/// assert_eq!(t.timestamp(), 1_700_000_000);
/// assert_eq!(t.timestamp_subsec_nanos(), 5);
/// ```
#[must_use]
pub const fn timestamp(secs: i64, nanos: u32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, nanos)
}

/// Cleans a path the way every lookup does.
///
/// The path is treated as absolute, empty and `.` segments are dropped, and
/// `..` removes the previous segment (never going above the root).
/// The result always starts with `/` and never ends with one, except for the
/// root itself.
///
/// # Examples
///
/// ```
/// use staticfs_vfs::clean_path;
///
/// assert_eq!(clean_path("index.html"), "/index.html");
/// assert_eq!(clean_path("/a//b/"), "/a/b");
/// assert_eq!(clean_path("/../../etc/passwd"), "/etc/passwd");
/// ```
#[must_use]
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    if cleaned.is_empty() {
        cleaned.push('/');
    }
    cleaned
}

/// Returns the last segment of a clean path, or `/` for the root.
///
/// # Examples
///
/// ```
/// use staticfs_vfs::base_name;
///
/// assert_eq!(base_name("/css/site.css"), "site.css");
/// assert_eq!(base_name("/"), "/");
/// ```
#[must_use]
pub fn base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) if pos + 1 < path.len() => &path[pos + 1..],
        _ => "/",
    }
}

/// Returns the parent of a clean path, or `None` for the root.
///
/// # Examples
///
/// ```
/// use staticfs_vfs::parent_path;
///
/// assert_eq!(parent_path("/css/site.css"), Some("/css"));
/// assert_eq!(parent_path("/index.html"), Some("/"));
/// assert_eq!(parent_path("/"), None);
/// ```
#[must_use]
pub fn parent_path(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    path.rfind('/').map(|pos| if pos == 0 { "/" } else { &path[..pos] })
}

/// Joins a clean directory path and a child name.
///
/// # Examples
///
/// ```
/// use staticfs_vfs::join_path;
///
/// assert_eq!(join_path("/", "a.txt"), "/a.txt");
/// assert_eq!(join_path("/sub", "b.bin"), "/sub/b.bin");
/// ```
#[must_use]
pub fn join_path(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// Type alias for filesystem operation results.
pub type Result<T> = std::result::Result<T, VfsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path_root_forms() {
        assert_eq!(clean_path(""), "/");
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("."), "/");
        assert_eq!(clean_path(".."), "/");
        assert_eq!(clean_path("//"), "/");
    }

    #[test]
    fn test_clean_path_collapses_segments() {
        assert_eq!(clean_path("/a/./b"), "/a/b");
        assert_eq!(clean_path("/a/b/../c"), "/a/c");
        assert_eq!(clean_path("a/b/"), "/a/b");
        assert_eq!(clean_path("/a/../../b"), "/b");
    }

    #[test]
    fn test_clean_path_keeps_dots_in_names() {
        assert_eq!(clean_path("/.hidden"), "/.hidden");
        assert_eq!(clean_path("/a.../b"), "/a.../b");
    }

    #[test]
    fn test_base_and_parent() {
        assert_eq!(base_name("/a/b/c.txt"), "c.txt");
        assert_eq!(parent_path("/a/b/c.txt"), Some("/a/b"));
        assert_eq!(parent_path("/a"), Some("/"));
        assert_eq!(base_name("/"), "/");
        assert_eq!(parent_path("/"), None);
    }

    #[test]
    fn test_metadata_constructors() {
        let file = Metadata::file("a.txt", 5, None);
        assert_eq!(file.mode(), FILE_MODE);
        assert!(!file.is_dir());

        let modified = timestamp(10, 0);
        let dir = Metadata::dir("sub", modified);
        assert_eq!(dir.size(), 0);
        assert_eq!(dir.mode(), DIR_MODE);
        assert!(dir.is_dir());
        assert_eq!(dir.modified(), modified);
    }

    #[test]
    fn test_error_predicates() {
        let err = VfsError::InvalidOperation {
            operation: "read from directory",
            name: "sub".to_string(),
        };
        assert!(err.is_invalid_operation());
        assert!(!err.is_not_found());

        assert!(VfsError::EndOfListing.is_end_of_listing());
        assert!(
            VfsError::Closed {
                name: "a".to_string()
            }
            .is_closed()
        );
    }

    #[test]
    fn test_io_error_maps_not_found() {
        let err = VfsError::io("/x", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());

        let err = VfsError::io("/x", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, VfsError::Io { .. }));
    }

    #[test]
    fn test_into_io_error_keeps_kind_and_inner() {
        let io_err: io::Error = VfsError::InvalidOperation {
            operation: "read from directory",
            name: "sub".to_string(),
        }
        .into();
        assert_eq!(io_err.kind(), io::ErrorKind::Unsupported);

        let inner = io_err
            .get_ref()
            .and_then(|e| e.downcast_ref::<VfsError>())
            .unwrap();
        assert!(inner.is_invalid_operation());
    }

    #[test]
    fn test_timestamp_out_of_range() {
        assert!(timestamp(i64::MAX, 0).is_none());
        assert!(timestamp(0, 0).is_some());
    }
}
