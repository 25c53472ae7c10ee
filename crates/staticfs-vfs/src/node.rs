//! Embedded node kinds.
//!
//! Every entry of an embedded tree is one of three [`Node`] variants. Generated
//! modules construct them from `'static` data, while tests and tooling can
//! build them from owned buffers; both are held as [`Cow`].

use crate::types::{Metadata, Result, VfsError};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use std::borrow::Cow;
use std::io::Read;

/// A file stored with its original bytes.
///
/// # Examples
///
/// ```
/// use staticfs_vfs::FileNode;
///
/// let node = FileNode::new("a.txt", None, b"hi".as_slice());
/// assert_eq!(node.content(), b"hi");
/// assert_eq!(node.metadata().size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    name: Cow<'static, str>,
    modified: Option<DateTime<Utc>>,
    content: Cow<'static, [u8]>,
}

impl FileNode {
    /// Creates an uncompressed file node.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        modified: Option<DateTime<Utc>>,
        content: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            modified,
            content: content.into(),
        }
    }

    /// Base name of the file.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file's bytes.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Describes the file.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        Metadata::file(self.name.as_ref(), self.content.len() as u64, self.modified)
    }
}

/// A file stored as a gzip stream.
///
/// The gzip bytes are served as-is by [`CompressedFileNode::gzip_bytes`];
/// readers see the decompressed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedFileNode {
    name: Cow<'static, str>,
    modified: Option<DateTime<Utc>>,
    uncompressed_size: u64,
    gzip: Cow<'static, [u8]>,
}

impl CompressedFileNode {
    /// Creates a compressed file node.
    ///
    /// `uncompressed_size` is what `stat` reports and what the decoded stream
    /// must add up to.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        modified: Option<DateTime<Utc>>,
        uncompressed_size: u64,
        gzip: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            modified,
            uncompressed_size,
            gzip: gzip.into(),
        }
    }

    /// Base name of the file.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length of the decompressed content.
    #[must_use]
    pub const fn uncompressed_size(&self) -> u64 {
        self.uncompressed_size
    }

    /// The stored gzip stream, byte-for-byte as embedded.
    ///
    /// Suitable for serving with `Content-Encoding: gzip` without
    /// decompressing.
    #[must_use]
    pub fn gzip_bytes(&self) -> &[u8] {
        &self.gzip
    }

    /// Decodes the whole gzip stream.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Corrupt`] if the stream does not decode or does not
    /// decode to `uncompressed_size` bytes.
    pub fn decompress(&self) -> Result<Vec<u8>> {
        let capacity = usize::try_from(self.uncompressed_size).unwrap_or(0);
        let mut content = Vec::with_capacity(capacity);
        GzDecoder::new(self.gzip.as_ref())
            .read_to_end(&mut content)
            .map_err(|source| VfsError::Corrupt {
                name: self.name.to_string(),
                source,
            })?;

        if content.len() as u64 != self.uncompressed_size {
            return Err(VfsError::Corrupt {
                name: self.name.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!(
                        "decoded {} bytes, expected {}",
                        content.len(),
                        self.uncompressed_size
                    ),
                ),
            });
        }
        Ok(content)
    }

    /// Describes the file with its uncompressed size.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        Metadata::file(self.name.as_ref(), self.uncompressed_size, self.modified)
    }
}

/// A directory and the paths of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    name: Cow<'static, str>,
    modified: Option<DateTime<Utc>>,
    entries: Vec<String>,
}

impl DirNode {
    /// Creates a directory with no children; they are wired by
    /// [`StaticFsBuilder::entries`](crate::StaticFsBuilder::entries).
    pub fn new(name: impl Into<Cow<'static, str>>, modified: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            modified,
            entries: Vec::new(),
        }
    }

    /// Base name of the directory (`/` for the root).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute paths of the children, sorted.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub(crate) fn set_entries(&mut self, entries: Vec<String>) {
        self.entries = entries;
    }

    /// Describes the directory.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        Metadata::dir(self.name.as_ref(), self.modified)
    }
}

/// One entry of an embedded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// File stored gzip-compressed
    Compressed(CompressedFileNode),
    /// File stored verbatim
    File(FileNode),
    /// Directory
    Dir(DirNode),
}

impl Node {
    /// Base name of the node.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Compressed(node) => node.name(),
            Self::File(node) => node.name(),
            Self::Dir(node) => node.name(),
        }
    }

    /// Whether the node is a directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Dir(_))
    }

    /// Describes the node.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        match self {
            Self::Compressed(node) => node.metadata(),
            Self::File(node) => node.metadata(),
            Self::Dir(node) => node.metadata(),
        }
    }
}

impl From<FileNode> for Node {
    fn from(node: FileNode) -> Self {
        Self::File(node)
    }
}

impl From<CompressedFileNode> for Node {
    fn from(node: CompressedFileNode) -> Self {
        Self::Compressed(node)
    }
}

impl From<DirNode> for Node {
    fn from(node: DirNode) -> Self {
        Self::Dir(node)
    }
}
