//! Embedded filesystem and open handles.
//!
//! [`StaticFs`] is the read-only tree a generated module exposes. Lookups
//! clean the path first, so `"a.txt"`, `"/a.txt"` and `"/x/../a.txt"` all
//! name the same node.
//!
//! # Examples
//!
//! ```
//! use staticfs_vfs::{DirNode, FileNode, StaticFs};
//! use std::io::Read;
//!
//! let fs = StaticFs::builder()
//!     .insert("/", DirNode::new("/", None))
//!     .insert("/hello.txt", FileNode::new("hello.txt", None, b"hello".as_slice()))
//!     .entries("/", ["/hello.txt"])
//!     .build()?;
//!
//! let mut handle = fs.open("hello.txt")?;
//! let mut content = String::new();
//! handle.read_to_string(&mut content)?;
//! assert_eq!(content, "hello");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::builder::StaticFsBuilder;
use crate::node::Node;
use crate::types::{Metadata, Result, VfsError, clean_path};
use std::collections::BTreeMap;
use std::io::{self, Read, Seek, SeekFrom};
use tracing::trace;

/// A read-only, in-memory filesystem.
///
/// Created through [`StaticFsBuilder`], which guarantees that `/` exists and is
/// a directory and that every directory entry resolves to a node.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`. Any number of handles may be open at once;
/// each keeps its own position and listing cursor.
#[derive(Debug, Clone)]
pub struct StaticFs {
    nodes: BTreeMap<String, Node>,
}

impl StaticFs {
    /// Starts building a filesystem.
    #[must_use]
    pub fn builder() -> StaticFsBuilder {
        StaticFsBuilder::new()
    }

    pub(crate) const fn from_nodes(nodes: BTreeMap<String, Node>) -> Self {
        Self { nodes }
    }

    /// Opens the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotFound`] if no node exists at the cleaned path.
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_vfs::{DirNode, StaticFs};
    ///
    /// let fs = StaticFs::builder().insert("/", DirNode::new("/", None)).build()?;
    ///
    /// assert!(fs.open("/").is_ok());
    /// assert!(fs.open("/missing").unwrap_err().is_not_found());
    /// # Ok::<(), staticfs_vfs::VfsError>(())
    /// ```
    pub fn open(&self, path: &str) -> Result<Handle<'_>> {
        let path = clean_path(path);
        match self.nodes.get(&path) {
            Some(node) => Ok(Handle::new(self, path, node)),
            None => Err(VfsError::NotFound { path }),
        }
    }

    /// Returns the node at `path`, if any.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Node> {
        self.nodes.get(&clean_path(path))
    }

    /// Checks if a node exists at the given path.
    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Iterates over every node in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(path, node)| (path.as_str(), node))
    }

    /// Number of nodes, directories included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false` for a built filesystem, which holds at least the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of file nodes.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.nodes.values().filter(|node| !node.is_dir()).count()
    }

    /// Number of directory nodes, the root included.
    #[must_use]
    pub fn dir_count(&self) -> usize {
        self.nodes.values().filter(|node| node.is_dir()).count()
    }
}

/// An open file or directory of a [`StaticFs`].
///
/// Files implement [`Read`] and [`Seek`]. Compressed files are decoded on the
/// first read and the decoded bytes are kept until the handle is closed or
/// dropped; seeking before that only moves the position.
///
/// Directories are listed with [`Handle::read_dir`] and only support seeking
/// back to the start.
#[derive(Debug)]
pub struct Handle<'a> {
    fs: &'a StaticFs,
    path: String,
    node: &'a Node,
    pos: u64,
    decoded: Option<Vec<u8>>,
    listed: usize,
    closed: bool,
}

impl<'a> Handle<'a> {
    const fn new(fs: &'a StaticFs, path: String, node: &'a Node) -> Self {
        Self {
            fs,
            path,
            node,
            pos: 0,
            decoded: None,
            listed: 0,
            closed: false,
        }
    }

    /// The cleaned path this handle was opened with.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The node behind the handle.
    #[must_use]
    pub const fn node(&self) -> &'a Node {
        self.node
    }

    /// Describes the node. Works on closed handles.
    #[must_use]
    pub fn stat(&self) -> Metadata {
        self.node.metadata()
    }

    /// Returns the stored gzip stream of a compressed file.
    ///
    /// `None` for uncompressed files and directories.
    #[must_use]
    pub fn gzip_bytes(&self) -> Option<&'a [u8]> {
        match self.node {
            Node::Compressed(node) => Some(node.gzip_bytes()),
            Node::File(_) | Node::Dir(_) => None,
        }
    }

    /// Lists directory entries in sorted order, continuing from the previous
    /// call.
    ///
    /// With `count <= 0` every remaining entry is returned, possibly none.
    /// With `count > 0` at most `count` entries are returned, and an exhausted
    /// listing yields [`VfsError::EndOfListing`].
    ///
    /// # Errors
    ///
    /// - [`VfsError::InvalidOperation`] if the handle is a file
    /// - [`VfsError::Closed`] after [`Handle::close`]
    /// - [`VfsError::EndOfListing`] as described above
    ///
    /// # Examples
    ///
    /// ```
    /// use staticfs_vfs::{DirNode, FileNode, StaticFs};
    ///
    /// let fs = StaticFs::builder()
    ///     .insert("/", DirNode::new("/", None))
    ///     .insert("/a", FileNode::new("a", None, b"".as_slice()))
    ///     .insert("/b", FileNode::new("b", None, b"".as_slice()))
    ///     .entries("/", ["/a", "/b"])
    ///     .build()?;
    ///
    /// let mut root = fs.open("/")?;
    /// assert_eq!(root.read_dir(1)?[0].name(), "a");
    /// assert_eq!(root.read_dir(1)?[0].name(), "b");
    /// assert!(root.read_dir(1).unwrap_err().is_end_of_listing());
    /// assert!(root.read_dir(0)?.is_empty());
    /// # Ok::<(), staticfs_vfs::VfsError>(())
    /// ```
    pub fn read_dir(&mut self, count: isize) -> Result<Vec<Metadata>> {
        self.ensure_open()?;
        let Node::Dir(dir) = self.node else {
            return Err(VfsError::InvalidOperation {
                operation: "list entries of file",
                name: self.node.name().to_string(),
            });
        };

        let entries = dir.entries();
        let remaining = &entries[self.listed.min(entries.len())..];
        let take = match usize::try_from(count) {
            Ok(limit) if limit > 0 => {
                if remaining.is_empty() {
                    return Err(VfsError::EndOfListing);
                }
                limit.min(remaining.len())
            }
            _ => remaining.len(),
        };

        let listing = remaining[..take]
            .iter()
            .map(|child| {
                self.fs
                    .nodes
                    .get(child)
                    .map(Node::metadata)
                    .ok_or_else(|| VfsError::InvalidTree {
                        reason: format!("{} lists missing entry {child}", self.path),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        self.listed += take;
        Ok(listing)
    }

    /// Closes the handle and drops any decoded content.
    ///
    /// Later reads, seeks and listings fail with [`VfsError::Closed`].
    /// Closing twice is a no-op.
    pub fn close(&mut self) {
        self.closed = true;
        self.decoded = None;
    }

    /// Whether [`Handle::close`] was called.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(VfsError::Closed {
                name: self.node.name().to_string(),
            });
        }
        Ok(())
    }

    fn content_len(&self) -> u64 {
        match self.node {
            Node::Compressed(node) => node.uncompressed_size(),
            Node::File(node) => node.content().len() as u64,
            Node::Dir(_) => 0,
        }
    }
}

impl Read for Handle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;
        let content: &[u8] = match self.node {
            Node::File(node) => node.content(),
            Node::Compressed(node) => {
                if self.decoded.is_none() {
                    trace!(path = %self.path, size = node.uncompressed_size(), "decompressing");
                    self.decoded = Some(node.decompress()?);
                }
                self.decoded.as_deref().unwrap_or_default()
            }
            Node::Dir(dir) => {
                return Err(VfsError::InvalidOperation {
                    operation: "read from directory",
                    name: dir.name().to_string(),
                }
                .into());
            }
        };

        let start = usize::try_from(self.pos)
            .unwrap_or(usize::MAX)
            .min(content.len());
        let count = buf.len().min(content.len() - start);
        buf[..count].copy_from_slice(&content[start..start + count]);
        self.pos += count as u64;
        Ok(count)
    }
}

impl Seek for Handle<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.ensure_open()?;
        if let Node::Dir(dir) = self.node {
            return match pos {
                SeekFrom::Start(0) => {
                    self.listed = 0;
                    Ok(0)
                }
                _ => Err(VfsError::InvalidOperation {
                    operation: "seek in directory",
                    name: dir.name().to_string(),
                }
                .into()),
            };
        }

        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
            SeekFrom::End(delta) => self.content_len().checked_add_signed(delta),
        };
        let target = target.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )
        })?;

        self.pos = target;
        Ok(target)
    }
}
