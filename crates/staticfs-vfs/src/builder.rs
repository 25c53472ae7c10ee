//! Builder for embedded filesystems.
//!
//! Generated modules declare every node first and wire directory entries in a
//! second pass, so a directory can list children declared after it. Problems
//! are collected and reported by [`StaticFsBuilder::build`].
//!
//! # Examples
//!
//! ```
//! use staticfs_vfs::{DirNode, FileNode, StaticFsBuilder};
//!
//! let mut builder = StaticFsBuilder::new();
//! builder.insert("/", DirNode::new("/", None));
//! builder.insert("/css", DirNode::new("css", None));
//! builder.insert("/css/site.css", FileNode::new("site.css", None, b"body{}".as_slice()));
//! builder.entries("/", ["/css"]);
//! builder.entries("/css", ["/css/site.css"]);
//!
//! let fs = builder.build()?;
//! assert_eq!(fs.file_count(), 1);
//! assert_eq!(fs.dir_count(), 2);
//! # Ok::<(), staticfs_vfs::VfsError>(())
//! ```

use crate::node::Node;
use crate::types::{Result, VfsError, base_name, clean_path, parent_path};
use crate::vfs::StaticFs;
use std::collections::BTreeMap;
use tracing::trace;

/// Builder for a [`StaticFs`].
///
/// Methods take `&mut self` so that both chained calls and one statement per
/// node work; the latter keeps very large generated modules flat.
///
/// # Examples
///
/// ```
/// use staticfs_vfs::{DirNode, StaticFsBuilder};
///
/// let err = StaticFsBuilder::new()
///     .insert("/", DirNode::new("/", None))
///     .entries("/", ["/missing.txt"])
///     .build()
///     .unwrap_err();
///
/// assert!(err.is_invalid_tree());
/// ```
#[derive(Debug, Default)]
pub struct StaticFsBuilder {
    nodes: BTreeMap<String, Node>,
    entries: Vec<(String, Vec<String>)>,
    errors: Vec<VfsError>,
}

impl StaticFsBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the node at `path`.
    ///
    /// `path` must already be clean (see [`clean_path`]) and the node's name
    /// must match its last segment. Declaring the same path twice is an error.
    pub fn insert(&mut self, path: impl Into<String>, node: impl Into<Node>) -> &mut Self {
        let path = path.into();
        let node = node.into();

        if clean_path(&path) != path {
            self.errors.push(VfsError::InvalidTree {
                reason: format!("path {path:?} is not clean"),
            });
            return self;
        }
        if base_name(&path) != node.name() {
            self.errors.push(VfsError::InvalidTree {
                reason: format!("node at {path} is named {:?}", node.name()),
            });
            return self;
        }
        if self.nodes.contains_key(&path) {
            self.errors.push(VfsError::InvalidTree {
                reason: format!("duplicate node at {path}"),
            });
            return self;
        }

        trace!(path = %path, dir = node.is_dir(), "inserting node");
        self.nodes.insert(path, node);
        self
    }

    /// Sets the children of the directory at `dir`.
    ///
    /// Children are absolute paths; they are sorted and checked against the
    /// declared nodes when the filesystem is built.
    pub fn entries<I, S>(&mut self, dir: &str, children: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut children: Vec<String> = children.into_iter().map(Into::into).collect();
        children.sort();
        children.dedup();
        self.entries.push((dir.to_string(), children));
        self
    }

    /// Validates the tree and returns the filesystem.
    ///
    /// The builder is left empty afterwards.
    ///
    /// # Errors
    ///
    /// Returns the first collected [`VfsError::InvalidTree`], or one describing
    /// the first of these problems:
    ///
    /// - `/` is missing or is not a directory
    /// - entries were set for a path that is not a declared directory
    /// - an entry names an undeclared node or one outside the directory
    pub fn build(&mut self) -> Result<StaticFs> {
        let mut nodes = std::mem::take(&mut self.nodes);
        let entries = std::mem::take(&mut self.entries);
        let mut errors = std::mem::take(&mut self.errors);

        if !matches!(nodes.get("/"), Some(Node::Dir(_))) {
            errors.push(VfsError::InvalidTree {
                reason: "root directory / is missing".to_string(),
            });
        }

        for (dir, children) in entries {
            if let Some(child) = children.iter().find(|child| {
                !nodes.contains_key(child.as_str()) || parent_path(child) != Some(dir.as_str())
            }) {
                errors.push(VfsError::InvalidTree {
                    reason: format!("{dir} lists {child}, which is not one of its children"),
                });
                continue;
            }

            match nodes.get_mut(&dir) {
                Some(Node::Dir(node)) => node.set_entries(children),
                Some(_) => errors.push(VfsError::InvalidTree {
                    reason: format!("{dir} has entries but is not a directory"),
                }),
                None => errors.push(VfsError::InvalidTree {
                    reason: format!("{dir} has entries but was never declared"),
                }),
            }
        }

        errors
            .into_iter()
            .next()
            .map_or_else(|| Ok(StaticFs::from_nodes(nodes)), Err)
    }
}
