//! Deterministic traversal of a source filesystem.
//!
//! The walk is depth-first: a directory is visited before its children, and
//! children are visited in lexical order of their names, files and
//! directories interleaved.
//!
//! The visit callback decides what happens next:
//!
//! - `Ok(WalkAction::Continue)` carries on.
//! - `Ok(WalkAction::SkipDir)` on a directory skips its children; on a file
//!   it skips the file's remaining siblings; on a failed entry it moves on to
//!   the next sibling.
//! - `Err(_)` stops the walk and is returned as is.

use serde::Serialize;
use staticfs_core::{Error, Result};
use staticfs_vfs::{File, FileSystem, Metadata, VfsError, clean_path, join_path};
use std::io::Read;

/// What the walker should do after a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Keep walking
    Continue,
    /// Skip the current directory's children, or a file's later siblings
    SkipDir,
}

/// A successfully opened entry handed to the visit callback.
pub struct WalkEntry<'a> {
    /// Metadata of the entry
    pub metadata: &'a Metadata,
    /// The open entry; reading a directory fails
    pub reader: &'a mut dyn Read,
}

impl std::fmt::Debug for WalkEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkEntry")
            .field("metadata", self.metadata)
            .finish_non_exhaustive()
    }
}

/// One node of the source tree, without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceNode {
    /// Absolute slash-separated path; `/` for the root
    pub path: String,
    /// Whether the node is a directory
    pub is_dir: bool,
    /// Modification time reported by the source
    pub modified: Option<chrono::DateTime<chrono::Utc>>,
    /// Content length; `None` for directories
    pub size: Option<u64>,
}

/// Walks `fs` from `root`, handing each entry and an open reader to `visit`.
///
/// # Errors
///
/// Returns the first error returned by `visit`.
///
/// # Examples
///
/// ```
/// use staticfs_codegen::walker::{WalkAction, walk_files};
/// use staticfs_vfs::{DirNode, FileNode, StaticFs};
/// use std::io::Read;
///
/// let fs = StaticFs::builder()
///     .insert("/", DirNode::new("/", None))
///     .insert("/b", FileNode::new("b", None, b"2".as_slice()))
///     .insert("/a", FileNode::new("a", None, b"1".as_slice()))
///     .entries("/", ["/b", "/a"])
///     .build()?;
///
/// let mut seen = Vec::new();
/// walk_files(&fs, "/", |path, entry| {
///     let entry = entry.map_err(|err| staticfs_core::Error::source_read(path, err))?;
///     let mut content = String::new();
///     if !entry.metadata.is_dir() {
///         entry.reader.read_to_string(&mut content).map_err(|err| staticfs_core::Error::source_read(path, err))?;
///     }
///     seen.push(format!("{path}={content}"));
///     Ok(WalkAction::Continue)
/// })?;
///
/// assert_eq!(seen, ["/=", "/a=1", "/b=2"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn walk_files<F, V>(fs: &F, root: &str, mut visit: V) -> Result<()>
where
    F: FileSystem + ?Sized,
    V: FnMut(&str, std::result::Result<WalkEntry<'_>, VfsError>) -> Result<WalkAction>,
{
    let root = clean_path(root);
    match open_stat(fs, &root) {
        Ok((mut file, metadata)) => {
            walk_node(fs, &root, &metadata, &mut file, &mut visit)?;
        }
        Err(err) => {
            visit(&root, Err(err))?;
        }
    }
    Ok(())
}

/// Walks `fs` from `root`, handing only metadata to `visit`.
///
/// # Errors
///
/// Returns the first error returned by `visit`.
pub fn walk_tree<F, V>(fs: &F, root: &str, mut visit: V) -> Result<()>
where
    F: FileSystem + ?Sized,
    V: FnMut(&str, std::result::Result<&Metadata, VfsError>) -> Result<WalkAction>,
{
    walk_files(fs, root, |path, entry| {
        visit(path, entry.map(|entry| entry.metadata))
    })
}

/// Lists every node under `root` in walk order.
///
/// # Errors
///
/// Returns [`Error::SourceRead`] for the first entry that cannot be opened,
/// stated or listed.
///
/// # Examples
///
/// ```
/// use staticfs_codegen::walker::walk;
/// use staticfs_vfs::{DirNode, StaticFs};
///
/// let fs = StaticFs::builder().insert("/", DirNode::new("/", None)).build()?;
/// let nodes = walk(&fs, "/")?;
/// assert_eq!(nodes.len(), 1);
/// assert!(nodes[0].is_dir);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn walk<F: FileSystem + ?Sized>(fs: &F, root: &str) -> Result<Vec<SourceNode>> {
    let mut nodes = Vec::new();
    walk_tree(fs, root, |path, metadata| {
        let metadata = metadata.map_err(|err| Error::source_read(path, err))?;
        nodes.push(SourceNode {
            path: path.to_string(),
            is_dir: metadata.is_dir(),
            modified: metadata.modified(),
            size: (!metadata.is_dir()).then(|| metadata.size()),
        });
        Ok(WalkAction::Continue)
    })?;
    Ok(nodes)
}

fn open_stat<'f, F: FileSystem + ?Sized>(
    fs: &'f F,
    path: &str,
) -> std::result::Result<(F::File<'f>, Metadata), VfsError> {
    let file = fs.open(path)?;
    let metadata = file.stat()?;
    Ok((file, metadata))
}

/// Visits one opened node and, for directories, its subtree.
///
/// Returns `SkipDir` only when a file asked to skip its siblings.
fn walk_node<'f, F, V>(
    fs: &'f F,
    path: &str,
    metadata: &Metadata,
    file: &mut F::File<'f>,
    visit: &mut V,
) -> Result<WalkAction>
where
    F: FileSystem + ?Sized,
    V: FnMut(&str, std::result::Result<WalkEntry<'_>, VfsError>) -> Result<WalkAction>,
{
    let action = visit(
        path,
        Ok(WalkEntry {
            metadata,
            reader: file,
        }),
    )?;

    if !metadata.is_dir() {
        file.close();
        return Ok(action);
    }
    if action == WalkAction::SkipDir {
        file.close();
        return Ok(WalkAction::Continue);
    }

    let listing = file.read_dir(0);
    file.close();
    let mut names: Vec<String> = match listing {
        Ok(listing) => listing.into_iter().map(|m| m.name().to_string()).collect(),
        Err(err) => {
            visit(path, Err(err))?;
            return Ok(WalkAction::Continue);
        }
    };
    names.sort();

    for name in names {
        let child = join_path(path, &name);
        match open_stat(fs, &child) {
            Ok((mut child_file, child_metadata)) => {
                let action = walk_node(fs, &child, &child_metadata, &mut child_file, visit)?;
                if action == WalkAction::SkipDir {
                    break;
                }
            }
            Err(err) => {
                visit(&child, Err(err))?;
            }
        }
    }

    Ok(WalkAction::Continue)
}
