//! Read-only filesystem abstraction.
//!
//! [`FileSystem`] is what the generator walks and what [`StaticFs`]
//! implements, so an embedded tree can be fed back into the generator or
//! served by the same code that serves a host directory.
//!
//! # Examples
//!
//! ```
//! use staticfs_vfs::{DirNode, FileNode, StaticFs, read_dir, read_file};
//!
//! let fs = StaticFs::builder()
//!     .insert("/", DirNode::new("/", None))
//!     .insert("/b.txt", FileNode::new("b.txt", None, b"bee".as_slice()))
//!     .insert("/a.txt", FileNode::new("a.txt", None, b"ay".as_slice()))
//!     .entries("/", ["/b.txt", "/a.txt"])
//!     .build()?;
//!
//! assert_eq!(read_file(&fs, "/b.txt")?, b"bee");
//! let names: Vec<_> = read_dir(&fs, "/")?.into_iter().map(|m| m.name().to_string()).collect();
//! assert_eq!(names, ["a.txt", "b.txt"]);
//! # Ok::<(), staticfs_vfs::VfsError>(())
//! ```

use crate::types::{Metadata, Result, VfsError};
use crate::vfs::{Handle, StaticFs};
use std::io::{Read, Seek};

/// A filesystem that can open paths for reading.
pub trait FileSystem {
    /// Handle type returned by [`FileSystem::open`].
    type File<'a>: File
    where
        Self: 'a;

    /// Opens the file or directory at a slash-separated path.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotFound`] when nothing exists at the path, or
    /// another error if it cannot be opened.
    fn open(&self, path: &str) -> Result<Self::File<'_>>;
}

/// An open file or directory.
pub trait File: Read + Seek {
    /// Describes the opened node.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be obtained.
    fn stat(&self) -> Result<Metadata>;

    /// Lists directory entries, continuing from the previous call.
    ///
    /// `count <= 0` returns everything remaining; `count > 0` returns at most
    /// `count` entries and [`VfsError::EndOfListing`] once exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::InvalidOperation`] on files.
    fn read_dir(&mut self, count: isize) -> Result<Vec<Metadata>>;

    /// Releases the handle.
    fn close(&mut self);
}

impl FileSystem for StaticFs {
    type File<'a> = Handle<'a>;

    fn open(&self, path: &str) -> Result<Handle<'_>> {
        Self::open(self, path)
    }
}

impl File for Handle<'_> {
    fn stat(&self) -> Result<Metadata> {
        Ok(Handle::stat(self))
    }

    fn read_dir(&mut self, count: isize) -> Result<Vec<Metadata>> {
        Handle::read_dir(self, count)
    }

    fn close(&mut self) {
        Handle::close(self);
    }
}

/// Reads the whole content of the file at `path`.
///
/// # Errors
///
/// Returns the open error, or [`VfsError::Io`] if reading fails.
pub fn read_file<F: FileSystem + ?Sized>(fs: &F, path: &str) -> Result<Vec<u8>> {
    let mut file = fs.open(path)?;
    let mut content = Vec::new();
    let result = file.read_to_end(&mut content);
    file.close();
    result.map_err(|source| into_vfs_error(path, source))?;
    Ok(content)
}

/// Describes the node at `path`.
///
/// # Errors
///
/// Returns the open or stat error.
pub fn stat<F: FileSystem + ?Sized>(fs: &F, path: &str) -> Result<Metadata> {
    let mut file = fs.open(path)?;
    let metadata = file.stat();
    file.close();
    metadata
}

/// Lists every entry of the directory at `path`, sorted by name.
///
/// # Errors
///
/// Returns the open error, or [`VfsError::InvalidOperation`] if `path` is a
/// file.
pub fn read_dir<F: FileSystem + ?Sized>(fs: &F, path: &str) -> Result<Vec<Metadata>> {
    let mut dir = fs.open(path)?;
    let listing = dir.read_dir(0);
    dir.close();
    let mut listing = listing?;
    listing.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(listing)
}

/// Recovers a [`VfsError`] carried inside an [`std::io::Error`], or wraps it.
fn into_vfs_error(path: &str, error: std::io::Error) -> VfsError {
    match error.downcast::<VfsError>() {
        Ok(inner) => inner,
        Err(error) => VfsError::io(path, error),
    }
}
