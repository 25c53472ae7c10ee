//! Read-only in-memory filesystem for staticfs generated modules.
//!
//! A generated module builds one [`StaticFs`] from `'static` data. Files are
//! stored either verbatim or as gzip streams; readers always see the original
//! bytes, and compressed streams can be served as-is through
//! [`Handle::gzip_bytes`].
//!
//! The same [`FileSystem`] trait is implemented by [`OsFs`], a host directory,
//! which is what the generator snapshots.
//!
//! # Examples
//!
//! ```
//! use staticfs_vfs::{DirNode, FileNode, StaticFs};
//! use std::io::Read;
//!
//! let fs = StaticFs::builder()
//!     .insert("/", DirNode::new("/", None))
//!     .insert("/index.html", FileNode::new("index.html", None, b"<html></html>".as_slice()))
//!     .entries("/", ["/index.html"])
//!     .build()?;
//!
//! let mut page = String::new();
//! fs.open("/index.html")?.read_to_string(&mut page)?;
//! assert_eq!(page, "<html></html>");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod node;
pub mod os;
pub mod source;
pub mod types;
pub mod vfs;

pub use builder::StaticFsBuilder;
pub use node::{CompressedFileNode, DirNode, FileNode, Node};
pub use os::{OsFile, OsFs};
pub use source::{File, FileSystem, read_dir, read_file, stat};
pub use types::{
    DIR_MODE, FILE_MODE, Metadata, Result, VfsError, base_name, clean_path, join_path,
    parent_path, timestamp,
};
pub use vfs::{Handle, StaticFs};
