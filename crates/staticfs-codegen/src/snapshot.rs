//! In-memory capture of a source tree.
//!
//! A [`Snapshot`] holds every entry in walk order with the storage decision
//! already made for each file. It is what the assembler renders, and it can be
//! turned straight into a [`StaticFs`] without going through generated code.

use crate::compress::{Kind, Representation, decide};
use crate::walker::{WalkAction, walk_files};
use chrono::{DateTime, Utc};
use serde::Serialize;
use staticfs_core::{Error, Result};
use staticfs_vfs::{
    CompressedFileNode, DirNode, FileNode, FileSystem, StaticFs, StaticFsBuilder, base_name,
    parent_path,
};
use std::collections::HashMap;
use tracing::debug;

/// A file and the form it is stored in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path
    pub path: String,
    /// Base name
    pub name: String,
    /// Modification time from the source
    pub modified: Option<DateTime<Utc>>,
    /// Length of the original content
    pub size: u64,
    /// Stored form
    pub representation: Representation,
}

/// A directory and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Absolute path; `/` for the root
    pub path: String,
    /// Base name; `/` for the root
    pub name: String,
    /// Modification time from the source
    pub modified: Option<DateTime<Utc>>,
    /// Absolute paths of the children, sorted
    pub children: Vec<String>,
}

/// One captured node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A file
    File(FileEntry),
    /// A directory
    Dir(DirEntry),
}

impl Entry {
    /// Absolute path of the entry.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::File(file) => &file.path,
            Self::Dir(dir) => &dir.path,
        }
    }
}

/// Summary of what a snapshot contains.
///
/// The flags decide which node constructors the generated module needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableOfContents {
    /// Number of directories, the root included
    pub dir_count: usize,
    /// Number of files
    pub file_count: usize,
    /// Whether any file is stored raw
    pub has_raw_file: bool,
    /// Whether any file is stored compressed
    pub has_compressed_file: bool,
}

/// Every entry of a source tree, in walk order.
///
/// # Examples
///
/// ```
/// use staticfs_codegen::Snapshot;
/// use staticfs_vfs::{DirNode, FileNode, StaticFs, read_file};
///
/// let source = StaticFs::builder()
///     .insert("/", DirNode::new("/", None))
///     .insert("/a.txt", FileNode::new("a.txt", None, b"hello".as_slice()))
///     .entries("/", ["/a.txt"])
///     .build()?;
///
/// let snapshot = Snapshot::capture(&source)?;
/// assert_eq!(snapshot.toc().file_count, 1);
/// assert!(snapshot.toc().has_raw_file);
///
/// let embedded = snapshot.to_fs()?;
/// assert_eq!(read_file(&embedded, "/a.txt")?, b"hello");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<Entry>,
    toc: TableOfContents,
}

impl Snapshot {
    /// Walks `fs` from `/`, reading every file and deciding how to store it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceRead`] for the first entry that cannot be
    /// opened, stated, listed or read, or if `/` is not a directory.
    pub fn capture<F: FileSystem + ?Sized>(fs: &F) -> Result<Self> {
        let mut entries: Vec<Entry> = Vec::new();
        let mut dirs: HashMap<String, usize> = HashMap::new();

        walk_files(fs, "/", |path, entry| {
            let entry = entry.map_err(|err| Error::source_read(path, err))?;
            let metadata = entry.metadata;
            if path == "/" && !metadata.is_dir() {
                return Err(Error::source_read(path, "source root is not a directory"));
            }

            if let Some(parent) = parent_path(path)
                && let Some(&index) = dirs.get(parent)
                && let Some(Entry::Dir(dir)) = entries.get_mut(index)
            {
                dir.children.push(path.to_string());
            }

            if metadata.is_dir() {
                dirs.insert(path.to_string(), entries.len());
                entries.push(Entry::Dir(DirEntry {
                    path: path.to_string(),
                    name: base_name(path).to_string(),
                    modified: metadata.modified(),
                    children: Vec::new(),
                }));
                return Ok(WalkAction::Continue);
            }

            let mut content =
                Vec::with_capacity(usize::try_from(metadata.size()).unwrap_or_default());
            entry
                .reader
                .read_to_end(&mut content)
                .map_err(|err| Error::source_read(path, err))?;

            let representation = decide(&content);
            debug!(
                path,
                size = content.len(),
                stored = representation.payload_size,
                kind = representation.kind.as_str(),
                "captured file"
            );

            entries.push(Entry::File(FileEntry {
                path: path.to_string(),
                name: base_name(path).to_string(),
                modified: metadata.modified(),
                size: content.len() as u64,
                representation,
            }));
            Ok(WalkAction::Continue)
        })?;

        Ok(Self::from_entries(entries))
    }

    /// Builds a snapshot from entries already in walk order.
    #[must_use]
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut toc = TableOfContents::default();
        for entry in &entries {
            match entry {
                Entry::Dir(_) => toc.dir_count += 1,
                Entry::File(file) => {
                    toc.file_count += 1;
                    match file.representation.kind {
                        Kind::Raw => toc.has_raw_file = true,
                        Kind::Compressed => toc.has_compressed_file = true,
                    }
                }
            }
        }
        Self { entries, toc }
    }

    /// Entries in walk order, the root first.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Directories in walk order.
    pub fn dirs(&self) -> impl Iterator<Item = &DirEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Dir(dir) => Some(dir),
            Entry::File(_) => None,
        })
    }

    /// Files in walk order.
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::File(file) => Some(file),
            Entry::Dir(_) => None,
        })
    }

    /// Counts and storage flags.
    #[must_use]
    pub const fn toc(&self) -> &TableOfContents {
        &self.toc
    }

    /// Total length of the original file contents.
    #[must_use]
    pub fn source_bytes(&self) -> u64 {
        self.files().map(|file| file.size).sum()
    }

    /// Total length of the embedded payloads.
    #[must_use]
    pub fn stored_bytes(&self) -> u64 {
        self.files()
            .map(|file| file.representation.payload_size as u64)
            .sum()
    }

    /// Materialises the snapshot as an in-memory filesystem.
    ///
    /// The result answers exactly like the generated module would.
    ///
    /// # Errors
    ///
    /// Returns [`staticfs_vfs::VfsError::InvalidTree`] if the entries do not
    /// form a tree rooted at `/`.
    pub fn to_fs(&self) -> staticfs_vfs::Result<StaticFs> {
        let mut builder = StaticFsBuilder::new();
        for entry in &self.entries {
            match entry {
                Entry::Dir(dir) => {
                    builder.insert(dir.path.clone(), DirNode::new(dir.name.clone(), dir.modified));
                }
                Entry::File(file) => {
                    let payload = file.representation.payload.clone();
                    match file.representation.kind {
                        Kind::Compressed => builder.insert(
                            file.path.clone(),
                            CompressedFileNode::new(
                                file.name.clone(),
                                file.modified,
                                file.size,
                                payload,
                            ),
                        ),
                        Kind::Raw => builder.insert(
                            file.path.clone(),
                            FileNode::new(file.name.clone(), file.modified, payload),
                        ),
                    };
                }
            }
        }
        for dir in self.dirs().filter(|dir| !dir.children.is_empty()) {
            builder.entries(&dir.path, dir.children.iter().cloned());
        }
        builder.build()
    }
}
