//! Host directory exposed as a [`FileSystem`].
//!
//! [`OsFs`] is the usual input to the generator. Slash-separated paths are
//! cleaned and resolved under the root directory, so `..` can never escape it.
//! Symbolic links are followed.

use crate::source::{File, FileSystem};
use crate::types::{Metadata, Result, VfsError, base_name, clean_path, join_path};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A directory on the host filesystem.
///
/// # Examples
///
/// ```no_run
/// use staticfs_vfs::{OsFs, read_file};
///
/// let fs = OsFs::new("assets");
/// let index = read_file(&fs, "/index.html")?;
/// # Ok::<(), staticfs_vfs::VfsError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsFs {
    root: PathBuf,
}

impl OsFs {
    /// Exposes the directory at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The host directory backing `/`.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn host_path(&self, clean: &str) -> PathBuf {
        clean
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

fn describe(name: &str, meta: &fs::Metadata) -> Metadata {
    let modified = meta.modified().ok().map(DateTime::<Utc>::from);
    if meta.is_dir() {
        Metadata::dir(name, modified)
    } else {
        Metadata::file(name, meta.len(), modified)
    }
}

impl FileSystem for OsFs {
    type File<'a> = OsFile;

    fn open(&self, path: &str) -> Result<OsFile> {
        let path = clean_path(path);
        let host = self.host_path(&path);
        let meta = fs::metadata(&host).map_err(|err| VfsError::io(path.as_str(), err))?;
        let metadata = describe(base_name(&path), &meta);

        let file = if meta.is_dir() {
            None
        } else {
            Some(fs::File::open(&host).map_err(|err| VfsError::io(path.as_str(), err))?)
        };

        Ok(OsFile {
            path,
            host,
            metadata,
            file,
            listing: None,
            listed: 0,
            closed: false,
        })
    }
}

/// An open entry of an [`OsFs`].
///
/// Directory listings are read from the host once, on the first
/// [`File::read_dir`] call, in the order the host returns them.
#[derive(Debug)]
pub struct OsFile {
    path: String,
    host: PathBuf,
    metadata: Metadata,
    file: Option<fs::File>,
    listing: Option<Vec<Metadata>>,
    listed: usize,
    closed: bool,
}

impl OsFile {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(VfsError::Closed {
                name: self.metadata.name().to_string(),
            });
        }
        Ok(())
    }

    fn invalid(&self, operation: &'static str) -> VfsError {
        VfsError::InvalidOperation {
            operation,
            name: self.metadata.name().to_string(),
        }
    }

    fn load_listing(&self) -> Result<Vec<Metadata>> {
        let entries =
            fs::read_dir(&self.host).map_err(|err| VfsError::io(self.path.as_str(), err))?;
        let mut listing = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| VfsError::io(self.path.as_str(), err))?;
            let name = entry
                .file_name()
                .into_string()
                .map_err(|raw| VfsError::InvalidName {
                    dir: self.path.clone(),
                    name: raw.to_string_lossy().into_owned(),
                })?;
            // dangling links are listed; opening them fails
            let meta = match fs::metadata(entry.path()) {
                Ok(meta) => meta,
                Err(_) => entry
                    .metadata()
                    .map_err(|err| VfsError::io(join_path(&self.path, &name), err))?,
            };
            listing.push(describe(&name, &meta));
        }
        Ok(listing)
    }
}

impl File for OsFile {
    fn stat(&self) -> Result<Metadata> {
        Ok(self.metadata.clone())
    }

    fn read_dir(&mut self, count: isize) -> Result<Vec<Metadata>> {
        self.ensure_open()?;
        if !self.metadata.is_dir() {
            return Err(self.invalid("list entries of file"));
        }

        let listing = match self.listing.take() {
            Some(listing) => listing,
            None => self.load_listing()?,
        };
        let remaining = &listing[self.listed.min(listing.len())..];
        let take = match usize::try_from(count) {
            Ok(limit) if limit > 0 => {
                if remaining.is_empty() {
                    self.listing = Some(listing);
                    return Err(VfsError::EndOfListing);
                }
                limit.min(remaining.len())
            }
            _ => remaining.len(),
        };

        let page = remaining[..take].to_vec();
        self.listed += take;
        self.listing = Some(listing);
        Ok(page)
    }

    fn close(&mut self) {
        self.closed = true;
        self.file = None;
        self.listing = None;
    }
}

impl Read for OsFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;
        let Some(file) = self.file.as_mut() else {
            return Err(self.invalid("read from directory").into());
        };
        file.read(buf)
    }
}

impl Seek for OsFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.ensure_open()?;
        match self.file.as_mut() {
            Some(file) => file.seek(pos),
            None if pos == SeekFrom::Start(0) => {
                self.listed = 0;
                Ok(0)
            }
            None => Err(self.invalid("seek in directory").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{read_dir, read_file, stat};
    use tempfile::TempDir;

    fn sample_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"alpha").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("b.bin"), [0u8, 1, 2]).unwrap();
        dir
    }

    #[test]
    fn test_os_read_file() {
        let dir = sample_dir();
        let fs = OsFs::new(dir.path());
        assert_eq!(read_file(&fs, "/a.txt").unwrap(), b"alpha");
        assert_eq!(read_file(&fs, "sub/b.bin").unwrap(), [0, 1, 2]);
    }

    #[test]
    fn test_os_stat() {
        let dir = sample_dir();
        let fs = OsFs::new(dir.path());
        let root = stat(&fs, "/").unwrap();
        assert!(root.is_dir());
        assert_eq!(root.name(), "/");

        let file = stat(&fs, "/sub/b.bin").unwrap();
        assert_eq!(file.name(), "b.bin");
        assert_eq!(file.size(), 3);
        assert!(file.modified().is_some());
    }

    #[test]
    fn test_os_missing_is_not_found() {
        let dir = sample_dir();
        let fs = OsFs::new(dir.path());
        assert!(fs.open("/nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_os_dotdot_stays_inside_root() {
        let dir = sample_dir();
        let fs = OsFs::new(dir.path().join("sub"));
        assert!(fs.open("/../a.txt").unwrap_err().is_not_found());
        assert_eq!(read_file(&fs, "/../b.bin").unwrap(), [0, 1, 2]);
    }

    #[test]
    fn test_os_read_dir() {
        let dir = sample_dir();
        let fs = OsFs::new(dir.path());
        let names: Vec<_> = read_dir(&fs, "/")
            .unwrap()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, ["a.txt", "sub"]);

        let mut root = fs.open("/").unwrap();
        assert_eq!(root.read_dir(1).unwrap().len(), 1);
        assert_eq!(root.read_dir(1).unwrap().len(), 1);
        assert!(root.read_dir(1).unwrap_err().is_end_of_listing());
        root.seek(SeekFrom::Start(0)).unwrap();
        assert_eq!(root.read_dir(0).unwrap().len(), 2);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_os_non_utf8_name_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = sample_dir();
        fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff.txt")), b"x").unwrap();
        let fs = OsFs::new(dir.path());

        let err = read_dir(&fs, "/").unwrap_err();
        assert!(err.is_invalid_name());
        assert!(err.to_string().starts_with("/: entry name"));
        assert_eq!(read_dir(&fs, "/sub").unwrap().len(), 1);
    }

    #[test]
    fn test_os_dir_rejects_read() {
        let dir = sample_dir();
        let fs = OsFs::new(dir.path());
        let mut sub = fs.open("/sub").unwrap();
        assert!(sub.read(&mut [0u8; 1]).is_err());
        assert!(sub.seek(SeekFrom::End(0)).is_err());

        let mut file = fs.open("/a.txt").unwrap();
        assert!(file.read_dir(0).unwrap_err().is_invalid_operation());
    }

    #[test]
    fn test_os_closed_file() {
        let dir = sample_dir();
        let fs = OsFs::new(dir.path());
        let mut file = fs.open("/a.txt").unwrap();
        file.close();
        assert!(file.read(&mut [0u8; 1]).is_err());
        assert_eq!(file.stat().unwrap().size(), 5);
    }
}
