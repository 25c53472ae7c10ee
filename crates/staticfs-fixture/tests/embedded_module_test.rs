//! Reads the generated `fixture` module back through its `LazyLock<StaticFs>`.
//!
//! The module was rendered by the generator in `build.rs` and compiled into
//! this crate, so these tests cover the templates, literal escaping and the
//! constructor helpers together.

use flate2::read::GzDecoder;
use staticfs_fixture::fixture::{self, FIXTURE};
use staticfs_vfs::{Node, read_dir, read_file, stat, timestamp};
use std::io::{Read, Seek, SeekFrom};

const ODD_NAME: &str = "we\"ird\\name.txt";

#[test]
fn test_raw_file() {
    assert_eq!(read_file(&*FIXTURE, "/a.txt").unwrap(), b"hello");
    assert!(matches!(FIXTURE.get("/a.txt"), Some(Node::File(_))));
}

#[test]
fn test_modified_time_survives() {
    let meta = stat(&*FIXTURE, "/a.txt").unwrap();
    assert_eq!(meta.modified(), timestamp(1_700_000_000, 5));
    assert_eq!(stat(&*FIXTURE, "/zeros.bin").unwrap().modified(), None);
}

#[test]
fn test_compressed_file() {
    assert!(matches!(FIXTURE.get("/zeros.bin"), Some(Node::Compressed(_))));
    assert_eq!(read_file(&*FIXTURE, "/zeros.bin").unwrap(), vec![0u8; 10_000]);
    assert_eq!(stat(&*FIXTURE, "/zeros.bin").unwrap().size(), 10_000);

    let handle = fixture::open("/zeros.bin").unwrap();
    let gzip = handle.gzip_bytes().unwrap();
    assert!(gzip.len() < 10_000);

    let mut decoded = Vec::new();
    GzDecoder::new(gzip).read_to_end(&mut decoded).unwrap();
    assert_eq!(decoded.len(), 10_000);
}

#[test]
fn test_seek_in_compressed_file() {
    let mut handle = fixture::open("/zeros.bin").unwrap();
    assert_eq!(handle.seek(SeekFrom::End(-4)).unwrap(), 9_996);

    let mut tail = Vec::new();
    handle.read_to_end(&mut tail).unwrap();
    assert_eq!(tail, [0u8; 4]);
}

#[test]
fn test_empty_file() {
    assert!(read_file(&*FIXTURE, "/empty.txt").unwrap().is_empty());
    assert!(matches!(FIXTURE.get("/empty.txt"), Some(Node::File(_))));
    assert_eq!(stat(&*FIXTURE, "/empty.txt").unwrap().size(), 0);
}

#[test]
fn test_name_needing_escapes() {
    let path = format!("/{ODD_NAME}");
    assert_eq!(read_file(&*FIXTURE, &path).unwrap(), b"quoted");
    assert_eq!(stat(&*FIXTURE, &path).unwrap().name(), ODD_NAME);
}

#[test]
fn test_root_listing() {
    let names: Vec<_> = read_dir(&*FIXTURE, "/")
        .unwrap()
        .iter()
        .map(|meta| meta.name().to_string())
        .collect();
    assert_eq!(names, ["a.txt", "empty.txt", "five", ODD_NAME, "zeros.bin"]);
}

#[test]
fn test_five_entries_then_end() {
    let mut handle = fixture::open("/five").unwrap();

    let listing = handle.read_dir(0).unwrap();
    let names: Vec<_> = listing.iter().map(|meta| meta.name()).collect();
    assert_eq!(names, ["a", "b", "c", "d", "e"]);
    assert!(listing.iter().all(|meta| meta.size() == 1));

    assert!(handle.read_dir(0).unwrap().is_empty());
    assert!(handle.read_dir(1).unwrap_err().is_end_of_listing());
}

#[test]
fn test_missing_path() {
    assert!(fixture::open("/missing").unwrap_err().is_not_found());
}

#[test]
fn test_counts() {
    assert_eq!(FIXTURE.dir_count(), 2);
    assert_eq!(read_file(&*FIXTURE, "/five/c").unwrap(), b"c");
}
