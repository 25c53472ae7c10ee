//! Embeds a fixed in-memory tree into `$OUT_DIR/fixture_data.rs`.
//!
//! The tree holds one file of each storage kind, an empty file, a name that
//! needs escaping in a string literal and a directory with five entries.

use anyhow::Result;
use staticfs_codegen::generate;
use staticfs_core::GenerateOptions;
use staticfs_vfs::{DirNode, FileNode, StaticFs, timestamp};
use std::env;
use std::path::PathBuf;

const FIVE: [&str; 5] = ["a", "b", "c", "d", "e"];

fn fixture_tree() -> staticfs_vfs::Result<StaticFs> {
    let mut builder = StaticFs::builder();
    builder
        .insert("/", DirNode::new("/", None))
        .insert(
            "/a.txt",
            FileNode::new("a.txt", timestamp(1_700_000_000, 5), b"hello".as_slice()),
        )
        .insert("/zeros.bin", FileNode::new("zeros.bin", None, vec![0u8; 10_000]))
        .insert("/empty.txt", FileNode::new("empty.txt", None, Vec::new()))
        .insert(
            "/we\"ird\\name.txt",
            FileNode::new("we\"ird\\name.txt", None, b"quoted".as_slice()),
        )
        .insert("/five", DirNode::new("five", None));

    for name in FIVE {
        builder.insert(
            format!("/five/{name}"),
            FileNode::new(name, None, name.as_bytes().to_vec()),
        );
    }

    builder
        .entries(
            "/",
            [
                "/a.txt",
                "/empty.txt",
                "/five",
                "/we\"ird\\name.txt",
                "/zeros.bin",
            ],
        )
        .entries("/five", FIVE.map(|name| format!("/five/{name}")))
        .build()
}

fn main() -> Result<()> {
    println!("cargo::rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let options = GenerateOptions::default()
        .with_package_name("fixture")
        .with_variable_name("fixture")
        .with_filename(out_dir.join("fixture_data.rs"));

    generate(&fixture_tree()?, &options)?;
    Ok(())
}
