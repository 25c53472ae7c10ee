//! Rendering and writing of the generated module.
//!
//! [`generate`] is the entry point: it resolves the options, captures the
//! source tree, renders it and writes the module in one atomic step.
//!
//! # Examples
//!
//! ```no_run
//! use staticfs_codegen::generate;
//! use staticfs_core::GenerateOptions;
//! use staticfs_vfs::OsFs;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = GenerateOptions::default()
//!     .with_variable_name("web")
//!     .with_filename("src/web_data.rs");
//! let report = generate(&OsFs::new("assets"), &options)?;
//! println!("embedded {} files", report.files);
//! # Ok(())
//! # }
//! ```

use crate::compress::Kind;
use crate::encoder::escape_into;
use crate::snapshot::{Entry, Snapshot, TableOfContents};
use crate::template_engine::{ARTIFACT_TEMPLATE, TemplateEngine};
use chrono::{DateTime, Utc};
use serde::Serialize;
use staticfs_core::{Error, GenerateOptions, ResolvedOptions, Result};
use staticfs_vfs::FileSystem;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, info_span};

/// Rendered module text and what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Full Rust source of the module
    pub text: String,
    /// Counts and storage flags of the rendered snapshot
    pub toc: TableOfContents,
}

/// Outcome of a [`generate`] run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Where the module was written
    pub output: PathBuf,
    /// Number of directories embedded, the root included
    pub dirs: usize,
    /// Number of files embedded
    pub files: usize,
    /// Number of files stored gzip-compressed
    pub compressed_files: usize,
    /// Total size of the original file contents
    pub source_bytes: u64,
    /// Total size of the embedded payloads
    pub stored_bytes: u64,
    /// Size of the written module
    pub artifact_bytes: usize,
}

#[derive(Debug, Serialize)]
struct ArtifactContext<'s> {
    has_build_tags: bool,
    build_tags: &'s str,
    package_name: &'s str,
    static_ident: String,
    doc_lines: Vec<String>,
    imports: String,
    entries: Vec<EntryContext<'s>>,
    dirs: Vec<DirContext<'s>>,
    has_raw_file: bool,
    has_compressed_file: bool,
}

#[derive(Debug, Serialize)]
struct EntryContext<'s> {
    path: &'s str,
    name: &'s str,
    modified: String,
    is_dir: bool,
    is_compressed: bool,
    size: u64,
    payload: String,
}

#[derive(Debug, Serialize)]
struct DirContext<'s> {
    path: &'s str,
    children: &'s [String],
}

/// Renders a modification time as the `Option<(i64, u32)>` literal the
/// generated constructors take.
fn modified_literal(modified: Option<DateTime<Utc>>) -> String {
    match modified {
        Some(time) => format!("Some(({}, {}))", time.timestamp(), time.timestamp_subsec_nanos()),
        None => "None".to_string(),
    }
}

/// One `///` line per comment line; blank lines stay bare.
fn doc_lines(comment: &str) -> Vec<String> {
    comment
        .lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                String::new()
            } else {
                format!(" {line}")
            }
        })
        .collect()
}

fn imports(toc: &TableOfContents) -> String {
    let mut names = Vec::with_capacity(6);
    if toc.has_compressed_file {
        names.push("CompressedFileNode");
    }
    names.push("DirNode");
    if toc.has_raw_file {
        names.push("FileNode");
    }
    names.extend(["Handle", "StaticFs", "timestamp"]);
    names.join(", ")
}

impl Snapshot {
    /// Renders the snapshot as a Rust module.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if rendering fails.
    pub fn render(
        &self,
        options: &ResolvedOptions,
        engine: &TemplateEngine<'_>,
    ) -> Result<GeneratedArtifact> {
        let toc = *self.toc();

        let entries = self
            .entries()
            .iter()
            .map(|entry| match entry {
                Entry::Dir(dir) => EntryContext {
                    path: &dir.path,
                    name: &dir.name,
                    modified: modified_literal(dir.modified),
                    is_dir: true,
                    is_compressed: false,
                    size: 0,
                    payload: String::new(),
                },
                Entry::File(file) => {
                    let mut payload = String::new();
                    escape_into(&mut payload, &file.representation.payload);
                    EntryContext {
                        path: &file.path,
                        name: &file.name,
                        modified: modified_literal(file.modified),
                        is_dir: false,
                        is_compressed: file.representation.kind == Kind::Compressed,
                        size: file.size,
                        payload,
                    }
                }
            })
            .collect();

        let dirs = self
            .dirs()
            .filter(|dir| !dir.children.is_empty())
            .map(|dir| DirContext {
                path: &dir.path,
                children: &dir.children,
            })
            .collect();

        let context = ArtifactContext {
            has_build_tags: options.build_tags.is_some(),
            build_tags: options.build_tags.as_deref().unwrap_or_default(),
            package_name: &options.package_name,
            static_ident: options.static_ident(),
            doc_lines: doc_lines(&options.variable_comment),
            imports: imports(&toc),
            entries,
            dirs,
            has_raw_file: toc.has_raw_file,
            has_compressed_file: toc.has_compressed_file,
        };

        let text = engine.render(ARTIFACT_TEMPLATE, &context)?;
        debug!(bytes = text.len(), "rendered module");
        Ok(GeneratedArtifact { text, toc })
    }
}

/// Writes `content` to `path` through a uniquely named temporary sibling
/// and a rename.
///
/// Either the whole content ends up at `path` or `path` is left untouched.
/// Other files next to `path` are never touched.
///
/// # Errors
///
/// Returns [`Error::OutputWrite`] if any step fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let output_error = |source: std::io::Error| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    // the temp file is removed when dropped
    let mut temp = NamedTempFile::new_in(parent).map_err(output_error)?;
    temp.write_all(content.as_bytes()).map_err(output_error)?;
    temp.as_file().sync_all().map_err(output_error)?;
    temp.persist(path).map_err(|err| output_error(err.error))?;
    Ok(())
}

static RUNS: AtomicU64 = AtomicU64::new(0);

/// Embeds the whole tree of `fs` into a Rust module written to the
/// configured filename.
///
/// Every run starts from scratch. Failures are logged with `tracing::error!`
/// and leave no output file behind.
///
/// # Errors
///
/// - [`Error::InvalidOptions`] if an option cannot be used
/// - [`Error::SourceRead`] if any source entry cannot be read
/// - [`Error::Template`] if rendering fails
/// - [`Error::OutputWrite`] if the module cannot be written
pub fn generate<F: FileSystem + ?Sized>(
    fs: &F,
    options: &GenerateOptions,
) -> Result<GenerationReport> {
    let run = RUNS.fetch_add(1, Ordering::Relaxed) + 1;
    let span = info_span!("generate", run);
    let _guard = span.enter();

    let result = run_generation(fs, options);
    if let Err(err) = &result {
        error!(error = %err, "generation failed");
    }
    result
}

fn run_generation<F: FileSystem + ?Sized>(
    fs: &F,
    options: &GenerateOptions,
) -> Result<GenerationReport> {
    let options = options.resolve()?;
    let engine = TemplateEngine::new()?;

    let snapshot = Snapshot::capture(fs)?;
    let artifact = snapshot.render(&options, &engine)?;
    write_atomic(&options.filename, &artifact.text)?;

    let report = GenerationReport {
        output: options.filename,
        dirs: artifact.toc.dir_count,
        files: artifact.toc.file_count,
        compressed_files: snapshot
            .files()
            .filter(|file| file.representation.kind == Kind::Compressed)
            .count(),
        source_bytes: snapshot.source_bytes(),
        stored_bytes: snapshot.stored_bytes(),
        artifact_bytes: artifact.text.len(),
    };

    info!(
        output = %report.output.display(),
        files = report.files,
        dirs = report.dirs,
        compressed = report.compressed_files,
        "generated module"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::decide;
    use crate::snapshot::{DirEntry, FileEntry};
    use std::fs;
    use tempfile::TempDir;

    fn resolved(options: GenerateOptions) -> ResolvedOptions {
        options.resolve().unwrap()
    }

    fn snapshot_with(files: &[(&str, &[u8])]) -> Snapshot {
        let mut entries = vec![Entry::Dir(DirEntry {
            path: "/".to_string(),
            name: "/".to_string(),
            modified: None,
            children: files.iter().map(|(name, _)| format!("/{name}")).collect(),
        })];
        for (name, content) in files {
            entries.push(Entry::File(FileEntry {
                path: format!("/{name}"),
                name: (*name).to_string(),
                modified: None,
                size: content.len() as u64,
                representation: decide(content),
            }));
        }
        Snapshot::from_entries(entries)
    }

    fn render(snapshot: &Snapshot, options: GenerateOptions) -> String {
        let engine = TemplateEngine::new().unwrap();
        snapshot.render(&resolved(options), &engine).unwrap().text
    }

    #[test]
    fn test_render_defaults() {
        let text = render(&snapshot_with(&[("a.txt", b"hello")]), GenerateOptions::default());

        assert!(text.starts_with("// Code generated by staticfs; DO NOT EDIT."));
        assert!(text.contains("pub mod main {"));
        assert!(text.contains("pub static ASSETS: LazyLock<StaticFs>"));
        assert!(text.contains(
            "/// assets statically implements the virtual filesystem provided to staticfs."
        ));
        assert!(!text.contains("#[cfg("));
    }

    #[test]
    fn test_render_raw_file_payload() {
        let text = render(&snapshot_with(&[("a.txt", b"hello")]), GenerateOptions::default());

        assert!(text.contains(r#"fs.insert("/a.txt", file("a.txt", None, b"\x68\x65\x6c\x6c\x6f"));"#));
        assert!(text.contains(r#"fs.insert("/", dir("/", None));"#));
        assert!(text.contains(r#"fs.entries("/", ["/a.txt", ]);"#));
    }

    #[test]
    fn test_render_only_needed_constructors() {
        let raw_only = render(&snapshot_with(&[("a.txt", b"hello")]), GenerateOptions::default());
        assert!(raw_only.contains("fn file("));
        assert!(!raw_only.contains("fn compressed_file("));
        assert!(!raw_only.contains("CompressedFileNode"));
        assert!(raw_only.contains("fn dir("));
        assert!(raw_only.contains("DirNode, FileNode, Handle, StaticFs, timestamp"));

        let zeros = vec![0u8; 4096];
        let compressed_only = render(&snapshot_with(&[("z.bin", &zeros)]), GenerateOptions::default());
        assert!(compressed_only.contains("fn compressed_file("));
        assert!(compressed_only.contains("compressed_file(\"z.bin\", None, 4096, b\"\\x1f\\x8b"));
        assert!(!compressed_only.contains("fn file("));
        assert!(!compressed_only.contains("DirNode, FileNode"));

        let dirs_only = render(&snapshot_with(&[]), GenerateOptions::default());
        assert!(dirs_only.contains("fn dir("));
        assert!(!dirs_only.contains("fn file("));
        assert!(!dirs_only.contains("fn compressed_file("));
        assert!(!dirs_only.contains("fs.entries("));
    }

    #[test]
    fn test_render_custom_naming() {
        let options = GenerateOptions::default()
            .with_package_name("embedded")
            .with_variable_name("webAssets")
            .with_build_tags("not(debug_assertions)")
            .with_variable_comment("Site assets.\n\nBuilt at release time.");
        let text = render(&snapshot_with(&[("a.txt", b"x")]), options);

        assert!(text.contains("#[cfg(not(debug_assertions))]"));
        assert!(text.contains("pub mod embedded {"));
        assert!(text.contains("pub static WEBASSETS: LazyLock<StaticFs>"));
        assert!(text.contains("    /// Site assets.\n"));
        assert!(text.contains("    ///\n"));
        assert!(text.contains("    /// Built at release time.\n"));
        assert!(text.contains("WEBASSETS.open(path)"));
    }

    #[test]
    fn test_render_modified_time() {
        let mut snapshot_entries = snapshot_with(&[]).entries().to_vec();
        if let Entry::Dir(root) = &mut snapshot_entries[0] {
            root.modified = DateTime::from_timestamp(1_700_000_000, 42);
        }
        let text = render(&Snapshot::from_entries(snapshot_entries), GenerateOptions::default());
        assert!(text.contains(r#"dir("/", Some((1700000000, 42)))"#));
    }

    #[test]
    fn test_render_quotes_odd_names() {
        let text = render(
            &snapshot_with(&[("say \"hi\".txt", b"x")]),
            GenerateOptions::default(),
        );
        assert!(text.contains(r#"fs.insert("/say \"hi\".txt", file("say \"hi\".txt""#));
    }

    #[test]
    fn test_render_is_deterministic() {
        let snapshot = snapshot_with(&[("a.txt", b"hello"), ("b.bin", &[0u8; 3000])]);
        assert_eq!(
            render(&snapshot, GenerateOptions::default()),
            render(&snapshot, GenerateOptions::default())
        );
    }

    #[test]
    fn test_doc_lines() {
        assert_eq!(doc_lines("one"), [" one"]);
        assert_eq!(doc_lines("a\n\nb  "), [" a", "", " b"]);
        assert!(doc_lines("").is_empty());
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets_data.rs");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_leaves_siblings_alone() {
        let dir = TempDir::new().unwrap();
        let sibling = dir.path().join("assets_data.tmp");
        fs::write(&sibling, "keep me").unwrap();

        write_atomic(&dir.path().join("assets_data.rs"), "module").unwrap();
        assert_eq!(fs::read_to_string(&sibling).unwrap(), "keep me");
    }

    #[test]
    fn test_write_atomic_tmp_named_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.tmp");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_missing_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.rs");
        let err = write_atomic(&path, "x").unwrap_err();
        assert!(err.is_output_write());
        assert!(!path.exists());
    }
}
