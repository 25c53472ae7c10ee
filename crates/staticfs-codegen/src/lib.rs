//! Generator of staticfs modules.
//!
//! Walks a [`staticfs_vfs::FileSystem`], decides per file whether to store it
//! raw or gzip-compressed, and renders a Rust module that rebuilds the same
//! tree as a [`staticfs_vfs::StaticFs`] using Handlebars templates.
//!
//! # Examples
//!
//! ```no_run
//! use staticfs_codegen::generate;
//! use staticfs_core::GenerateOptions;
//! use staticfs_vfs::OsFs;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let report = generate(&OsFs::new("assets"), &GenerateOptions::default())?;
//! println!("wrote {}", report.output.display());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod assembler;
pub mod compress;
pub mod encoder;
pub mod snapshot;
pub mod template_engine;
pub mod walker;

pub use assembler::{GeneratedArtifact, GenerationReport, generate, write_atomic};
pub use snapshot::{Snapshot, TableOfContents};
pub use template_engine::TemplateEngine;
