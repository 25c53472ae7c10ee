//! Core types, options, and errors for staticfs.
//!
//! This crate provides the pieces shared by the generator and the command
//! line: the generation error hierarchy, the user-facing
//! [`GenerateOptions`] with their defaults, and small CLI value types.
//!
//! # Examples
//!
//! ```
//! use staticfs_core::GenerateOptions;
//!
//! let options = GenerateOptions::default().with_variable_name("web");
//! let resolved = options.resolve()?;
//! assert_eq!(resolved.static_ident(), "WEB");
//! # Ok::<(), staticfs_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;

pub mod cli;

pub use config::{DEFAULT_PACKAGE_NAME, DEFAULT_VARIABLE_NAME, GenerateOptions, ResolvedOptions};
pub use error::{Error, Result};
