//! staticfs CLI library.
//!
//! Exposes the command implementations and output formatters behind the
//! `staticfs` binary so they can be tested directly.

pub mod commands;
pub mod formatters;
