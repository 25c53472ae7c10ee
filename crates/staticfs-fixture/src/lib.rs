//! A fixed tree compiled in through a generated module.
//!
//! `build.rs` runs the generator over an in-memory tree; the result is
//! included here as the `fixture` module, exposing `fixture::FIXTURE` and
//! `fixture::open`.

include!(concat!(env!("OUT_DIR"), "/fixture_data.rs"));
