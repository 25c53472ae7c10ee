//! Per-file choice between raw and gzip storage.
//!
//! Each file is compressed at the best level into an [`EncodedSink`] and the
//! result is kept only if the sink counted strictly fewer bytes than the
//! original. The gzip header carries no name
//! and a zero mtime so identical input always yields identical output.
//!
//! # Examples
//!
//! ```
//! use staticfs_codegen::compress::{Kind, decide};
//!
//! assert_eq!(decide(b"hi").kind, Kind::Raw);
//!
//! let zeros = vec![0u8; 10_000];
//! let repr = decide(&zeros);
//! assert_eq!(repr.kind, Kind::Compressed);
//! assert!(repr.payload_size < zeros.len());
//! ```

use crate::encoder::EncodedSink;
use flate2::{Compression, GzBuilder};
use serde::Serialize;
use std::io::Write;

/// How a file's bytes are stored in the generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Original bytes
    Raw,
    /// gzip stream of the original bytes
    Compressed,
}

impl Kind {
    /// Lowercase name, as shown by `inspect`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Compressed => "compressed",
        }
    }
}

/// The stored form of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representation {
    /// Raw or compressed
    pub kind: Kind,
    /// Bytes that get embedded: the original content or the gzip stream
    pub payload: Vec<u8>,
    /// Length of `payload`
    pub payload_size: usize,
}

impl Representation {
    fn raw(bytes: &[u8]) -> Self {
        Self {
            kind: Kind::Raw,
            payload: bytes.to_vec(),
            payload_size: bytes.len(),
        }
    }
}

/// Chooses how to store `bytes`.
///
/// Empty input is always [`Kind::Raw`]. Otherwise the content is gzipped and
/// [`Kind::Compressed`] is chosen only when the stream is strictly shorter.
#[must_use]
pub fn decide(bytes: &[u8]) -> Representation {
    if bytes.is_empty() {
        return Representation::raw(bytes);
    }

    match gzip(bytes) {
        Ok(sink) if sink.bytes_in() < bytes.len() => Representation {
            kind: Kind::Compressed,
            payload_size: sink.bytes_in(),
            payload: sink.into_bytes(),
        },
        Ok(_) => Representation::raw(bytes),
        Err(err) => {
            tracing::warn!(error = %err, "gzip failed, storing raw");
            Representation::raw(bytes)
        }
    }
}

fn gzip(bytes: &[u8]) -> std::io::Result<EncodedSink> {
    let mut encoder = GzBuilder::new()
        .mtime(0)
        .write(EncodedSink::with_capacity(bytes.len() / 2), Compression::best());
    encoder.write_all(bytes)?;
    encoder.finish()
}
