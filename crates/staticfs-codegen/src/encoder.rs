//! Byte-string literal encoding.
//!
//! Every byte is written as a four character `\xHH` escape, so the output can
//! sit between the quotes of a Rust `b"..."` literal whatever the input is.
//!
//! # Examples
//!
//! ```
//! use staticfs_codegen::encoder::escape;
//!
//! let (literal, len) = escape(b"hi\0");
//! assert_eq!(literal, r"\x68\x69\x00");
//! assert_eq!(len, 12);
//! ```

use std::io::{self, Write};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Number of characters emitted for `bytes` input bytes.
#[must_use]
pub const fn escaped_len(bytes: usize) -> usize {
    bytes * 4
}

/// Appends the escaped form of `bytes` to `out`.
///
/// Returns the number of characters appended.
pub fn escape_into(out: &mut String, bytes: &[u8]) -> usize {
    out.reserve(escaped_len(bytes.len()));
    for &byte in bytes {
        out.push('\\');
        out.push('x');
        out.push(char::from(HEX[usize::from(byte >> 4)]));
        out.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }
    escaped_len(bytes.len())
}

/// Escapes `bytes` into a new string and returns it with its length.
#[must_use]
pub fn escape(bytes: &[u8]) -> (String, usize) {
    let mut out = String::with_capacity(escaped_len(bytes.len()));
    let len = escape_into(&mut out, bytes);
    (out, len)
}

/// Byte sink that counts what goes through it, raw and escaped.
///
/// The compression decider gzips into this sink and compares
/// [`bytes_in`](Self::bytes_in) against the original length, so the choice
/// rests on the emitted byte count rather than an estimate.
///
/// # Examples
///
/// ```
/// use staticfs_codegen::encoder::EncodedSink;
/// use std::io::Write;
///
/// let mut sink = EncodedSink::default();
/// sink.write_all(b"abc")?;
/// assert_eq!(sink.bytes_in(), 3);
/// assert_eq!(sink.escaped_len(), 12);
/// assert_eq!(sink.into_bytes(), b"abc");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedSink {
    bytes: Vec<u8>,
}

impl EncodedSink {
    /// Creates a sink with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[must_use]
    pub const fn bytes_in(&self) -> usize {
        self.bytes.len()
    }

    /// Characters the written bytes take once escaped.
    #[must_use]
    pub const fn escaped_len(&self) -> usize {
        escaped_len(self.bytes.len())
    }

    /// Escapes the written bytes into `out`.
    pub fn escape_into(&self, out: &mut String) -> usize {
        escape_into(out, &self.bytes)
    }

    /// The written bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Write for EncodedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
