//! Error kinds for diff construction and patch application.
//!
//! Value-typed per the container's own failure model: a corrupt header
//! is distinguishable from a short compressed stream, which is
//! distinguishable from a triple that would overrun the target buffer.

use std::io;

use thiserror::Error;

/// Failure of a [`crate::diff`]/[`crate::patch`] call (or the
/// equivalent [`crate::Bsdiff`]/[`crate::Bspatch`] methods).
#[derive(Error, Debug)]
pub enum Error {
    /// Bad magic, a patch shorter than 32 bytes, or a header length
    /// field that decodes negative.
    #[error("corrupt patch header")]
    CorruptHeader,

    /// A compressed stream produced fewer bytes than the control
    /// triple demanded, or ended before a triple could be fully read.
    #[error("corrupt patch body or truncated compressed stream")]
    CorruptStream,

    /// A control triple would advance `newpos` past the declared
    /// target size.
    #[error("patch fails sanity check (control triple overruns target size)")]
    SanityFailure,

    /// The growable write buffer was asked to seek to a negative
    /// position. Should not occur from correct encoder code.
    #[error("seek to negative position")]
    Seek,

    /// Propagated I/O or bzip2 compressor/decompressor failure.
    #[error("compression error: {0}")]
    Compression(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
