//! Error types for camera index header handling.

use thiserror::Error;

/// Errors that can occur when reading or writing camera index headers.
#[derive(Debug, Error)]
pub enum Error {
    /// Name is not one of the recognized camera models.
    #[error("unrecognized camera model '{0}': expected one of ov2640, ov3660, ov5640")]
    UnknownModel(String),

    /// A block declaration does not follow the expected grammar.
    #[error("malformed block at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// Gzip payload could not be decompressed.
    #[error("decompression failed: {0}")]
    Decompression(String),

    /// Gzip payload could not be produced.
    #[error("compression failed: {0}")]
    Compression(String),

    /// No block for the model exists in the header.
    #[error("no array block for '{0}' found in header")]
    BlockNotFound(&'static str),
}

/// Result type for header operations.
pub type Result<T> = std::result::Result<T, Error>;
