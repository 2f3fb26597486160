//! Error types for file-level operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while extracting or embedding pages.
#[derive(Debug, Error)]
pub enum Error {
    /// Header file does not exist.
    #[error("header file not found: {}", .0.display())]
    HeaderNotFound(PathBuf),

    /// HTML input does not exist.
    #[error("HTML file not found: {}", .0.display())]
    HtmlNotFound(PathBuf),

    /// Directory of the running executable could not be determined.
    #[error("cannot locate default header next to executable: {0}")]
    ExecutableDir(std::io::Error),

    /// A freshly compressed payload did not decompress to its input.
    #[error("compressed payload for {0} does not round-trip")]
    RoundTrip(camidx_header::CameraModel),

    /// Header format error.
    #[error("{0}")]
    Header(#[from] camidx_header::Error),

    /// I/O error on a specific path.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}

/// Result type for file-level operations.
pub type Result<T> = std::result::Result<T, Error>;
