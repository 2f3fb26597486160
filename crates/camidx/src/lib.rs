//! Camidx - extract and re-embed the camera web UI stored in `camera_index.h`.
//!
//! This crate wraps [`camidx_header`] with the file-level operations used by
//! the command-line tool:
//!
//! - [`extract`] - write one `index_<model>.html` per block in the header
//! - [`embed`] - compress an HTML page and print or patch its block
//! - [`inspect`] - summarize the blocks of a header
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use camidx::prelude::*;
//!
//! let config = ToolConfig::with_header("camera_index.h");
//! for page in extract(&config)?.written {
//!     println!("{} -> {}", page.model, page.path.display());
//! }
//!
//! let config = ToolConfig { inplace: true, ..config };
//! embed("ov2640", Path::new("index_ov2640.html"), &config)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod atomic;
mod config;
mod embed;
mod error;
mod extract;
mod inspect;

pub use camidx_header as header;

pub use atomic::write_atomic;
pub use config::{default_header_path, ToolConfig, DEFAULT_HEADER_FILE, HEADER_ENV};
pub use embed::{compress_page, embed, EmbedOutcome};
pub use error::{Error, Result};
pub use extract::{extract, read_header, ExtractReport, ExtractedPage};
pub use inspect::{inspect, summarize, BlockSummary, HeaderSummary};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{embed, extract, inspect, EmbedOutcome, ExtractReport, ToolConfig};
    pub use camidx_header::{CameraModel, HeaderDocument};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
