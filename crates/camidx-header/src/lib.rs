//! Reader and writer for the web UI arrays in `camera_index.h`.
//!
//! The ESP32 camera firmware serves its web page from gzip-compressed byte
//! arrays compiled into the binary, one per camera sensor:
//!
//! - `index_ov2640_html_gz` / `index_ov2640_html_gz_len`
//! - `index_ov3660_html_gz` / `index_ov3660_html_gz_len`
//! - `index_ov5640_html_gz` / `index_ov5640_html_gz_len`
//!
//! This crate locates those blocks, decodes them to HTML, and writes new
//! payloads back without disturbing the rest of the header.
//!
//! # Example
//!
//! ```no_run
//! use camidx_header::{gzip, CameraModel, HeaderDocument};
//!
//! let data = std::fs::read("camera_index.h")?;
//! let doc = HeaderDocument::parse(&data);
//!
//! if let Some(block) = doc.block(CameraModel::Ov2640) {
//!     let html = block.decompress()?;
//!     std::fs::write("index_ov2640.html", &html)?;
//!
//!     let payload = gzip::compress(&html)?;
//!     let patched = doc.patch(CameraModel::Ov2640, &payload)?;
//!     std::fs::write("camera_index.h", patched)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod block;
mod document;
mod error;
mod model;
mod patch;

pub mod gzip;
pub mod lexer;
pub mod render;

pub use block::{ArrayBlock, BlockIssue};
pub use document::{line_of, HeaderDocument, LineEnding, MARKER};
pub use error::{Error, Result};
pub use model::CameraModel;
pub use render::{render_block, render_body};
