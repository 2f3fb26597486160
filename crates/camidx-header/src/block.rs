//! Array blocks located in a header document.

use std::fmt;
use std::ops::Range;

use crate::{gzip, CameraModel, Result};

/// One compressed HTML payload declared in the header.
///
/// All ranges are byte offsets into the document the block was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayBlock {
    pub(crate) model: CameraModel,
    pub(crate) line: usize,
    pub(crate) span: Range<usize>,
    pub(crate) size_field: Range<usize>,
    pub(crate) len_field: Range<usize>,
    pub(crate) array_size_field: Option<Range<usize>>,
    pub(crate) body: Range<usize>,
    pub(crate) marker_size: u64,
    pub(crate) declared_len: u64,
    pub(crate) bytes: Vec<u8>,
}

impl ArrayBlock {
    /// Camera model this block belongs to.
    pub fn model(&self) -> CameraModel {
        self.model
    }

    /// 1-based line of the marker comment.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whole block, from the marker comment through the closing `;`.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Digits of the `Size:` value in the marker comment.
    pub fn size_field(&self) -> Range<usize> {
        self.size_field.clone()
    }

    /// Digits of the `#define ..._len` value.
    pub fn len_field(&self) -> Range<usize> {
        self.len_field.clone()
    }

    /// Digits of an explicit array size such as `[6787]`, if the declaration has one.
    pub fn array_size_field(&self) -> Option<Range<usize>> {
        self.array_size_field.clone()
    }

    /// Everything between `{` and `}`.
    pub fn body(&self) -> Range<usize> {
        self.body.clone()
    }

    /// Size written in the marker comment.
    pub fn marker_size(&self) -> u64 {
        self.marker_size
    }

    /// Length declared by the `#define`.
    pub fn declared_len(&self) -> u64 {
        self.declared_len
    }

    /// The parsed byte values.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether both declared sizes agree with the number of listed bytes.
    pub fn is_length_consistent(&self) -> bool {
        let actual = self.bytes.len() as u64;
        self.declared_len == actual && self.marker_size == actual
    }

    /// Decompress the payload into HTML.
    pub fn decompress(&self) -> Result<Vec<u8>> {
        gzip::decompress(&self.bytes)
    }
}

/// A block that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockIssue {
    pub model: CameraModel,
    pub line: usize,
    pub reason: String,
}

impl fmt::Display for BlockIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {}): {}", self.model, self.line, self.reason)
    }
}
