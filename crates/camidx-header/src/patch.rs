//! In-place replacement of a block's payload.

use std::ops::Range;

use crate::render::render_body;
use crate::{CameraModel, Error, HeaderDocument, Result};

impl HeaderDocument<'_> {
    /// Produce a copy of the document with the payload of `model` replaced.
    ///
    /// Only the length fields and the byte list change: the `Size:` digits of
    /// the marker comment, the `#define` value, the explicit array size when
    /// the declaration has one, and everything between `{` and `}`. Every
    /// other byte is copied unchanged.
    pub fn patch(&self, model: CameraModel, payload: &[u8]) -> Result<Vec<u8>> {
        let block = self
            .block(model)
            .ok_or(Error::BlockNotFound(model.as_str()))?;

        let len = payload.len().to_string();
        let body = render_body(payload, self.line_ending());
        let mut edits = vec![
            (block.size_field(), len.as_bytes()),
            (block.len_field(), len.as_bytes()),
        ];
        if let Some(array_size) = block.array_size_field() {
            edits.push((array_size, len.as_bytes()));
        }
        edits.push((block.body(), body.as_bytes()));

        Ok(splice(self.data(), &edits))
    }
}

/// Replace non-overlapping ranges, given in ascending order.
fn splice(data: &[u8], edits: &[(Range<usize>, &[u8])]) -> Vec<u8> {
    let added: usize = edits.iter().map(|(_, r)| r.len()).sum();
    let mut output = Vec::with_capacity(data.len() + added);

    let mut cursor = 0;
    for (range, replacement) in edits {
        debug_assert!(range.start >= cursor, "edits must be ordered and disjoint");
        output.extend_from_slice(&data[cursor..range.start]);
        output.extend_from_slice(replacement);
        cursor = range.end;
    }
    output.extend_from_slice(&data[cursor..]);

    output
}
