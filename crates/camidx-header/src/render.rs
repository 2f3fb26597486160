//! Rendering of array blocks in the header's declaration syntax.

use std::fmt::Write;

use crate::{CameraModel, LineEnding};

/// Byte values per line in the emitted list.
pub const BYTES_PER_LINE: usize = 12;

/// Indentation of byte list lines.
pub const INDENT: &str = "  ";

/// Render the byte list that goes between `{` and `}`.
///
/// Starts with a line break and ends with one, so the braces stay on their
/// own lines.
pub fn render_body(bytes: &[u8], eol: LineEnding) -> String {
    let eol = eol.as_str();
    let mut buf = String::with_capacity(bytes.len() * 6 + 16);
    buf.push_str(eol);

    let mut chunks = bytes.chunks(BYTES_PER_LINE).peekable();
    while let Some(chunk) = chunks.next() {
        buf.push_str(INDENT);
        for (i, b) in chunk.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            let _ = write!(buf, "0x{:02X}", b);
        }
        if chunks.peek().is_some() {
            buf.push(',');
        }
        buf.push_str(eol);
    }

    buf
}

/// Render a complete block: marker comment, length macro and array.
///
/// The result has no trailing line ending.
pub fn render_block(model: CameraModel, bytes: &[u8], eol: LineEnding) -> String {
    let len = bytes.len();
    let mut buf = String::with_capacity(bytes.len() * 6 + 160);

    let _ = write!(buf, "//File: {}, Size: {}{}", model.gz_file_name(), len, eol.as_str());
    let _ = write!(buf, "#define {} {}{}", model.len_ident(), len, eol.as_str());
    let _ = write!(buf, "const unsigned char {}[] = {{", model.array_ident());
    buf.push_str(&render_body(bytes, eol));
    buf.push_str("};");

    buf
}
