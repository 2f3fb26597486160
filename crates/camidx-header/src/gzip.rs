//! Gzip encoding of HTML payloads.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};

use crate::{Error, Result};

/// Gzip member magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Operating system byte written to the gzip header ("unknown").
pub const OS_UNKNOWN: u8 = 255;

/// Compress data at maximum level with a fixed header.
///
/// The modification time is zeroed and no file name is stored, so the same
/// input always produces the same bytes.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder: GzEncoder<Vec<u8>> = GzBuilder::new()
        .mtime(0)
        .operating_system(OS_UNKNOWN)
        .write(Vec::with_capacity(data.len() / 2 + 32), Compression::best());

    encoder
        .write_all(data)
        .map_err(|e| Error::Compression(e.to_string()))?;
    encoder.finish().map_err(|e| Error::Compression(e.to_string()))
}

/// Decompress a gzip stream.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if !is_gzip(data) {
        return Err(Error::Decompression("missing gzip magic".to_string()));
    }

    let mut output = Vec::with_capacity(data.len() * 4);
    GzDecoder::new(data)
        .read_to_end(&mut output)
        .map_err(|e| Error::Decompression(e.to_string()))?;

    Ok(output)
}

/// Check for the gzip magic.
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gzip_roundtrip() {
        let html = b"<!doctype html>\n<html><body><h1>ESP32 OV2640</h1></body></html>\n";

        let compressed = compress(html).unwrap();
        assert!(is_gzip(&compressed));

        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, html);
    }

    #[test]
    fn test_compress_is_deterministic() {
        let html = "<html>".repeat(200);
        let a = compress(html.as_bytes()).unwrap();
        let b = compress(html.as_bytes()).unwrap();
        assert_eq!(a, b);

        // mtime and OS fields of the member header
        assert_eq!(&a[4..8], &[0, 0, 0, 0]);
        assert_eq!(a[9], OS_UNKNOWN);
    }

    #[test]
    fn test_empty_payload() {
        let compressed = compress(b"").unwrap();
        assert_eq!(decompress(&compressed).unwrap(), b"");
    }

    #[test]
    fn test_decompress_rejects_garbage() {
        assert!(matches!(decompress(b"not gzip"), Err(Error::Decompression(_))));
        assert!(matches!(decompress(b""), Err(Error::Decompression(_))));
    }

    #[test]
    fn test_decompress_rejects_truncated() {
        let compressed = compress(b"<html>truncated payload</html>").unwrap();
        let cut = &compressed[..compressed.len() - 6];
        assert!(matches!(decompress(cut), Err(Error::Decompression(_))));
    }
}
