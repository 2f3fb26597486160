//! Summary of the blocks in a header.

use camidx_header::{BlockIssue, CameraModel, HeaderDocument};

use crate::extract::read_header;
use crate::{Result, ToolConfig};

/// One recognized block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    pub model: CameraModel,
    pub line: usize,
    pub declared_len: u64,
    pub marker_size: u64,
    pub byte_len: usize,
    /// Decompressed HTML size, or the decompression error.
    pub html: std::result::Result<usize, String>,
}

impl BlockSummary {
    pub fn is_length_consistent(&self) -> bool {
        self.declared_len == self.byte_len as u64 && self.marker_size == self.byte_len as u64
    }
}

/// Everything found in a header.
#[derive(Debug, Clone, Default)]
pub struct HeaderSummary {
    pub blocks: Vec<BlockSummary>,
    pub issues: Vec<BlockIssue>,
    pub unrecognized: Vec<String>,
}

/// Scan the configured header without writing anything.
pub fn inspect(config: &ToolConfig) -> Result<HeaderSummary> {
    let header = config.header_path()?;
    let data = read_header(&header)?;
    Ok(summarize(&HeaderDocument::parse(&data)))
}

/// Summarize a parsed document.
pub fn summarize(doc: &HeaderDocument<'_>) -> HeaderSummary {
    let blocks = doc
        .blocks()
        .iter()
        .map(|block| BlockSummary {
            model: block.model(),
            line: block.line(),
            declared_len: block.declared_len(),
            marker_size: block.marker_size(),
            byte_len: block.bytes().len(),
            html: block.decompress().map(|h| h.len()).map_err(|e| e.to_string()),
        })
        .collect();

    HeaderSummary {
        blocks,
        issues: doc.issues().to_vec(),
        unrecognized: doc.unrecognized().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_header;

    #[test]
    fn test_summarize() {
        let text = sample_header(&[
            (CameraModel::Ov3660, "<html>B</html>"),
            (CameraModel::Ov5640, "<html>C!</html>"),
        ]);
        let summary = summarize(&HeaderDocument::parse(text.as_bytes()));

        assert_eq!(summary.blocks.len(), 2);
        assert_eq!(summary.blocks[0].model, CameraModel::Ov3660);
        assert_eq!(summary.blocks[0].html, Ok(14));
        assert_eq!(summary.blocks[1].html, Ok(15));
        assert!(summary.blocks.iter().all(BlockSummary::is_length_consistent));
        assert!(summary.issues.is_empty());
    }

    #[test]
    fn test_summarize_bad_payload() {
        let text = "//File: index_ov2640.html.gz, Size: 4\n\
                    #define index_ov2640_html_gz_len 2\n\
                    const unsigned char index_ov2640_html_gz[] = {\n  0x00, 0x01\n};\n";
        let summary = summarize(&HeaderDocument::parse(text.as_bytes()));

        let block = &summary.blocks[0];
        assert_eq!(block.byte_len, 2);
        assert!(!block.is_length_consistent());
        assert!(block.html.is_err());
    }
}
