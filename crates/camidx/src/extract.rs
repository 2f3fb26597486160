//! Extraction of embedded pages to editable HTML files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use camidx_header::{BlockIssue, CameraModel, HeaderDocument};

use crate::{Error, Result, ToolConfig};

/// A page written by [`extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub model: CameraModel,
    pub path: PathBuf,
    pub html_len: usize,
}

/// Outcome of an extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractReport {
    /// Pages written, in header order.
    pub written: Vec<ExtractedPage>,
    /// Blocks that could not be parsed or decompressed.
    pub skipped: Vec<BlockIssue>,
    /// Marker names outside the recognized set.
    pub unrecognized: Vec<String>,
}

impl ExtractReport {
    /// Whether the header held no usable block at all.
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}

/// Read a header, mapping a missing file to [`Error::HeaderNotFound`].
pub fn read_header(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::HeaderNotFound(path.to_path_buf()),
        _ => Error::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Write one `index_<name>.html` per recognized block in the header.
///
/// A block that fails to parse or decompress is recorded in
/// [`ExtractReport::skipped`] and does not stop the others. Only a missing
/// header or a failed write is fatal.
pub fn extract(config: &ToolConfig) -> Result<ExtractReport> {
    let header = config.header_path()?;
    let data = read_header(&header)?;
    let doc = HeaderDocument::parse(&data);
    let out_dir = config.output_dir(&header);

    log::debug!(
        "scanned {}: {} blocks, {} issues",
        header.display(),
        doc.blocks().len(),
        doc.issues().len()
    );

    let mut report = ExtractReport {
        skipped: doc.issues().to_vec(),
        unrecognized: doc.unrecognized().to_vec(),
        ..ExtractReport::default()
    };

    for issue in doc.issues() {
        log::warn!("skipping block {}", issue);
    }
    for name in doc.unrecognized() {
        log::debug!("ignoring block for unrecognized model '{}'", name);
    }

    if !doc.blocks().is_empty() {
        fs::create_dir_all(&out_dir).map_err(Error::io(&out_dir))?;
    }

    for block in doc.blocks() {
        let model = block.model();

        if !block.is_length_consistent() {
            log::warn!(
                "{}: declared length {} and marker size {} do not match {} listed bytes",
                model,
                block.declared_len(),
                block.marker_size(),
                block.bytes().len()
            );
        }

        let html = match block.decompress() {
            Ok(html) => html,
            Err(e) => {
                log::warn!("{}: decompress failed: {}", model, e);
                report.skipped.push(BlockIssue {
                    model,
                    line: block.line(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let path = out_dir.join(model.html_file_name());
        fs::write(&path, &html).map_err(Error::io(&path))?;

        report.written.push(ExtractedPage {
            model,
            path,
            html_len: html.len(),
        });
    }

    if doc.blocks().is_empty() {
        log::warn!("no recognized array blocks found in {}", header.display());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_header, scratch_dir};

    #[test]
    fn test_extract_single_block() {
        let dir = scratch_dir("extract-single");
        let header = dir.join("camera_index.h");
        fs::write(&header, sample_header(&[(CameraModel::Ov2640, "<html>A</html>")])).unwrap();

        let report = extract(&ToolConfig::with_header(&header)).unwrap();

        assert_eq!(report.written.len(), 1);
        assert_eq!(report.written[0].model, CameraModel::Ov2640);
        assert_eq!(report.written[0].html_len, 14);
        assert_eq!(fs::read_to_string(dir.join("index_ov2640.html")).unwrap(), "<html>A</html>");
        assert!(!dir.join("index_ov3660.html").exists());
        assert!(!dir.join("index_ov5640.html").exists());
    }

    #[test]
    fn test_extract_missing_header() {
        let dir = scratch_dir("extract-missing");
        let err = extract(&ToolConfig::with_header(dir.join("nope.h"))).unwrap_err();

        assert!(matches!(err, Error::HeaderNotFound(_)));
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_extract_no_blocks() {
        let dir = scratch_dir("extract-empty");
        let header = dir.join("camera_index.h");
        fs::write(&header, "#pragma once\n").unwrap();

        let report = extract(&ToolConfig::with_header(&header)).unwrap();

        assert!(report.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
    }

    #[test]
    fn test_corrupt_block_is_skipped() {
        let dir = scratch_dir("extract-corrupt");
        let header = dir.join("camera_index.h");
        let text = format!(
            "//File: index_ov3660.html.gz, Size: 3\n\
             #define index_ov3660_html_gz_len 3\n\
             const unsigned char index_ov3660_html_gz[] = {{\n  0x1F, 0x8B, 0x08\n}};\n{}",
            sample_header(&[(CameraModel::Ov5640, "<html>C</html>")])
        );
        fs::write(&header, text).unwrap();

        let report = extract(&ToolConfig::with_header(&header)).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].model, CameraModel::Ov3660);
        assert_eq!(report.written.len(), 1);
        assert!(!dir.join("index_ov3660.html").exists());
        assert_eq!(fs::read_to_string(dir.join("index_ov5640.html")).unwrap(), "<html>C</html>");
    }

    #[test]
    fn test_extract_to_custom_dir() {
        let dir = scratch_dir("extract-outdir");
        let header = dir.join("camera_index.h");
        fs::write(&header, sample_header(&[(CameraModel::Ov5640, "<html>C</html>")])).unwrap();

        let config = ToolConfig {
            header_path: Some(header),
            out_dir: Some(dir.join("pages")),
            inplace: false,
        };
        let report = extract(&config).unwrap();

        assert_eq!(report.written[0].path, dir.join("pages").join("index_ov5640.html"));
        assert!(!dir.join("index_ov5640.html").exists());
    }
}
