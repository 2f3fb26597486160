//! Re-embedding edited HTML into the header.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use camidx_header::{gzip, render_block, CameraModel, HeaderDocument, LineEnding};

use crate::atomic::write_atomic;
use crate::extract::read_header;
use crate::{Error, Result, ToolConfig};

/// Result of [`embed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedOutcome {
    /// Rendered block for standard output; no file was touched.
    Block { model: CameraModel, text: String },
    /// The header was patched in place.
    Patched {
        model: CameraModel,
        header: PathBuf,
        compressed_len: usize,
    },
}

/// Compress an HTML page for `name` and either render or patch its block.
///
/// `name` is validated before any file is read. With `config.inplace` the
/// existing block is replaced and the header is rewritten atomically; a
/// missing block is an error and leaves the header untouched.
pub fn embed(name: &str, html_path: &Path, config: &ToolConfig) -> Result<EmbedOutcome> {
    let model: CameraModel = name.parse()?;

    let html = fs::read(html_path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::HtmlNotFound(html_path.to_path_buf()),
        _ => Error::Io {
            path: html_path.to_path_buf(),
            source: e,
        },
    })?;

    let payload = compress_page(model, &html)?;
    log::debug!("{}: {} HTML bytes -> {} gz bytes", model, html.len(), payload.len());

    if !config.inplace {
        return Ok(EmbedOutcome::Block {
            model,
            text: render_block(model, &payload, LineEnding::Lf),
        });
    }

    let header = config.header_path()?;
    let data = read_header(&header)?;
    let doc = HeaderDocument::parse(&data);

    if doc.block(model).is_none() {
        if let Some(issue) = doc.issues().iter().find(|i| i.model == model) {
            return Err(camidx_header::Error::Malformed {
                line: issue.line,
                reason: issue.reason.clone(),
            }
            .into());
        }
    }

    let patched = doc.patch(model, &payload)?;
    write_atomic(&header, &patched)?;

    Ok(EmbedOutcome::Patched {
        model,
        header,
        compressed_len: payload.len(),
    })
}

/// Compress a page and check that it decodes back to the same bytes.
pub fn compress_page(model: CameraModel, html: &[u8]) -> Result<Vec<u8>> {
    let payload = gzip::compress(html)?;
    if gzip::decompress(&payload)? != html {
        return Err(Error::RoundTrip(model));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::test_support::{sample_header, scratch_dir};

    #[test]
    fn test_rejects_unknown_name_before_io() {
        let dir = scratch_dir("embed-reject");
        let config = ToolConfig {
            header_path: Some(dir.join("camera_index.h")),
            out_dir: None,
            inplace: true,
        };

        // neither file exists, so any I/O would surface as a different error
        let err = embed("ov7670", &dir.join("index.html"), &config).unwrap_err();
        assert!(matches!(err, Error::Header(camidx_header::Error::UnknownModel(_))));

        let err = embed("OV2640", &dir.join("index.html"), &config).unwrap_err();
        assert!(matches!(err, Error::Header(camidx_header::Error::UnknownModel(_))));
    }

    #[test]
    fn test_missing_html() {
        let dir = scratch_dir("embed-nohtml");
        let html = dir.join("index_ov2640.html");
        let err = embed("ov2640", &html, &ToolConfig::default()).unwrap_err();
        assert!(matches!(err, Error::HtmlNotFound(_)));
    }

    #[test]
    fn test_render_to_stdout_block() {
        let dir = scratch_dir("embed-stdout");
        let html = dir.join("index_ov3660.html");
        fs::write(&html, "<html>B</html>").unwrap();

        let outcome = embed("ov3660", &html, &ToolConfig::default()).unwrap();

        let EmbedOutcome::Block { model, text } = outcome else {
            panic!("expected rendered block");
        };
        assert_eq!(model, CameraModel::Ov3660);
        assert!(text.starts_with("//File: index_ov3660.html.gz, Size: "));

        let doc = HeaderDocument::parse(text.as_bytes());
        let block = doc.block(CameraModel::Ov3660).unwrap();
        assert!(block.is_length_consistent());
        assert_eq!(block.decompress().unwrap(), b"<html>B</html>");
    }

    #[test]
    fn test_edit_and_patch_in_place() {
        let dir = scratch_dir("embed-inplace");
        let header = dir.join("camera_index.h");
        fs::write(
            &header,
            sample_header(&[
                (CameraModel::Ov2640, "<html>A</html>"),
                (CameraModel::Ov5640, "<html>C</html>"),
            ]),
        )
        .unwrap();

        let config = ToolConfig::with_header(&header);
        extract(&config).unwrap();
        let page = dir.join("index_ov2640.html");
        fs::write(&page, "<html>B</html>").unwrap();

        let config = ToolConfig {
            inplace: true,
            ..config
        };
        let outcome = embed("ov2640", &page, &config).unwrap();
        assert!(matches!(outcome, EmbedOutcome::Patched { model: CameraModel::Ov2640, .. }));

        fs::remove_file(&page).unwrap();
        extract(&config).unwrap();
        assert_eq!(fs::read_to_string(&page).unwrap(), "<html>B</html>");
        assert_eq!(fs::read_to_string(dir.join("index_ov5640.html")).unwrap(), "<html>C</html>");
    }

    #[test]
    fn test_unedited_round_trip_keeps_content() {
        let dir = scratch_dir("embed-roundtrip");
        let header = dir.join("camera_index.h");
        let original = sample_header(&[
            (CameraModel::Ov2640, "<html>A</html>"),
            (CameraModel::Ov3660, "<html>B</html>"),
        ]);
        fs::write(&header, &original).unwrap();

        let config = ToolConfig {
            header_path: Some(header.clone()),
            out_dir: None,
            inplace: true,
        };
        for page in extract(&config).unwrap().written {
            embed(page.model.as_str(), &page.path, &config).unwrap();
        }

        let data = fs::read(&header).unwrap();
        let doc = HeaderDocument::parse(&data);
        for (model, html) in [
            (CameraModel::Ov2640, b"<html>A</html>"),
            (CameraModel::Ov3660, b"<html>B</html>"),
        ] {
            assert_eq!(doc.block(model).unwrap().decompress().unwrap(), html);
        }
    }

    #[test]
    fn test_missing_target_leaves_header_untouched() {
        let dir = scratch_dir("embed-notarget");
        let header = dir.join("camera_index.h");
        let original = sample_header(&[(CameraModel::Ov2640, "<html>A</html>")]);
        fs::write(&header, &original).unwrap();
        let html = dir.join("page.html");
        fs::write(&html, "<html>new</html>").unwrap();

        let config = ToolConfig {
            header_path: Some(header.clone()),
            out_dir: None,
            inplace: true,
        };
        let err = embed("ov5640", &html, &config).unwrap_err();

        assert!(matches!(err, Error::Header(camidx_header::Error::BlockNotFound("ov5640"))));
        assert_eq!(fs::read_to_string(&header).unwrap(), original);
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 2);
    }

    #[test]
    fn test_malformed_target_is_reported() {
        let dir = scratch_dir("embed-malformed");
        let header = dir.join("camera_index.h");
        let original = "//File: index_ov2640.html.gz, Size: 1\n\
                        #define index_ov2640_html_gz_len 1\n\
                        const unsigned char index_ov2640_html_gz[] = {\n  0x1F,\n";
        fs::write(&header, original).unwrap();
        let html = dir.join("page.html");
        fs::write(&html, "<html>new</html>").unwrap();

        let config = ToolConfig {
            header_path: Some(header.clone()),
            out_dir: None,
            inplace: true,
        };
        let err = embed("ov2640", &html, &config).unwrap_err();

        assert!(matches!(err, Error::Header(camidx_header::Error::Malformed { .. })));
        assert_eq!(fs::read_to_string(&header).unwrap(), original);
    }

    #[test]
    fn test_compress_page_round_trips() {
        let html = "<!doctype html><title>cam</title>".repeat(50);
        let payload = compress_page(CameraModel::Ov5640, html.as_bytes()).unwrap();
        assert_eq!(gzip::decompress(&payload).unwrap(), html.as_bytes());
    }
}
