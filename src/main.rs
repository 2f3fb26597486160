//! Camidx CLI - extract and re-embed the web UI pages in `camera_index.h`.
//!
//! This is the main entry point for the camidx command-line application.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use camidx::prelude::*;

/// Camidx - camera_index.h HTML round-trip tool
#[derive(Parser)]
#[command(name = "camidx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write index_<model>.html for every page embedded in the header
    Extract {
        /// Header file (defaults to camera_index.h next to this executable)
        #[arg(env = camidx::HEADER_ENV)]
        header: Option<PathBuf>,

        /// Directory for the HTML files (defaults to the header's directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Compress an HTML page and print its array block, or patch the header
    Embed {
        /// Camera model: ov2640, ov3660 or ov5640
        name: String,

        /// HTML file to embed
        html: PathBuf,

        /// Header file (defaults to camera_index.h next to this executable)
        #[arg(env = camidx::HEADER_ENV)]
        header: Option<PathBuf>,

        /// Replace the existing block in the header instead of printing it
        #[arg(long)]
        inplace: bool,
    },

    /// List the array blocks found in the header
    List {
        /// Header file (defaults to camera_index.h next to this executable)
        #[arg(env = camidx::HEADER_ENV)]
        header: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Extract { header, out_dir } => {
            let config = ToolConfig {
                header_path: header,
                out_dir,
                inplace: false,
            };
            cmd_extract(&config)?;
        }
        Commands::Embed {
            name,
            html,
            header,
            inplace,
        } => {
            let config = ToolConfig {
                header_path: header,
                out_dir: None,
                inplace,
            };
            cmd_embed(&name, &html, &config)?;
        }
        Commands::List { header } => {
            cmd_list(&ToolConfig {
                header_path: header,
                ..ToolConfig::default()
            })?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn cmd_extract(config: &ToolConfig) -> Result<()> {
    let report = extract(config).context("Failed to extract pages")?;

    for page in &report.written {
        println!("Wrote {} ({} bytes HTML)", page.path.display(), page.html_len);
    }

    if !report.skipped.is_empty() {
        println!("Skipped {} block(s)", report.skipped.len());
    }

    Ok(())
}

fn cmd_embed(name: &str, html: &PathBuf, config: &ToolConfig) -> Result<()> {
    let outcome = embed(name, html, config)
        .with_context(|| format!("Failed to embed {} for {}", html.display(), name))?;

    match outcome {
        EmbedOutcome::Block { text, .. } => println!("{}", text),
        EmbedOutcome::Patched {
            model,
            header,
            compressed_len,
        } => {
            println!("Updated {} with {} ({} gz bytes)", header.display(), model, compressed_len);
        }
    }

    Ok(())
}

fn cmd_list(config: &ToolConfig) -> Result<()> {
    let summary = inspect(config).context("Failed to read header")?;

    for block in &summary.blocks {
        let html = match &block.html {
            Ok(len) => format!("{} bytes HTML", len),
            Err(e) => format!("corrupt: {}", e),
        };
        println!(
            "{:<8} line {:>5}  {:>8} gz bytes  {}{}",
            block.model,
            block.line,
            block.byte_len,
            html,
            if block.is_length_consistent() {
                String::new()
            } else {
                format!(
                    "  (declared {}, marker {})",
                    block.declared_len, block.marker_size
                )
            }
        );
    }

    for issue in &summary.issues {
        println!("malformed {}", issue);
    }
    for name in &summary.unrecognized {
        println!("unrecognized model '{}'", name);
    }

    println!("\nTotal: {} blocks", summary.blocks.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_embed_inplace_after_header() {
        let cli = Cli::try_parse_from([
            "camidx",
            "embed",
            "ov2640",
            "index_ov2640.html",
            "fw/camera_index.h",
            "--inplace",
        ])
        .unwrap();

        let Commands::Embed {
            name,
            html,
            header,
            inplace,
        } = cli.command
        else {
            panic!("expected embed");
        };
        assert_eq!(name, "ov2640");
        assert_eq!(html, PathBuf::from("index_ov2640.html"));
        assert_eq!(header, Some(PathBuf::from("fw/camera_index.h")));
        assert!(inplace);
    }

    #[test]
    fn test_parse_extract_out_dir() {
        let cli =
            Cli::try_parse_from(["camidx", "extract", "camera_index.h", "-o", "pages"]).unwrap();

        let Commands::Extract { header, out_dir } = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(header, Some(PathBuf::from("camera_index.h")));
        assert_eq!(out_dir, Some(PathBuf::from("pages")));
    }

    #[test]
    fn test_header_argument_reads_env() {
        let cmd = Cli::command();
        for name in ["extract", "embed", "list"] {
            let sub = cmd.find_subcommand(name).unwrap();
            let header = sub.get_arguments().find(|a| a.get_id() == "header").unwrap();
            assert_eq!(header.get_env(), Some(std::ffi::OsStr::new(camidx::HEADER_ENV)));
        }
    }

    #[test]
    fn test_embed_requires_html() {
        assert!(Cli::try_parse_from(["camidx", "embed", "ov2640"]).is_err());
    }
}
