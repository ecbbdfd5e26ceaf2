//! CLI binary for pdf2img.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, runs the conversion, and writes the result to disk.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2img::{convert_file, inspect, ConversionConfig, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pdf2img",
    version,
    about = "Convert PDF page ranges to raster images",
    long_about = "Convert a page range of a PDF into a single stacked image \
                  or a zip archive with one image per page."
)]
struct Cli {
    /// Path to the input PDF.
    input: PathBuf,

    /// Output file path. Defaults to the input name with an extension
    /// matching the output (e.g. document.png, document.zip).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// First page to convert (0-based).
    #[arg(long, default_value_t = 0)]
    start_page: usize,

    /// Last page to convert (0-based, inclusive; 0 = through the last page).
    #[arg(long, default_value_t = 0)]
    end_page: usize,

    /// Package pages into a zip archive instead of one stacked image.
    #[arg(long)]
    zip: bool,

    /// Output format token: tifflzw, jpeg, pnggray, png256, png16, png16m.
    #[arg(short, long, default_value = "png16m")]
    format: String,

    /// Rendering resolution in DPI (72–600).
    #[arg(long, default_value_t = 150)]
    dpi: u32,

    /// JPEG quality (1–100); ignored for other formats.
    #[arg(short, long, default_value_t = 90)]
    quality: u8,

    /// Background colour as #RRGGBB.
    #[arg(short, long, default_value = "#FFFFFF")]
    background: String,

    /// Maximum pages rendered concurrently.
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Per-page render timeout in seconds.
    #[arg(long, default_value_t = 60)]
    page_timeout: u64,

    /// Print the document's page count and exit without converting.
    #[arg(long)]
    info: bool,

    /// Suppress the summary line.
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.info {
        let bytes = tokio::fs::read(&cli.input)
            .await
            .with_context(|| format!("Failed to read {}", cli.input.display()))?;
        let info = inspect(&bytes).await?;
        println!("{} pages, {} bytes", info.page_count, info.size_bytes);
        return Ok(());
    }

    let config = build_config(&cli)?;
    let output_path = cli.output.clone().unwrap_or_else(|| default_output(&cli));

    let result = convert_file(&cli.input, &config)
        .await
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    tokio::fs::write(&output_path, &result.bytes)
        .await
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if !cli.quiet {
        eprintln!(
            "Wrote {} ({}, {} pages, {}ms)",
            output_path.display(),
            result.mime_type,
            result.stats.rendered_pages,
            result.stats.total_duration_ms
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    ConversionConfig::builder()
        .start_page(cli.start_page)
        .end_page(cli.end_page)
        .single_file(!cli.zip)
        .output_format_token(&cli.format)
        .dpi(cli.dpi)
        .quality(cli.quality)
        .background_hex(&cli.background)
        .context("Invalid background colour")?
        .concurrency(cli.concurrency)
        .page_timeout_secs(cli.page_timeout)
        .build()
        .context("Invalid configuration")
}

/// Derive an output path from the input name and requested output mode.
fn default_output(cli: &Cli) -> PathBuf {
    let ext = if cli.zip {
        "zip"
    } else {
        let spec = pdf2img::EncodingSpec::resolve(
            OutputFormat::from_token(&cli.format),
            cli.quality,
            cli.dpi,
            [255, 255, 255],
        );
        spec.container.extension()
    };
    cli.input.with_extension(ext)
}
