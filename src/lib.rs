//! # pdf2img
//!
//! Convert a page range of a PDF document into raster images: one
//! vertically-stacked composite image, or a zip archive with one image per
//! page.
//!
//! ## Why this crate?
//!
//! Serving "give me pages 3–7 of this PDF as images" over HTTP sounds
//! trivial until documents get large, single pages hang the rasteriser, and
//! temp files pile up under load. This crate owns exactly that pipeline:
//! range resolution, format resolution, bounded-concurrency rendering with
//! per-page timeouts and guaranteed staging cleanup, and output assembly.
//! Upload parsing, auth, and storage stay in whatever gateway calls it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Validate  %PDF- header + %%EOF trailer plausibility checks
//!  ├─ 2. Info      page count query (pdfium, spawn_blocking)
//!  ├─ 3. Range     clamp [start,end] against the page count
//!  ├─ 4. Spec      format token → container / colour mode / quality
//!  ├─ 5. Render    concurrent per-page rasterisation, 60s timeout each,
//!  │               fail-fast, per-page temp staging cleaned on every path
//!  └─ 6. Assemble  vertical composite (single-file) or zip archive
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2img::{convert, ConversionConfig, OutputFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = std::fs::read("document.pdf")?;
//!     let config = ConversionConfig::builder()
//!         .start_page(2)
//!         .end_page(4)
//!         .single_file(false) // zip archive, one image per page
//!         .output_format(OutputFormat::Jpeg)
//!         .build()?;
//!     let result = convert(&bytes, &config).await?;
//!     std::fs::write("pages.zip", &result.bytes)?;
//!     eprintln!("{} pages in {}ms", result.stats.rendered_pages,
//!         result.stats.total_duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Output formats
//!
//! | Token | Container | Colour handling |
//! |-------|-----------|-----------------|
//! | `tifflzw` | TIFF | full colour, LZW compression |
//! | `jpeg`    | JPEG | full colour, lossy (`quality` applies) |
//! | `pnggray` | PNG  | 8-bit grayscale |
//! | `png256`  | PNG  | ≤256-colour palette |
//! | `png16`   | PNG  | ≤16-colour palette |
//! | `png16m`  | PNG  | full colour (default) |
//!
//! Unknown tokens fall back to `png16m`; strict validation belongs to the
//! request layer in front of this library.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2img` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2img = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_file, convert_to_file, convert_with_renderer, inspect};
pub use error::Pdf2ImgError;
pub use output::{Conversion, ConversionStats, DocumentInfo, RenderedPage};
pub use pipeline::options::{ColorMode, Container, EncodingSpec, OutputFormat};
pub use pipeline::render::{PageRenderer, PdfiumRenderer};
