//! Top-level conversion entry points.
//!
//! [`convert`] is the primary API: PDF bytes in, a single composite image or
//! a zip archive out. [`convert_with_renderer`] exposes the rendering seam
//! for tests and alternative backends; [`convert_file`] /
//! [`convert_to_file`] are path-based conveniences used by the CLI;
//! [`inspect`] answers the page-count query without converting anything.
//!
//! Resolution errors (bad range, unreadable document) are detected before
//! any rendering begins, so a rejected request never does partial work.

use crate::config::ConversionConfig;
use crate::error::Pdf2ImgError;
use crate::output::{Conversion, ConversionStats, DocumentInfo};
use crate::pipeline::options::EncodingSpec;
use crate::pipeline::render::{PageRenderer, PdfiumRenderer};
use crate::pipeline::{assemble, orchestrate, range, render, validate};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Convert a page range of a PDF document to images.
///
/// Uses the default pdfium-backed renderer. Returns either one
/// vertically-stacked composite image (`config.single_file = true`) or a zip
/// archive with one image per page; `Conversion::mime_type` tells which.
///
/// # Errors
/// * Client faults: [`Pdf2ImgError::InvalidDocument`],
///   [`Pdf2ImgError::DocumentRead`], [`Pdf2ImgError::InvalidRange`].
/// * Backend faults: [`Pdf2ImgError::RenderTimeout`],
///   [`Pdf2ImgError::RenderFailed`], [`Pdf2ImgError::Assembly`].
pub async fn convert(
    document: &[u8],
    config: &ConversionConfig,
) -> Result<Conversion, Pdf2ImgError> {
    let renderer: Arc<dyn PageRenderer> = Arc::new(PdfiumRenderer);
    convert_with_renderer(document, config, &renderer).await
}

/// [`convert`] with an injected rendering backend.
///
/// The orchestration logic is backend-agnostic; anything implementing
/// [`PageRenderer`] works — the in-process pdfium binding, a subprocess
/// wrapper, or a test fake.
pub async fn convert_with_renderer(
    document: &[u8],
    config: &ConversionConfig,
    renderer: &Arc<dyn PageRenderer>,
) -> Result<Conversion, Pdf2ImgError> {
    let total_start = Instant::now();

    validate::validate_pdf(document)?;

    let doc_info = render::document_info(document).await?;
    info!(
        pages = doc_info.page_count,
        size = doc_info.size_bytes,
        "processing PDF"
    );

    let page_range =
        range::resolve_page_range(config.start_page, config.end_page, doc_info.page_count)?;
    let spec = EncodingSpec::resolve(
        config.output_format,
        config.quality,
        config.dpi,
        config.background_color,
    );
    debug!(?spec, ?page_range, single_file = config.single_file, "resolved conversion plan");

    let render_start = Instant::now();
    let pages = orchestrate::render_range(
        renderer,
        document,
        page_range,
        &spec,
        config.concurrency,
        Duration::from_secs(config.page_timeout_secs),
    )
    .await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    let assembled = assemble::assemble(&pages, &spec, config.single_file)?;

    let stats = ConversionStats {
        total_pages: doc_info.page_count,
        rendered_pages: pages.len(),
        render_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        rendered = stats.rendered_pages,
        total_ms = stats.total_duration_ms,
        mime = assembled.mime_type,
        "conversion complete"
    );

    Ok(Conversion {
        bytes: assembled.bytes,
        mime_type: assembled.mime_type,
        stats,
    })
}

/// Convert a PDF file on disk.
pub async fn convert_file(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<Conversion, Pdf2ImgError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|_| Pdf2ImgError::FileNotFound {
            path: path.to_path_buf(),
        })?;
    convert(&bytes, config).await
}

/// Convert a PDF file and write the output directly to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2ImgError> {
    let conversion = convert_file(input_path, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Pdf2ImgError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("tmp");
    tokio::fs::write(&tmp_path, &conversion.bytes)
        .await
        .map_err(|e| Pdf2ImgError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Pdf2ImgError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(conversion.stats)
}

/// Query a document's page count and size without converting anything.
pub async fn inspect(document: &[u8]) -> Result<DocumentInfo, Pdf2ImgError> {
    validate::validate_pdf(document)?;
    render::document_info(document).await
}

#[cfg(test)]
mod tests {
    use super::*;

    // Pipeline behaviour behind the validation gate is covered by the unit
    // tests in `pipeline::*` (with fake renderers) and by the pdfium-gated
    // integration tests in `tests/e2e.rs`. These cover the synchronous
    // rejections that must happen before any rendering is attempted.

    #[tokio::test]
    async fn rejects_non_pdf_before_rendering() {
        let config = ConversionConfig::default();
        let err = convert(b"\x89PNG not a pdf at all, padded to size....", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2ImgError::InvalidDocument { .. }));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn rejects_empty_buffer() {
        let err = convert(&[], &ConversionConfig::default()).await.unwrap_err();
        assert!(matches!(err, Pdf2ImgError::InvalidDocument { .. }));
    }

    #[tokio::test]
    async fn missing_input_file_is_reported() {
        let err = convert_file("/definitely/not/here.pdf", &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2ImgError::FileNotFound { .. }));
    }
}
