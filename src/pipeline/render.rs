//! Page rasterisation: the [`PageRenderer`] capability and its pdfium-backed
//! default implementation.
//!
//! ## Why a trait?
//!
//! The orchestrator only needs "document bytes + page index + encoding spec →
//! image bytes". Modelling that as a trait keeps the fan-out, timeout, and
//! ordering logic reusable against any concrete rasteriser — the in-process
//! pdfium binding shipped here, a subprocess, or a remote service — and lets
//! tests substitute a deterministic fake.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto the blocking thread
//! pool, preventing the Tokio worker threads from stalling during CPU-heavy
//! rendering.
//!
//! ## Staging discipline
//!
//! pdfium opens documents by file path, so every render stages its own copy
//! of the document into a uniquely-named temp file. The `NamedTempFile`
//! guard deletes the staging copy on every exit path of the blocking closure,
//! including panics unwound through it. Renders never share scratch space,
//! so no locking is needed.

use crate::error::Pdf2ImgError;
use crate::output::DocumentInfo;
use crate::pipeline::encode;
use crate::pipeline::options::EncodingSpec;
use async_trait::async_trait;
use pdfium_render::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::debug;

/// Prefix for staging temp files, so leftovers are attributable (and so
/// tests can scan for them).
pub const STAGING_PREFIX: &str = "pdf2img-";

/// A rendering backend capable of rasterising one page of a PDF document.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Render page `page_index` (0-based) of `document` and encode it per
    /// `spec`, returning the encoded image bytes.
    ///
    /// # Errors
    /// [`Pdf2ImgError::RenderFailed`] for backend faults (corrupt page,
    /// unsupported construct, empty output). Timeouts are enforced by the
    /// orchestrator, not here.
    async fn render_page(
        &self,
        document: &[u8],
        page_index: usize,
        spec: &EncodingSpec,
    ) -> Result<Vec<u8>, Pdf2ImgError>;
}

/// The default renderer, backed by the pdfium library.
#[derive(Debug, Default)]
pub struct PdfiumRenderer;

#[async_trait]
impl PageRenderer for PdfiumRenderer {
    async fn render_page(
        &self,
        document: &[u8],
        page_index: usize,
        spec: &EncodingSpec,
    ) -> Result<Vec<u8>, Pdf2ImgError> {
        let doc = document.to_vec();
        let spec = spec.clone();
        tokio::task::spawn_blocking(move || render_page_blocking(&doc, page_index, &spec))
            .await
            .map_err(|e| Pdf2ImgError::Internal(format!("render task panicked: {e}")))?
    }
}

/// Blocking implementation of a single page render.
fn render_page_blocking(
    document: &[u8],
    page_index: usize,
    spec: &EncodingSpec,
) -> Result<Vec<u8>, Pdf2ImgError> {
    // Dropped on every exit path below, deleting the staging copy.
    let staging = stage_document(document)?;

    let pdfium = Pdfium::default();
    let doc = pdfium
        .load_pdf_from_file(staging.path(), None)
        .map_err(|e| Pdf2ImgError::DocumentRead {
            detail: format!("{e:?}"),
        })?;

    let pages = doc.pages();
    let page = pages
        .get(page_index as u16)
        .map_err(|e| Pdf2ImgError::RenderFailed {
            page: page_index,
            detail: format!("{e:?}"),
        })?;

    // Points are 1/72 inch; scale to the requested DPI.
    let width_px = (page.width().value * spec.dpi as f32 / 72.0).round().max(1.0) as i32;
    let height_px = (page.height().value * spec.dpi as f32 / 72.0).round().max(1.0) as i32;

    let render_config = PdfRenderConfig::new()
        .set_target_width(width_px)
        .set_maximum_height(height_px);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| Pdf2ImgError::RenderFailed {
            page: page_index,
            detail: format!("{e:?}"),
        })?;

    let image = bitmap.as_image();
    debug!(
        page = page_index,
        width = image.width(),
        height = image.height(),
        "rasterised page"
    );

    let bytes = encode::encode_image(&image, spec).map_err(|e| Pdf2ImgError::RenderFailed {
        page: page_index,
        detail: e.to_string(),
    })?;

    if bytes.is_empty() {
        return Err(Pdf2ImgError::RenderFailed {
            page: page_index,
            detail: "encoding produced an empty buffer".into(),
        });
    }

    Ok(bytes)
}

/// Query basic document facts (page count) without rendering anything.
///
/// This is the one-per-conversion "document info" query feeding page-range
/// resolution.
///
/// # Errors
/// [`Pdf2ImgError::DocumentRead`] when pdfium cannot parse the buffer or the
/// document reports zero pages.
pub async fn document_info(document: &[u8]) -> Result<DocumentInfo, Pdf2ImgError> {
    let doc = document.to_vec();
    tokio::task::spawn_blocking(move || document_info_blocking(&doc))
        .await
        .map_err(|e| Pdf2ImgError::Internal(format!("info task panicked: {e}")))?
}

fn document_info_blocking(document: &[u8]) -> Result<DocumentInfo, Pdf2ImgError> {
    let staging = stage_document(document)?;

    let pdfium = Pdfium::default();
    let doc = pdfium
        .load_pdf_from_file(staging.path(), None)
        .map_err(|e| Pdf2ImgError::DocumentRead {
            detail: format!("{e:?}"),
        })?;

    let page_count = doc.pages().len() as usize;
    if page_count == 0 {
        return Err(Pdf2ImgError::DocumentRead {
            detail: "document contains no pages".into(),
        });
    }

    debug!(page_count, size = document.len(), "document info");
    Ok(DocumentInfo {
        page_count,
        size_bytes: document.len(),
    })
}

/// Write the document to a uniquely-named temp file for pdfium to open.
fn stage_document(document: &[u8]) -> Result<NamedTempFile, Pdf2ImgError> {
    let mut tmp = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| Pdf2ImgError::Internal(format!("failed to create staging file: {e}")))?;
    tmp.write_all(document)
        .map_err(|e| Pdf2ImgError::Internal(format!("failed to write staging file: {e}")))?;
    debug!(path = %tmp.path().display(), size = document.len(), "staged document");
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_file_is_removed_on_drop() {
        let tmp = stage_document(b"%PDF-1.4 test").unwrap();
        let path = tmp.path().to_path_buf();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(STAGING_PREFIX));
        assert!(name.ends_with(".pdf"));
        drop(tmp);
        assert!(!path.exists(), "staging file must be deleted on drop");
    }
}
