//! Output types: rendered pages, conversion results, and per-run statistics.

use serde::{Deserialize, Serialize};

/// One rendered page: encoded image bytes tagged with the page's original
/// document index.
///
/// The index is what preserves source order — pages render concurrently and
/// complete in arbitrary order, so assembly sorts by `index`, never by
/// completion sequence.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// 0-based page index within the source document.
    pub index: usize,
    /// Encoded image bytes in the conversion's output format.
    pub bytes: Vec<u8>,
}

/// Basic facts about a PDF document, queried once per conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Number of pages the document reports. Always ≥ 1 when returned
    /// successfully; a zero-page document is a [`crate::Pdf2ImgError::DocumentRead`] error.
    pub page_count: usize,
    /// Size of the source buffer in bytes.
    pub size_bytes: usize,
}

/// Statistics for a completed conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages actually rendered (the resolved range length).
    pub rendered_pages: usize,
    /// Wall-clock time spent in per-page rendering.
    pub render_duration_ms: u64,
    /// End-to-end wall-clock time including assembly.
    pub total_duration_ms: u64,
}

/// The terminal artifact of a conversion.
///
/// Either a single composite image or a zip archive, depending on the
/// request's single-file flag; `mime_type` tells the caller which.
#[derive(Debug)]
pub struct Conversion {
    /// Encoded output: one image, or a zip archive of per-page images.
    pub bytes: Vec<u8>,
    /// `image/png`, `image/jpeg`, `image/tiff`, or `application/zip`.
    pub mime_type: &'static str,
    pub stats: ConversionStats,
}
