//! Error types for the pdf2img library.
//!
//! One enum covers the whole pipeline, but the variants fall into two
//! families that callers (typically an HTTP gateway) treat differently:
//!
//! * **Client faults** — the request itself is wrong: a bad page range, a
//!   document that is not a PDF, an invalid configuration. The caller can
//!   fix these and retry. [`Pdf2ImgError::is_client_error`] returns `true`.
//!
//! * **Backend faults** — the rasteriser timed out or failed, assembly hit
//!   an impossible state, or an internal invariant broke. The caller cannot
//!   generally remedy these; surface them as a generic server error without
//!   internal diagnostic detail.
//!
//! No partial results are ever returned alongside an error: the first page
//! failure aborts the whole conversion (see [`crate::pipeline::orchestrate`]).

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2img library.
#[derive(Debug, Error)]
pub enum Pdf2ImgError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The buffer does not contain a structurally plausible PDF.
    #[error("Not a valid PDF document: {detail}")]
    InvalidDocument { detail: String },

    /// The document could not be read or reports zero pages.
    #[error("Failed to read PDF document: {detail}")]
    DocumentRead { detail: String },

    /// Requested page range is empty after clamping against the page count.
    #[error("Invalid page range: start page ({start}) cannot be greater than end page ({end})")]
    InvalidRange { start: usize, end: usize },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// A single page render exceeded its timeout. Fails the whole conversion.
    #[error("Rendering page {page} timed out after {secs}s")]
    RenderTimeout { page: usize, secs: u64 },

    /// The rendering backend reported a fault for a specific page.
    #[error("Rendering failed for page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    // ── Assembly errors ───────────────────────────────────────────────────
    /// Output assembly hit an impossible state (e.g. an empty page list).
    /// Always indicates an upstream logic fault, never user input.
    #[error("Output assembly failed: {detail}")]
    Assembly { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write the output file (CLI / `convert_to_file`).
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2ImgError {
    /// Whether the error is attributable to the caller's input.
    ///
    /// An HTTP gateway maps these to 4xx responses with the descriptive
    /// message, and everything else to a generic 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Pdf2ImgError::InvalidDocument { .. }
                | Pdf2ImgError::DocumentRead { .. }
                | Pdf2ImgError::InvalidRange { .. }
                | Pdf2ImgError::FileNotFound { .. }
                | Pdf2ImgError::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_range_display() {
        let e = Pdf2ImgError::InvalidRange { start: 5, end: 2 };
        let msg = e.to_string();
        assert!(msg.contains("start page (5)"), "got: {msg}");
        assert!(msg.contains("end page (2)"), "got: {msg}");
    }

    #[test]
    fn render_timeout_display() {
        let e = Pdf2ImgError::RenderTimeout { page: 3, secs: 60 };
        assert!(e.to_string().contains("page 3"));
        assert!(e.to_string().contains("60s"));
    }

    #[test]
    fn client_error_classification() {
        assert!(Pdf2ImgError::InvalidRange { start: 5, end: 2 }.is_client_error());
        assert!(Pdf2ImgError::InvalidDocument {
            detail: "missing header".into()
        }
        .is_client_error());
        assert!(Pdf2ImgError::DocumentRead {
            detail: "no pages".into()
        }
        .is_client_error());
        assert!(!Pdf2ImgError::RenderTimeout { page: 1, secs: 60 }.is_client_error());
        assert!(!Pdf2ImgError::RenderFailed {
            page: 1,
            detail: "corrupt page".into()
        }
        .is_client_error());
        assert!(!Pdf2ImgError::Assembly {
            detail: "no pages".into()
        }
        .is_client_error());
    }
}
