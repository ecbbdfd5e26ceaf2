//! Structural PDF validation: reject obviously-broken uploads before the
//! expensive rendering path.
//!
//! This is a cheap plausibility check, not a parse: a correct `%PDF-` header,
//! a minimum viable size, and an `%%EOF` trailer marker somewhere in a
//! bounded tail window. pdfium performs the real parse later and reports its
//! own errors; the point here is to turn the common "someone uploaded a JPEG"
//! case into a clear client error instead of a backend fault.

use crate::error::Pdf2ImgError;
use tracing::debug;

/// Smallest buffer that could plausibly hold a header plus an EOF marker.
const MIN_PDF_SIZE: usize = 32;

/// How far back from the end to look for `%%EOF`. Some producers append
/// whitespace or metadata after the marker, so scanning only the last few
/// bytes produces false rejections.
const EOF_TAIL_WINDOW: usize = 1024;

/// Validate that a buffer is structurally plausible as a PDF document.
///
/// # Errors
/// [`Pdf2ImgError::InvalidDocument`] describing which check failed: empty
/// buffer, missing `%PDF-` header, truncated file, or missing `%%EOF`.
pub fn validate_pdf(buffer: &[u8]) -> Result<(), Pdf2ImgError> {
    if buffer.is_empty() {
        return Err(Pdf2ImgError::InvalidDocument {
            detail: "empty buffer".into(),
        });
    }

    if buffer.len() < MIN_PDF_SIZE {
        return Err(Pdf2ImgError::InvalidDocument {
            detail: format!("file too small to be a PDF ({} bytes)", buffer.len()),
        });
    }

    if !buffer.starts_with(b"%PDF-") {
        return Err(Pdf2ImgError::InvalidDocument {
            detail: "missing %PDF- header".into(),
        });
    }

    let tail_start = buffer.len().saturating_sub(EOF_TAIL_WINDOW);
    let tail = &buffer[tail_start..];
    if !contains_eof_marker(tail) {
        return Err(Pdf2ImgError::InvalidDocument {
            detail: "missing %%EOF trailer marker".into(),
        });
    }

    debug!(size = buffer.len(), "PDF structural validation passed");
    Ok(())
}

fn contains_eof_marker(tail: &[u8]) -> bool {
    tail.windows(5).any(|w| w == b"%%EOF")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal, structurally plausible PDF buffer for validation tests.
    fn minimal_pdf() -> Vec<u8> {
        let mut buf = b"%PDF-1.4\n".to_vec();
        buf.extend_from_slice(&[b' '; 64]);
        buf.extend_from_slice(b"\n%%EOF\n");
        buf
    }

    #[test]
    fn accepts_minimal_pdf() {
        assert!(validate_pdf(&minimal_pdf()).is_ok());
    }

    #[test]
    fn rejects_empty_buffer() {
        let err = validate_pdf(&[]).unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert!(err.is_client_error());
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut buf = b"\x89PNG\r\n".to_vec();
        buf.extend_from_slice(&[0; 64]);
        let err = validate_pdf(&buf).unwrap_err();
        assert!(err.to_string().contains("%PDF-"), "got: {err}");
    }

    #[test]
    fn rejects_truncated_file() {
        let err = validate_pdf(b"%PDF-1.4").unwrap_err();
        assert!(err.to_string().contains("too small"), "got: {err}");
    }

    #[test]
    fn rejects_missing_eof() {
        let mut buf = b"%PDF-1.4\n".to_vec();
        buf.extend_from_slice(&[b'x'; 2048]);
        let err = validate_pdf(&buf).unwrap_err();
        assert!(err.to_string().contains("%%EOF"), "got: {err}");
    }

    #[test]
    fn eof_found_within_tail_window_only() {
        // %%EOF buried more than 1 KiB from the end is not accepted
        let mut buf = b"%PDF-1.4\n%%EOF".to_vec();
        buf.extend_from_slice(&[b'x'; 4096]);
        assert!(validate_pdf(&buf).is_err());

        // but trailing whitespace after the marker is fine
        let mut buf = b"%PDF-1.4\n".to_vec();
        buf.extend_from_slice(&[b'x'; 256]);
        buf.extend_from_slice(b"%%EOF\n\n   \n");
        assert!(validate_pdf(&buf).is_ok());
    }
}
