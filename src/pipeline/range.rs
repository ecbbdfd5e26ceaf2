//! Page-range resolution: clamp a requested `[start, end]` interval against
//! the document's actual page count.
//!
//! Pure arithmetic, no I/O. The resolver is deliberately forgiving about
//! out-of-bounds values (they clamp) but strict about inverted ranges: once
//! clamping produces `start > end` the caller asked for something that does
//! not exist, and the conversion aborts before any rendering starts.

use crate::error::Pdf2ImgError;
use tracing::debug;

/// An inclusive, 0-based page interval, resolved against a page count.
///
/// Created once per conversion and immutable afterwards. Both bounds are
/// guaranteed to lie in `[0, total_pages - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

impl PageRange {
    /// Number of pages in the range.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Iterate the page indices in ascending document order.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }
}

/// Resolve the effective page range for a conversion.
///
/// * `start_page` — first page, 0-based; clamped into the document.
/// * `end_page` — last page, 0-based inclusive; `0` is a sentinel meaning
///   "through the last page".
/// * `total_pages` — the document's reported page count; must be ≥ 1.
///
/// # Errors
/// * [`Pdf2ImgError::DocumentRead`] when `total_pages` is 0.
/// * [`Pdf2ImgError::InvalidRange`] when the clamped start exceeds the
///   clamped end (e.g. `start_page=5, end_page=2`).
pub fn resolve_page_range(
    start_page: usize,
    end_page: usize,
    total_pages: usize,
) -> Result<PageRange, Pdf2ImgError> {
    if total_pages == 0 {
        return Err(Pdf2ImgError::DocumentRead {
            detail: "document contains no pages".into(),
        });
    }

    let start = start_page.min(total_pages - 1);
    let end = if end_page == 0 {
        total_pages - 1
    } else {
        end_page.min(total_pages - 1)
    };

    if start > end {
        return Err(Pdf2ImgError::InvalidRange { start, end });
    }

    debug!(start, end, total_pages, "resolved page range");
    Ok(PageRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_covers_whole_document() {
        for total in [1, 2, 10, 500] {
            let r = resolve_page_range(0, 0, total).unwrap();
            assert_eq!(r, PageRange { start: 0, end: total - 1 });
            assert_eq!(r.len(), total);
        }
    }

    #[test]
    fn single_page_document_default() {
        let r = resolve_page_range(0, 0, 1).unwrap();
        assert_eq!(r, PageRange { start: 0, end: 0 });
        assert_eq!(r.indices().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn explicit_range_within_bounds() {
        let r = resolve_page_range(2, 4, 10).unwrap();
        assert_eq!(r, PageRange { start: 2, end: 4 });
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn bounds_clamp_to_last_page() {
        // end beyond the document clamps down
        let r = resolve_page_range(2, 99, 10).unwrap();
        assert_eq!(r, PageRange { start: 2, end: 9 });

        // start beyond the document clamps too; with the default end this is
        // a one-page range on the last page
        let r = resolve_page_range(99, 0, 10).unwrap();
        assert_eq!(r, PageRange { start: 9, end: 9 });
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = resolve_page_range(5, 2, 10).unwrap_err();
        assert!(matches!(err, Pdf2ImgError::InvalidRange { start: 5, end: 2 }));
    }

    #[test]
    fn clamped_start_above_explicit_end_is_rejected() {
        // start clamps to 9, end stays 3 → inverted after clamping
        let err = resolve_page_range(50, 3, 10).unwrap_err();
        assert!(matches!(err, Pdf2ImgError::InvalidRange { start: 9, end: 3 }));
    }

    #[test]
    fn zero_pages_is_a_document_error() {
        let err = resolve_page_range(0, 0, 0).unwrap_err();
        assert!(matches!(err, Pdf2ImgError::DocumentRead { .. }));
    }
}
