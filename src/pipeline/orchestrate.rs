//! Concurrent per-page rendering with bounded fan-out, per-page timeouts,
//! and source-order results.
//!
//! ## Concurrency model
//!
//! One render future per page index, driven through
//! `futures::stream::buffer_unordered` so at most `concurrency` renders are
//! in flight at once. Each render holds its own staging copy of the document
//! and its own output buffer — there is no shared mutable state between
//! pages, so no locking.
//!
//! ## Timeouts and fail-fast
//!
//! Every render is wrapped in an individual `tokio::time::timeout`; a page
//! exceeding it fails only that page. The first page failure of any kind
//! aborts the whole conversion: the `?` below drops the stream, which drops
//! all in-flight futures and never polls the pending ones. Partial results
//! are not independently useful to callers, so nothing is salvaged; retries
//! are a caller-level concern.
//!
//! ## Ordering
//!
//! `buffer_unordered` yields results in completion order. Every result
//! carries its page index, and the final vector is sorted by that index, so
//! callers always see ascending document order.

use crate::error::Pdf2ImgError;
use crate::output::RenderedPage;
use crate::pipeline::options::EncodingSpec;
use crate::pipeline::range::PageRange;
use crate::pipeline::render::PageRenderer;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Render every page in `range` concurrently and return them in ascending
/// page order.
///
/// # Errors
/// The first failing page aborts the conversion:
/// * [`Pdf2ImgError::RenderTimeout`] when a page exceeds `page_timeout`.
/// * [`Pdf2ImgError::RenderFailed`] for backend faults.
pub async fn render_range(
    renderer: &Arc<dyn PageRenderer>,
    document: &[u8],
    range: PageRange,
    spec: &EncodingSpec,
    concurrency: usize,
    page_timeout: Duration,
) -> Result<Vec<RenderedPage>, Pdf2ImgError> {
    debug!(
        start = range.start,
        end = range.end,
        concurrency,
        timeout_secs = page_timeout.as_secs(),
        "dispatching page renders"
    );

    let mut results = stream::iter(range.indices().map(|index| {
        let renderer = Arc::clone(renderer);
        async move {
            match tokio::time::timeout(page_timeout, renderer.render_page(document, index, spec))
                .await
            {
                Ok(Ok(bytes)) if bytes.is_empty() => Err(Pdf2ImgError::RenderFailed {
                    page: index,
                    detail: "renderer produced an empty buffer".into(),
                }),
                Ok(Ok(bytes)) => Ok(RenderedPage { index, bytes }),
                Ok(Err(e)) => Err(e),
                Err(_) => {
                    warn!(page = index, "page render timed out");
                    Err(Pdf2ImgError::RenderTimeout {
                        page: index,
                        secs: page_timeout.as_secs(),
                    })
                }
            }
        }
    }))
    .buffer_unordered(concurrency.max(1));

    let mut pages = Vec::with_capacity(range.len());
    while let Some(result) = results.next().await {
        // Fail-fast: dropping `results` here cancels all in-flight renders.
        pages.push(result?);
    }

    pages.sort_unstable_by_key(|p| p.index);
    debug!(rendered = pages.len(), "all pages rendered");
    Ok(pages)
}
