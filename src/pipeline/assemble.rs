//! Output assembly: stack rendered pages into one composite image, or
//! package them into a zip archive.
//!
//! Both paths are pure functions of the rendered page buffers plus the
//! encoding spec — no I/O beyond buffer manipulation. Pages arrive already
//! sorted by the orchestrator; entry naming and composite offsets follow
//! that order.

use crate::error::Pdf2ImgError;
use crate::output::RenderedPage;
use crate::pipeline::encode;
use crate::pipeline::options::EncodingSpec;
use image::{DynamicImage, Rgb, RgbImage};
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Assembled output bytes plus the MIME type describing them.
#[derive(Debug)]
pub struct AssembledOutput {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Assemble rendered pages into the final response body.
///
/// * `single_file = true` — one vertically-stacked image, encoded per the
///   spec's format; MIME type derives from the container.
/// * `single_file = false` — a zip archive with one `page-<n>.<ext>` entry
///   per page, `n` being the 1-based position within the range.
///
/// # Errors
/// [`Pdf2ImgError::Assembly`] when `pages` is empty (an upstream logic fault;
/// the orchestrator never returns an empty success) or when re-encoding the
/// composite fails.
pub fn assemble(
    pages: &[RenderedPage],
    spec: &EncodingSpec,
    single_file: bool,
) -> Result<AssembledOutput, Pdf2ImgError> {
    if pages.is_empty() {
        return Err(Pdf2ImgError::Assembly {
            detail: "no rendered pages to assemble".into(),
        });
    }

    if single_file {
        Ok(AssembledOutput {
            bytes: stack_pages(pages, spec)?,
            mime_type: spec.container.mime_type(),
        })
    } else {
        Ok(AssembledOutput {
            bytes: zip_pages(pages, spec)?,
            mime_type: "application/zip",
        })
    }
}

/// Stack pages vertically: width = max page width, height = sum of heights,
/// each page left-aligned at x=0, background filling any width gap.
fn stack_pages(pages: &[RenderedPage], spec: &EncodingSpec) -> Result<Vec<u8>, Pdf2ImgError> {
    let decoded: Vec<RgbImage> = pages
        .iter()
        .map(|p| {
            image::load_from_memory(&p.bytes)
                .map(|img| img.to_rgb8())
                .map_err(|e| Pdf2ImgError::Assembly {
                    detail: format!("failed to decode rendered page {}: {e}", p.index),
                })
        })
        .collect::<Result<_, _>>()?;

    let width = decoded.iter().map(|i| i.width()).max().unwrap_or(1);
    let height: u32 = decoded.iter().map(|i| i.height()).sum();

    let mut canvas = RgbImage::from_pixel(width, height, Rgb(spec.background));
    let mut y_offset: i64 = 0;
    for page in &decoded {
        image::imageops::replace(&mut canvas, page, 0, y_offset);
        y_offset += page.height() as i64;
    }

    debug!(width, height, pages = pages.len(), "stacked pages");

    encode::encode_image(&DynamicImage::ImageRgb8(canvas), spec).map_err(|e| {
        Pdf2ImgError::Assembly {
            detail: format!("failed to encode composite image: {e}"),
        }
    })
}

/// Package pages into a zip archive at maximum compression, one entry per
/// page named `page-<n>.<ext>` in page order.
fn zip_pages(pages: &[RenderedPage], spec: &EncodingSpec) -> Result<Vec<u8>, Pdf2ImgError> {
    let ext = spec.container.extension();
    let mut buf = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(9));

        for (n, page) in pages.iter().enumerate() {
            let name = format!("page-{}.{}", n + 1, ext);
            zip.start_file(name.as_str(), options)
                .map_err(|e| Pdf2ImgError::Assembly {
                    detail: format!("failed to create zip entry '{name}': {e}"),
                })?;
            zip.write_all(&page.bytes)
                .map_err(|e| Pdf2ImgError::Assembly {
                    detail: format!("failed to write zip entry '{name}': {e}"),
                })?;
        }

        zip.finish().map_err(|e| Pdf2ImgError::Assembly {
            detail: format!("failed to finalise zip archive: {e}"),
        })?;
    }

    debug!(entries = pages.len(), size = buf.len(), "packaged archive");
    Ok(buf)
}
