//! Image encoding: `DynamicImage` → encoded bytes per an [`EncodingSpec`].
//!
//! Pages come out of the rasteriser with an alpha channel (PDF pages are
//! transparent where nothing is drawn), so every path first flattens onto the
//! spec's background colour. Colour handling then follows the spec:
//! grayscale conversion for `pnggray`, NeuQuant palette reduction for
//! `png256`/`png16`, and full colour otherwise.
//!
//! TIFF goes through the `tiff` crate directly because `image`'s
//! `TiffEncoder` does not expose a compression choice and `tifflzw` promises
//! LZW.

use crate::error::Pdf2ImgError;
use crate::pipeline::options::{ColorMode, Container, EncodingSpec};
use color_quant::NeuQuant;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use thiserror::Error;
use tiff::encoder::{colortype, compression::Lzw, TiffEncoder};
use tracing::debug;

/// Encoding failure, wrapped into a page- or assembly-level error by callers.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("TIFF encoding failed: {0}")]
    Tiff(#[from] tiff::TiffError),
}

impl From<EncodeError> for Pdf2ImgError {
    fn from(e: EncodeError) -> Self {
        Pdf2ImgError::Internal(e.to_string())
    }
}

/// NeuQuant sample factor: 1 = every pixel, 30 = fastest. 10 is the
/// conventional quality/speed balance for document-sized images.
const QUANT_SAMPLE_FACTOR: i32 = 10;

/// Encode a rasterised page (or assembled canvas) per the encoding spec.
pub fn encode_image(img: &DynamicImage, spec: &EncodingSpec) -> Result<Vec<u8>, EncodeError> {
    let flat = flatten_onto_background(img, spec.background);

    let bytes = match (spec.container, spec.color) {
        (Container::Jpeg, _) => encode_jpeg(&flat, spec.quality.unwrap_or(90))?,
        (Container::Tiff, _) => encode_tiff_lzw(&flat)?,
        (Container::Png, ColorMode::Grayscale) => {
            let gray = DynamicImage::ImageRgb8(flat).into_luma8();
            let mut buf = Vec::new();
            DynamicImage::ImageLuma8(gray).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
            buf
        }
        (Container::Png, ColorMode::Indexed { max_colors }) => {
            let quantized = quantize(&flat, max_colors);
            let mut buf = Vec::new();
            DynamicImage::ImageRgb8(quantized)
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
            buf
        }
        (Container::Png, ColorMode::FullColor) => {
            let mut buf = Vec::new();
            DynamicImage::ImageRgb8(flat).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
            buf
        }
    };

    debug!(
        container = ?spec.container,
        color = ?spec.color,
        size = bytes.len(),
        "encoded image"
    );
    Ok(bytes)
}

/// Flatten any alpha channel onto the background colour, yielding opaque RGB.
pub fn flatten_onto_background(img: &DynamicImage, background: [u8; 3]) -> RgbImage {
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut out = RgbImage::from_pixel(w, h, Rgb(background));

    for (x, y, px) in rgba.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let a = a as u16;
        let blend = |fg: u8, bg: u8| -> u8 { ((fg as u16 * a + bg as u16 * (255 - a)) / 255) as u8 };
        let bg = out.get_pixel(x, y).0;
        out.put_pixel(x, y, Rgb([blend(r, bg[0]), blend(g, bg[1]), blend(b, bg[2])]));
    }
    out
}

fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    use image::{ExtendedColorType, ImageEncoder};

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality);
    encoder.write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8)?;
    Ok(buf)
}

fn encode_tiff_lzw(img: &RgbImage) -> Result<Vec<u8>, EncodeError> {
    let (w, h) = img.dimensions();
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut buf)?;
        encoder.write_image_with_compression::<colortype::RGB8, _>(
            w,
            h,
            Lzw::default(),
            img.as_raw(),
        )?;
    }
    Ok(buf.into_inner())
}

/// Reduce the image to at most `max_colors` distinct colours.
///
/// The PNG bytes still carry 24-bit samples; the reduction is in the colour
/// population, which is what determines compressed size for document scans.
fn quantize(img: &RgbImage, max_colors: usize) -> RgbImage {
    let (w, h) = img.dimensions();
    let rgba: Vec<u8> = img
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2], 255])
        .collect();

    let nq = NeuQuant::new(QUANT_SAMPLE_FACTOR, max_colors, &rgba);
    let palette = nq.color_map_rgb();

    let mut out = RgbImage::new(w, h);
    for (src, dst) in rgba.chunks_exact(4).zip(out.pixels_mut()) {
        let idx = nq.index_of(src) * 3;
        dst.0 = [palette[idx], palette[idx + 1], palette[idx + 2]];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::options::OutputFormat;
    use image::{Rgba, RgbaImage};

    const WHITE: [u8; 3] = [255, 255, 255];

    fn spec(format: OutputFormat) -> EncodingSpec {
        EncodingSpec::resolve(format, 90, 150, WHITE)
    }

    fn red_page(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([200, 30, 30, 255])))
    }

    #[test]
    fn png_output_decodes_back() {
        let bytes = encode_image(&red_page(20, 10), &spec(OutputFormat::Png16m)).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 20);
        assert_eq!(decoded.height(), 10);
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn jpeg_output_has_jpeg_magic() {
        let bytes = encode_image(&red_page(16, 16), &spec(OutputFormat::Jpeg)).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8], "missing JPEG SOI marker");
    }

    #[test]
    fn tiff_output_decodes_back() {
        let bytes = encode_image(&red_page(8, 8), &spec(OutputFormat::TiffLzw)).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Tiff).unwrap();
        assert_eq!(decoded.width(), 8);
    }

    #[test]
    fn grayscale_output_is_luma() {
        let bytes = encode_image(&red_page(8, 8), &spec(OutputFormat::PngGray)).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn indexed_output_reduces_color_population() {
        // A noisy gradient has far more than 16 colours before quantisation.
        let mut img = RgbaImage::new(64, 64);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255]);
        }
        let bytes =
            encode_image(&DynamicImage::ImageRgba8(img), &spec(OutputFormat::Png16)).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();

        let mut colors: std::collections::HashSet<[u8; 3]> = std::collections::HashSet::new();
        for p in decoded.pixels() {
            colors.insert(p.0);
        }
        assert!(
            colors.len() <= 16,
            "expected ≤16 colours, got {}",
            colors.len()
        );
    }

    #[test]
    fn transparency_flattens_onto_background() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0])));
        let flat = flatten_onto_background(&img, [10, 200, 30]);
        assert_eq!(flat.get_pixel(0, 0).0, [10, 200, 30]);
    }
}
