//! Encoding-spec resolution: map a requested format token to concrete
//! rasterisation and encoding parameters.
//!
//! The token vocabulary (`tifflzw`, `jpeg`, `pnggray`, `png256`, `png16`,
//! `png16m`) follows Ghostscript device naming, which the HTTP request
//! contract inherited. The mapping is a fixed, exhaustive lookup; an unknown
//! token falls back to full-colour PNG rather than erroring, because strict
//! token validation is the job of the request-validation layer in front of
//! this library.

use serde::{Deserialize, Serialize};

/// Requested output format token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// TIFF with LZW compression (best for documents).
    TiffLzw,
    /// JPEG with configurable quality (best for photos).
    Jpeg,
    /// PNG grayscale, 8-bit (best for black and white).
    PngGray,
    /// PNG with a 256-colour palette (balance of quality and size).
    Png256,
    /// PNG with a 16-colour palette (smallest files).
    Png16,
    /// PNG with millions of colours (best quality, default).
    #[default]
    Png16m,
}

impl OutputFormat {
    /// Resolve a request token leniently; unknown tokens map to `Png16m`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "tifflzw" => OutputFormat::TiffLzw,
            "jpeg" => OutputFormat::Jpeg,
            "pnggray" => OutputFormat::PngGray,
            "png256" => OutputFormat::Png256,
            "png16" => OutputFormat::Png16,
            "png16m" => OutputFormat::Png16m,
            _ => OutputFormat::Png16m,
        }
    }

    /// The request token for this format.
    pub fn token(&self) -> &'static str {
        match self {
            OutputFormat::TiffLzw => "tifflzw",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::PngGray => "pnggray",
            OutputFormat::Png256 => "png256",
            OutputFormat::Png16 => "png16",
            OutputFormat::Png16m => "png16m",
        }
    }
}

/// Image container derived from the format token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Container {
    Tiff,
    Jpeg,
    Png,
}

impl Container {
    /// MIME type for single-image responses.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Container::Tiff => "image/tiff",
            Container::Jpeg => "image/jpeg",
            Container::Png => "image/png",
        }
    }

    /// File extension used for archive entry names.
    pub fn extension(&self) -> &'static str {
        match self {
            Container::Tiff => "tiff",
            Container::Jpeg => "jpeg",
            Container::Png => "png",
        }
    }
}

/// Colour handling applied during encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Full 24-bit colour.
    FullColor,
    /// 8-bit grayscale.
    Grayscale,
    /// Palette-reduced colour with at most `max_colors` entries.
    Indexed { max_colors: usize },
}

/// Concrete encoding parameters for one conversion.
///
/// Derived deterministically from the format token plus the request's
/// quality/DPI/background parameters; immutable for the lifetime of the
/// conversion that built it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingSpec {
    pub format: OutputFormat,
    pub container: Container,
    pub color: ColorMode,
    /// LZW for `tifflzw`; the other containers carry their own compression.
    pub lzw_compression: bool,
    /// JPEG quality (1–100). `None` for lossless containers.
    pub quality: Option<u8>,
    pub dpi: u32,
    pub background: [u8; 3],
}

impl EncodingSpec {
    /// Resolve the encoding spec for a format token and request parameters.
    ///
    /// `quality` is retained only for JPEG; `dpi` and `background` pass
    /// through unchanged.
    pub fn resolve(format: OutputFormat, quality: u8, dpi: u32, background: [u8; 3]) -> Self {
        let (container, color, lzw) = match format {
            OutputFormat::TiffLzw => (Container::Tiff, ColorMode::FullColor, true),
            OutputFormat::Jpeg => (Container::Jpeg, ColorMode::FullColor, false),
            OutputFormat::PngGray => (Container::Png, ColorMode::Grayscale, false),
            OutputFormat::Png256 => (Container::Png, ColorMode::Indexed { max_colors: 256 }, false),
            OutputFormat::Png16 => (Container::Png, ColorMode::Indexed { max_colors: 16 }, false),
            OutputFormat::Png16m => (Container::Png, ColorMode::FullColor, false),
        };

        EncodingSpec {
            format,
            container,
            color,
            lzw_compression: lzw,
            quality: (container == Container::Jpeg).then_some(quality),
            dpi,
            background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 3] = [255, 255, 255];

    #[test]
    fn token_round_trip() {
        for f in [
            OutputFormat::TiffLzw,
            OutputFormat::Jpeg,
            OutputFormat::PngGray,
            OutputFormat::Png256,
            OutputFormat::Png16,
            OutputFormat::Png16m,
        ] {
            assert_eq!(OutputFormat::from_token(f.token()), f);
        }
    }

    #[test]
    fn unknown_token_falls_back_to_png16m() {
        assert_eq!(OutputFormat::from_token("webp"), OutputFormat::Png16m);
        assert_eq!(OutputFormat::from_token(""), OutputFormat::Png16m);

        let unknown = EncodingSpec::resolve(OutputFormat::from_token("bmp"), 90, 150, WHITE);
        let png16m = EncodingSpec::resolve(OutputFormat::Png16m, 90, 150, WHITE);
        assert_eq!(unknown, png16m);
    }

    #[test]
    fn tifflzw_spec() {
        let spec = EncodingSpec::resolve(OutputFormat::TiffLzw, 90, 150, WHITE);
        assert_eq!(spec.container, Container::Tiff);
        assert_eq!(spec.color, ColorMode::FullColor);
        assert!(spec.lzw_compression);
        assert_eq!(spec.quality, None, "quality only applies to JPEG");
        assert_eq!(spec.container.mime_type(), "image/tiff");
        assert_eq!(spec.container.extension(), "tiff");
    }

    #[test]
    fn jpeg_keeps_quality() {
        let spec = EncodingSpec::resolve(OutputFormat::Jpeg, 75, 300, [0, 0, 0]);
        assert_eq!(spec.container, Container::Jpeg);
        assert_eq!(spec.quality, Some(75));
        assert_eq!(spec.dpi, 300);
        assert_eq!(spec.background, [0, 0, 0]);
        assert_eq!(spec.container.mime_type(), "image/jpeg");
    }

    #[test]
    fn png_variants() {
        let gray = EncodingSpec::resolve(OutputFormat::PngGray, 90, 150, WHITE);
        assert_eq!(gray.color, ColorMode::Grayscale);
        assert_eq!(gray.container.mime_type(), "image/png");

        let p256 = EncodingSpec::resolve(OutputFormat::Png256, 90, 150, WHITE);
        assert_eq!(p256.color, ColorMode::Indexed { max_colors: 256 });

        let p16 = EncodingSpec::resolve(OutputFormat::Png16, 90, 150, WHITE);
        assert_eq!(p16.color, ColorMode::Indexed { max_colors: 16 });

        let p16m = EncodingSpec::resolve(OutputFormat::Png16m, 90, 150, WHITE);
        assert_eq!(p16m.color, ColorMode::FullColor);
        assert_eq!(p16m.quality, None);
    }
}
