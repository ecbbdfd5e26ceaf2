//! Configuration types for PDF-to-image conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across requests, serialise them for logging,
//! and diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on documented
//! defaults for the rest; `build()` validates cross-field constraints once.

use crate::error::Pdf2ImgError;
use crate::pipeline::options::OutputFormat;
use serde::{Deserialize, Serialize};

/// Configuration for a single PDF-to-image conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2img::{ConversionConfig, OutputFormat};
///
/// let config = ConversionConfig::builder()
///     .start_page(0)
///     .end_page(4)
///     .output_format(OutputFormat::Jpeg)
///     .dpi(200)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// First page to convert (0-based index). Default: 0.
    pub start_page: usize,

    /// Last page to convert (0-based, inclusive). Default: 0.
    ///
    /// `0` is a sentinel meaning "through the last page of the document".
    /// The effective range is resolved once per conversion against the
    /// document's actual page count.
    pub end_page: usize,

    /// Combine all pages into one vertically-stacked image. Default: true.
    ///
    /// When false, the conversion returns a zip archive with one image file
    /// per page, named `page-<n>.<ext>` in range order.
    pub single_file: bool,

    /// Output image format. Default: [`OutputFormat::Png16m`].
    pub output_format: OutputFormat,

    /// Rendering resolution in DPI. Range: 72–600. Default: 150.
    ///
    /// 150 DPI keeps text legible while file sizes stay modest. Raise it for
    /// small-print documents; lower it for thumbnails.
    pub dpi: u32,

    /// Image quality for JPEG output. Range: 1–100. Default: 90.
    ///
    /// Ignored for PNG and TIFF containers.
    pub quality: u8,

    /// Background colour as an RGB triple. Default: white.
    ///
    /// PDF pages are transparent where nothing is drawn; the background is
    /// flattened under every page and fills width gaps when stacking pages
    /// of different widths.
    pub background_color: [u8; 3],

    /// Maximum number of pages rendered concurrently. Default: 4.
    ///
    /// Each in-flight render holds a staging copy of the document on disk
    /// and a decoded page bitmap in memory. Unbounded fan-out on a 500-page
    /// document would exhaust both, so the ceiling is deliberately small.
    pub concurrency: usize,

    /// Per-page render timeout in seconds. Default: 60.
    ///
    /// A timeout fails only the owning page's render; the conversion then
    /// aborts fail-fast because partial output is not useful to callers.
    pub page_timeout_secs: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            start_page: 0,
            end_page: 0,
            single_file: true,
            output_format: OutputFormat::default(),
            dpi: 150,
            quality: 90,
            background_color: [255, 255, 255],
            concurrency: 4,
            page_timeout_secs: 60,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn start_page(mut self, page: usize) -> Self {
        self.config.start_page = page;
        self
    }

    /// Last page (0-based, inclusive); `0` means "through the last page".
    pub fn end_page(mut self, page: usize) -> Self {
        self.config.end_page = page;
        self
    }

    pub fn single_file(mut self, v: bool) -> Self {
        self.config.single_file = v;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Set the output format from its request token (`tifflzw`, `jpeg`,
    /// `pnggray`, `png256`, `png16`, `png16m`).
    ///
    /// Unknown tokens fall back to `png16m` rather than erroring; strict
    /// token validation belongs to the request-validation layer in front of
    /// this library.
    pub fn output_format_token(mut self, token: &str) -> Self {
        self.config.output_format = OutputFormat::from_token(token);
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn quality(mut self, q: u8) -> Self {
        self.config.quality = q.clamp(1, 100);
        self
    }

    pub fn background_color(mut self, rgb: [u8; 3]) -> Self {
        self.config.background_color = rgb;
        self
    }

    /// Set the background colour from a `#RRGGBB` hex string.
    ///
    /// Parse failures are deferred to `build()` so the builder chain stays
    /// infallible.
    pub fn background_hex(self, hex: &str) -> Result<Self, Pdf2ImgError> {
        let rgb = parse_hex_color(hex)?;
        Ok(self.background_color(rgb))
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn page_timeout_secs(mut self, secs: u64) -> Self {
        self.config.page_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2ImgError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(Pdf2ImgError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.quality < 1 {
            return Err(Pdf2ImgError::InvalidConfig(
                "Quality must be 1–100".into(),
            ));
        }
        if c.concurrency == 0 {
            return Err(Pdf2ImgError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.page_timeout_secs == 0 {
            return Err(Pdf2ImgError::InvalidConfig(
                "Page timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Parse a `#RRGGBB` (or `RRGGBB`) hex string into an RGB triple.
pub fn parse_hex_color(hex: &str) -> Result<[u8; 3], Pdf2ImgError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Pdf2ImgError::InvalidConfig(format!(
            "Background colour must be '#RRGGBB', got '{hex}'"
        )));
    }
    // Length and digit checks above make these infallible.
    let r = u8::from_str_radix(&digits[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&digits[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&digits[4..6], 16).unwrap_or(0);
    Ok([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_request_contract() {
        let c = ConversionConfig::default();
        assert_eq!(c.start_page, 0);
        assert_eq!(c.end_page, 0);
        assert!(c.single_file);
        assert_eq!(c.output_format, OutputFormat::Png16m);
        assert_eq!(c.dpi, 150);
        assert_eq!(c.quality, 90);
        assert_eq!(c.background_color, [255, 255, 255]);
    }

    #[test]
    fn builder_clamps_dpi_and_quality() {
        let c = ConversionConfig::builder()
            .dpi(10_000)
            .quality(200)
            .build()
            .unwrap();
        assert_eq!(c.dpi, 600);
        assert_eq!(c.quality, 100);

        let c = ConversionConfig::builder().dpi(1).build().unwrap();
        assert_eq!(c.dpi, 72);
    }

    #[test]
    fn builder_rejects_zero_concurrency_via_clamp() {
        // The setter clamps to 1 rather than letting build() fail.
        let c = ConversionConfig::builder().concurrency(0).build().unwrap();
        assert_eq!(c.concurrency, 1);
    }

    #[test]
    fn parse_hex_color_accepts_both_forms() {
        assert_eq!(parse_hex_color("#FFFFFF").unwrap(), [255, 255, 255]);
        assert_eq!(parse_hex_color("000000").unwrap(), [0, 0, 0]);
        assert_eq!(parse_hex_color("#1a2B3c").unwrap(), [0x1a, 0x2b, 0x3c]);
    }

    #[test]
    fn parse_hex_color_rejects_junk() {
        assert!(parse_hex_color("#FFF").is_err());
        assert!(parse_hex_color("not-a-colour").is_err());
        assert!(parse_hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn background_hex_flows_into_config() {
        let c = ConversionConfig::builder()
            .background_hex("#FF0000")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(c.background_color, [255, 0, 0]);
    }
}
