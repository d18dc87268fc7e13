//! Configuration types for the three pipelines.
//!
//! Each pipeline takes one config struct built through a builder, in the same
//! shape: start from documented defaults, override what you care about, and
//! let `build()` reject values the pipeline cannot honour.
//!
//! | Pipeline | Config | Builder |
//! |----------|--------|---------|
//! | PDF → images | [`PdfToImageConfig`] | [`PdfToImageConfigBuilder`] |
//! | Resize | [`ResizeConfig`] | [`ResizeConfigBuilder`] |
//! | Compress | [`CompressConfig`] | [`CompressConfigBuilder`] |
//!
//! Engine binding options live in [`EngineConfig`].

use crate::error::DocpixError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Encode quality used wherever the caller does not pick one (PDF pages
/// rendered as JPEG, resized JPEG output).
pub const DEFAULT_ENCODE_QUALITY: f32 = 0.92;

/// Resolution, in units per inch, that PDF user space is defined at.
pub const PDF_BASE_DPI: f32 = 72.0;

// ── Formats ──────────────────────────────────────────────────────────────

/// Concrete encoding produced by an [`crate::engine::ImageCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Canonical file extension (no leading dot).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// Whether the format discards information, i.e. whether a quality factor
    /// means anything to the encoder.
    pub fn is_lossy(self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::WebP)
    }

    /// Map a decoded source format to the encoding we can write back.
    ///
    /// Formats we can read but not write (GIF, BMP, …) return `None`.
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
            image::ImageFormat::Png => Some(OutputFormat::Png),
            image::ImageFormat::WebP => Some(OutputFormat::WebP),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Raster format for rendered PDF pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    Jpg,
    /// Lossless; the default because rendered text stays crisp.
    #[default]
    Png,
}

impl RasterFormat {
    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Jpg => "jpg",
            RasterFormat::Png => "png",
        }
    }

    pub fn output_format(self) -> OutputFormat {
        match self {
            RasterFormat::Jpg => OutputFormat::Jpeg,
            RasterFormat::Png => OutputFormat::Png,
        }
    }
}

impl FromStr for RasterFormat {
    type Err = DocpixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(RasterFormat::Jpg),
            "png" => Ok(RasterFormat::Png),
            other => Err(DocpixError::InvalidConfig(format!(
                "unknown page image format '{other}' (expected jpg or png)"
            ))),
        }
    }
}

/// Target format for the compression pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressFormat {
    #[default]
    Jpeg,
    Webp,
    Png,
}

impl CompressFormat {
    /// Extension written into the output filename; `jpeg` normalises to `jpg`.
    pub fn extension(self) -> &'static str {
        self.output_format().extension()
    }

    pub fn output_format(self) -> OutputFormat {
        match self {
            CompressFormat::Jpeg => OutputFormat::Jpeg,
            CompressFormat::Webp => OutputFormat::WebP,
            CompressFormat::Png => OutputFormat::Png,
        }
    }
}

impl FromStr for CompressFormat {
    type Err = DocpixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(CompressFormat::Jpeg),
            "webp" => Ok(CompressFormat::Webp),
            "png" => Ok(CompressFormat::Png),
            other => Err(DocpixError::InvalidConfig(format!(
                "unknown compression format '{other}' (expected jpeg, webp or png)"
            ))),
        }
    }
}

// ── Resampling knobs ─────────────────────────────────────────────────────

/// Convolution filter used by the resampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    Bilinear,
    CatmullRom,
    Mitchell,
    /// Sharpest of the set; the default for photographic downscaling.
    #[default]
    Lanczos3,
}

/// Post-resize sharpening parameters.
///
/// Downscaling with any low-pass filter softens edges. An unsharp mask adds
/// back `amount` percent of the difference between the image and a Gaussian
/// blur of radius `radius`, skipping differences smaller than `threshold`
/// (0–255) so flat regions and noise are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnsharpMask {
    /// Strength in percent. 0 disables sharpening.
    pub amount: f32,
    /// Gaussian sigma of the blur, in pixels.
    pub radius: f32,
    /// Minimum per-channel difference that gets sharpened.
    pub threshold: u8,
}

impl UnsharpMask {
    pub const DISABLED: UnsharpMask = UnsharpMask {
        amount: 0.0,
        radius: 0.0,
        threshold: 0,
    };

    pub fn is_enabled(&self) -> bool {
        self.amount > 0.0 && self.radius > 0.0
    }
}

impl Default for UnsharpMask {
    fn default() -> Self {
        Self {
            amount: 160.0,
            radius: 0.6,
            threshold: 2,
        }
    }
}

// ── PDF → images ─────────────────────────────────────────────────────────

/// Configuration for converting PDF pages to images.
///
/// # Example
/// ```rust
/// use docpix::{PdfToImageConfig, RasterFormat};
///
/// let config = PdfToImageConfig::builder()
///     .pages("1,3-4")
///     .dpi(300)
///     .format(RasterFormat::Jpg)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 300);
/// ```
#[derive(Clone)]
pub struct PdfToImageConfig {
    /// Page specification: `all`, `3`, `1-5`, `1,3,5-7`. Default: `all`.
    pub pages: String,

    /// Rendering resolution. Default: 150.
    ///
    /// The UI offers 96, 150 and 300, but any positive value is accepted.
    /// Pages are rendered at `dpi / 72` times their natural PDF size.
    pub dpi: u32,

    /// Output raster format. Default: PNG.
    pub format: RasterFormat,

    /// Quality used when `format` is JPEG. Default: 0.92.
    pub jpeg_quality: f32,

    /// Receives page-by-page progress. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PdfToImageConfig {
    fn default() -> Self {
        Self {
            pages: "all".to_string(),
            dpi: 150,
            format: RasterFormat::default(),
            jpeg_quality: DEFAULT_ENCODE_QUALITY,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PdfToImageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfToImageConfig")
            .field("pages", &self.pages)
            .field("dpi", &self.dpi)
            .field("format", &self.format)
            .field("jpeg_quality", &self.jpeg_quality)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl PdfToImageConfig {
    pub fn builder() -> PdfToImageConfigBuilder {
        PdfToImageConfigBuilder {
            config: Self::default(),
        }
    }

    /// Render scale relative to PDF user space.
    pub fn render_scale(&self) -> f32 {
        self.dpi as f32 / PDF_BASE_DPI
    }
}

/// Builder for [`PdfToImageConfig`].
#[derive(Debug)]
pub struct PdfToImageConfigBuilder {
    config: PdfToImageConfig,
}

impl PdfToImageConfigBuilder {
    pub fn pages(mut self, spec: impl Into<String>) -> Self {
        self.config.pages = spec.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn format(mut self, format: RasterFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn jpeg_quality(mut self, quality: f32) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PdfToImageConfig, DocpixError> {
        let c = &self.config;
        if c.dpi == 0 {
            return Err(DocpixError::InvalidConfig("DPI must be positive".into()));
        }
        validate_quality("JPEG quality", c.jpeg_quality)?;
        Ok(self.config)
    }
}

// ── Resize ───────────────────────────────────────────────────────────────

/// Configuration for the resize pipeline.
///
/// Set at least one of `width` / `height`; the other follows the source's
/// aspect ratio. Setting both may distort the image, on purpose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeConfig {
    /// Target width in pixels.
    pub width: Option<u32>,
    /// Target height in pixels.
    pub height: Option<u32>,
    /// Resampling filter. Default: Lanczos3.
    pub filter: ResampleFilter,
    /// Post-resize sharpening. Default: amount 160, radius 0.6, threshold 2.
    pub sharpen: UnsharpMask,
    /// Quality for lossy re-encoding of the resized image. Default: 0.92.
    pub encode_quality: f32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            filter: ResampleFilter::default(),
            sharpen: UnsharpMask::default(),
            encode_quality: DEFAULT_ENCODE_QUALITY,
        }
    }
}

impl ResizeConfig {
    pub fn builder() -> ResizeConfigBuilder {
        ResizeConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ResizeConfig`].
#[derive(Debug)]
pub struct ResizeConfigBuilder {
    config: ResizeConfig,
}

impl ResizeConfigBuilder {
    pub fn width(mut self, px: u32) -> Self {
        self.config.width = Some(px);
        self
    }

    pub fn height(mut self, px: u32) -> Self {
        self.config.height = Some(px);
        self
    }

    /// Set both optional targets at once (handy when mapping CLI flags).
    pub fn dimensions(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn filter(mut self, filter: ResampleFilter) -> Self {
        self.config.filter = filter;
        self
    }

    pub fn sharpen(mut self, mask: UnsharpMask) -> Self {
        self.config.sharpen = mask;
        self
    }

    pub fn encode_quality(mut self, quality: f32) -> Self {
        self.config.encode_quality = quality;
        self
    }

    pub fn build(self) -> Result<ResizeConfig, DocpixError> {
        let c = &self.config;
        if c.width == Some(0) || c.height == Some(0) {
            return Err(DocpixError::InvalidConfig(
                "target width and height must be positive".into(),
            ));
        }
        if c.sharpen.amount < 0.0 || c.sharpen.radius < 0.0 {
            return Err(DocpixError::InvalidConfig(
                "unsharp amount and radius must not be negative".into(),
            ));
        }
        validate_quality("encode quality", c.encode_quality)?;
        Ok(self.config)
    }
}

// ── Compress ─────────────────────────────────────────────────────────────

/// Configuration for the compression pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressConfig {
    /// Quality in (0, 1]. Only lossy formats use it. Default: 0.8.
    pub quality: f32,
    /// Output format. Default: JPEG.
    pub format: CompressFormat,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            quality: 0.8,
            format: CompressFormat::default(),
        }
    }
}

impl CompressConfig {
    pub fn builder() -> CompressConfigBuilder {
        CompressConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`CompressConfig`].
#[derive(Debug)]
pub struct CompressConfigBuilder {
    config: CompressConfig,
}

impl CompressConfigBuilder {
    pub fn quality(mut self, quality: f32) -> Self {
        self.config.quality = quality;
        self
    }

    pub fn format(mut self, format: CompressFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn build(self) -> Result<CompressConfig, DocpixError> {
        validate_quality("quality", self.config.quality)?;
        Ok(self.config)
    }
}

// ── Engines ──────────────────────────────────────────────────────────────

/// Options for binding the default engines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Explicit path to the pdfium shared library.
    ///
    /// When `None`, the renderer tries `PDFIUM_LIB_PATH`, then the platform
    /// library in the working directory, then the system library.
    pub pdfium_library: Option<PathBuf>,
}

fn validate_quality(what: &str, q: f32) -> Result<(), DocpixError> {
    if q > 0.0 && q <= 1.0 {
        Ok(())
    } else {
        Err(DocpixError::InvalidConfig(format!(
            "{what} must be in (0, 1], got {q}"
        )))
    }
}
