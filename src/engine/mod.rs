//! External capabilities behind narrow traits.
//!
//! Every heavy lifting step is delegated to a third-party library: pdfium
//! rasterises pages, fast_image_resize resamples, the `image` crate decodes and
//! encodes, and the `zip` crate builds archives. Each sits behind one trait
//! here, and an [`Engines`] bundle carries one implementation of each into
//! the pipelines.
//!
//! ```text
//!   Engines ─┬─ renderer  : dyn PdfRenderer   (pdfium)
//!            ├─ resampler : dyn Resampler     (fast_image_resize + unsharp mask)
//!            ├─ codec     : dyn ImageCodec    (image)
//!            └─ archiver  : dyn Archiver      (zip)
//! ```
//!
//! Build the bundle once at startup with [`Engines::with_defaults`] and clone
//! it freely; clones share the same engines. Tests swap any single engine via
//! the `with_*` setters.
//!
//! All trait methods are blocking. Pipelines call them from
//! `tokio::task::spawn_blocking`.

pub mod archive;
pub mod codec;
pub mod pdfium;
pub mod resample;

use crate::config::{EngineConfig, OutputFormat, ResampleFilter, UnsharpMask};
use crate::error::EngineFailure;
use image::DynamicImage;
use std::fmt;
use std::sync::Arc;

pub use archive::ZipArchiver;
pub use codec::ImageCrateCodec;
pub use pdfium::PdfiumRenderer;
pub use resample::FastResampler;

/// Result type for engine calls.
pub type EngineResult<T> = Result<T, EngineFailure>;

// ── Capability traits ────────────────────────────────────────────────────

/// Opens PDF documents.
pub trait PdfRenderer: Send + Sync {
    /// Parse `bytes` as a PDF. The returned document may borrow both the
    /// renderer and the bytes.
    fn open<'a>(&'a self, bytes: &'a [u8]) -> EngineResult<Box<dyn RenderedDocument + 'a>>;
}

/// An open PDF document.
pub trait RenderedDocument {
    fn page_count(&self) -> usize;

    /// Rasterise one page (1-indexed) at `scale` times its natural size.
    fn render_page(&self, page: usize, scale: f32) -> EngineResult<DynamicImage>;
}

/// High-quality resampling with optional post-sharpening.
pub trait Resampler: Send + Sync {
    fn resample(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        filter: ResampleFilter,
        sharpen: &UnsharpMask,
    ) -> EngineResult<DynamicImage>;
}

/// How an image should be serialised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeSettings {
    pub format: OutputFormat,
    /// Quality in (0, 1]. Ignored by lossless formats.
    pub quality: Option<f32>,
}

impl EncodeSettings {
    /// Attach `quality` when `format` is lossy; drop it otherwise.
    pub fn with_quality(format: OutputFormat, quality: f32) -> Self {
        Self {
            format,
            quality: format.is_lossy().then_some(quality),
        }
    }
}

/// Decodes and encodes raster images.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> EngineResult<DynamicImage>;

    fn encode(&self, image: &DynamicImage, settings: EncodeSettings) -> EngineResult<Vec<u8>>;
}

/// One file to place in an archive.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveEntry<'a> {
    pub filename: &'a str,
    pub bytes: &'a [u8],
}

/// Bundles named blobs into one archive.
pub trait Archiver: Send + Sync {
    fn bundle(&self, entries: &[ArchiveEntry<'_>]) -> EngineResult<Vec<u8>>;

    /// MIME type of the archives this engine produces.
    fn mime_type(&self) -> &'static str {
        "application/zip"
    }
}

// ── Bundle ───────────────────────────────────────────────────────────────

/// The set of engines a pipeline run uses.
#[derive(Clone)]
pub struct Engines {
    renderer: Arc<dyn PdfRenderer>,
    resampler: Arc<dyn Resampler>,
    codec: Arc<dyn ImageCodec>,
    archiver: Arc<dyn Archiver>,
}

impl Engines {
    pub fn new(
        renderer: Arc<dyn PdfRenderer>,
        resampler: Arc<dyn Resampler>,
        codec: Arc<dyn ImageCodec>,
        archiver: Arc<dyn Archiver>,
    ) -> Self {
        Self {
            renderer,
            resampler,
            codec,
            archiver,
        }
    }

    /// pdfium + fast_image_resize + image + zip.
    ///
    /// Does not touch pdfium yet; the library is bound on the first PDF
    /// conversion, so image-only callers never need it installed.
    pub fn with_defaults(config: &EngineConfig) -> Self {
        Self::new(
            Arc::new(PdfiumRenderer::new(config.pdfium_library.clone())),
            Arc::new(FastResampler),
            Arc::new(ImageCrateCodec),
            Arc::new(ZipArchiver),
        )
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn PdfRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_resampler(mut self, resampler: Arc<dyn Resampler>) -> Self {
        self.resampler = resampler;
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_archiver(mut self, archiver: Arc<dyn Archiver>) -> Self {
        self.archiver = archiver;
        self
    }

    pub fn renderer(&self) -> &Arc<dyn PdfRenderer> {
        &self.renderer
    }

    pub fn resampler(&self) -> &Arc<dyn Resampler> {
        &self.resampler
    }

    pub fn codec(&self) -> &Arc<dyn ImageCodec> {
        &self.codec
    }

    pub fn archiver(&self) -> &Arc<dyn Archiver> {
        &self.archiver
    }
}

impl Default for Engines {
    fn default() -> Self {
        Self::with_defaults(&EngineConfig::default())
    }
}

impl fmt::Debug for Engines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engines")
            .field("renderer", &"<dyn PdfRenderer>")
            .field("resampler", &"<dyn Resampler>")
            .field("codec", &"<dyn ImageCodec>")
            .field("archiver", &"<dyn Archiver>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_kept_only_for_lossy() {
        let s = EncodeSettings::with_quality(OutputFormat::Jpeg, 0.6);
        assert_eq!(s.quality, Some(0.6));
        let s = EncodeSettings::with_quality(OutputFormat::Png, 0.6);
        assert_eq!(s.quality, None);
        let s = EncodeSettings::with_quality(OutputFormat::WebP, 0.6);
        assert_eq!(s.quality, None);
    }

    #[test]
    fn swapping_one_engine_keeps_the_rest() {
        struct NullArchiver;
        impl Archiver for NullArchiver {
            fn bundle(&self, _: &[ArchiveEntry<'_>]) -> EngineResult<Vec<u8>> {
                Ok(Vec::new())
            }
            fn mime_type(&self) -> &'static str {
                "application/octet-stream"
            }
        }

        let base = Engines::default();
        let swapped = base.clone().with_archiver(Arc::new(NullArchiver));
        assert_eq!(swapped.archiver().mime_type(), "application/octet-stream");
        assert!(Arc::ptr_eq(base.codec(), swapped.codec()));
    }
}
