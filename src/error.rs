//! Error types for the docpix library.
//!
//! Every pipeline run either succeeds completely or fails with exactly one
//! [`DocpixError`]. There is no partial-success mode: a page that fails to
//! rasterise aborts the whole PDF conversion, and the caller decides whether
//! to retry with different settings.
//!
//! External engines (pdfium, the resampler, the image codec, the archiver)
//! report failures through the much smaller [`EngineFailure`]. Pipelines map
//! those into the variant that names the unit of work that failed, so the
//! final message says *what* broke (which page, which file) and not just
//! *that* something broke.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the docpix library.
#[derive(Debug, Error)]
pub enum DocpixError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading the input failed for another reason.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The page specification contains a malformed or out-of-bounds token.
    #[error("Invalid page range '{token}' (document has {total} pages)\nUse 'all', '3', '1-5' or '1,3,5-7'.")]
    InvalidRange { token: String, total: usize },

    // ── Load errors ───────────────────────────────────────────────────────
    /// The input could not be opened as a PDF document.
    #[error("Cannot open '{name}' as a PDF: {detail}")]
    DocumentLoad { name: String, detail: String },

    /// The input could not be decoded as an image.
    #[error("Cannot decode '{name}' as an image: {detail}")]
    ImageLoad { name: String, detail: String },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// A specific PDF page failed to rasterise or encode.
    #[error("Rendering failed for page {page}: {detail}")]
    Render { page: usize, detail: String },

    /// The resampling step failed.
    #[error("Resize failed: {detail}")]
    ResizeEngine { detail: String },

    /// Re-encoding in the compression pipeline failed.
    #[error("Compression failed: {detail}")]
    CompressionEngine { detail: String },

    /// Final serialisation of the output image failed.
    #[error("Encoding output image failed: {detail}")]
    Encode { detail: String },

    /// Bundling artifacts into an archive failed.
    #[error("Building archive failed: {detail}")]
    ArchiveBuild { detail: String },

    /// An external library could not be loaded.
    #[error(
        "Failed to load the {engine} engine: {detail}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib) to use a\n\
specific copy, or place the platform library next to the binary.\n"
    )]
    EngineUnavailable { engine: String, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or argument validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocpixError {
    /// True when the user can fix the problem by editing their input
    /// (page spec, dimensions, quality) rather than the file itself.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            DocpixError::InvalidRange { .. } | DocpixError::InvalidConfig(_)
        )
    }
}

/// Failure reported by an external engine.
///
/// Deliberately context-free: the pipeline that called the engine knows the
/// page, file, or step and wraps this into a [`DocpixError`]. The one thing an
/// engine does know is whether its backing library could be loaded at all;
/// that case maps to [`DocpixError::EngineUnavailable`] regardless of step.
#[derive(Debug, Clone, Error)]
#[error("{detail}")]
pub struct EngineFailure {
    detail: String,
    unavailable: bool,
}

impl EngineFailure {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            unavailable: false,
        }
    }

    /// The engine's library could not be loaded.
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            unavailable: true,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Map to `EngineUnavailable` when the library is missing, otherwise to
    /// whatever `step` builds from the detail.
    pub fn into_error(
        self,
        engine: &str,
        step: impl FnOnce(String) -> DocpixError,
    ) -> DocpixError {
        if self.unavailable {
            DocpixError::EngineUnavailable {
                engine: engine.to_string(),
                detail: self.detail,
            }
        } else {
            step(self.detail)
        }
    }
}

impl From<image::ImageError> for EngineFailure {
    fn from(e: image::ImageError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<std::io::Error> for EngineFailure {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}
