//! # docpix
//!
//! Three small document and image utilities, each a single async call:
//!
//! - **PDF → images**: render selected pages at a chosen DPI as PNG or JPEG
//! - **Resize**: resample to a target width and/or height, aspect-preserving
//!   when only one is given, with post-resize sharpening
//! - **Compress**: re-encode at a chosen quality and format
//!
//! plus bundling of multi-page output into a ZIP archive.
//!
//! ## Pipeline Overview
//!
//! ```text
//! InputFile (name + bytes)
//!  │
//!  ├─ convert_pdf     pages spec ─▶ pdfium, one page at a time ─▶ N artifacts + progress
//!  ├─ resize_image    width/height ─▶ fast_image_resize + unsharp mask ─▶ 1 artifact
//!  ├─ compress_image  quality/format ─▶ image encoders ─▶ 1 artifact
//!  └─ bundle_artifacts  N artifacts ─▶ zip ─▶ 1 artifact
//! ```
//!
//! All heavy lifting is done by external libraries reached through the
//! [`Engines`] bundle. Build it once and pass it to every call; substitute any
//! engine in tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docpix::{convert_pdf, bundle_artifacts, Engines, InputFile, PdfToImageConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engines = Engines::default();
//!     let input = InputFile::from_path("slides.pdf").await?;
//!     let config = PdfToImageConfig::builder().pages("1-5").dpi(150).build()?;
//!
//!     let result = convert_pdf(&engines, &input, &config).await?;
//!     if result.offers_archive() {
//!         let zip = bundle_artifacts(&engines, &result.artifacts, &result.archive_name()).await?;
//!         zip.write_to_dir("out").await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docpix` binary (clap + indicatif + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docpix = { version = "0.1", default-features = false }
//! ```
//!
//! ## pdfium
//!
//! PDF rendering needs the pdfium shared library at runtime. It is looked up
//! on the first PDF conversion, not at startup: an explicit
//! [`EngineConfig::pdfium_library`] path, then `PDFIUM_LIB_PATH`, then the
//! working directory, then the system library path. Resize and compress never
//! touch it.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    CompressConfig, CompressConfigBuilder, CompressFormat, EngineConfig, OutputFormat,
    PdfToImageConfig, PdfToImageConfigBuilder, RasterFormat, ResampleFilter, ResizeConfig,
    ResizeConfigBuilder, UnsharpMask,
};
pub use convert::{bundle_artifacts, compress_image, convert_pdf, convert_pdf_sync, resize_image};
pub use engine::Engines;
pub use error::{DocpixError, EngineFailure};
pub use output::{format_file_size, ArtifactMetadata, OutputArtifact, PdfConversion};
pub use pipeline::dimensions::{compute_dimensions, Dimensions};
pub use pipeline::input::{InputFile, MediaKind};
pub use pipeline::pages::parse_page_range;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback, ProgressEvent};
pub use stream::{convert_pdf_stream, ConversionEvent, ConversionStream};
