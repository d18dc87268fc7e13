//! Eager entry points: run a pipeline to completion and return its result.
//!
//! Each function moves its blocking pipeline onto tokio's blocking pool, so
//! none of them stall the async workers while pdfium renders or an encoder
//! runs. [`convert_pdf`] calls the config's progress callback from inside the
//! page loop, after each page and before the next one starts; use
//! [`crate::stream::convert_pdf_stream`] to pull events instead.

use crate::config::{CompressConfig, PdfToImageConfig, ResizeConfig};
use crate::engine::Engines;
use crate::error::DocpixError;
use crate::output::{OutputArtifact, PdfConversion};
use crate::pipeline::input::InputFile;
use crate::pipeline::render::{self, RenderOutcome};
use crate::pipeline::{archive, compress, resize};
use crate::stream::ConversionEvent;
use std::ops::ControlFlow;
use std::time::Instant;
use tracing::info;

/// Convert the selected pages of a PDF to images.
///
/// Fires `on_conversion_start`, then `on_page_complete` once per page in
/// ascending page order, then `on_conversion_complete`, all before this
/// function returns.
///
/// # Errors
/// - [`DocpixError::DocumentLoad`] if `input` is not a readable PDF
/// - [`DocpixError::InvalidRange`] if `config.pages` does not resolve
/// - [`DocpixError::Render`] naming the first page that failed; no partial
///   result is returned
/// - [`DocpixError::EngineUnavailable`] if pdfium cannot be loaded
///
/// An empty selection is not an error: the result simply has no artifacts
/// (see [`PdfConversion::is_empty`]).
///
/// # Example
/// ```rust,no_run
/// use docpix::{convert_pdf, Engines, InputFile, PdfToImageConfig, RasterFormat};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engines = Engines::default();
/// let input = InputFile::from_path("report.pdf").await?;
/// let config = PdfToImageConfig::builder()
///     .pages("1,3")
///     .dpi(300)
///     .format(RasterFormat::Jpg)
///     .build()?;
///
/// let result = convert_pdf(&engines, &input, &config).await?;
/// for artifact in &result.artifacts {
///     artifact.write_to_dir("out").await?;
/// }
/// # Ok(())
/// # }
/// ```
pub async fn convert_pdf(
    engines: &Engines,
    input: &InputFile,
    config: &PdfToImageConfig,
) -> Result<PdfConversion, DocpixError> {
    let engines = engines.clone();
    let input = input.clone();
    let config = config.clone();

    info!(
        "Starting PDF conversion: {} (pages={}, dpi={}, format={:?})",
        input.name(),
        config.pages,
        config.dpi,
        config.format
    );

    run_blocking("render", move || {
        let start = Instant::now();
        let callback = config.progress_callback.as_deref();
        let mut document_pages = 0;

        let mut sink = |event: ConversionEvent| {
            match event {
                ConversionEvent::Started {
                    document_pages: pages,
                    selected_pages,
                } => {
                    document_pages = pages;
                    if let Some(cb) = callback {
                        cb.on_conversion_start(pages, selected_pages);
                    }
                }
                ConversionEvent::Progress(progress) => {
                    if let Some(cb) = callback {
                        cb.on_page_complete(&progress);
                    }
                }
                ConversionEvent::Completed(_) => {}
            }
            ControlFlow::Continue(())
        };

        let artifacts = match render::rasterize(&engines, &input, &config, &mut sink)? {
            RenderOutcome::Finished(artifacts) => artifacts,
            RenderOutcome::Stopped(_) => {
                return Err(DocpixError::Internal(
                    "render loop stopped without being asked to".into(),
                ))
            }
        };

        if let Some(cb) = callback {
            cb.on_conversion_complete(artifacts.len());
        }
        info!(
            "Converted {} page(s) of {} in {}ms",
            artifacts.len(),
            input.name(),
            start.elapsed().as_millis()
        );
        Ok(PdfConversion {
            source_name: input.name().to_string(),
            document_pages,
            artifacts,
        })
    })
    .await
}

/// Synchronous wrapper around [`convert_pdf`].
///
/// Creates a temporary tokio runtime internally; do not call it from inside
/// another runtime.
pub fn convert_pdf_sync(
    engines: &Engines,
    input: &InputFile,
    config: &PdfToImageConfig,
) -> Result<PdfConversion, DocpixError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DocpixError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_pdf(engines, input, config))
}

/// Resize an image.
///
/// # Errors
/// - [`DocpixError::InvalidConfig`] for a zero target dimension
/// - [`DocpixError::ImageLoad`] if `input` cannot be decoded
/// - [`DocpixError::ResizeEngine`] if resampling fails
/// - [`DocpixError::Encode`] if the result cannot be serialised
pub async fn resize_image(
    engines: &Engines,
    input: &InputFile,
    config: &ResizeConfig,
) -> Result<OutputArtifact, DocpixError> {
    let engines = engines.clone();
    let input = input.clone();
    let config = config.clone();
    run_blocking("resize", move || resize::resize(&engines, &input, &config)).await
}

/// Re-encode an image at a given quality and format.
///
/// # Errors
/// - [`DocpixError::InvalidConfig`] for a quality outside (0, 1]
/// - [`DocpixError::CompressionEngine`] if decoding or re-encoding fails
pub async fn compress_image(
    engines: &Engines,
    input: &InputFile,
    config: &CompressConfig,
) -> Result<OutputArtifact, DocpixError> {
    let engines = engines.clone();
    let input = input.clone();
    let config = *config;
    run_blocking("compress", move || compress::compress(&engines, &input, &config)).await
}

/// Bundle artifacts into a single archive artifact named `archive_name`.
///
/// Callers normally only offer this when
/// [`crate::pipeline::archive::should_offer_archive`] says so.
///
/// # Errors
/// [`DocpixError::ArchiveBuild`] if the archiver fails.
pub async fn bundle_artifacts(
    engines: &Engines,
    artifacts: &[OutputArtifact],
    archive_name: &str,
) -> Result<OutputArtifact, DocpixError> {
    let engines = engines.clone();
    // Cloning artifacts only bumps the byte buffers' refcounts.
    let artifacts = artifacts.to_vec();
    let archive_name = archive_name.to_string();
    run_blocking("archive", move || {
        archive::bundle(&engines, &artifacts, &archive_name)
    })
    .await
}

async fn run_blocking<T, F>(what: &str, f: F) -> Result<T, DocpixError>
where
    F: FnOnce() -> Result<T, DocpixError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DocpixError::Internal(format!("{} task panicked: {}", what, e)))?
}
