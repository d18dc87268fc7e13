//! PDF rasterisation: open, resolve pages, render one page at a time.
//!
//! Everything here is blocking. Both [`crate::convert::convert_pdf`] and
//! [`crate::stream::convert_pdf_stream`] run [`rasterize`] inside
//! `spawn_blocking`: the former hands each [`ConversionEvent`] straight to
//! the progress callback, the latter forwards it over a channel.
//!
//! Pages are rendered strictly in ascending order and never in parallel, so
//! at most one rasterised page is alive at a time and progress percentages
//! only ever go up.

use crate::config::PdfToImageConfig;
use crate::engine::{EncodeSettings, Engines};
use crate::error::DocpixError;
use crate::output::{ArtifactMetadata, OutputArtifact};
use crate::pipeline::input::InputFile;
use crate::pipeline::pages::parse_page_range;
use crate::progress::ProgressEvent;
use crate::stream::ConversionEvent;
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

/// Outcome of a rasterisation run.
#[derive(Debug)]
pub enum RenderOutcome {
    /// Every selected page was rendered.
    Finished(Vec<OutputArtifact>),
    /// The sink asked to stop; holds what was rendered so far.
    Stopped(Vec<OutputArtifact>),
}

/// Rasterise the selected pages of `input`.
///
/// `sink` receives a [`ConversionEvent::Started`] once the page list is known
/// and a [`ConversionEvent::Progress`] after every page. Returning
/// [`ControlFlow::Break`] from the sink stops the loop before the next page.
///
/// The terminal [`ConversionEvent::Completed`] is left to the caller.
pub fn rasterize(
    engines: &Engines,
    input: &InputFile,
    config: &PdfToImageConfig,
    sink: &mut dyn FnMut(ConversionEvent) -> ControlFlow<()>,
) -> Result<RenderOutcome, DocpixError> {
    if !input.is_pdf() {
        return Err(DocpixError::DocumentLoad {
            name: input.name().to_string(),
            detail: format!("missing %PDF header (starts with {:?})", input.magic()),
        });
    }

    let document = engines.renderer().open(input.bytes()).map_err(|e| {
        e.into_error("pdfium", |detail| DocpixError::DocumentLoad {
            name: input.name().to_string(),
            detail,
        })
    })?;

    let document_pages = document.page_count();
    let pages = parse_page_range(&config.pages, document_pages)?;
    info!(
        "Opened {}: {} pages, {} selected",
        input.name(),
        document_pages,
        pages.len()
    );

    if sink(ConversionEvent::Started {
        document_pages,
        selected_pages: pages.len(),
    })
    .is_break()
    {
        return Ok(RenderOutcome::Stopped(Vec::new()));
    }

    if pages.is_empty() {
        warn!("No pages selected from {}; nothing converted", input.name());
        return Ok(RenderOutcome::Finished(Vec::new()));
    }

    let scale = config.render_scale();
    let format = config.format.output_format();
    let settings = EncodeSettings::with_quality(format, config.jpeg_quality);
    let stem = input.stem();
    let total = pages.len();
    let mut artifacts = Vec::with_capacity(total);

    for (done, &page) in pages.iter().enumerate() {
        let image = document
            .render_page(page, scale)
            .map_err(|e| e.into_error("pdfium", |detail| DocpixError::Render { page, detail }))?;

        let bytes = engines
            .codec()
            .encode(&image, settings)
            .map_err(|e| DocpixError::Render {
                page,
                detail: format!("encoding page image failed: {e}"),
            })?;
        drop(image);

        debug!(page, size = bytes.len(), "Page encoded");
        artifacts.push(OutputArtifact::new(
            format!("{stem}_page{page}.{}", config.format.extension()),
            bytes,
            format.mime_type(),
            ArtifactMetadata::Page { page_number: page },
        ));

        let event = ProgressEvent::new(page, done + 1, total);
        if sink(ConversionEvent::Progress(event)).is_break() {
            debug!("Conversion of {} stopped after page {}", input.name(), page);
            return Ok(RenderOutcome::Stopped(artifacts));
        }
    }

    Ok(RenderOutcome::Finished(artifacts))
}
