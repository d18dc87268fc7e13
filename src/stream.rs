//! Streaming PDF conversion: pull progress events as pages complete.
//!
//! [`convert_pdf_stream`] returns a finite, non-restartable stream. It yields
//! one [`ConversionEvent::Started`], then one [`ConversionEvent::Progress`]
//! per rendered page, and ends with either [`ConversionEvent::Completed`]
//! carrying every artifact or a single `Err`. Nothing follows the terminal
//! item.
//!
//! The page loop runs on the blocking pool and hands events over a bounded
//! channel. Dropping the stream closes the channel; the loop notices on its
//! next send and stops before rendering another page.
//!
//! The eager [`crate::convert::convert_pdf`] drives the same page loop
//! without a channel, so its callback runs in lockstep with rendering.

use crate::config::PdfToImageConfig;
use crate::engine::Engines;
use crate::error::DocpixError;
use crate::output::OutputArtifact;
use crate::pipeline::input::InputFile;
use crate::pipeline::render::{self, RenderOutcome};
use crate::progress::ProgressEvent;
use std::ops::ControlFlow;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tracing::info;

/// One step of a PDF conversion.
#[derive(Debug, Clone)]
pub enum ConversionEvent {
    /// The document is open and the page list resolved.
    Started {
        document_pages: usize,
        selected_pages: usize,
    },
    /// A page finished rendering.
    Progress(ProgressEvent),
    /// All selected pages are done. Always the last item on success.
    Completed(Vec<OutputArtifact>),
}

/// A boxed stream of conversion events.
pub type ConversionStream = Pin<Box<dyn Stream<Item = Result<ConversionEvent, DocpixError>> + Send>>;

/// Enough slack that the renderer never waits on a slow consumer for long.
const EVENT_BUFFER: usize = 16;

/// Convert a PDF to page images, streaming events as pages complete.
///
/// Must be called from within a tokio runtime. The config's progress
/// callback, if any, is not invoked; consume the events instead.
///
/// # Example
/// ```rust,no_run
/// use docpix::{convert_pdf_stream, ConversionEvent, Engines, InputFile, PdfToImageConfig};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engines = Engines::default();
/// let input = InputFile::from_path("deck.pdf").await?;
/// let config = PdfToImageConfig::builder().pages("1-3").build()?;
///
/// let mut events = convert_pdf_stream(&engines, &input, &config);
/// while let Some(event) = events.next().await {
///     match event? {
///         ConversionEvent::Progress(p) => eprintln!("page {} ({}%)", p.page, p.percent),
///         ConversionEvent::Completed(artifacts) => println!("{} images", artifacts.len()),
///         ConversionEvent::Started { .. } => {}
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub fn convert_pdf_stream(
    engines: &Engines,
    input: &InputFile,
    config: &PdfToImageConfig,
) -> ConversionStream {
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
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

    tokio::task::spawn_blocking(move || {
        let mut sink = |event: ConversionEvent| {
            if tx.blocking_send(Ok(event)).is_err() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };

        let terminal = match render::rasterize(&engines, &input, &config, &mut sink) {
            Ok(RenderOutcome::Finished(artifacts)) => {
                info!("Converted {}: {} images", input.name(), artifacts.len());
                Ok(ConversionEvent::Completed(artifacts))
            }
            // Receiver is gone; nobody to tell.
            Ok(RenderOutcome::Stopped(_)) => return,
            Err(e) => Err(e),
        };
        let _ = tx.blocking_send(terminal);
    });

    Box::pin(ReceiverStream::new(rx))
}
