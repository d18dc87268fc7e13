//! Progress reporting for the PDF pipeline.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::PdfToImageConfigBuilder::progress_callback`] to receive
//! an event after every rendered page. Callers that prefer pulling events
//! can consume [`crate::stream::convert_pdf_stream`] instead; the eager
//! [`crate::convert::convert_pdf`] is built on that stream and forwards each
//! item to the callback in order.
//!
//! # Example
//!
//! ```rust
//! use docpix::{ConversionProgressCallback, PdfToImageConfig, ProgressEvent};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl ConversionProgressCallback for Printer {
//!     fn on_page_complete(&self, event: &ProgressEvent) {
//!         eprintln!(
//!             "Processing page {} of {} ({}%)",
//!             event.page, event.total, event.percent
//!         );
//!     }
//! }
//!
//! let config = PdfToImageConfig::builder()
//!     .progress_callback(Arc::new(Printer))
//!     .build()
//!     .unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One page finished rendering.
///
/// `page` is the 1-indexed page number just completed, `total` the number of
/// *selected* pages (not the document's page count), and `percent` the share
/// of selected pages done so far, rounded to the nearest integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub page: usize,
    pub total: usize,
    pub percent: u8,
}

impl ProgressEvent {
    /// Build the event for `page` after `completed` of `total` pages are done.
    pub fn new(page: usize, completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            ((completed as f64 / total as f64) * 100.0).round().min(100.0) as u8
        };
        Self {
            page,
            total,
            percent,
        }
    }
}

/// Called by the PDF pipeline as it renders each page.
///
/// All methods default to no-ops so implementors override only what they
/// need. Events arrive in page order, one at a time.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the document is open and the page list is resolved.
    ///
    /// # Arguments
    /// * `document_pages`: page count of the whole document
    /// * `selected_pages`: pages that will be rendered
    fn on_conversion_start(&self, document_pages: usize, selected_pages: usize) {
        let _ = (document_pages, selected_pages);
    }

    /// Called after a page has been rendered and encoded.
    fn on_page_complete(&self, event: &ProgressEvent) {
        let _ = event;
    }

    /// Called once after the last page, with the number of artifacts produced.
    fn on_conversion_complete(&self, artifacts: usize) {
        let _ = artifacts;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PdfToImageConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
