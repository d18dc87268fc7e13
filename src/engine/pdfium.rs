//! Default [`PdfRenderer`]: pdfium via `pdfium-render`.
//!
//! The shared library is bound lazily, on the first [`PdfRenderer::open`],
//! and kept for the life of the renderer. Binding runs under the cell's lock:
//! concurrent first callers wait on a single bind, and at most one `Pdfium`
//! ever exists per renderer, since dropping one destroys the library state.
//! A failed bind is not remembered, so a later call (say, after the user
//! installs the library) can still succeed.
//!
//! Library lookup order:
//!
//! 1. The path passed to [`PdfiumRenderer::new`] (`--pdfium-lib`)
//! 2. `PDFIUM_LIB_PATH`
//! 3. The platform library name in the working directory
//! 4. The system library search path

use super::{EngineResult, PdfRenderer, RenderedDocument};
use crate::error::EngineFailure;
use image::DynamicImage;
use once_cell::sync::OnceCell;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// pdfium-backed renderer.
pub struct PdfiumRenderer {
    library_path: Option<PathBuf>,
    pdfium: OnceCell<Pdfium>,
}

impl PdfiumRenderer {
    /// `library_path` overrides the lookup order when set.
    pub fn new(library_path: Option<PathBuf>) -> Self {
        Self {
            library_path,
            pdfium: OnceCell::new(),
        }
    }

    /// The bound library, binding it on first use.
    fn pdfium(&self) -> EngineResult<&Pdfium> {
        self.pdfium
            .get_or_try_init(|| bind(self.library_path.as_deref()))
    }
}

impl std::fmt::Debug for PdfiumRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfiumRenderer")
            .field("library_path", &self.library_path)
            .field("bound", &self.pdfium.get().is_some())
            .finish()
    }
}

impl PdfRenderer for PdfiumRenderer {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> EngineResult<Box<dyn RenderedDocument + 'a>> {
        let pdfium = self.pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| EngineFailure::new(format!("{:?}", e)))?;
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl RenderedDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, page: usize, scale: f32) -> EngineResult<DynamicImage> {
        let index = page
            .checked_sub(1)
            .ok_or_else(|| EngineFailure::new("page numbers start at 1"))?;
        let pdf_page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| EngineFailure::new(format!("{:?}", e)))?;

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = pdf_page
            .render_with_config(&render_config)
            .map_err(|e| EngineFailure::new(format!("{:?}", e)))?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} at ×{:.3} → {}x{} px",
            page,
            scale,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

fn bind(explicit: Option<&Path>) -> EngineResult<Pdfium> {
    if let Some(path) = explicit {
        return bind_at(path);
    }

    if let Ok(env_path) = std::env::var("PDFIUM_LIB_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return bind_at(&path);
        }
        debug!(
            "PDFIUM_LIB_PATH '{}' does not exist; trying other locations",
            path.display()
        );
    }

    let local = Pdfium::pdfium_platform_library_name_at_path("./");
    if local.exists() {
        return bind_at(&local);
    }

    let bindings = Pdfium::bind_to_system_library()
        .map_err(|e| EngineFailure::unavailable(format!("system pdfium library: {}", e)))?;
    info!("Bound pdfium from the system library path");
    Ok(Pdfium::new(bindings))
}

fn bind_at(path: &Path) -> EngineResult<Pdfium> {
    let bindings = Pdfium::bind_to_library(path)
        .map_err(|e| EngineFailure::unavailable(format!("{}: {}", path.display(), e)))?;
    info!("Bound pdfium from {}", path.display());
    Ok(Pdfium::new(bindings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_does_not_bind() {
        let r = PdfiumRenderer::new(Some(PathBuf::from("/nonexistent/libpdfium.so")));
        assert!(r.pdfium.get().is_none());
    }

    #[test]
    fn failed_bind_is_not_cached() {
        let r = PdfiumRenderer::new(Some(PathBuf::from("/nonexistent/libpdfium.so")));
        assert!(r.open(b"%PDF-1.4").is_err());
        assert!(r.pdfium.get().is_none());
        let err = r.open(b"%PDF-1.4").err();
        assert!(err.as_ref().is_some_and(|e| e.is_unavailable()));
        assert!(err.is_some_and(|e| e.detail().contains("/nonexistent/libpdfium.so")));
    }

    #[test]
    fn concurrent_first_opens_share_one_bind_attempt() {
        let r = PdfiumRenderer::new(Some(PathBuf::from("/nonexistent/libpdfium.so")));
        let barrier = std::sync::Barrier::new(4);

        let failures: Vec<bool> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        r.open(b"%PDF-1.4").err().is_some_and(|e| e.is_unavailable())
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(failures, vec![true; 4]);
        assert!(r.pdfium.get().is_none());
    }

    #[test]
    fn renderer_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PdfiumRenderer>();
    }
}
