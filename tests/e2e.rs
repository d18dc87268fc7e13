//! End-to-end tests against the real pdfium library.
//!
//! These need the pdfium shared library at runtime, so they are gated behind
//! the `DOCPIX_E2E` environment variable and skip themselves when pdfium
//! cannot be bound.
//!
//! Run with:
//!   DOCPIX_E2E=1 PDFIUM_LIB_PATH=/path/to/libpdfium.so cargo test --test e2e -- --nocapture

use docpix::{
    bundle_artifacts, convert_pdf, DocpixError, EngineConfig, Engines, InputFile,
    PdfConversion, PdfToImageConfig, RasterFormat,
};
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless DOCPIX_E2E is set.
macro_rules! e2e_skip_unless_enabled {
    () => {{
        if std::env::var("DOCPIX_E2E").is_err() {
            println!("SKIP — set DOCPIX_E2E=1 to run e2e tests");
            return;
        }
    }};
}

/// Unwrap a conversion, skipping the test when pdfium is not installed.
macro_rules! skip_if_engine_missing {
    ($result:expr) => {{
        match $result {
            Err(DocpixError::EngineUnavailable { detail, .. }) => {
                println!("SKIP — pdfium not available: {detail}");
                return;
            }
            other => other.expect("conversion should succeed"),
        }
    }};
}

fn engines() -> Engines {
    Engines::with_defaults(&EngineConfig {
        pdfium_library: std::env::var("PDFIUM_LIB_PATH").ok().map(PathBuf::from),
    })
}

/// A valid PDF with `pages` blank pages of `width` × `height` points.
fn blank_pdf(pages: usize, width: u32, height: u32) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", i + 3)).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages
    ));
    for _ in 0..pages {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width} {height}] /Resources << >> >>"
        ));
    }

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_at = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for off in &offsets {
        xref.push_str(&format!("{off:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}

async fn convert(
    engines: &Engines,
    pdf: Vec<u8>,
    config: &PdfToImageConfig,
) -> Result<PdfConversion, DocpixError> {
    convert_pdf(engines, &InputFile::from_bytes("blank.pdf", pdf), config).await
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_render_selected_pages_png() {
    e2e_skip_unless_enabled!();
    let engines = engines();
    let config = PdfToImageConfig::builder()
        .pages("1,3")
        .dpi(144)
        .build()
        .unwrap();

    let result = skip_if_engine_missing!(convert(&engines, blank_pdf(3, 200, 100), &config).await);

    assert_eq!(result.document_pages, 3);
    assert_eq!(result.page_numbers(), vec![1, 3]);
    for artifact in &result.artifacts {
        let img = image::load_from_memory(&artifact.bytes).unwrap();
        // 200×100 pt at 2× scale.
        assert_eq!((img.width(), img.height()), (400, 200));
    }
}

#[tokio::test]
async fn test_render_jpeg_and_bundle() {
    e2e_skip_unless_enabled!();
    let engines = engines();
    let config = PdfToImageConfig::builder()
        .dpi(72)
        .format(RasterFormat::Jpg)
        .build()
        .unwrap();

    let result = skip_if_engine_missing!(convert(&engines, blank_pdf(2, 300, 300), &config).await);
    assert!(result.offers_archive());
    assert!(result.artifacts[0].filename.ends_with("_page1.jpg"));

    let archive = bundle_artifacts(&engines, &result.artifacts, &result.archive_name())
        .await
        .unwrap();
    assert_eq!(archive.filename, "blank_pages.zip");
    assert!(archive.size() > 0);
}

#[tokio::test]
async fn test_out_of_range_pages() {
    e2e_skip_unless_enabled!();
    let engines = engines();
    let config = PdfToImageConfig::builder().pages("4").build().unwrap();

    match convert(&engines, blank_pdf(3, 100, 100), &config).await {
        Err(DocpixError::EngineUnavailable { .. }) => println!("SKIP — pdfium not available"),
        Err(DocpixError::InvalidRange { token, total }) => {
            assert_eq!(token, "4");
            assert_eq!(total, 3);
        }
        other => panic!("expected InvalidRange, got {other:?}"),
    }
}

#[tokio::test]
async fn test_corrupt_pdf_is_document_load_error() {
    e2e_skip_unless_enabled!();
    let engines = engines();

    match convert(&engines, b"%PDF-1.4\nthis is not a pdf".to_vec(), &PdfToImageConfig::default()).await {
        Err(DocpixError::EngineUnavailable { .. }) => println!("SKIP — pdfium not available"),
        Err(DocpixError::DocumentLoad { name, .. }) => assert_eq!(name, "blank.pdf"),
        other => panic!("expected DocumentLoad, got {other:?}"),
    }
}

#[test]
fn test_blank_pdf_fixture_is_well_formed() {
    let pdf = blank_pdf(2, 10, 10);
    assert!(pdf.starts_with(b"%PDF-1.4"));
    let text = String::from_utf8(pdf).unwrap();
    assert!(text.contains("/Count 2"));
    assert!(text.trim_end().ends_with("%%EOF"));
}
