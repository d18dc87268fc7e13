//! Output artifacts produced by the pipelines.
//!
//! An [`OutputArtifact`] is an immutable byte blob plus a suggested filename
//! and metadata specific to the operation that produced it. Bytes are held
//! behind an `Arc<[u8]>` so that the resize no-op path can hand back the
//! caller's original bytes without copying them.

use crate::error::DocpixError;
use crate::pipeline::input::split_file_name;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Operation-specific facts about an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactMetadata {
    /// A rendered PDF page.
    Page { page_number: usize },
    /// A resized image.
    Resized { width: u32, height: u32 },
    /// A re-encoded image.
    Compressed {
        original_size: u64,
        compressed_size: u64,
    },
    /// An archive bundling other artifacts.
    Archive { entries: usize },
}

/// A finished output unit, ready to be saved or offered for download.
#[derive(Debug, Clone, Serialize)]
pub struct OutputArtifact {
    /// Suggested filename, e.g. `report_page3.png`.
    pub filename: String,
    /// Encoded bytes. Not serialised; manifests describe artifacts, not carry them.
    #[serde(skip)]
    pub bytes: Arc<[u8]>,
    /// MIME type of `bytes`.
    pub mime_type: String,
    pub metadata: ArtifactMetadata,
}

impl OutputArtifact {
    pub fn new(
        filename: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
        mime_type: impl Into<String>,
        metadata: ArtifactMetadata,
    ) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            metadata,
        }
    }

    /// Size of the encoded blob in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Page number for rendered PDF pages.
    pub fn page_number(&self) -> Option<usize> {
        match self.metadata {
            ArtifactMetadata::Page { page_number } => Some(page_number),
            _ => None,
        }
    }

    /// Pixel dimensions for resized images.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self.metadata {
            ArtifactMetadata::Resized { width, height } => Some((width, height)),
            _ => None,
        }
    }

    /// Size reduction in percent for compressed images.
    ///
    /// Negative when the "compressed" output grew. `None` for other artifact
    /// kinds or an empty original.
    pub fn reduction_percent(&self) -> Option<f64> {
        match self.metadata {
            ArtifactMetadata::Compressed {
                original_size,
                compressed_size,
            } if original_size > 0 => {
                Some((1.0 - compressed_size as f64 / original_size as f64) * 100.0)
            }
            _ => None,
        }
    }

    /// Write the artifact into `dir` under its suggested filename.
    ///
    /// Uses atomic write (temp file + rename) so a crash never leaves a
    /// truncated image behind. Creates `dir` when missing.
    pub async fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, DocpixError> {
        let dir = dir.as_ref();
        let path = dir.join(&self.filename);

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DocpixError::OutputWriteFailed {
                path: path.clone(),
                source: e,
            })?;

        let tmp_path = dir.join(format!(".{}.tmp", self.filename));
        tokio::fs::write(&tmp_path, &self.bytes)
            .await
            .map_err(|e| DocpixError::OutputWriteFailed {
                path: path.clone(),
                source: e,
            })?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(DocpixError::OutputWriteFailed { path, source: e });
        }

        debug!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// Result of a PDF → images conversion.
#[derive(Debug, Clone, Serialize)]
pub struct PdfConversion {
    /// Name of the source PDF.
    pub source_name: String,
    /// Page count of the whole document.
    pub document_pages: usize,
    /// One artifact per selected page, in ascending page order.
    pub artifacts: Vec<OutputArtifact>,
}

impl PdfConversion {
    /// True when nothing was converted. Callers should surface this as its
    /// own outcome rather than as success with no files.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Whether a bulk archive should be offered for this result.
    pub fn offers_archive(&self) -> bool {
        crate::pipeline::archive::should_offer_archive(self.artifacts.len())
    }

    /// Suggested archive filename: `{stem}_pages.zip`.
    pub fn archive_name(&self) -> String {
        let (stem, _) = split_file_name(&self.source_name);
        format!("{stem}_pages.zip")
    }

    /// Page numbers in output order.
    pub fn page_numbers(&self) -> Vec<usize> {
        self.artifacts.iter().filter_map(|a| a.page_number()).collect()
    }
}

/// Format a byte count for humans: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB`.
///
/// Base 1024, at most two decimals, trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize) -> OutputArtifact {
        OutputArtifact::new(
            format!("doc_page{n}.png"),
            vec![1u8, 2, 3],
            "image/png",
            ArtifactMetadata::Page { page_number: n },
        )
    }

    #[test]
    fn file_size_formatting() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn reduction_percent() {
        let a = OutputArtifact::new(
            "x_compressed.jpg",
            vec![0u8; 10],
            "image/jpeg",
            ArtifactMetadata::Compressed {
                original_size: 200,
                compressed_size: 50,
            },
        );
        assert_eq!(a.reduction_percent(), Some(75.0));
        assert_eq!(page(1).reduction_percent(), None);
    }

    #[test]
    fn archive_threshold_and_name() {
        let mut conv = PdfConversion {
            source_name: "Quarterly Report.PDF".into(),
            document_pages: 3,
            artifacts: vec![page(1)],
        };
        assert!(!conv.offers_archive());
        conv.artifacts.push(page(3));
        assert!(conv.offers_archive());
        assert_eq!(conv.archive_name(), "Quarterly Report_pages.zip");
        assert_eq!(conv.page_numbers(), vec![1, 3]);
    }

    #[test]
    fn manifest_skips_bytes() {
        let json = serde_json::to_value(page(2)).unwrap();
        assert_eq!(json["filename"], "doc_page2.png");
        assert_eq!(json["metadata"]["kind"], "page");
        assert_eq!(json["metadata"]["page_number"], 2);
        assert!(json.get("bytes").is_none());
    }

    #[tokio::test]
    async fn write_to_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("nested/out");
        let path = page(4).write_to_dir(&out).await.unwrap();
        assert_eq!(path, out.join("doc_page4.png"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
        // No temp file left behind.
        let names: Vec<_> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let tmp = tempfile::tempdir().unwrap();
        // A non-empty directory where the file should go makes the rename fail.
        let blocker = tmp.path().join("doc_page4.png");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        let err = page(4).write_to_dir(tmp.path()).await.unwrap_err();
        assert!(matches!(err, DocpixError::OutputWriteFailed { ref path, .. } if *path == blocker));
        assert!(!tmp.path().join(".doc_page4.png.tmp").exists());
    }
}
