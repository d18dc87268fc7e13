//! Input files: name, sniffed media kind, and immutable bytes.
//!
//! Pipelines never touch the filesystem themselves; they receive an
//! [`InputFile`] that already holds the bytes. [`InputFile::from_path`] is the
//! convenience loader used by the CLI, mapping missing files and permission
//! problems to dedicated errors before any engine is involved.

use crate::error::DocpixError;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// PDF files start with this magic.
const PDF_MAGIC: &[u8] = b"%PDF";

/// What an input file looks like, judged from its bytes first and its
/// extension second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Pdf,
    Image(image::ImageFormat),
    Unknown,
}

impl MediaKind {
    /// Sniff the media kind of `bytes`, using `name` as a fallback hint.
    pub fn detect(name: &str, bytes: &[u8]) -> Self {
        if bytes.starts_with(PDF_MAGIC) {
            return MediaKind::Pdf;
        }
        if let Ok(format) = image::guess_format(bytes) {
            return MediaKind::Image(format);
        }
        match image::ImageFormat::from_path(name) {
            Ok(format) => MediaKind::Image(format),
            Err(_) if name.to_ascii_lowercase().ends_with(".pdf") => MediaKind::Pdf,
            Err(_) => MediaKind::Unknown,
        }
    }

    /// Declared MIME type, if known.
    pub fn mime_type(self) -> Option<&'static str> {
        match self {
            MediaKind::Pdf => Some("application/pdf"),
            MediaKind::Image(format) => Some(format.to_mime_type()),
            MediaKind::Unknown => None,
        }
    }
}

/// An immutable input: a name, a declared media kind, and the bytes.
#[derive(Debug, Clone)]
pub struct InputFile {
    name: String,
    kind: MediaKind,
    bytes: Arc<[u8]>,
}

impl InputFile {
    /// Wrap bytes already in memory.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let bytes = bytes.into();
        let kind = MediaKind::detect(&name, &bytes);
        Self { name, kind, bytes }
    }

    /// Read a local file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, DocpixError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DocpixError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => DocpixError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => DocpixError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input".to_string());

        debug!("Read {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Cheap shared handle to the bytes.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// True when the bytes carry the `%PDF` magic.
    pub fn is_pdf(&self) -> bool {
        self.bytes.starts_with(PDF_MAGIC)
    }

    /// The filename without its final extension.
    pub fn stem(&self) -> &str {
        split_file_name(&self.name).0
    }

    /// The final extension, if the name has one.
    pub fn extension(&self) -> Option<&str> {
        split_file_name(&self.name).1
    }

    /// First four bytes, for error messages.
    pub fn magic(&self) -> [u8; 4] {
        let mut magic = [0u8; 4];
        let n = self.bytes.len().min(4);
        magic[..n].copy_from_slice(&self.bytes[..n]);
        magic
    }
}

/// Split `name` into stem and extension at the last dot.
///
/// A leading dot (`.hidden`) is part of the stem, and a trailing dot yields no
/// extension.
pub fn split_file_name(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(i) if i + 1 == name.len() => (&name[..i], None),
        Some(i) => (&name[..i], Some(&name[i + 1..])),
    }
}
