//! Default [`Archiver`]: deflate-compressed ZIP via the `zip` crate.
//!
//! Every entry carries the fixed DOS epoch timestamp, so bundling the same
//! files twice yields byte-identical archives.

use super::{ArchiveEntry, Archiver, EngineResult};
use crate::error::EngineFailure;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl Archiver for ZipArchiver {
    fn bundle(&self, entries: &[ArchiveEntry<'_>]) -> EngineResult<Vec<u8>> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for entry in entries {
            writer
                .start_file(entry.filename, options)
                .map_err(|e| EngineFailure::new(format!("{}: {}", entry.filename, e)))?;
            writer.write_all(entry.bytes)?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| EngineFailure::new(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn entries_read_back_in_order() {
        let entries = [
            ArchiveEntry {
                filename: "doc_page1.png",
                bytes: b"first",
            },
            ArchiveEntry {
                filename: "doc_page3.png",
                bytes: b"third page bytes",
            },
        ];
        let bytes = ZipArchiver.bundle(&entries).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        for (i, expected) in entries.iter().enumerate() {
            let mut file = archive.by_index(i).unwrap();
            assert_eq!(file.name(), expected.filename);
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            assert_eq!(content, expected.bytes);
        }
    }

    #[test]
    fn output_is_deterministic() {
        let entries = [ArchiveEntry {
            filename: "a.jpg",
            bytes: &[7u8; 300],
        }];
        assert_eq!(
            ZipArchiver.bundle(&entries).unwrap(),
            ZipArchiver.bundle(&entries).unwrap()
        );
    }

    #[test]
    fn duplicate_names_fail() {
        let entries = [
            ArchiveEntry {
                filename: "same.png",
                bytes: b"1",
            },
            ArchiveEntry {
                filename: "same.png",
                bytes: b"2",
            },
        ];
        let err = ZipArchiver.bundle(&entries).unwrap_err();
        assert!(err.to_string().contains("same.png"));
    }
}
