//! Archive assembly for multi-page PDF output.

use crate::engine::{ArchiveEntry, Engines};
use crate::error::DocpixError;
use crate::output::{ArtifactMetadata, OutputArtifact};
use tracing::info;

/// A bulk download is only worth offering for more than one artifact.
pub fn should_offer_archive(artifact_count: usize) -> bool {
    artifact_count > 1
}

/// Bundle `artifacts` into one archive named `archive_name`. Blocking.
///
/// Entries keep the artifacts' order and filenames; unique names are the
/// caller's responsibility.
pub fn bundle(
    engines: &Engines,
    artifacts: &[OutputArtifact],
    archive_name: &str,
) -> Result<OutputArtifact, DocpixError> {
    let entries: Vec<ArchiveEntry<'_>> = artifacts
        .iter()
        .map(|a| ArchiveEntry {
            filename: &a.filename,
            bytes: &a.bytes,
        })
        .collect();

    let archiver = engines.archiver();
    let bytes = archiver
        .bundle(&entries)
        .map_err(|e| e.into_error("archiver", |detail| DocpixError::ArchiveBuild { detail }))?;

    info!(
        "Bundled {} files into {} ({} bytes)",
        entries.len(),
        archive_name,
        bytes.len()
    );

    Ok(OutputArtifact::new(
        archive_name,
        bytes,
        archiver.mime_type(),
        ArtifactMetadata::Archive {
            entries: entries.len(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_offered_only_for_several_artifacts() {
        assert!(!should_offer_archive(0));
        assert!(!should_offer_archive(1));
        assert!(should_offer_archive(2));
        assert!(should_offer_archive(40));
    }
}
