//! Compress: re-encode at a requested quality and format. No resizing.

use crate::config::CompressConfig;
use crate::engine::{EncodeSettings, Engines};
use crate::error::DocpixError;
use crate::output::{ArtifactMetadata, OutputArtifact};
use crate::pipeline::input::InputFile;
use tracing::info;

/// Re-encode `input` per `config`. Blocking.
///
/// Quality only reaches the encoder for lossy formats. Either step failing
/// (decode or encode) is reported as [`DocpixError::CompressionEngine`].
pub fn compress(
    engines: &Engines,
    input: &InputFile,
    config: &CompressConfig,
) -> Result<OutputArtifact, DocpixError> {
    if !(config.quality > 0.0 && config.quality <= 1.0) {
        return Err(DocpixError::InvalidConfig(format!(
            "quality must be in (0, 1], got {}",
            config.quality
        )));
    }

    let original_size = input.size();
    let format = config.format.output_format();

    let image = engines
        .codec()
        .decode(input.bytes())
        .map_err(|e| {
            e.into_error("image codec", |detail| DocpixError::CompressionEngine {
                detail: format!("cannot decode '{}': {}", input.name(), detail),
            })
        })?;

    let bytes = engines
        .codec()
        .encode(&image, EncodeSettings::with_quality(format, config.quality))
        .map_err(|e| {
            e.into_error("image codec", |detail| DocpixError::CompressionEngine {
                detail: format!("cannot encode as {format}: {detail}"),
            })
        })?;

    let compressed_size = bytes.len() as u64;
    info!(
        "Compressed {}: {} → {} bytes as {} (quality {})",
        input.name(),
        original_size,
        compressed_size,
        format,
        config.quality
    );

    Ok(OutputArtifact::new(
        format!("{}_compressed.{}", input.stem(), config.format.extension()),
        bytes,
        format.mime_type(),
        ArtifactMetadata::Compressed {
            original_size,
            compressed_size,
        },
    ))
}
