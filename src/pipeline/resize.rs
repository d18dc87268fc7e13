//! Resize: decode, compute target size, resample, re-encode.

use crate::config::{OutputFormat, ResizeConfig};
use crate::engine::{EncodeSettings, Engines};
use crate::error::DocpixError;
use crate::output::{ArtifactMetadata, OutputArtifact};
use crate::pipeline::dimensions::{compute_dimensions, Dimensions};
use crate::pipeline::input::{InputFile, MediaKind};
use tracing::{debug, info};

/// Resize `input` according to `config`. Blocking.
///
/// When the computed size equals the source size the original bytes are
/// returned as-is (same allocation, original filename), so asking for no
/// change never costs a lossy re-encode.
pub fn resize(
    engines: &Engines,
    input: &InputFile,
    config: &ResizeConfig,
) -> Result<OutputArtifact, DocpixError> {
    if config.width == Some(0) || config.height == Some(0) {
        return Err(DocpixError::InvalidConfig(
            "target width and height must be positive".into(),
        ));
    }

    let source = engines
        .codec()
        .decode(input.bytes())
        .map_err(|e| {
            e.into_error("image codec", |detail| DocpixError::ImageLoad {
                name: input.name().to_string(),
                detail,
            })
        })?;

    let original = Dimensions::new(source.width(), source.height());
    let target = compute_dimensions(original.width, original.height, config.width, config.height);

    let output_format = encode_format(input.kind());

    if target == original {
        debug!(
            "{} is already {}x{}; returning original bytes",
            input.name(),
            original.width,
            original.height
        );
        let mime = input
            .kind()
            .mime_type()
            .unwrap_or_else(|| output_format.mime_type());
        return Ok(OutputArtifact::new(
            input.name(),
            input.shared_bytes(),
            mime,
            ArtifactMetadata::Resized {
                width: original.width,
                height: original.height,
            },
        ));
    }

    let resized = engines
        .resampler()
        .resample(
            &source,
            target.width,
            target.height,
            config.filter,
            &config.sharpen,
        )
        .map_err(|e| e.into_error("resampler", |detail| DocpixError::ResizeEngine { detail }))?;
    drop(source);

    let settings = EncodeSettings::with_quality(output_format, config.encode_quality);
    let bytes = engines
        .codec()
        .encode(&resized, settings)
        .map_err(|e| e.into_error("image codec", |detail| DocpixError::Encode { detail }))?;

    let extension = input.extension().unwrap_or(output_format.extension());
    let filename = format!(
        "{}_{}x{}.{}",
        input.stem(),
        target.width,
        target.height,
        extension
    );

    info!(
        "Resized {} from {}x{} to {}x{} ({} bytes)",
        input.name(),
        original.width,
        original.height,
        target.width,
        target.height,
        bytes.len()
    );

    Ok(OutputArtifact::new(
        filename,
        bytes,
        output_format.mime_type(),
        ArtifactMetadata::Resized {
            width: target.width,
            height: target.height,
        },
    ))
}

/// Keep the source encoding when we can write it back; PNG otherwise.
fn encode_format(kind: MediaKind) -> OutputFormat {
    match kind {
        MediaKind::Image(format) => OutputFormat::from_image_format(format).unwrap_or(OutputFormat::Png),
        _ => OutputFormat::Png,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritable_sources_fall_back_to_png() {
        assert_eq!(
            encode_format(MediaKind::Image(image::ImageFormat::Jpeg)),
            OutputFormat::Jpeg
        );
        assert_eq!(
            encode_format(MediaKind::Image(image::ImageFormat::Gif)),
            OutputFormat::Png
        );
        assert_eq!(encode_format(MediaKind::Unknown), OutputFormat::Png);
    }

    #[test]
    fn zero_target_rejected_before_decoding() {
        let engines = Engines::default();
        let input = InputFile::from_bytes("x.png", b"not even an image".to_vec());
        let config = ResizeConfig {
            width: Some(0),
            ..ResizeConfig::default()
        };
        assert!(matches!(
            resize(&engines, &input, &config),
            Err(DocpixError::InvalidConfig(_))
        ));
    }
}
