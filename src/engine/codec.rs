//! Default [`ImageCodec`] backed by the `image` crate.
//!
//! JPEG and WebP honour the quality factor; PNG is always lossless. WebP goes
//! through libwebp (`webp` crate) since the `image` crate only writes
//! lossless WebP.

use super::{EncodeSettings, EngineResult, ImageCodec};
use crate::error::EngineFailure;
use crate::config::OutputFormat;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, bytes: &[u8]) -> EngineResult<DynamicImage> {
        Ok(image::load_from_memory(bytes)?)
    }

    fn encode(&self, image: &DynamicImage, settings: EncodeSettings) -> EngineResult<Vec<u8>> {
        let mut buf = Vec::new();
        match settings.format {
            OutputFormat::Jpeg => {
                let quality = jpeg_quality(settings.quality.unwrap_or(1.0));
                // JPEG has no alpha channel.
                let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
                image.to_rgb8().write_with_encoder(encoder)?;
            }
            OutputFormat::Png => {
                image.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
            }
            OutputFormat::WebP => {
                let quality = webp_quality(settings.quality.unwrap_or(1.0));
                let encoded = if image.color().has_alpha() {
                    let rgba = image.to_rgba8();
                    webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
                        .encode_simple(false, quality)
                } else {
                    let rgb = image.to_rgb8();
                    webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
                        .encode_simple(false, quality)
                };
                let encoded = encoded
                    .map_err(|e| EngineFailure::new(format!("webp encoding failed: {:?}", e)))?;
                buf.extend_from_slice(&encoded);
            }
        }

        debug!(
            "Encoded {}x{} as {} → {} bytes",
            image.width(),
            image.height(),
            settings.format,
            buf.len()
        );
        Ok(buf)
    }
}

/// Map a (0, 1] quality factor onto libjpeg's 1–100 scale.
fn jpeg_quality(q: f32) -> u8 {
    (q * 100.0).round().clamp(1.0, 100.0) as u8
}

/// libwebp takes a 0–100 float.
fn webp_quality(q: f32) -> f32 {
    (q * 100.0).clamp(0.0, 100.0)
}
