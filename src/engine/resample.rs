//! Default [`Resampler`]: SIMD convolution via `fast_image_resize`, followed
//! by an optional unsharp mask.

use super::{EngineResult, Resampler};
use crate::config::{ResampleFilter, UnsharpMask};
use crate::error::EngineFailure;
use fast_image_resize as fr;
use image::{DynamicImage, RgbaImage};

/// fast_image_resize-backed resampler. Stateless; a fresh `fr::Resizer` is
/// built per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastResampler;

impl Resampler for FastResampler {
    fn resample(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        filter: ResampleFilter,
        sharpen: &UnsharpMask,
    ) -> EngineResult<DynamicImage> {
        if width == 0 || height == 0 {
            return Err(EngineFailure::new(format!(
                "cannot resample to {width}x{height}"
            )));
        }

        let rgba = image.to_rgba8();
        let (src_w, src_h) = rgba.dimensions();
        let src = fr::images::Image::from_vec_u8(src_w, src_h, rgba.into_raw(), fr::PixelType::U8x4)
            .map_err(|e| EngineFailure::new(format!("source buffer: {:?}", e)))?;

        let mut dst = fr::images::Image::new(width, height, fr::PixelType::U8x4);
        let mut resizer = fr::Resizer::new();
        let options =
            fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(filter_type(filter)));

        resizer
            .resize(&src, &mut dst, &options)
            .map_err(|e| EngineFailure::new(format!("resample: {:?}", e)))?;

        let resized = RgbaImage::from_raw(width, height, dst.into_vec())
            .ok_or_else(|| EngineFailure::new("resampled buffer has the wrong length"))?;

        let out = if sharpen.is_enabled() {
            unsharp_mask(&resized, sharpen)
        } else {
            resized
        };
        Ok(DynamicImage::ImageRgba8(out))
    }
}

fn filter_type(filter: ResampleFilter) -> fr::FilterType {
    match filter {
        ResampleFilter::Bilinear => fr::FilterType::Bilinear,
        ResampleFilter::CatmullRom => fr::FilterType::CatmullRom,
        ResampleFilter::Mitchell => fr::FilterType::Mitchell,
        ResampleFilter::Lanczos3 => fr::FilterType::Lanczos3,
    }
}

/// Classic unsharp mask on the colour channels. Alpha passes through.
pub fn unsharp_mask(image: &RgbaImage, mask: &UnsharpMask) -> RgbaImage {
    let blurred = image::imageops::blur(image, mask.radius);
    let gain = mask.amount / 100.0;
    let threshold = mask.threshold as i16;

    let mut out = image.clone();
    for (dst, (src, blur)) in out
        .pixels_mut()
        .zip(image.pixels().zip(blurred.pixels()))
    {
        for c in 0..3 {
            let diff = src.0[c] as i16 - blur.0[c] as i16;
            if diff.abs() >= threshold {
                let v = src.0[c] as f32 + diff as f32 * gain;
                dst.0[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
        dst.0[3] = src.0[3];
    }
    out
}
