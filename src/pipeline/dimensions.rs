//! Target-size calculation for the resize pipeline.

use serde::{Deserialize, Serialize};

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Compute the output size for a `source_w × source_h` image.
///
/// | width | height | result |
/// |-------|--------|--------|
/// | set   | set    | both used verbatim (may distort) |
/// | set   | —      | height follows the aspect ratio |
/// | —     | set    | width follows the aspect ratio |
/// | —     | —      | source size unchanged |
///
/// Derived sides are rounded to the nearest pixel and never drop below 1.
/// Inputs are assumed positive.
pub fn compute_dimensions(
    source_w: u32,
    source_h: u32,
    target_w: Option<u32>,
    target_h: Option<u32>,
) -> Dimensions {
    match (target_w, target_h) {
        (Some(width), Some(height)) => Dimensions::new(width, height),
        (Some(width), None) => {
            Dimensions::new(width, scale_side(width, source_h, source_w))
        }
        (None, Some(height)) => {
            Dimensions::new(scale_side(height, source_w, source_h), height)
        }
        (None, None) => Dimensions::new(source_w, source_h),
    }
}

/// `round(known × numerator / denominator)`, clamped to at least one pixel.
fn scale_side(known: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return known.max(1);
    }
    let scaled = (known as f64 * numerator as f64 / denominator as f64).round();
    (scaled as u32).max(1)
}
