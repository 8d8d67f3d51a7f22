//! Tonal adjustments: auto-balance, brightness, contrast and gamma.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::raster::RasterImage;

/// Fraction of pixels clipped at each end of a channel histogram.
pub const DEFAULT_CLIP_FRACTION: f64 = 0.05;

/// Values handed in by the adjustment dialog.
///
/// `brightness` and `contrast` are offsets from the neutral factor 1.0,
/// `gamma` is used as a raw factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentParams {
    pub brightness: f32,
    pub contrast: f32,
    pub gamma: f32,
    pub autobalance: bool,
}

impl Default for AdjustmentParams {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            gamma: 1.0,
            autobalance: false,
        }
    }
}

impl AdjustmentParams {
    pub fn is_identity(&self) -> bool {
        !self.autobalance && self.brightness == 0.0 && self.contrast == 0.0 && self.gamma == 1.0
    }
}

/// Runs the full chain: auto-balance, brightness, contrast, gamma.
///
/// Neutral steps are skipped. Gamma is applied as a second brightness-style
/// scale, not as a power curve.
pub fn apply_adjustments(image: &RasterImage, params: &AdjustmentParams, clip: f64) -> RasterImage {
    let mut result = if params.autobalance {
        auto_balance(image, clip)
    } else {
        image.clone()
    };
    if params.brightness != 0.0 {
        result = enhance_brightness(&result, 1.0 + params.brightness);
    }
    if params.contrast != 0.0 {
        result = enhance_contrast(&result, 1.0 + params.contrast);
    }
    if params.gamma != 1.0 {
        result = enhance_brightness(&result, params.gamma);
    }
    result
}

pub fn histogram(image: &RgbaImage, channel: usize) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for pixel in image.pixels() {
        hist[pixel[channel] as usize] += 1;
    }
    hist
}

/// Finds the `(low, high)` stretch bounds of one channel.
///
/// `low` is the first value at which the cumulative count from below exceeds
/// `clip * total`, `high` the same from above. The result always has
/// `low < high`.
pub fn channel_bounds(hist: &[u64; 256], total: u64, clip: f64) -> (u8, u8) {
    let threshold = total as f64 * clip;

    let mut low = 0usize;
    let mut count = 0u64;
    for (value, &n) in hist.iter().enumerate() {
        count += n;
        if count as f64 > threshold {
            low = value;
            break;
        }
    }

    let mut high = 255usize;
    count = 0;
    for (value, &n) in hist.iter().enumerate().rev() {
        count += n;
        if count as f64 > threshold {
            high = value;
            break;
        }
    }

    if low >= high {
        high = if low < 255 { low + 1 } else { 255 };
        low = high.saturating_sub(1);
    }
    (low as u8, high as u8)
}

/// Stretches each colour channel so its clipped range covers 0..=255.
pub fn auto_balance(image: &RasterImage, clip: f64) -> RasterImage {
    let src = image.as_rgba();
    let total = u64::from(src.width()) * u64::from(src.height());

    let mut luts = [[0u8; 256]; 3];
    for (channel, lut) in luts.iter_mut().enumerate() {
        let (low, high) = channel_bounds(&histogram(src, channel), total, clip);
        let range = f32::from(high - low).max(1.0);
        for (value, entry) in lut.iter_mut().enumerate() {
            let stretched = (value as f32 - f32::from(low)) * 255.0 / range;
            // Truncate like an integer cast of the float result
            *entry = stretched.clamp(0.0, 255.0) as u8;
        }
    }
    map_channels(image, &luts)
}

/// Scales colour channels by `factor` (blend with black).
pub fn enhance_brightness(image: &RasterImage, factor: f32) -> RasterImage {
    let lut = blend_lut(0.0, factor);
    map_channels(image, &[lut; 3])
}

/// Blends colour channels with the image's mean grey level.
pub fn enhance_contrast(image: &RasterImage, factor: f32) -> RasterImage {
    let mean = mean_luma(image.as_rgba()) as f32;
    let lut = blend_lut(mean, factor);
    map_channels(image, &[lut; 3])
}

/// Rounded mean of the ITU-R 601 luma over all pixels.
pub fn mean_luma(image: &RgbaImage) -> u8 {
    let total = u64::from(image.width()) * u64::from(image.height());
    if total == 0 {
        return 0;
    }
    let sum: u64 = image.pixels().map(|p| u64::from(luma(p[0], p[1], p[2]))).sum();
    ((sum as f64 / total as f64) + 0.5) as u8
}

pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b) + 500) / 1000) as u8
}

fn blend_lut(degenerate: f32, factor: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (value, entry) in lut.iter_mut().enumerate() {
        let blended = degenerate + (value as f32 - degenerate) * factor;
        *entry = blended.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

fn map_channels(image: &RasterImage, luts: &[[u8; 256]; 3]) -> RasterImage {
    let mut out = image.as_rgba().clone();
    for pixel in out.pixels_mut() {
        for (channel, lut) in luts.iter().enumerate() {
            pixel[channel] = lut[pixel[channel] as usize];
        }
    }
    out.into()
}
