//! Geometric transforms: crop, rotate, flip and resize.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};
use crate::raster::{PixelRect, RasterImage};

/// A rotation or a mirror. A single transform command carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransformKind {
    /// Signed degrees, positive turns clockwise on screen
    Rotate { degrees: f32 },
    /// `horizontal` mirrors left to right, otherwise top to bottom
    Flip { horizontal: bool },
}

impl TransformKind {
    pub fn apply(&self, image: &RasterImage) -> RasterImage {
        match *self {
            TransformKind::Rotate { degrees } => rotate(image, degrees),
            TransformKind::Flip { horizontal } => flip(image, horizontal),
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            TransformKind::Rotate { degrees } => format!("Rotated by {degrees}°"),
            TransformKind::Flip { horizontal: true } => "Flipped horizontally".to_owned(),
            TransformKind::Flip { horizontal: false } => "Flipped vertically".to_owned(),
        }
    }
}

pub fn crop(image: &RasterImage, rect: PixelRect) -> EditorResult<RasterImage> {
    image.crop(rect)
}

pub fn flip(image: &RasterImage, horizontal: bool) -> RasterImage {
    let pixels = if horizontal {
        imageops::flip_horizontal(image.as_rgba())
    } else {
        imageops::flip_vertical(image.as_rgba())
    };
    pixels.into()
}

/// Rotates by arbitrary signed degrees.
///
/// Quarter turns are exact; any other angle is resampled bilinearly onto a
/// transparent canvas sized to the rotated bounding box.
pub fn rotate(image: &RasterImage, degrees: f32) -> RasterImage {
    let degrees = f64::from(degrees);
    let quarters = degrees.rem_euclid(360.0) / 90.0;
    if (quarters - quarters.round()).abs() < 1e-9 {
        let src = image.as_rgba();
        return match quarters.round() as i64 % 4 {
            0 => image.clone(),
            1 => imageops::rotate90(src).into(),
            2 => imageops::rotate180(src).into(),
            _ => imageops::rotate270(src).into(),
        };
    }
    rotate_smooth(image.as_rgba(), degrees.to_radians()).into()
}

/// Size of the axis-aligned box holding a `width` x `height` image rotated
/// by `radians`.
pub fn rotated_extent(width: u32, height: u32, radians: f64) -> (u32, u32) {
    let (sin, cos) = radians.sin_cos();
    let (w, h) = (f64::from(width), f64::from(height));
    // Trim float noise so that e.g. 100.0000001 does not become 101
    let snap = |v: f64| ((v - 1e-6).ceil().max(1.0)) as u32;
    (snap(w * cos.abs() + h * sin.abs()), snap(w * sin.abs() + h * cos.abs()))
}

fn rotate_smooth(src: &RgbaImage, radians: f64) -> RgbaImage {
    let (dst_w, dst_h) = rotated_extent(src.width(), src.height(), radians);
    let (sin, cos) = radians.sin_cos();
    let src_cx = f64::from(src.width()) * 0.5;
    let src_cy = f64::from(src.height()) * 0.5;
    let dst_cx = f64::from(dst_w) * 0.5;
    let dst_cy = f64::from(dst_h) * 0.5;

    RgbaImage::from_fn(dst_w, dst_h, |dx, dy| {
        let px = f64::from(dx) + 0.5 - dst_cx;
        let py = f64::from(dy) + 0.5 - dst_cy;
        // Inverse of the clockwise (y down) rotation
        let sx = px * cos + py * sin + src_cx;
        let sy = -px * sin + py * cos + src_cy;
        bilinear_sample(src, (sx - 0.5) as f32, (sy - 0.5) as f32)
    })
}

/// Bilinear sampling, transparent outside the image.
fn bilinear_sample(img: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let sample = |sx: i64, sy: i64| -> [f32; 4] {
        if sx < 0 || sy < 0 || sx >= i64::from(img.width()) || sy >= i64::from(img.height()) {
            [0.0; 4]
        } else {
            let p = img.get_pixel(sx as u32, sy as u32);
            [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
        }
    };

    let tl = sample(x0, y0);
    let tr = sample(x0 + 1, y0);
    let bl = sample(x0, y0 + 1);
    let br = sample(x0 + 1, y0 + 1);

    let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = lerp(tl[c], tr[c], fx);
        let bot = lerp(bl[c], br[c], fx);
        out[c] = lerp(top, bot, fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

/// Largest size with the source aspect ratio that fits inside the target box.
pub fn fit_within(width: u32, height: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    let (w, h) = (u64::from(width.max(1)), u64::from(height.max(1)));
    let (tw, th) = (u64::from(target_w), u64::from(target_h));
    let rw = th * w / h;
    let (out_w, out_h) = if rw <= tw { (rw, th) } else { (tw, tw * h / w) };
    (out_w.max(1) as u32, out_h.max(1) as u32)
}

/// Smoothly scales to the target size, or into the target box when
/// `keep_aspect` is set.
pub fn resize(
    image: &RasterImage,
    target_w: u32,
    target_h: u32,
    keep_aspect: bool,
) -> EditorResult<RasterImage> {
    if target_w == 0 || target_h == 0 {
        return Err(EditorError::InvalidParameters(format!(
            "target size {target_w}x{target_h} must be non-zero"
        )));
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(EditorError::InvalidParameters("cannot resize an empty image".to_owned()));
    }
    let (w, h) = if keep_aspect {
        fit_within(image.width(), image.height(), target_w, target_h)
    } else {
        (target_w, target_h)
    };
    Ok(imageops::resize(image.as_rgba(), w, h, FilterType::Triangle).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn two_pixel_image() -> RasterImage {
        let mut image = RasterImage::filled(2, 1, RED);
        image.fill_rect(PixelRect::new(1, 0, 1, 1), BLUE);
        image
    }

    #[test]
    fn test_quarter_turns_are_exact() {
        let image = two_pixel_image();

        let cw = rotate(&image, 90.0);
        assert_eq!((cw.width(), cw.height()), (1, 2));
        assert_eq!(cw.pixel(0, 0), RED);
        assert_eq!(cw.pixel(0, 1), BLUE);

        let ccw = rotate(&image, -90.0);
        assert_eq!(ccw.pixel(0, 0), BLUE);
        assert_eq!(ccw.pixel(0, 1), RED);

        assert_eq!(rotate(&image, 360.0), image);
        assert_eq!(rotate(&rotate(&image, 180.0), 180.0), image);
    }

    #[test]
    fn test_arbitrary_rotation_grows_canvas() {
        let image = RasterImage::filled(100, 50, RED);
        let rotated = rotate(&image, 30.0);
        assert_eq!((rotated.width(), rotated.height()), (112, 94));
        // Centre stays opaque, corners are outside the rotated content
        assert_eq!(rotated.pixel(56, 47), RED);
        assert_eq!(rotated.pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_flip_axes() {
        let image = two_pixel_image();
        let mirrored = flip(&image, true);
        assert_eq!(mirrored.pixel(0, 0), BLUE);
        assert_eq!(flip(&image, false), image);
    }

    #[test]
    fn test_fit_within_keeps_ratio() {
        assert_eq!(fit_within(200, 100, 50, 50), (50, 25));
        assert_eq!(fit_within(100, 200, 50, 50), (25, 50));
        assert_eq!(fit_within(100, 100, 300, 40), (40, 40));
    }

    #[test]
    fn test_resize_rejects_zero_target() {
        let image = RasterImage::filled(10, 10, RED);
        assert!(matches!(resize(&image, 0, 5, false), Err(EditorError::InvalidParameters(_))));
        let stretched = resize(&image, 30, 5, false).unwrap();
        assert_eq!((stretched.width(), stretched.height()), (30, 5));
    }
}
