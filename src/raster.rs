use egui::{Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage, imageops};
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};

/// Integer rectangle in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rounds a floating scene rectangle to pixels.
    ///
    /// The corners are rounded, not the size, so a rectangle that ends on
    /// the image edge still ends there after rounding. Returns `None` when
    /// the rectangle is not finite or starts left of or above the image
    /// origin.
    pub fn from_rect(rect: Rect) -> Option<Self> {
        let corners = [rect.min.x, rect.min.y, rect.max.x, rect.max.y];
        if corners.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let [x0, y0, x1, y1] = corners.map(f32::round);
        if x0 < 0.0 || y0 < 0.0 {
            return None;
        }
        let width = (x1 - x0).max(0.0);
        let height = (y1 - y0).max(0.0);
        Some(Self::new(x0 as u32, y0 as u32, width as u32, height as u32))
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True if the rectangle is non-empty and lies fully inside a
    /// `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        !self.is_empty()
            && u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

/// An owned RGBA8 pixel buffer.
///
/// Cloning copies the pixels, so a clone held as an undo snapshot never
/// aliases the live image.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("data_len", &self.pixels.as_raw().len())
            .finish()
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(pixels: RgbaImage) -> Self {
        Self { pixels }
    }
}

impl RasterImage {
    /// Fully transparent image
    pub fn new(width: u32, height: u32) -> Self {
        Self { pixels: RgbaImage::new(width, height) }
    }

    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self { pixels: RgbaImage::from_pixel(width, height, color) }
    }

    /// Wraps raw RGBA bytes; `None` if the length does not match the size.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(Self::from)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    /// The larger of the two dimensions
    pub fn extent(&self) -> u32 {
        self.width().max(self.height())
    }

    /// Scene rectangle covered by the image. The image always sits at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.size())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn as_rgba_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Checks that `rect` is non-empty and inside this image.
    pub fn validate_rect(&self, rect: PixelRect) -> EditorResult<PixelRect> {
        if rect.fits_within(self.width(), self.height()) {
            Ok(rect)
        } else {
            Err(EditorError::InvalidSelection)
        }
    }

    /// Copies a sub-rectangle into a new image.
    pub fn crop(&self, rect: PixelRect) -> EditorResult<RasterImage> {
        let rect = self.validate_rect(rect)?;
        let view = imageops::crop_imm(&self.pixels, rect.x, rect.y, rect.width, rect.height);
        Ok(Self { pixels: view.to_image() })
    }

    /// Overwrites every pixel of `rect` (clipped to the image) with `color`.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        let x_end = rect.x.saturating_add(rect.width).min(self.width());
        let y_end = rect.y.saturating_add(rect.height).min(self.height());
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                self.pixels.put_pixel(x, y, color);
            }
        }
    }

    /// Source-over composites `top` with its top-left corner at `(x, y)`.
    /// Parts falling outside this image are dropped.
    pub fn composite(&mut self, top: &RasterImage, x: i64, y: i64) {
        imageops::overlay(&mut self.pixels, &top.pixels, x, y);
    }

    /// Composites `top` at the rectangle's origin, clipped to the rectangle.
    pub fn composite_into(&mut self, top: &RasterImage, rect: PixelRect) {
        let width = top.width().min(rect.width);
        let height = top.height().min(rect.height);
        if width == 0 || height == 0 {
            return;
        }
        let clipped = imageops::crop_imm(&top.pixels, 0, 0, width, height).to_image();
        imageops::overlay(&mut self.pixels, &clipped, i64::from(rect.x), i64::from(rect.y));
    }

    /// True if every pixel equals `color`
    pub fn is_uniform(&self, color: Rgba<u8>) -> bool {
        self.pixels.pixels().all(|p| *p == color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn test_pixel_rect_rounding() {
        let rect = Rect::from_min_max(Pos2::new(4.6, 5.2), Pos2::new(24.4, 25.1));
        assert_eq!(PixelRect::from_rect(rect), Some(PixelRect::new(5, 5, 19, 20)));
        // Half-pixel start dragged to the far edge stays inside a 100x100 image
        let to_edge = Rect::from_min_max(Pos2::new(10.5, 10.5), Pos2::new(100.0, 100.0));
        let pixels = PixelRect::from_rect(to_edge).unwrap();
        assert_eq!(pixels, PixelRect::new(11, 11, 89, 89));
        assert!(pixels.fits_within(100, 100));
        assert_eq!(PixelRect::from_rect(Rect::NOTHING), None);
        let negative = Rect::from_min_max(Pos2::new(-3.0, 0.0), Pos2::new(5.0, 5.0));
        assert_eq!(PixelRect::from_rect(negative), None);
    }

    #[test]
    fn test_crop_rejects_invalid_rects() {
        let image = RasterImage::filled(10, 10, WHITE);
        assert!(image.crop(PixelRect::new(0, 0, 0, 5)).is_err());
        assert!(image.crop(PixelRect::new(5, 5, 6, 2)).is_err());
        let cropped = image.crop(PixelRect::new(2, 3, 4, 5)).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (4, 5));
    }

    #[test]
    fn test_clone_is_deep() {
        let original = RasterImage::filled(4, 4, WHITE);
        let mut copy = original.clone();
        copy.fill_rect(PixelRect::new(0, 0, 2, 2), RED);
        assert!(original.is_uniform(WHITE));
        assert_eq!(copy.pixel(1, 1), RED);
    }

    #[test]
    fn test_composite_into_clips_to_rect() {
        let mut base = RasterImage::filled(10, 10, WHITE);
        let top = RasterImage::filled(8, 8, RED);
        base.composite_into(&top, PixelRect::new(1, 1, 3, 3));
        assert_eq!(base.pixel(1, 1), RED);
        assert_eq!(base.pixel(3, 3), RED);
        assert_eq!(base.pixel(4, 4), WHITE);
        assert_eq!(base.pixel(0, 0), WHITE);
    }
}
