//! Overlay geometry for a view to paint above the image.
//!
//! Everything here is in image coordinates. A view that zooms or scrolls
//! transforms the shapes itself.

use egui::{Color32, ColorImage, Pos2, Rect, Shape, Stroke};

use crate::document::Document;
use crate::raster::RasterImage;
use crate::scene::{Marquee, Scene, Selection};

pub const HANDLE_FILL: Color32 = Color32::from_rgb(255, 0, 0);
pub const HANDLE_OUTLINE: f32 = 2.0;
pub const MARQUEE_COLOR: Color32 = Color32::BLACK;
pub const ITEM_OUTLINE: Color32 = Color32::from_rgb(30, 120, 255);

/// Pixels in the form egui textures are created from
pub fn to_color_image(image: &RasterImage) -> ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, image.as_rgba().as_raw())
}

/// All overlay shapes, bottom to top: floating item outlines, the marquee,
/// then the handles.
pub fn overlay_shapes(scene: &Scene, document: &Document) -> Vec<Shape> {
    let mut shapes = item_outlines(document);
    if let Some(selection) = scene.selection() {
        shapes.extend(marquee_shapes(selection.rect(), scene.marquee(), scene.pen_width()));
        shapes.extend(handle_shapes(selection));
    }
    shapes
}

pub fn item_outlines(document: &Document) -> Vec<Shape> {
    document
        .items()
        .iter()
        .filter(|item| item.is_selected())
        .map(|item| Shape::rect_stroke(item.rect(), 0.0, Stroke::new(1.0, ITEM_OUTLINE)))
        .collect()
}

/// Dashed outline, 4 on and 4 off in pen-width units, shifted by the
/// marquee's animation offset.
pub fn marquee_shapes(rect: Rect, marquee: &Marquee, pen_width: f32) -> Vec<Shape> {
    let path: [Pos2; 5] = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    let dash = Marquee::DASH * pen_width;
    Shape::dashed_line_with_offset(
        &path,
        Stroke::new(pen_width, MARQUEE_COLOR),
        &[dash],
        &[dash],
        marquee.dash_offset() as f32 * pen_width,
    )
}

/// Red squares with a black outline
pub fn handle_shapes(selection: &Selection) -> Vec<Shape> {
    selection
        .handles()
        .iter()
        .flat_map(|handle| {
            [
                Shape::rect_filled(handle.rect, 0.0, HANDLE_FILL),
                Shape::rect_stroke(handle.rect, 0.0, Stroke::new(HANDLE_OUTLINE, Color32::BLACK)),
            ]
        })
        .collect()
}
