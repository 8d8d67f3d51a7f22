use egui::{Pos2, Rect, Vec2};
use uuid::Uuid;

use crate::raster::RasterImage;

/// A pasted sub-image floating above the base image until it is fixed.
#[derive(Clone, PartialEq)]
pub struct MovableItem {
    id: Uuid,
    image: RasterImage,
    position: Pos2,
    selected: bool,
}

// Custom Debug to keep pixel data out of log lines
impl std::fmt::Debug for MovableItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovableItem")
            .field("id", &self.id)
            .field("size", &(self.image.width(), self.image.height()))
            .field("position", &self.position)
            .field("selected", &self.selected)
            .finish()
    }
}

impl MovableItem {
    pub fn new(image: RasterImage, position: Pos2) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            position,
            selected: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn size(&self) -> Vec2 {
        self.image.size()
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size())
    }

    pub fn hit_test(&self, pos: Pos2) -> bool {
        self.rect().contains(pos)
    }

    /// Moves the item to `position`, keeping its box inside `bounds`.
    /// An item larger than `bounds` is pinned to the bounds' minimum.
    pub fn move_clamped(&mut self, position: Pos2, bounds: Rect) {
        let size = self.size();
        let max_x = (bounds.max.x - size.x).max(bounds.min.x);
        let max_y = (bounds.max.y - size.y).max(bounds.min.y);
        self.position = Pos2::new(
            position.x.clamp(bounds.min.x, max_x),
            position.y.clamp(bounds.min.y, max_y),
        );
    }

    /// Integer offset used when compositing into the base image. Fractional
    /// positions are truncated toward the origin.
    pub fn pixel_offset(&self) -> (i64, i64) {
        (self.position.x.floor() as i64, self.position.y.floor() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn item(w: u32, h: u32) -> MovableItem {
        MovableItem::new(RasterImage::filled(w, h, Rgba([0, 0, 0, 255])), Pos2::new(10.0, 10.0))
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(item(1, 1).id(), item(1, 1).id());
    }

    #[test]
    fn test_move_clamped_stays_inside() {
        let bounds = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 80.0));
        let mut floating = item(20, 30);

        floating.move_clamped(Pos2::new(95.0, -5.0), bounds);
        assert_eq!(floating.position(), Pos2::new(80.0, 0.0));

        floating.move_clamped(Pos2::new(-40.0, 70.0), bounds);
        assert_eq!(floating.position(), Pos2::new(0.0, 50.0));
        assert!(bounds.contains_rect(floating.rect()));
    }

    #[test]
    fn test_oversized_item_pins_to_origin() {
        let bounds = Rect::from_min_size(Pos2::ZERO, Vec2::new(10.0, 10.0));
        let mut floating = item(50, 5);
        floating.move_clamped(Pos2::new(7.0, 3.0), bounds);
        assert_eq!(floating.position(), Pos2::new(0.0, 3.0));
    }

    #[test]
    fn test_pixel_offset_truncates() {
        let bounds = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 100.0));
        let mut floating = item(4, 4);
        floating.move_clamped(Pos2::new(10.6, 20.9), bounds);
        assert_eq!(floating.pixel_offset(), (10, 20));
    }
}
