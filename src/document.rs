use egui::Rect;
use uuid::Uuid;

use crate::error::{EditorError, EditorResult};
use crate::item::MovableItem;
use crate::raster::RasterImage;

/// The current base image plus the floating items above it.
#[derive(Debug, Default)]
pub struct Document {
    image: Option<RasterImage>,
    items: Vec<MovableItem>,
}

/// Deep copy of everything a command may change in a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub image: Option<RasterImage>,
    pub items: Vec<MovableItem>,
}

impl From<DocumentSnapshot> for Document {
    fn from(snapshot: DocumentSnapshot) -> Self {
        Self {
            image: snapshot.image,
            items: snapshot.items,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&RasterImage> {
        self.image.as_ref()
    }

    pub fn require_image(&self) -> EditorResult<&RasterImage> {
        self.image.as_ref().ok_or(EditorError::NoActiveImage)
    }

    pub fn require_image_mut(&mut self) -> EditorResult<&mut RasterImage> {
        self.image.as_mut().ok_or(EditorError::NoActiveImage)
    }

    pub fn set_image(&mut self, image: RasterImage) {
        self.image = Some(image);
    }

    /// Scene rectangle of the base image, `None` before an image is loaded.
    pub fn bounds(&self) -> Option<Rect> {
        self.image.as_ref().map(RasterImage::bounds)
    }

    pub fn items(&self) -> &[MovableItem] {
        &self.items
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn add_item(&mut self, item: MovableItem) {
        self.items.push(item);
    }

    pub fn find_item(&self, id: Uuid) -> Option<&MovableItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find_item_mut(&mut self, id: Uuid) -> Option<&mut MovableItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Topmost item under `pos`. Later items are drawn above earlier ones.
    pub fn item_at(&self, pos: egui::Pos2) -> Option<Uuid> {
        self.items.iter().rev().find(|item| item.hit_test(pos)).map(MovableItem::id)
    }

    /// Marks only `id` as selected.
    pub fn select_only(&mut self, id: Uuid) {
        for item in &mut self.items {
            item.set_selected(item.id() == id);
        }
    }

    /// Composites the chosen items into the base image in collection order and
    /// removes them. Returns how many were fixed.
    pub fn fix_items(&mut self, only_selected: bool) -> usize {
        let Some(image) = self.image.as_mut() else {
            return 0;
        };
        let mut fixed = 0;
        self.items.retain(|item| {
            if only_selected && !item.is_selected() {
                return true;
            }
            let (x, y) = item.pixel_offset();
            image.composite(item.image(), x, y);
            fixed += 1;
            false
        });
        fixed
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            image: self.image.clone(),
            items: self.items.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: &DocumentSnapshot) {
        self.image = snapshot.image.clone();
        self.items = snapshot.items.clone();
    }

    /// Drops the image and all floating items.
    pub fn reset(&mut self) {
        self.image = None;
        self.items.clear();
    }
}
