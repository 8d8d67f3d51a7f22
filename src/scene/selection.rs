use egui::{CursorIcon, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::raster::PixelRect;

/// One of the eight resize handles around a finalised selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
}

impl HandleKind {
    /// Creation order. Later handles are drawn, and hit, above earlier ones.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::TopLeft,
        HandleKind::TopRight,
        HandleKind::BottomLeft,
        HandleKind::BottomRight,
        HandleKind::Top,
        HandleKind::Bottom,
        HandleKind::Left,
        HandleKind::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandleKind::TopLeft => "top_left",
            HandleKind::TopRight => "top_right",
            HandleKind::BottomLeft => "bottom_left",
            HandleKind::BottomRight => "bottom_right",
            HandleKind::Top => "top",
            HandleKind::Bottom => "bottom",
            HandleKind::Left => "left",
            HandleKind::Right => "right",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            HandleKind::TopLeft | HandleKind::BottomRight => CursorIcon::ResizeNwSe,
            HandleKind::TopRight | HandleKind::BottomLeft => CursorIcon::ResizeNeSw,
            HandleKind::Top | HandleKind::Bottom => CursorIcon::ResizeVertical,
            HandleKind::Left | HandleKind::Right => CursorIcon::ResizeHorizontal,
        }
    }

    /// Where this handle sits on `rect`
    pub fn anchor(&self, rect: Rect) -> Pos2 {
        let center = rect.center();
        match self {
            HandleKind::TopLeft => rect.left_top(),
            HandleKind::TopRight => rect.right_top(),
            HandleKind::BottomLeft => rect.left_bottom(),
            HandleKind::BottomRight => rect.right_bottom(),
            HandleKind::Top => Pos2::new(center.x, rect.top()),
            HandleKind::Bottom => Pos2::new(center.x, rect.bottom()),
            HandleKind::Left => Pos2::new(rect.left(), center.y),
            HandleKind::Right => Pos2::new(rect.right(), center.y),
        }
    }

    /// Moves the edges this handle controls to `pos`, then normalises the
    /// result and clamps it to `bounds`.
    ///
    /// A corner moves its two adjacent edges, an edge handle only its own.
    /// Dragging past the opposite edge flips the rectangle instead of
    /// producing a negative size.
    pub fn drag(&self, rect: Rect, pos: Pos2, bounds: Rect) -> Rect {
        let pos = bounds.clamp(pos);
        let (mut min, mut max) = (rect.min, rect.max);
        match self {
            HandleKind::TopLeft => min = pos,
            HandleKind::TopRight => {
                max.x = pos.x;
                min.y = pos.y;
            }
            HandleKind::BottomLeft => {
                min.x = pos.x;
                max.y = pos.y;
            }
            HandleKind::BottomRight => max = pos,
            HandleKind::Top => min.y = pos.y,
            HandleKind::Bottom => max.y = pos.y,
            HandleKind::Left => min.x = pos.x,
            HandleKind::Right => max.x = pos.x,
        }
        clamp_rect(Rect::from_two_pos(min, max), bounds)
    }
}

/// Keeps `rect` inside `bounds` by moving each edge inwards.
pub fn clamp_rect(rect: Rect, bounds: Rect) -> Rect {
    Rect::from_min_max(bounds.clamp(rect.min), bounds.clamp(rect.max))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub rect: Rect,
}

impl Handle {
    pub fn new(kind: HandleKind, selection: Rect, size: f32) -> Self {
        Self {
            kind,
            rect: Rect::from_center_size(kind.anchor(selection), Vec2::splat(size)),
        }
    }
}

/// The single rectangular selection, in image coordinates.
///
/// Has no handles while it is being dragged out and all eight once
/// finalised.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    rect: Rect,
    handles: Vec<Handle>,
}

impl Selection {
    /// A selection still being dragged out
    pub fn in_progress(rect: Rect) -> Self {
        Self { rect, handles: Vec::new() }
    }

    pub fn finalized(rect: Rect, handle_size: f32) -> Self {
        let mut selection = Self::in_progress(rect);
        selection.create_handles(handle_size);
        selection
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn pixel_rect(&self) -> Option<PixelRect> {
        PixelRect::from_rect(self.rect)
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    pub fn is_finalized(&self) -> bool {
        !self.handles.is_empty()
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Regenerates all eight handles for the current rectangle
    pub fn create_handles(&mut self, handle_size: f32) {
        self.handles = HandleKind::ALL
            .iter()
            .map(|&kind| Handle::new(kind, self.rect, handle_size))
            .collect();
    }

    pub fn handle_at(&self, pos: Pos2) -> Option<HandleKind> {
        self.handles
            .iter()
            .rev()
            .find(|handle| handle.rect.contains(pos))
            .map(|handle| handle.kind)
    }
}
