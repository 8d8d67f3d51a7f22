use egui::{Pos2, Vec2};
use uuid::Uuid;

use crate::scene::selection::HandleKind;

/// Pointer interaction state of the scene.
///
/// ```text
///            press canvas          release
///   Idle ───────────────► Selecting ───────► Idle
///    │  press handle                release
///    ├──────────────────► Resizing  ───────► Idle
///    │  press item                  release
///    └──────────────────► Moving    ───────► Idle
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SceneState {
    #[default]
    Idle,
    /// Dragging out a new selection from `anchor`
    Selecting { anchor: Pos2 },
    /// Dragging one handle of the finalised selection
    Resizing { handle: HandleKind },
    /// Dragging a floating item, `grab` is the pointer offset from its origin
    Moving { item: Uuid, grab: Vec2 },
}

impl SceneState {
    /// Every gesture starts from and ends in Idle
    pub fn can_transition_to(&self, new_state: &SceneState) -> bool {
        matches!(
            (self, new_state),
            (SceneState::Idle, _) | (_, SceneState::Idle)
        )
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SceneState::Idle)
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self, SceneState::Selecting { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, SceneState::Resizing { .. })
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, SceneState::Moving { .. })
    }

    pub fn active_handle(&self) -> Option<HandleKind> {
        match self {
            SceneState::Resizing { handle } => Some(*handle),
            _ => None,
        }
    }

    pub fn moving_item(&self) -> Option<Uuid> {
        match self {
            SceneState::Moving { item, .. } => Some(*item),
            _ => None,
        }
    }
}
