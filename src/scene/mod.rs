//! Interactive scene: the selection rectangle, its handles and the pointer
//! state machine that edits them and drags floating items.

mod marquee;
mod selection;
mod state;

pub use marquee::Marquee;
pub use selection::{Handle, HandleKind, Selection, clamp_rect};
pub use state::SceneState;

use egui::{Pos2, Rect};
use log::debug;

use crate::config::EditorConfig;
use crate::document::Document;
use crate::event::{EditorEvent, EventBus, ItemEvent, SelectionEvent};
use crate::tools::Tool;

/// Work the scene cannot do itself and hands back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRequest {
    /// Composite every floating item into the base image as one undoable step
    FixPastedItems,
}

#[derive(Debug)]
pub struct Scene {
    tool: Tool,
    state: SceneState,
    selection: Option<Selection>,
    marquee: Marquee,
    handle_size: f32,
    pen_width: f32,
}

impl Scene {
    pub fn new(config: &EditorConfig) -> Self {
        let mut scene = Self {
            tool: Tool::default(),
            state: SceneState::Idle,
            selection: None,
            marquee: Marquee::default(),
            handle_size: 0.0,
            pen_width: 0.0,
        };
        scene.update_metrics(None, config);
        scene
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selection_rect(&self) -> Option<Rect> {
        self.selection.as_ref().map(Selection::rect)
    }

    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    pub fn handle_size(&self) -> f32 {
        self.handle_size
    }

    pub fn pen_width(&self) -> f32 {
        self.pen_width
    }

    /// Recomputes handle size and pen width for an image whose larger side
    /// is `extent` (1000 when no image is loaded), regenerating any handles.
    pub fn update_metrics(&mut self, extent: Option<u32>, config: &EditorConfig) {
        let extent = extent.unwrap_or(1000);
        self.handle_size = config.handle_size(extent);
        self.pen_width = config.pen_width(extent);
        if let Some(selection) = self.selection.as_mut().filter(|s| s.is_finalized()) {
            selection.create_handles(self.handle_size);
        }
    }

    pub fn set_tool(&mut self, tool: Tool, events: &EventBus) {
        if tool == self.tool {
            return;
        }
        let old = self.tool;
        self.tool = tool;
        self.transition(SceneState::Idle, events);
        events.emit(EditorEvent::ToolChanged { old, new: tool });
    }

    /// Replaces the selection with `rect` clamped to `bounds`, with handles.
    pub fn set_selection(&mut self, rect: Rect, bounds: Rect, events: &EventBus) {
        let rect = clamp_rect(Rect::from_two_pos(rect.min, rect.max), bounds);
        self.selection = Some(Selection::finalized(rect, self.handle_size));
        self.transition(SceneState::Idle, events);
        events.emit(EditorEvent::SelectionChanged(SelectionEvent::Finalized { bounds: rect }));
    }

    pub fn clear_selection(&mut self, events: &EventBus) {
        if self.selection.take().is_some() {
            self.marquee.reset();
            events.emit(EditorEvent::SelectionChanged(SelectionEvent::Cleared));
        }
    }

    /// Drops the selection and any gesture in progress.
    pub fn reset(&mut self, events: &EventBus) {
        self.clear_selection(events);
        self.transition(SceneState::Idle, events);
    }

    fn transition(&mut self, new: SceneState, events: &EventBus) {
        if self.state == new {
            return;
        }
        debug_assert!(self.state.can_transition_to(&new), "{:?} -> {:?}", self.state, new);
        debug!("Scene state: {:?} -> {:?}", self.state, new);
        let old = std::mem::replace(&mut self.state, new);
        events.emit(EditorEvent::StateChanged { old, new });
    }

    /// Handles a press at `pos` in image coordinates.
    ///
    /// Hit order is handles, then floating items (topmost first), then the
    /// empty canvas. A canvas press with floating items present asks the
    /// session to fix them.
    pub fn pointer_down(
        &mut self,
        pos: Pos2,
        document: &mut Document,
        events: &EventBus,
    ) -> Option<SceneRequest> {
        if !self.tool.edits_scene() || !self.state.is_idle() {
            return None;
        }

        let handle = self
            .selection
            .as_ref()
            .filter(|selection| selection.is_finalized())
            .and_then(|selection| selection.handle_at(pos));
        if let Some(handle) = handle {
            self.transition(SceneState::Resizing { handle }, events);
            return None;
        }

        let bounds = document.bounds()?;

        if let Some(id) = document.item_at(pos) {
            document.select_only(id);
            let origin = document.find_item(id)?.position();
            self.transition(SceneState::Moving { item: id, grab: pos - origin }, events);
            return None;
        }

        let request = document.has_items().then_some(SceneRequest::FixPastedItems);
        self.clear_selection(events);
        let anchor = bounds.clamp(pos);
        self.selection = Some(Selection::in_progress(Rect::from_min_max(anchor, anchor)));
        events.emit(EditorEvent::SelectionChanged(SelectionEvent::Started { anchor }));
        self.transition(SceneState::Selecting { anchor }, events);
        request
    }

    pub fn pointer_move(&mut self, pos: Pos2, document: &mut Document, events: &EventBus) {
        let Some(bounds) = document.bounds() else {
            return;
        };
        match self.state {
            SceneState::Idle => {}
            SceneState::Selecting { anchor } => {
                let rect = clamp_rect(Rect::from_two_pos(anchor, bounds.clamp(pos)), bounds);
                if let Some(selection) = self.selection.as_mut() {
                    selection.set_rect(rect);
                    events.emit(EditorEvent::SelectionChanged(SelectionEvent::InProgress { bounds: rect }));
                }
            }
            SceneState::Resizing { handle } => {
                if let Some(selection) = self.selection.as_mut() {
                    let rect = handle.drag(selection.rect(), pos, bounds);
                    selection.set_rect(rect);
                    selection.create_handles(self.handle_size);
                    events.emit(EditorEvent::SelectionChanged(SelectionEvent::InProgress { bounds: rect }));
                }
            }
            SceneState::Moving { item, grab } => {
                if let Some(floating) = document.find_item_mut(item) {
                    floating.move_clamped(pos - grab, bounds);
                    let position = floating.position();
                    events.emit(EditorEvent::ItemChanged(ItemEvent::Moved { id: item, position }));
                }
            }
        }
    }

    pub fn pointer_up(&mut self, _pos: Pos2, document: &mut Document, events: &EventBus) {
        match self.state {
            SceneState::Idle => return,
            SceneState::Selecting { .. } | SceneState::Resizing { .. } => {
                if let Some(selection) = self.selection.as_mut() {
                    selection.create_handles(self.handle_size);
                    let bounds = selection.rect();
                    events.emit(EditorEvent::SelectionChanged(SelectionEvent::Finalized { bounds }));
                }
            }
            SceneState::Moving { item, .. } => {
                if let Some(floating) = document.find_item_mut(item) {
                    floating.set_selected(true);
                }
            }
        }
        self.transition(SceneState::Idle, events);
    }

    /// Advances the marquee animation while a selection is shown.
    pub fn tick(&mut self, dt: f32, interval: f32) -> bool {
        self.selection.is_some() && self.marquee.tick(dt, interval)
    }
}
