use std::path::Path;

use egui::{Pos2, Rect, Shape};
use image::{ImageFormat, Rgba};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::capability::Capabilities;
use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::codec;
use crate::command::{Command, CommandContext, CommandHistory};
use crate::config::EditorConfig;
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::event::{DocumentEvent, EditorEvent, EventBus};
use crate::ops::{self, AdjustmentParams, TransformKind};
use crate::raster::{PixelRect, RasterImage};
use crate::render;
use crate::scene::{Scene, SceneRequest};
use crate::tools::Tool;

/// Values from the "new image" dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewImageParams {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 4],
}

impl Default for NewImageParams {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: [255, 255, 255, 255],
        }
    }
}

/// Values from the resize dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
    pub keep_aspect: bool,
}

/// One open image with its history, selection and floating items.
///
/// Every method runs to completion synchronously. A failing operation leaves
/// the image, the floating items and both history stacks as they were,
/// reports a warning on the event bus and returns the error.
pub struct EditorSession {
    config: EditorConfig,
    capabilities: Capabilities,
    clipboard: Box<dyn Clipboard>,
    document: Document,
    scene: Scene,
    history: CommandHistory,
    events: EventBus,
    preview_baseline: Option<RasterImage>,
    modified: bool,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("document", &self.document)
            .field("scene", &self.scene)
            .field("history", &self.history)
            .field("previewing", &self.preview_baseline.is_some())
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(
            EditorConfig::default(),
            Capabilities::detect(),
            Box::new(MemoryClipboard::new()),
        )
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig, capabilities: Capabilities, clipboard: Box<dyn Clipboard>) -> Self {
        debug!("New editor session with {:?}", capabilities);
        let scene = Scene::new(&config);
        Self {
            config,
            capabilities,
            clipboard,
            document: Document::new(),
            scene,
            history: CommandHistory::new(),
            events: EventBus::new(),
            preview_baseline: None,
            modified: false,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn current_image(&self) -> Option<&RasterImage> {
        self.document.image()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_previewing(&self) -> bool {
        self.preview_baseline.is_some()
    }

    /// Splits the session into the history and a context over the rest.
    fn parts(&mut self) -> (&mut CommandHistory, CommandContext<'_>) {
        let ctx = CommandContext {
            document: &mut self.document,
            scene: &mut self.scene,
            clipboard: self.clipboard.as_mut(),
            capabilities: &self.capabilities,
            events: &self.events,
            config: &self.config,
        };
        (&mut self.history, ctx)
    }

    /// Reports `err` as a warning and passes it on.
    fn warn<T>(&self, err: EditorError) -> EditorResult<T> {
        self.events.warning(err.to_string());
        Err(err)
    }

    fn emit_history(&self) {
        self.events.emit(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    // ---- image lifecycle ----

    /// Loads `image` as a fresh document: history, floating items, selection
    /// and any preview are discarded and the modified flag is cleared.
    pub fn set_image(&mut self, image: RasterImage) {
        let (width, height) = (image.width(), image.height());
        info!("Loaded image {}x{}", width, height);
        self.document.reset();
        self.document.set_image(image);
        self.history.clear();
        self.preview_baseline = None;
        self.scene.reset(&self.events);
        self.scene.update_metrics(Some(width.max(height)), &self.config);
        self.modified = false;
        self.events.emit(EditorEvent::DocumentChanged(DocumentEvent::Loaded { width, height }));
        self.emit_history();
    }

    pub fn new_image(&mut self, params: NewImageParams) -> EditorResult<()> {
        if params.width == 0 || params.height == 0 {
            let err = EditorError::InvalidParameters(format!(
                "image size {}x{} must be non-zero",
                params.width, params.height
            ));
            return self.warn(err);
        }
        self.set_image(RasterImage::filled(params.width, params.height, Rgba(params.background)));
        Ok(())
    }

    pub fn open_image(&mut self, bytes: &[u8]) -> EditorResult<()> {
        match codec::decode(bytes) {
            Ok(image) => {
                self.set_image(image);
                Ok(())
            }
            Err(err) => self.warn(err),
        }
    }

    pub fn open_file(&mut self, path: &Path) -> EditorResult<()> {
        match codec::load_file(path) {
            Ok(image) => {
                self.set_image(image);
                self.events.status(format!("Opened {}", path.display()));
                Ok(())
            }
            Err(err) => self.warn(err),
        }
    }

    /// The image as it would look with every floating item fixed.
    pub fn flattened_image(&self) -> EditorResult<RasterImage> {
        let mut scratch = Document::from(self.document.snapshot());
        scratch.fix_items(false);
        scratch.require_image().cloned()
    }

    /// Encodes the flattened image and clears the modified flag.
    pub fn save_image(&mut self, format: ImageFormat) -> EditorResult<Vec<u8>> {
        let encoded = self.flattened_image().and_then(|image| codec::encode(&image, format));
        match encoded {
            Ok(bytes) => {
                self.modified = false;
                self.events.emit(EditorEvent::DocumentChanged(DocumentEvent::Saved));
                Ok(bytes)
            }
            Err(err) => self.warn(err),
        }
    }

    pub fn save_file(&mut self, path: &Path) -> EditorResult<()> {
        let written = self
            .flattened_image()
            .and_then(|image| codec::save_file(&image, path));
        match written {
            Ok(()) => {
                self.modified = false;
                self.events.emit(EditorEvent::DocumentChanged(DocumentEvent::Saved));
                self.events.status(format!("Saved to {}", path.display()));
                Ok(())
            }
            Err(err) => self.warn(err),
        }
    }

    // ---- history ----

    /// Runs `command` and records it. Resizes are recorded under the
    /// configured undo depth limit.
    pub fn execute_command(&mut self, command: Command) -> EditorResult<()> {
        let limit = self.config.resize_history_limit;
        let is_resize = command.is_resize();
        let (history, mut ctx) = self.parts();
        let result = if is_resize {
            history.execute_with_limit(command, &mut ctx, limit)
        } else {
            history.execute(command, &mut ctx)
        };
        if let Err(err) = result {
            return self.warn(err);
        }
        self.modified = true;
        if let Some(command) = self.history.last_command() {
            self.events.status(command.description());
        }
        self.emit_history();
        Ok(())
    }

    /// Builds and runs a command, reporting a failed build like a failed run.
    fn run(&mut self, command: EditorResult<Command>) -> EditorResult<()> {
        match command {
            Ok(command) => self.execute_command(command),
            Err(err) => self.warn(err),
        }
    }

    pub fn undo(&mut self) -> bool {
        let (history, mut ctx) = self.parts();
        if !history.undo(&mut ctx) {
            return false;
        }
        self.modified = self.history.can_undo();
        self.events.status("Undo performed");
        self.emit_history();
        true
    }

    pub fn redo(&mut self) -> EditorResult<bool> {
        let (history, mut ctx) = self.parts();
        match history.redo(&mut ctx) {
            Ok(false) => Ok(false),
            Ok(true) => {
                self.modified = true;
                self.events.status("Redo performed");
                self.emit_history();
                Ok(true)
            }
            Err(err) => self.warn(err),
        }
    }

    // ---- selection and clipboard ----

    /// The selection rounded to pixels, if it is a usable rectangle.
    fn selected_pixels(&self) -> Option<PixelRect> {
        let image = self.document.image()?;
        let rect = self.scene.selection()?.pixel_rect()?;
        rect.fits_within(image.width(), image.height()).then_some(rect)
    }

    /// A copy of the selected pixels.
    pub fn selected_region(&self) -> Option<RasterImage> {
        let rect = self.selected_pixels()?;
        self.document.image()?.crop(rect).ok()
    }

    /// Composites `image` into the selection as an undoable paste.
    pub fn set_selected_region(&mut self, image: RasterImage) -> EditorResult<()> {
        let command = Command::paste_into(&self.document, self.scene.selection_rect(), image);
        self.run(command)
    }

    pub fn set_selection(&mut self, rect: Rect) -> EditorResult<()> {
        match self.document.bounds() {
            Some(bounds) => {
                self.scene.set_selection(rect, bounds, &self.events);
                Ok(())
            }
            None => self.warn(EditorError::NoActiveImage),
        }
    }

    pub fn select_all(&mut self) -> EditorResult<()> {
        match self.document.bounds() {
            Some(bounds) => self.set_selection(bounds),
            None => self.warn(EditorError::NoActiveImage),
        }
    }

    pub fn clear_selection(&mut self) {
        self.scene.clear_selection(&self.events);
    }

    pub fn crop_to_selection(&mut self) -> EditorResult<()> {
        let Some(rect) = self.selected_pixels() else {
            let err = if self.document.image().is_none() {
                EditorError::NoActiveImage
            } else {
                EditorError::InvalidSelection
            };
            return self.warn(err);
        };
        let command = Command::crop(&self.document, rect);
        self.run(command)
    }

    /// Puts the selected pixels on the clipboard. Not recorded in history.
    pub fn copy(&mut self) -> EditorResult<()> {
        if self.document.image().is_none() {
            return self.warn(EditorError::NoActiveImage);
        }
        let Some(region) = self.selected_region() else {
            return self.warn(EditorError::InvalidSelection);
        };
        if let Err(err) = self.clipboard.set_image(&region) {
            return self.warn(err);
        }
        self.events.status("Selection copied to clipboard");
        Ok(())
    }

    pub fn cut(&mut self) -> EditorResult<()> {
        let command = Command::cut(&self.document, self.scene.selection_rect());
        self.run(command)
    }

    /// Pastes the clipboard image into the selection, or as a new floating
    /// item when nothing is selected.
    pub fn paste(&mut self) -> EditorResult<()> {
        let pasted = match self.clipboard.get_image() {
            Ok(Some(image)) => image,
            Ok(None) => return self.warn(EditorError::ClipboardEmpty),
            Err(err) => return self.warn(err),
        };
        let command = Command::paste(&self.document, self.scene.selection_rect(), pasted);
        self.run(command)
    }

    /// Fixes every floating item into the image as one undoable step.
    /// Returns false when there was nothing to fix.
    pub fn fix_pasted_items(&mut self) -> EditorResult<bool> {
        if !self.document.has_items() {
            return Ok(false);
        }
        let command = Command::fix_paste(&self.document);
        self.run(command).map(|()| true)
    }

    // ---- transforms ----

    pub fn resize_image(&mut self, width: u32, height: u32, keep_aspect: bool) -> EditorResult<()> {
        let command = Command::resize(&self.document, width, height, keep_aspect);
        self.run(command)
    }

    pub fn resize_with(&mut self, params: ResizeParams) -> EditorResult<()> {
        self.resize_image(params.width, params.height, params.keep_aspect)
    }

    pub fn convert_to_grayscale(&mut self) -> EditorResult<()> {
        let command = Command::grayscale(&self.document);
        self.run(command)
    }

    pub fn rotate_image(&mut self, degrees: f32) -> EditorResult<()> {
        let command = Command::transform(&self.document, TransformKind::Rotate { degrees });
        self.run(command)?;
        self.preview_baseline = None;
        Ok(())
    }

    pub fn flip_image(&mut self, horizontal: bool) -> EditorResult<()> {
        let command = Command::transform(&self.document, TransformKind::Flip { horizontal });
        self.run(command)
    }

    // ---- live preview ----

    /// Remembers the current image as the preview baseline. A preview that
    /// is already running keeps its baseline.
    pub fn start_preview(&mut self) -> EditorResult<()> {
        if self.preview_baseline.is_some() {
            return Ok(());
        }
        match self.document.image() {
            Some(image) => {
                self.preview_baseline = Some(image.clone());
                Ok(())
            }
            None => self.warn(EditorError::NoActiveImage),
        }
    }

    fn show_preview(&mut self, image: RasterImage) {
        let resized = self.document.image().map(|current| (current.width(), current.height()))
            != Some((image.width(), image.height()));
        let extent = image.extent();
        self.document.set_image(image);
        if resized {
            self.scene.clear_selection(&self.events);
            self.scene.update_metrics(Some(extent), &self.config);
        }
    }

    fn require_baseline(&mut self) -> EditorResult<&RasterImage> {
        self.start_preview()?;
        self.preview_baseline.as_ref().ok_or(EditorError::NoActiveImage)
    }

    /// Shows `params` applied to the baseline without recording anything.
    pub fn preview_adjustments(&mut self, params: AdjustmentParams) -> EditorResult<()> {
        let clip = self.config.autobalance_clip;
        let preview = ops::apply_adjustments(self.require_baseline()?, &params, clip);
        self.show_preview(preview);
        Ok(())
    }

    pub fn preview_rotation(&mut self, degrees: f32) -> EditorResult<()> {
        let preview = ops::rotate(self.require_baseline()?, degrees);
        self.show_preview(preview);
        Ok(())
    }

    /// Puts the baseline back and ends the preview.
    pub fn cancel_preview(&mut self) {
        if let Some(baseline) = self.preview_baseline.take() {
            self.show_preview(baseline);
        }
    }

    /// Baseline for a committing command: the preview baseline if a preview
    /// runs, else the current image.
    fn take_baseline(&mut self) -> EditorResult<RasterImage> {
        match self.preview_baseline.take() {
            Some(baseline) => Ok(baseline),
            None => self.document.require_image().cloned(),
        }
    }

    pub fn apply_adjustments(&mut self, params: AdjustmentParams) -> EditorResult<()> {
        let command = self
            .take_baseline()
            .map(|baseline| Command::adjustments_from(baseline, params));
        self.run(command)
    }

    pub fn apply_rotation(&mut self, degrees: f32) -> EditorResult<()> {
        let command = self
            .take_baseline()
            .map(|baseline| Command::transform_from(baseline, TransformKind::Rotate { degrees }));
        self.run(command)
    }

    // ---- pointer input ----

    pub fn set_tool(&mut self, tool: Tool) {
        self.scene.set_tool(tool, &self.events);
    }

    /// Press at `pos` in image coordinates. A press on the empty canvas fixes
    /// floating items before the new selection starts.
    pub fn pointer_down(&mut self, pos: Pos2) -> EditorResult<()> {
        match self.scene.pointer_down(pos, &mut self.document, &self.events) {
            Some(SceneRequest::FixPastedItems) => self.fix_pasted_items().map(|_| ()),
            None => Ok(()),
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        self.scene.pointer_move(pos, &mut self.document, &self.events);
    }

    pub fn pointer_up(&mut self, pos: Pos2) {
        self.scene.pointer_up(pos, &mut self.document, &self.events);
    }

    /// Advances the marquee animation by `dt` seconds. Returns true if the
    /// overlay needs repainting.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.scene.tick(dt, self.config.marquee_interval)
    }

    pub fn overlay_shapes(&self) -> Vec<Shape> {
        render::overlay_shapes(&self.scene, &self.document)
    }
}
