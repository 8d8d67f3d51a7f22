use egui::Rect;
use log::debug;

use super::{CommandContext, CommandResult};
use crate::document::{Document, DocumentSnapshot};
use crate::error::{EditorError, EditorResult};
use crate::event::{DocumentEvent, EditorEvent, ItemEvent};
use crate::item::MovableItem;
use crate::ops::{self, AdjustmentParams, TransformKind};
use crate::raster::{PixelRect, RasterImage};

/// Undoable edits.
///
/// Each command owns a deep copy of the state it replaces, taken when it is
/// built. The new state is computed on the first execution and cached, so
/// redo never recomputes pixels.
#[derive(Clone)]
pub enum Command {
    /// Replace the image with a sub-rectangle of it
    Crop {
        rect: PixelRect,
        before: RasterImage,
        after: Option<RasterImage>,
    },

    /// Auto-balance, brightness, contrast and gamma in that order
    Adjustments {
        params: AdjustmentParams,
        before: RasterImage,
        after: Option<RasterImage>,
    },

    /// A single rotation or flip
    Transform {
        kind: TransformKind,
        before: RasterImage,
        after: Option<RasterImage>,
    },

    /// Needs the grayscale capability
    Grayscale {
        before: RasterImage,
        after: Option<RasterImage>,
    },

    /// Smooth rescale, optionally fitting inside the target box
    Resize {
        width: u32,
        height: u32,
        keep_aspect: bool,
        before: RasterImage,
        after: Option<RasterImage>,
    },

    /// Copy the selection to the clipboard and fill it with the background colour
    Cut {
        selection: Rect,
        before: RasterImage,
        after: Option<RasterImage>,
    },

    /// Composite `image` into `target`, or float it as a new item when there
    /// is no target
    Paste {
        image: RasterImage,
        target: Option<PixelRect>,
        before: DocumentSnapshot,
        after: Option<DocumentSnapshot>,
    },

    /// Composite every floating item into the image
    FixPaste {
        before: DocumentSnapshot,
        after: Option<DocumentSnapshot>,
    },
}

// Custom Debug to keep pixel data out of log lines
impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Crop { rect, after, .. } => f
                .debug_struct("Crop")
                .field("rect", rect)
                .field("executed", &after.is_some())
                .finish(),
            Command::Adjustments { params, after, .. } => f
                .debug_struct("Adjustments")
                .field("params", params)
                .field("executed", &after.is_some())
                .finish(),
            Command::Transform { kind, after, .. } => f
                .debug_struct("Transform")
                .field("kind", kind)
                .field("executed", &after.is_some())
                .finish(),
            Command::Grayscale { after, .. } => f
                .debug_struct("Grayscale")
                .field("executed", &after.is_some())
                .finish(),
            Command::Resize { width, height, keep_aspect, after, .. } => f
                .debug_struct("Resize")
                .field("width", width)
                .field("height", height)
                .field("keep_aspect", keep_aspect)
                .field("executed", &after.is_some())
                .finish(),
            Command::Cut { selection, after, .. } => f
                .debug_struct("Cut")
                .field("selection", selection)
                .field("executed", &after.is_some())
                .finish(),
            Command::Paste { image, target, before, after } => f
                .debug_struct("Paste")
                .field("image", image)
                .field("target", target)
                .field("items_before", &before.items.len())
                .field("executed", &after.is_some())
                .finish(),
            Command::FixPaste { before, after } => f
                .debug_struct("FixPaste")
                .field("items", &before.items.len())
                .field("executed", &after.is_some())
                .finish(),
        }
    }
}

impl Command {
    pub fn crop(document: &Document, rect: PixelRect) -> EditorResult<Self> {
        Ok(Command::Crop {
            rect,
            before: document.require_image()?.clone(),
            after: None,
        })
    }

    pub fn adjustments(document: &Document, params: AdjustmentParams) -> EditorResult<Self> {
        Ok(Self::adjustments_from(document.require_image()?.clone(), params))
    }

    /// Adjustments whose undo returns to `baseline`, e.g. the image as it was
    /// before a live preview started.
    pub fn adjustments_from(baseline: RasterImage, params: AdjustmentParams) -> Self {
        Command::Adjustments {
            params,
            before: baseline,
            after: None,
        }
    }

    pub fn transform(document: &Document, kind: TransformKind) -> EditorResult<Self> {
        Ok(Self::transform_from(document.require_image()?.clone(), kind))
    }

    pub fn transform_from(baseline: RasterImage, kind: TransformKind) -> Self {
        Command::Transform {
            kind,
            before: baseline,
            after: None,
        }
    }

    pub fn grayscale(document: &Document) -> EditorResult<Self> {
        Ok(Command::Grayscale {
            before: document.require_image()?.clone(),
            after: None,
        })
    }

    pub fn resize(document: &Document, width: u32, height: u32, keep_aspect: bool) -> EditorResult<Self> {
        Ok(Command::Resize {
            width,
            height,
            keep_aspect,
            before: document.require_image()?.clone(),
            after: None,
        })
    }

    pub fn cut(document: &Document, selection: Option<Rect>) -> EditorResult<Self> {
        let before = document.require_image()?.clone();
        let selection = selection.ok_or(EditorError::InvalidSelection)?;
        Ok(Command::Cut {
            selection,
            before,
            after: None,
        })
    }

    /// A paste into `selection` if it is a usable rectangle on the image,
    /// otherwise a paste as a new floating item.
    ///
    /// A paste into a selection is clipped to the selection rectangle. Desktop
    /// editors that draw the whole clipboard image at the selection's corner
    /// can spill past it; this one never writes outside the selection.
    pub fn paste(document: &Document, selection: Option<Rect>, image: RasterImage) -> EditorResult<Self> {
        let current = document.require_image()?;
        let target = selection
            .and_then(PixelRect::from_rect)
            .filter(|rect| rect.fits_within(current.width(), current.height()));
        Ok(Command::Paste {
            image,
            target,
            before: document.snapshot(),
            after: None,
        })
    }

    /// A paste that must land inside `selection`.
    pub fn paste_into(document: &Document, selection: Option<Rect>, image: RasterImage) -> EditorResult<Self> {
        let command = Self::paste(document, selection, image)?;
        match command {
            Command::Paste { target: Some(_), .. } => Ok(command),
            _ => Err(EditorError::InvalidSelection),
        }
    }

    pub fn fix_paste(document: &Document) -> EditorResult<Self> {
        document.require_image()?;
        Ok(Command::FixPaste {
            before: document.snapshot(),
            after: None,
        })
    }

    /// Applies the command. The first call computes the new state, later
    /// calls reapply the cached one.
    pub fn execute(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::Crop { rect, before, after } => {
                let image = cached_or(after, || ops::geometry::crop(before, *rect))?;
                replace_image(ctx, image);
                ctx.scene.clear_selection(ctx.events);
            }
            Command::Adjustments { params, before, after } => {
                let clip = ctx.config.autobalance_clip;
                let image = cached_or(after, || Ok(ops::apply_adjustments(before, params, clip)))?;
                replace_image(ctx, image);
            }
            Command::Transform { kind, before, after } => {
                let image = cached_or(after, || Ok(kind.apply(before)))?;
                replace_image(ctx, image);
            }
            Command::Grayscale { before, after } => {
                let capabilities = ctx.capabilities;
                let image = cached_or(after, || capabilities.grayscale()?.to_grayscale(before))?;
                replace_image(ctx, image);
            }
            Command::Resize { width, height, keep_aspect, before, after } => {
                let image = cached_or(after, || ops::resize(before, *width, *height, *keep_aspect))?;
                replace_image(ctx, image);
            }
            Command::Cut { selection, before, after } => {
                let region = PixelRect::from_rect(*selection)
                    .ok_or(EditorError::InvalidSelection)
                    .and_then(|rect| before.validate_rect(rect))?;
                // The clipboard is written on every redo as well
                ctx.clipboard.set_image(&before.crop(region)?)?;
                let fill = ctx.config.cut_fill();
                let image = cached_or(after, || {
                    let mut image = before.clone();
                    image.fill_rect(region, fill);
                    Ok(image)
                })?;
                replace_image(ctx, image);
                ctx.scene.clear_selection(ctx.events);
            }
            Command::Paste { image, target, before, after } => {
                let snapshot = match after {
                    Some(snapshot) => snapshot.clone(),
                    None => {
                        let snapshot = paste_snapshot(before, image, *target, ctx.config.paste_offset())?;
                        *after = Some(snapshot.clone());
                        snapshot
                    }
                };
                restore_document(ctx, &snapshot);
                if target.is_none() {
                    if let Some(item) = snapshot.items.last() {
                        ctx.events.emit(EditorEvent::ItemChanged(ItemEvent::Pasted { id: item.id() }));
                    }
                }
            }
            Command::FixPaste { before, after } => {
                let snapshot = match after {
                    Some(snapshot) => snapshot.clone(),
                    None => {
                        let mut scratch = Document::from(before.clone());
                        scratch.fix_items(false);
                        let snapshot = scratch.snapshot();
                        *after = Some(snapshot.clone());
                        snapshot
                    }
                };
                restore_document(ctx, &snapshot);
                let count = before.items.len();
                ctx.events.emit(EditorEvent::ItemChanged(ItemEvent::Fixed { count }));
            }
        }
        Ok(())
    }

    /// Restores the state captured when the command was built.
    pub fn undo(&mut self, ctx: &mut CommandContext<'_>) {
        match self {
            Command::Crop { before, .. }
            | Command::Adjustments { before, .. }
            | Command::Transform { before, .. }
            | Command::Grayscale { before, .. }
            | Command::Resize { before, .. } => replace_image(ctx, before.clone()),
            Command::Cut { selection, before, .. } => {
                replace_image(ctx, before.clone());
                ctx.scene.set_selection(*selection, before.bounds(), ctx.events);
            }
            Command::Paste { before, .. } | Command::FixPaste { before, .. } => {
                restore_document(ctx, before);
            }
        }
    }

    /// Reapplies the cached result, or executes if the command never ran.
    pub fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        self.execute(ctx)
    }

    pub fn is_resize(&self) -> bool {
        matches!(self, Command::Resize { .. })
    }

    /// Status bar text for a successful execution
    pub fn description(&self) -> String {
        match self {
            Command::Crop { .. } => "Image cropped".to_owned(),
            Command::Adjustments { .. } => "Adjustments applied".to_owned(),
            Command::Transform { kind, .. } => kind.describe(),
            Command::Grayscale { .. } => "Converted to grayscale".to_owned(),
            Command::Resize { after, width, height, .. } => match after {
                Some(image) => format!("Resized to {}x{}", image.width(), image.height()),
                None => format!("Resize to {width}x{height}"),
            },
            Command::Cut { .. } => "Selection cut to clipboard".to_owned(),
            Command::Paste { target: Some(_), .. } => "Image pasted into selection".to_owned(),
            Command::Paste { target: None, after, .. } => {
                let items = after.as_ref().map_or(0, |snapshot| snapshot.items.len());
                format!("Image pasted as movable object (items: {items})")
            }
            Command::FixPaste { before, .. } => format!("Fixed {} pasted item(s)", before.items.len()),
        }
    }
}

fn cached_or(
    slot: &mut Option<RasterImage>,
    compute: impl FnOnce() -> EditorResult<RasterImage>,
) -> EditorResult<RasterImage> {
    if let Some(image) = slot {
        return Ok(image.clone());
    }
    let image = compute()?;
    *slot = Some(image.clone());
    Ok(image)
}

/// Builds the post-paste document from `before` without touching the live one.
fn paste_snapshot(
    before: &DocumentSnapshot,
    pasted: &RasterImage,
    target: Option<PixelRect>,
    offset: egui::Vec2,
) -> EditorResult<DocumentSnapshot> {
    let mut scratch = Document::from(before.clone());
    match target {
        Some(rect) => scratch.require_image_mut()?.composite_into(pasted, rect),
        None => {
            let fixed = scratch.fix_items(true);
            if fixed > 0 {
                debug!("Fixed {} selected item(s) before pasting", fixed);
            }
            let mut item = MovableItem::new(pasted.clone(), offset.to_pos2());
            item.set_selected(true);
            scratch.add_item(item);
        }
    }
    Ok(scratch.snapshot())
}

fn image_size(document: &Document) -> Option<(u32, u32)> {
    document.image().map(|image| (image.width(), image.height()))
}

fn replace_image(ctx: &mut CommandContext<'_>, image: RasterImage) {
    let old_size = image_size(ctx.document);
    ctx.document.set_image(image);
    image_changed(ctx, old_size);
}

fn restore_document(ctx: &mut CommandContext<'_>, snapshot: &DocumentSnapshot) {
    let old_size = image_size(ctx.document);
    ctx.document.restore(snapshot);
    image_changed(ctx, old_size);
}

/// A selection cannot outlive a change of image size.
fn image_changed(ctx: &mut CommandContext<'_>, old_size: Option<(u32, u32)>) {
    if image_size(ctx.document) != old_size {
        ctx.scene.clear_selection(ctx.events);
        let extent = ctx.document.image().map(RasterImage::extent);
        ctx.scene.update_metrics(extent, ctx.config);
    }
    ctx.events.emit(EditorEvent::DocumentChanged(DocumentEvent::Modified));
}
