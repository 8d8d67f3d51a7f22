use egui::{Pos2, Rect, Vec2};
use image::Rgba;
use raster_editor::capability::LumaConverter;
use raster_editor::event::DocumentEvent;
use raster_editor::{
    AdjustmentParams, Capabilities, EditorConfig, EditorError, EditorEvent, EditorSession,
    MemoryClipboard, RasterImage, ResizeParams, StatusLog,
};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

fn session_with(clipboard: MemoryClipboard) -> EditorSession {
    let _ = env_logger::builder().is_test(true).try_init();
    let capabilities = Capabilities::none().with_grayscale(Box::new(LumaConverter));
    EditorSession::new(EditorConfig::default(), capabilities, Box::new(clipboard))
}

// A white canvas with a few coloured pixels so every transform changes it
fn patterned(width: u32, height: u32) -> RasterImage {
    let mut image = RasterImage::filled(width, height, WHITE);
    image.as_rgba_mut().put_pixel(0, 0, RED);
    image.as_rgba_mut().put_pixel(width - 1, 1, Rgba([0, 128, 0, 255]));
    image.as_rgba_mut().put_pixel(2, height - 1, Rgba([20, 40, 200, 255]));
    image
}

fn select(session: &mut EditorSession, x: f32, y: f32, w: f32, h: f32) {
    let rect = Rect::from_min_size(Pos2::new(x, y), Vec2::new(w, h));
    session.set_selection(rect).unwrap();
}

#[test]
fn test_crop_then_undo_end_to_end() {
    let mut session = session_with(MemoryClipboard::new());
    session.set_image(RasterImage::filled(100, 100, WHITE));
    select(&mut session, 10.0, 10.0, 50.0, 50.0);

    session.crop_to_selection().unwrap();
    let cropped = session.current_image().unwrap();
    assert_eq!((cropped.width(), cropped.height()), (50, 50));
    assert!(cropped.is_uniform(WHITE));
    assert!(session.scene().selection().is_none());
    assert!(session.is_modified());

    assert!(session.undo());
    let restored = session.current_image().unwrap();
    assert_eq!((restored.width(), restored.height()), (100, 100));
    assert!(restored.is_uniform(WHITE));
    assert!(!session.is_modified());
}

#[test]
fn test_every_command_undo_restores_pixels() {
    let mut session = session_with(MemoryClipboard::with_image(RasterImage::filled(4, 4, RED)));
    session.set_image(patterned(40, 30));
    let original = session.current_image().unwrap().clone();

    let steps: Vec<(&str, fn(&mut EditorSession))> = vec![
        ("crop", |s| {
            select(s, 5.0, 5.0, 10.0, 10.0);
            s.crop_to_selection().unwrap();
        }),
        ("adjust", |s| {
            let params = AdjustmentParams {
                brightness: 0.3,
                contrast: -0.2,
                gamma: 1.4,
                autobalance: true,
            };
            s.apply_adjustments(params).unwrap();
        }),
        ("rotate", |s| s.rotate_image(30.0).unwrap()),
        ("flip", |s| s.flip_image(true).unwrap()),
        ("grayscale", |s| s.convert_to_grayscale().unwrap()),
        ("resize", |s| s.resize_image(13, 7, false).unwrap()),
        ("cut", |s| {
            select(s, 0.0, 0.0, 8.0, 8.0);
            s.cut().unwrap();
        }),
        ("paste into selection", |s| {
            select(s, 1.0, 1.0, 4.0, 4.0);
            s.paste().unwrap();
        }),
        ("paste floating", |s| {
            s.clear_selection();
            s.paste().unwrap();
        }),
    ];

    for (name, step) in steps {
        step(&mut session);
        let changed = session.current_image() != Some(&original) || session.document().has_items();
        assert!(changed, "{name} changed nothing");
        assert!(session.undo(), "{name} was not recorded");
        assert_eq!(session.current_image(), Some(&original), "{name} undo");
        assert!(!session.document().has_items(), "{name} left items behind");
    }
}

#[test]
fn test_new_command_clears_redo() {
    let mut session = session_with(MemoryClipboard::new());
    session.set_image(patterned(20, 20));
    session.flip_image(true).unwrap();
    session.flip_image(false).unwrap();

    assert!(session.undo());
    assert!(session.can_redo());
    session.rotate_image(90.0).unwrap();
    assert!(!session.can_redo());
    assert!(!session.redo().unwrap());
    assert_eq!(session.history().undo_len(), 2);
}

#[test]
fn test_redo_reapplies_cached_result() {
    let mut session = session_with(MemoryClipboard::new());
    session.set_image(patterned(20, 10));
    session.rotate_image(45.0).unwrap();
    let rotated = session.current_image().unwrap().clone();

    assert!(session.undo());
    assert!(session.redo().unwrap());
    assert_eq!(session.current_image(), Some(&rotated));
    assert!(session.is_modified());
}

#[test]
fn test_invalid_crop_leaves_state_unchanged() {
    let mut session = session_with(MemoryClipboard::new());
    let log = StatusLog::new();
    session.events().subscribe(Box::new(log.clone()));
    session.set_image(patterned(30, 30));
    let original = session.current_image().unwrap().clone();

    // No selection at all
    assert!(matches!(session.crop_to_selection(), Err(EditorError::InvalidSelection)));

    // Zero-area selection
    select(&mut session, 10.0, 10.0, 0.0, 5.0);
    let err = session.crop_to_selection().unwrap_err();
    assert!(err.is_precondition());

    assert_eq!(session.current_image(), Some(&original));
    assert!(!session.can_undo());
    assert!(!session.is_modified());
    assert_eq!(log.warnings().len(), 2);
}

#[test]
fn test_commands_without_image_are_rejected() {
    let mut session = session_with(MemoryClipboard::with_image(RasterImage::filled(2, 2, RED)));
    assert!(matches!(session.rotate_image(90.0), Err(EditorError::NoActiveImage)));
    assert!(matches!(session.paste(), Err(EditorError::NoActiveImage)));
    assert!(matches!(session.select_all(), Err(EditorError::NoActiveImage)));
    assert!(!session.can_undo());
}

#[test]
fn test_grayscale_without_backend_leaves_image() {
    let mut session = EditorSession::new(
        EditorConfig::default(),
        Capabilities::none(),
        Box::new(MemoryClipboard::new()),
    );
    session.set_image(patterned(8, 8));
    let original = session.current_image().unwrap().clone();

    let err = session.convert_to_grayscale().unwrap_err();
    assert!(matches!(err, EditorError::MissingCapability(_)));
    assert_eq!(session.current_image(), Some(&original));
    assert!(!session.can_undo());
}

#[test]
fn test_resize_history_is_capped() {
    let mut session = session_with(MemoryClipboard::new());
    session.set_image(patterned(64, 64));
    for size in 20..35 {
        session.resize_image(size, size, false).unwrap();
    }
    assert_eq!(session.history().undo_len(), 10);

    // Other commands are not capped
    for _ in 0..5 {
        session.flip_image(true).unwrap();
    }
    assert_eq!(session.history().undo_len(), 15);
}

#[test]
fn test_resize_keep_aspect_ratio() {
    let mut session = session_with(MemoryClipboard::new());
    session.set_image(RasterImage::filled(200, 100, WHITE));
    let params = ResizeParams {
        width: 50,
        height: 50,
        keep_aspect: true,
    };
    session.resize_with(params).unwrap();
    let image = session.current_image().unwrap();
    assert_eq!((image.width(), image.height()), (50, 25));

    assert!(matches!(
        session.resize_image(0, 10, false),
        Err(EditorError::InvalidParameters(_))
    ));
    assert_eq!(session.history().undo_len(), 1);
}

#[test]
fn test_cut_fills_and_fills_clipboard() {
    let mut session = session_with(MemoryClipboard::new());
    let mut image = RasterImage::filled(20, 20, RED);
    image.as_rgba_mut().put_pixel(19, 19, WHITE);
    session.set_image(image);
    select(&mut session, 2.0, 2.0, 6.0, 4.0);

    session.cut().unwrap();
    let image = session.current_image().unwrap();
    assert_eq!(image.pixel(2, 2), WHITE);
    assert_eq!(image.pixel(7, 5), WHITE);
    assert_eq!(image.pixel(8, 2), RED);
    assert!(session.scene().selection().is_none());

    // The clipboard now holds the 6x4 red block
    session.clear_selection();
    session.paste().unwrap();
    let item = &session.document().items()[0];
    assert_eq!((item.image().width(), item.image().height()), (6, 4));
    assert!(item.image().is_uniform(RED));

    session.undo();
    assert!(session.undo());
    let expected = Rect::from_min_size(Pos2::new(2.0, 2.0), Vec2::new(6.0, 4.0));
    assert_eq!(session.scene().selection_rect(), Some(expected));
}

#[test]
fn test_save_clears_modified_and_flattens_items() {
    let mut session = session_with(MemoryClipboard::with_image(RasterImage::filled(3, 3, RED)));
    let log = StatusLog::new();
    session.events().subscribe(Box::new(log.clone()));
    session.set_image(RasterImage::filled(30, 30, WHITE));
    session.paste().unwrap();
    assert!(session.is_modified());

    let bytes = session.save_image(image::ImageFormat::Png).unwrap();
    assert!(!session.is_modified());
    assert!(log.events().contains(&EditorEvent::DocumentChanged(DocumentEvent::Saved)));
    // Saving does not fix the items in the live document
    assert!(session.document().has_items());

    let saved = raster_editor::codec::decode(&bytes).unwrap();
    assert_eq!(saved.pixel(10, 10), RED);
    assert_eq!(saved.pixel(13, 13), WHITE);
}

#[test]
fn test_open_image_resets_history() {
    let mut session = session_with(MemoryClipboard::new());
    session.set_image(patterned(10, 10));
    session.flip_image(true).unwrap();
    let bytes = session.save_image(image::ImageFormat::Png).unwrap();

    session.open_image(&bytes).unwrap();
    assert!(!session.can_undo());
    assert!(!session.is_modified());
    assert!(session.open_image(b"not an image").is_err());
    assert!(session.current_image().is_some());
}

// Drags from a half-pixel point past the bottom-right corner of a 100x100 image
fn drag_to_edge(session: &mut EditorSession) {
    session.pointer_down(Pos2::new(10.5, 10.5)).unwrap();
    session.pointer_move(Pos2::new(500.0, 500.0));
    session.pointer_up(Pos2::new(500.0, 500.0));
}

#[test]
fn test_half_pixel_selection_to_edge_is_usable() {
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    let mut session = session_with(MemoryClipboard::new());
    session.set_image(RasterImage::filled(100, 100, WHITE));
    drag_to_edge(&mut session);
    let region = session.selected_region().unwrap();
    assert_eq!((region.width(), region.height()), (89, 89));
    session.crop_to_selection().unwrap();
    let cropped = session.current_image().unwrap();
    assert_eq!((cropped.width(), cropped.height()), (89, 89));

    let mut session = session_with(MemoryClipboard::new());
    session.set_image(RasterImage::filled(100, 100, RED));
    drag_to_edge(&mut session);
    session.cut().unwrap();
    let image = session.current_image().unwrap();
    assert_eq!(image.pixel(11, 11), WHITE);
    assert_eq!(image.pixel(99, 99), WHITE);
    assert_eq!(image.pixel(10, 10), RED);

    let mut session = session_with(MemoryClipboard::with_image(RasterImage::filled(120, 120, BLUE)));
    session.set_image(RasterImage::filled(100, 100, WHITE));
    drag_to_edge(&mut session);
    session.paste().unwrap();
    assert!(!session.document().has_items());
    let image = session.current_image().unwrap();
    assert_eq!(image.pixel(11, 11), BLUE);
    assert_eq!(image.pixel(99, 99), BLUE);
    assert_eq!(image.pixel(10, 10), WHITE);
}
