use image::Rgba;
use raster_editor::{
    AdjustmentParams, EditorError, EditorSession, MemoryClipboard, NewImageParams, RasterImage,
};

fn gray_session() -> EditorSession {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut session = EditorSession::new(
        Default::default(),
        raster_editor::Capabilities::detect(),
        Box::new(MemoryClipboard::new()),
    );
    session.set_image(RasterImage::filled(40, 20, Rgba([100, 100, 100, 255])));
    session
}

fn brighter() -> AdjustmentParams {
    AdjustmentParams {
        brightness: 0.5,
        ..Default::default()
    }
}

#[test]
fn test_preview_records_nothing() {
    let mut session = gray_session();
    session.preview_adjustments(brighter()).unwrap();
    assert!(session.is_previewing());
    assert_eq!(session.current_image().unwrap().pixel(0, 0), Rgba([150, 150, 150, 255]));
    assert!(!session.can_undo());
    assert!(!session.is_modified());

    // Previews always start from the baseline, never stack
    session.preview_adjustments(brighter()).unwrap();
    assert_eq!(session.current_image().unwrap().pixel(0, 0), Rgba([150, 150, 150, 255]));
}

#[test]
fn test_cancel_preview_restores_baseline() {
    let mut session = gray_session();
    session.preview_rotation(90.0).unwrap();
    let rotated = session.current_image().unwrap();
    assert_eq!((rotated.width(), rotated.height()), (20, 40));

    session.cancel_preview();
    assert!(!session.is_previewing());
    let image = session.current_image().unwrap();
    assert_eq!((image.width(), image.height()), (40, 20));
    assert!(image.is_uniform(Rgba([100, 100, 100, 255])));
}

#[test]
fn test_apply_after_preview_undoes_to_baseline() {
    let mut session = gray_session();
    session.preview_adjustments(brighter()).unwrap();
    session.apply_adjustments(brighter()).unwrap();
    assert!(!session.is_previewing());
    assert_eq!(session.current_image().unwrap().pixel(3, 3), Rgba([150, 150, 150, 255]));

    assert!(session.undo());
    assert!(session.current_image().unwrap().is_uniform(Rgba([100, 100, 100, 255])));
}

#[test]
fn test_apply_rotation_after_preview() {
    let mut session = gray_session();
    session.preview_rotation(45.0).unwrap();
    session.preview_rotation(90.0).unwrap();
    session.apply_rotation(90.0).unwrap();
    let image = session.current_image().unwrap();
    assert_eq!((image.width(), image.height()), (20, 40));
    assert_eq!(session.history().undo_len(), 1);

    assert!(session.undo());
    let image = session.current_image().unwrap();
    assert_eq!((image.width(), image.height()), (40, 20));
}

#[test]
fn test_preview_needs_an_image() {
    let mut session = EditorSession::default();
    assert!(matches!(
        session.preview_adjustments(brighter()),
        Err(EditorError::NoActiveImage)
    ));
    assert!(!session.is_previewing());
}

#[test]
fn test_new_image_uses_background() {
    let mut session = gray_session();
    session.flip_image(true).unwrap();
    session
        .new_image(NewImageParams {
            width: 16,
            height: 9,
            background: [0, 0, 255, 255],
        })
        .unwrap();
    let image = session.current_image().unwrap();
    assert_eq!((image.width(), image.height()), (16, 9));
    assert!(image.is_uniform(Rgba([0, 0, 255, 255])));
    assert!(!session.can_undo());
    assert!(!session.is_modified());

    let empty = NewImageParams {
        width: 0,
        ..Default::default()
    };
    assert!(matches!(session.new_image(empty), Err(EditorError::InvalidParameters(_))));
    assert_eq!(session.current_image().unwrap().width(), 16);
}
