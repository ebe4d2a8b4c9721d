//! Repository behaviour across reopen, background saves and imports.

use drawpad_core::{PenShape, PointerEvent, RasterCanvas, Rgba, StrokeSession};
use drawpad_renderer::BufferExporter;
use drawpad_store::{DrawingId, ImageRepository, StoreError, CATALOG_FILE};

fn drawn_canvas(size: u32) -> RasterCanvas {
    let mut canvas = RasterCanvas::new(size).expect("canvas");
    canvas.set_shape(PenShape::Line);
    canvas.set_pen_color(Rgba::RED);
    canvas.set_pen_size(3.0).expect("size");

    let mut session = StrokeSession::new(canvas);
    session.handle(&PointerEvent::down(2.0, 2.0));
    session.handle(&PointerEvent::moved(size as f32 - 2.0, size as f32 - 2.0));
    session.handle(&PointerEvent::up(size as f32 - 2.0, size as f32 - 2.0));
    session.into_canvas()
}

#[test]
fn test_catalog_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");

    let saved = {
        let repo = ImageRepository::open(dir.path()).expect("open");
        let first = repo.save_image(drawn_canvas(16).buffer(), "first").expect("save");
        let second = repo.save_image(drawn_canvas(16).buffer(), "second").expect("save");
        assert_ne!(first.file_path, second.file_path);
        vec![second, first]
    };

    assert!(dir.path().join(CATALOG_FILE).is_file());

    let repo = ImageRepository::open(dir.path()).expect("reopen");
    assert_eq!(repo.all_images(), saved);
    assert_eq!(repo.file_names(), ["first", "second"]);
}

#[tokio::test]
async fn test_background_save_while_drawing_continues() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = ImageRepository::open(dir.path()).expect("open");

    let mut canvas = drawn_canvas(32);
    let snapshot = canvas.snapshot();
    let expected = snapshot.clone();

    let save = repo.save_snapshot(snapshot, "async");
    // Keep drawing; the snapshot must not change
    canvas.clear();
    let row = save.await.expect("save");

    assert_eq!(row.id, DrawingId(1));
    let stored = repo.load_image(&row.file_path).expect("load");
    assert_eq!(&stored, &*expected);
    assert_ne!(&stored, canvas.buffer());
}

#[test]
fn test_open_drawing_variants() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = ImageRepository::open(dir.path()).expect("open");

    // Exact size comes back untouched
    let canvas = drawn_canvas(20);
    let row = repo.save_image(canvas.buffer(), "exact").expect("save");
    let opened = repo.open_drawing(Some(&row.file_path), 20).expect("open");
    assert_eq!(&opened, canvas.buffer());

    // A wide photo is letterboxed
    let photo_path = dir.path().join("photo.png");
    let photo = drawpad_core::PixelBuffer::new(10, Rgba::opaque(0, 0, 255)).expect("photo");
    BufferExporter::with_defaults()
        .export_to_path(&photo, &photo_path)
        .expect("export");
    let wide = image::imageops::crop_imm(
        &image::open(&photo_path).expect("decode").to_rgba8(),
        0,
        0,
        10,
        5,
    )
    .to_image();
    wide.save(&photo_path).expect("rewrite");

    let fitted = repo.open_drawing(Some(&photo_path), 40).expect("fit");
    assert_eq!(fitted.pixel(20, 0), Some(Rgba::WHITE));
    assert_eq!(fitted.pixel(20, 20), Some(Rgba::opaque(0, 0, 255)));
    assert_eq!(fitted.pixel(20, 39), Some(Rgba::WHITE));

    // Missing and absent files start blank
    let missing = repo
        .open_drawing(Some(&dir.path().join("missing.png")), 8)
        .expect("blank");
    assert_eq!(missing.count_matching(Rgba::WHITE), 64);
    assert_eq!(repo.open_drawing(None, 8).expect("blank"), missing);
}

#[test]
fn test_zero_size_canvas_is_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = ImageRepository::open(dir.path()).expect("open");
    assert!(matches!(
        repo.open_drawing(None, 0),
        Err(StoreError::Render(_))
    ));
}
