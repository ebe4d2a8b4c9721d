//! Stroke rasterization properties.
//!
//! Covers the footprint of single stamps, Line polyline continuity across a
//! gesture, gesture isolation after `end_stroke`, and the reference
//! red-disc scenario on a full-size canvas.

use drawpad_core::raster::fill_capsule;
use drawpad_core::{
    PenShape, PixelBuffer, PointerEvent, RasterCanvas, Rgba, StrokeSession, DEFAULT_CANVAS_SIZE,
};
use proptest::prelude::*;

fn center_distance(px: u32, py: u32, cx: f32, cy: f32) -> f64 {
    let dx = f64::from(px) + 0.5 - f64::from(cx);
    let dy = f64::from(py) + 0.5 - f64::from(cy);
    dx.hypot(dy)
}

fn square_contains(px: u32, py: u32, cx: f32, cy: f32, side: f32) -> bool {
    let half = f64::from(side) / 2.0;
    let inside = |p: u32, c: f32| {
        let center = f64::from(p) + 0.5;
        center >= f64::from(c) - half && center < f64::from(c) + half
    };
    inside(px, cx) && inside(py, cy)
}

// ==========================================================================
// Reference scenario
// ==========================================================================

#[test]
fn test_red_disc_on_default_canvas() {
    let mut canvas = RasterCanvas::new(DEFAULT_CANVAS_SIZE).expect("canvas");
    canvas.set_shape(PenShape::Circle);
    canvas.set_pen_size(20.0).expect("size");
    canvas.set_pen_color(Rgba::RED);
    canvas.stroke_at(500.0, 500.0);
    canvas.end_stroke();

    let blank = PixelBuffer::new(DEFAULT_CANVAS_SIZE, Rgba::WHITE).expect("blank");
    let buffer = canvas.buffer();

    let mut changed = 0;
    for y in 0..DEFAULT_CANVAS_SIZE {
        for x in 0..DEFAULT_CANVAS_SIZE {
            let px = buffer.pixel(x, y).expect("pixel");
            if px != Rgba::WHITE {
                changed += 1;
            }
            let d = center_distance(x, y, 500.0, 500.0);
            if d <= 9.49 {
                assert_eq!(px, Rgba::RED, "interior pixel ({x}, {y})");
            } else if d >= 10.5 {
                assert_eq!(px, Rgba::WHITE, "exterior pixel ({x}, {y})");
            } else {
                // Edge blend of red over white
                assert_eq!(px.r, 255, "edge pixel ({x}, {y}) {px:?}");
                assert_eq!(px.g, px.b, "edge pixel ({x}, {y}) {px:?}");
            }
        }
    }

    assert_eq!(buffer.diff_count(&blank), changed);
    // pi * 10^2 ~= 314, plus a partially covered rim
    assert!((280..=350).contains(&changed), "changed {changed} pixels");
}

#[test]
fn test_create_is_all_background() {
    for size in [1, 2, 17, 256] {
        let canvas = RasterCanvas::new(size).expect("canvas");
        let expected = (size * size) as usize;
        assert_eq!(canvas.buffer().count_matching(Rgba::WHITE), expected);
    }
}

// ==========================================================================
// Line continuity
// ==========================================================================

#[test]
fn test_line_polyline_is_union_of_segments() {
    let (p1, p2, p3) = ((10.3, 12.1), (40.7, 30.2), (20.4, 55.9));

    let mut canvas = RasterCanvas::new(64).expect("canvas");
    canvas.set_shape(PenShape::Line);
    canvas.set_pen_size(5.0).expect("size");
    canvas.stroke_at(p1.0, p1.1);
    canvas.stroke_at(p2.0, p2.1);
    canvas.stroke_at(p3.0, p3.1);

    let mut expected = PixelBuffer::new(64, Rgba::WHITE).expect("buffer");
    fill_capsule(&mut expected, p1, p2, 5.0, Rgba::BLACK);
    fill_capsule(&mut expected, p2, p3, 5.0, Rgba::BLACK);

    assert_eq!(canvas.buffer().diff_count(&expected), 0);
}

#[test]
fn test_end_stroke_isolates_next_mark() {
    let (p3, p4) = ((8.2, 32.1), (56.6, 32.3));

    let mut session = {
        let mut canvas = RasterCanvas::new(64).expect("canvas");
        canvas.set_shape(PenShape::Line);
        canvas.set_pen_size(4.0).expect("size");
        StrokeSession::new(canvas)
    };

    session.handle(&PointerEvent::down(p3.0, p3.1));
    session.handle(&PointerEvent::up(p3.0, p3.1));
    session.handle(&PointerEvent::down(p4.0, p4.1));
    session.handle(&PointerEvent::up(p4.0, p4.1));

    let mut expected = PixelBuffer::new(64, Rgba::WHITE).expect("buffer");
    fill_capsule(&mut expected, p3, p3, 4.0, Rgba::BLACK);
    fill_capsule(&mut expected, p4, p4, 4.0, Rgba::BLACK);

    let buffer = session.canvas().buffer();
    assert_eq!(buffer.diff_count(&expected), 0);
    assert_eq!(buffer.pixel(32, 32), Some(Rgba::WHITE), "no bridge between gestures");
}

#[test]
fn test_end_stroke_is_idempotent() {
    let mut canvas = RasterCanvas::new(32).expect("canvas");
    canvas.set_shape(PenShape::Line);
    canvas.stroke_at(5.0, 5.0);
    let before = canvas.snapshot();

    canvas.end_stroke();
    canvas.end_stroke();
    canvas.end_stroke();

    assert!(canvas.cursor().is_none());
    assert_eq!(canvas.revision(), before.revision());
    assert_eq!(canvas.buffer(), &*before);
}

// ==========================================================================
// Footprint properties
// ==========================================================================

proptest! {
    #[test]
    fn square_modifies_exactly_its_footprint(
        cx in -20.0f32..84.0,
        cy in -20.0f32..84.0,
        side in 0.5f32..40.0,
    ) {
        let mut canvas = RasterCanvas::new(64).expect("canvas");
        canvas.set_shape(PenShape::Square);
        canvas.set_pen_size(side).expect("size");
        canvas.set_pen_color(Rgba::RED);
        canvas.stroke_at(cx, cy);

        for y in 0..64 {
            for x in 0..64 {
                let px = canvas.buffer().pixel(x, y).expect("pixel");
                if square_contains(x, y, cx, cy, side) {
                    prop_assert_eq!(px, Rgba::RED);
                } else {
                    prop_assert_eq!(px, Rgba::WHITE);
                }
            }
        }
    }

    #[test]
    fn circle_stays_inside_its_footprint(
        cx in -20.0f32..84.0,
        cy in -20.0f32..84.0,
        size in 0.5f32..40.0,
    ) {
        let mut canvas = RasterCanvas::new(64).expect("canvas");
        canvas.set_pen_size(size).expect("size");
        canvas.set_pen_color(Rgba::RED);
        canvas.stroke_at(cx, cy);

        let radius = f64::from(size) / 2.0;
        for y in 0..64 {
            for x in 0..64 {
                let px = canvas.buffer().pixel(x, y).expect("pixel");
                let d = center_distance(x, y, cx, cy);
                if d >= radius + 0.5 {
                    prop_assert_eq!(px, Rgba::WHITE);
                } else if d <= radius - 0.501 {
                    prop_assert_eq!(px, Rgba::RED);
                }
            }
        }
    }

    #[test]
    fn strokes_never_panic_on_wild_coordinates(
        x in proptest::num::f32::ANY,
        y in proptest::num::f32::ANY,
        size in 0.001f32..1.0e6,
        shape in prop_oneof![
            Just(PenShape::Circle),
            Just(PenShape::Square),
            Just(PenShape::Line),
        ],
    ) {
        let mut canvas = RasterCanvas::new(16).expect("canvas");
        canvas.set_shape(shape);
        canvas.set_pen_size(size).expect("size");
        canvas.stroke_at(x, y);
        canvas.stroke_at(y, x);
        canvas.end_stroke();
        prop_assert_eq!(canvas.size(), 16);
    }
}
