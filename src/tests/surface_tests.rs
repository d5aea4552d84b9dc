//! Surface behaviour: loads, gestures, modes and host interaction.

use std::io::Cursor;

use super::{Harness, ScriptedLayer, options, pixel_square};
use crate::{
    AnnotatorError, DrawMode, DrawingPoint, ImageFrame, Key, KeyEvent, LayerAction, LoadOutcome,
    LogLevel, Modifiers, PointerEvent, SeedData, SurfaceEvent, SurfaceOptions, free_draw_factory,
};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbaImage::new(width, height)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_queries_are_empty_before_load() {
    let mut h = Harness::new(None);
    assert!(!h.surface.is_loaded());
    assert_eq!(h.surface.snapshot(), None);
    assert_eq!(h.surface.mode(), None);
    assert_eq!(h.surface.palette(), None);
    assert!(h.surface.styles().is_none());
    assert!(h.surface.render_preview().is_none());

    // Input before load is dropped
    h.click(10.0, 10.0);
    h.surface.commit();
    assert!(h.events.borrow().is_empty());
    assert!(h.host.borrow().persisted.is_empty());
}

#[test]
fn test_load_without_seed_only_announces_loaded() {
    let mut h = Harness::new(None);
    h.load();
    assert_eq!(*h.events.borrow(), vec![SurfaceEvent::Loaded]);
    assert!(h.host.borrow().persisted.is_empty());
    assert_eq!(h.surface.mode(), Some(DrawMode::CreateDelete));
}

#[test]
fn test_stale_ticket_is_ignored() {
    let mut h = Harness::new(None);
    let first = h.surface.begin_load();
    let second = h.surface.begin_load();

    let frame = ImageFrame::new(800, 400).unwrap();
    assert_eq!(h.surface.finish_load(first, frame).unwrap(), LoadOutcome::Stale);
    assert!(!h.surface.is_loaded());

    assert_eq!(h.surface.finish_load(second, frame).unwrap(), LoadOutcome::Loaded);
    assert_eq!(h.surface.finish_load(second, frame).unwrap(), LoadOutcome::Stale);
    assert_eq!(h.events.borrow().len(), 1);
}

#[test]
fn test_new_load_discards_previous_image() {
    let mut h = Harness::new(None);
    h.load();
    h.stroke_rect(50.0, 50.0, 150.0, 150.0);
    assert_eq!(h.surface.snapshot().unwrap().len(), 1);

    let ticket = h.surface.begin_load();
    assert!(!h.surface.is_loaded());
    h.surface
        .finish_load(ticket, ImageFrame::new(800, 400).unwrap())
        .unwrap();
    assert!(h.surface.snapshot().unwrap().is_empty());
}

#[test]
fn test_load_from_encoded_bytes() {
    let mut h = Harness::new(None);
    let ticket = h.surface.begin_load();
    let outcome = h.surface.finish_load_bytes(ticket, &png_bytes(40, 20)).unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded);

    let frame = h.surface.mapper().unwrap().display_frame();
    assert_eq!((frame.width(), frame.height()), (400.0, 200.0));
}

#[test]
fn test_undecodable_image_leaves_surface_unloaded() {
    let mut h = Harness::new(None);
    let ticket = h.surface.begin_load();
    let result = h.surface.finish_load_bytes(ticket, b"not an image");
    assert!(matches!(result, Err(AnnotatorError::ImageDecode(_))));
    assert!(!h.surface.is_loaded());
    assert!(h.events.borrow().is_empty());
}

#[test]
fn test_invalid_options_are_rejected() {
    let options = SurfaceOptions::default().with_display_width(-5.0);
    let result = crate::AnnotationSurface::new(
        options,
        None,
        free_draw_factory(),
        Box::new(crate::DetachedHost),
    );
    assert!(matches!(result, Err(AnnotatorError::Configuration { .. })));
}

#[test]
fn test_stroke_creates_polygon_and_publishes() {
    let mut h = Harness::new(None);
    h.load();
    h.stroke_rect(50.0, 50.0, 150.0, 150.0);

    let snapshot = h.surface.snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.colors, None);

    // Display (50..150) is pixel (100..300) on an 800 px image shown at 400
    let xs: Vec<f64> = snapshot.polygons[0].iter().map(|p| p[0]).collect();
    let min_x = xs.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_x = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!((min_x - 100.0).abs() < 1e-6);
    assert!((max_x - 300.0).abs() < 1e-6);

    assert_eq!(h.changed_count(), 1);
    let host = h.host.borrow();
    assert_eq!(host.persisted.len(), 1);
    assert_eq!(host.persisted[0].coords, snapshot.polygons);
    assert_eq!(host.messages.len(), 1);
    assert_eq!(host.messages[0].0, "selection");
    let sent = host.messages[0].1["polygons"][0].as_array().unwrap();
    assert_eq!(sent.len(), snapshot.polygons[0].len());
}

#[test]
fn test_click_deletes_and_click_elsewhere_commits() {
    let seed = SeedData::new(
        vec![pixel_square(0.0, 0.0, 100.0), pixel_square(400.0, 200.0, 100.0)],
        Vec::new(),
    )
    .unwrap();
    let mut h = Harness::new(Some(seed));
    h.load();
    let published = h.changed_count();

    let persisted = h.host.borrow().persisted.len();

    // Empty space: nothing is deleted but the snapshot is committed
    h.click(350.0, 20.0);
    assert_eq!(h.surface.snapshot().unwrap().len(), 2);
    assert_eq!(h.changed_count(), published + 1);
    assert_eq!(h.host.borrow().persisted.len(), persisted + 1);

    // Second square spans display (200..250, 100..150)
    h.click(225.0, 125.0);
    let snapshot = h.surface.snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.polygons[0][0], [0.0, 0.0]);
    assert_eq!(h.changed_count(), published + 2);
    assert_eq!(h.host.borrow().persisted.len(), persisted + 2);
}

#[test]
fn test_clicks_without_an_edit_commit_in_every_mode() {
    let seed = SeedData::new(vec![pixel_square(0.0, 0.0, 100.0)], Vec::new()).unwrap();
    let mut h = Harness::new(Some(seed));
    h.load();
    let published = h.changed_count();

    // Edit mode, away from every vertex
    h.surface.key_down(&KeyEvent::new(Key::Alt, Modifiers::alt()));
    h.click(300.0, 150.0);
    h.surface.key_up(&KeyEvent::new(Key::Alt, Modifiers::NONE));
    assert_eq!(h.changed_count(), published + 1);

    h.surface.key_down(&KeyEvent::new(Key::Shift, Modifiers::shift()));
    h.click(300.0, 150.0);
    h.surface.key_up(&KeyEvent::new(Key::Shift, Modifiers::NONE));
    assert_eq!(h.changed_count(), published + 2);

    let snapshot = h.surface.snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(h.host.borrow().persisted.last().unwrap().coords, snapshot.polygons);
}

#[test]
fn test_drag_back_to_start_is_not_a_click() {
    let mut h = Harness::new(None);
    h.load();

    // A straight out-and-back stroke has no area and creates nothing
    h.surface.pointer(PointerEvent::down(100.0, 100.0)).unwrap();
    h.surface.pointer(PointerEvent::moved(200.0, 100.0)).unwrap();
    h.surface.pointer(PointerEvent::moved(101.0, 100.0)).unwrap();
    h.surface.pointer(PointerEvent::up(100.0, 100.0)).unwrap();

    assert!(h.surface.snapshot().unwrap().is_empty());
    assert_eq!(h.changed_count(), 0);
    assert!(h.host.borrow().persisted.is_empty());
}

#[test]
fn test_creating_a_surface_keeps_the_global_log_level() {
    log::set_max_level(log::LevelFilter::Warn);
    let mut options = options();
    options.log_level = LogLevel::Trace;
    let surface = crate::AnnotationSurface::new(
        options,
        None,
        free_draw_factory(),
        Box::new(crate::DetachedHost),
    )
    .unwrap();

    assert_eq!(log::max_level(), log::LevelFilter::Warn);
    assert_eq!(surface.options().log_level, LogLevel::Trace);
}

#[test]
fn test_alt_drag_moves_a_vertex() {
    let seed = SeedData::new(vec![pixel_square(0.0, 0.0, 100.0)], Vec::new()).unwrap();
    let mut h = Harness::new(Some(seed));
    h.load();

    h.surface.key_down(&KeyEvent::new(Key::Alt, Modifiers::alt()));
    assert_eq!(h.surface.mode(), Some(DrawMode::Edit));

    // Vertex 2 sits at display (50, 50)
    h.surface.pointer(PointerEvent::down(51.0, 49.0)).unwrap();
    h.surface.pointer(PointerEvent::moved(70.0, 60.0)).unwrap();
    h.surface.pointer(PointerEvent::up(75.0, 75.0)).unwrap();

    let snapshot = h.surface.snapshot().unwrap();
    assert_eq!(snapshot.polygons[0][2], [150.0, 150.0]);
    assert_eq!(snapshot.polygons[0][0], [0.0, 0.0]);

    h.surface.key_up(&KeyEvent::new(Key::Alt, Modifiers::NONE));
    assert_eq!(h.surface.mode(), Some(DrawMode::CreateDelete));
}

#[test]
fn test_view_mode_drag_pans_instead_of_drawing() {
    let mut h = Harness::new(None);
    h.load();

    h.surface.wheel(-1.0, 0.0, 0.0);
    h.surface.wheel(-1.0, 0.0, 0.0);
    let zoomed = h.surface.view().unwrap();
    assert!((zoomed.zoom - 1.44).abs() < 1e-9);

    h.surface.key_down(&KeyEvent::new(Key::Shift, Modifiers::shift()));
    assert_eq!(h.surface.mode(), Some(DrawMode::View));
    h.surface.pointer(PointerEvent::down(100.0, 100.0)).unwrap();
    h.surface.pointer(PointerEvent::moved(70.0, 80.0)).unwrap();
    h.surface.pointer(PointerEvent::moved(40.0, 40.0)).unwrap();
    h.surface.pointer(PointerEvent::up(40.0, 40.0)).unwrap();

    assert!(h.surface.snapshot().unwrap().is_empty());
    let panned = h.surface.view().unwrap();
    assert!((panned.pan_x + 60.0).abs() < 1e-9);
    assert!((panned.pan_y + 60.0).abs() < 1e-9);

    // Further drags stop at the image edge
    h.surface.pointer(PointerEvent::down(300.0, 150.0)).unwrap();
    h.surface.pointer(PointerEvent::moved(0.0, 0.0)).unwrap();
    let clamped = h.surface.view().unwrap();
    assert!((clamped.pan_x + 176.0).abs() < 1e-9);
    assert!((clamped.pan_y + 88.0).abs() < 1e-9);
}

#[test]
fn test_zoom_is_bounded() {
    let mut h = Harness::new(None);
    h.load();
    for _ in 0..40 {
        h.surface.wheel(-1.0, 200.0, 100.0);
    }
    assert_eq!(h.surface.view().unwrap().zoom, 8.0);
    for _ in 0..40 {
        h.surface.wheel(1.0, 200.0, 100.0);
    }
    let view = h.surface.view().unwrap();
    assert_eq!(view.zoom, 1.0);
    assert_eq!((view.pan_x, view.pan_y), (0.0, 0.0));
}

#[test]
fn test_gestures_follow_zoomed_view() {
    let seed = SeedData::new(vec![pixel_square(200.0, 0.0, 100.0)], Vec::new()).unwrap();
    let mut h = Harness::new(Some(seed));
    h.load();

    // Zoom about the origin: screen = display * 1.2
    h.surface.wheel(-1.0, 0.0, 0.0);
    // Display (125, 25) is inside the square
    h.click(150.0, 30.0);
    assert!(h.surface.snapshot().unwrap().is_empty());
}

#[test]
fn test_persistence_failure_keeps_state() {
    let mut h = Harness::failing(None);
    h.load();
    h.stroke_rect(50.0, 50.0, 150.0, 150.0);

    assert_eq!(h.surface.snapshot().unwrap().len(), 1);
    assert_eq!(h.host.borrow().persisted.len(), 1);
    assert_eq!(h.changed_count(), 1);

    h.stroke_rect(200.0, 20.0, 300.0, 120.0);
    assert_eq!(h.surface.snapshot().unwrap().len(), 2);
}

#[test]
fn test_commit_republishes_current_snapshot() {
    let mut h = Harness::new(None);
    h.load();
    h.surface.commit();
    h.surface.commit();
    assert_eq!(h.changed_count(), 2);
    assert_eq!(h.host.borrow().persisted.len(), 2);
    assert!(h.host.borrow().persisted[1].coords.is_empty());
}

#[test]
fn test_preview_renders_drawn_polygons() {
    let seed = SeedData::new(vec![pixel_square(0.0, 0.0, 200.0)], Vec::new()).unwrap();
    let mut h = Harness::new(Some(seed));
    h.load();

    let pixmap = h.surface.render_preview().unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (400, 200));
    let inside = pixmap.pixel(50, 50).unwrap();
    assert!(inside.alpha() > 0);
    let outside = pixmap.pixel(300, 150).unwrap();
    assert_eq!(outside.alpha(), 0);
}

#[test]
fn test_custom_layer_actions_are_applied() {
    let edited = vec![
        DrawingPoint::new(0.0, 0.0),
        DrawingPoint::new(10.0, 0.0),
        DrawingPoint::new(10.0, -10.0),
    ];
    let seed = SeedData::new(vec![pixel_square(0.0, 0.0, 100.0)], Vec::new()).unwrap();
    let mut h = Harness::build(
        options(),
        Some(seed),
        ScriptedLayer::factory(LayerAction::Edited(0, edited)),
        None,
    );
    h.load();
    h.surface.pointer(PointerEvent::up(0.0, 0.0)).unwrap();

    let snapshot = h.surface.snapshot().unwrap();
    assert_eq!(snapshot.polygons[0][1], [40.0, 0.0]);
    assert_eq!(snapshot.polygons[0][2], [40.0, 40.0]);
}

#[test]
#[cfg_attr(debug_assertions, should_panic(expected = "layer action out of range"))]
fn test_out_of_range_layer_action_is_reported() {
    let factory = ScriptedLayer::factory(LayerAction::Destroyed(5));
    let mut h = Harness::build(options(), None, factory, None);
    h.load();
    let result = h.surface.pointer(PointerEvent::up(0.0, 0.0));
    assert!(matches!(
        result,
        Err(AnnotatorError::OutOfRange { index: 5, len: 0 })
    ));
    assert!(h.surface.snapshot().unwrap().is_empty());
}
