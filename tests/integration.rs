// SPDX-License-Identifier: MPL-2.0
//! End-to-end checks across the quantizer, the camera, the input controller
//! and the selection broker.

use iced::{Point, Size};
use image_rs::{ImageFormat, Rgba, RgbaImage};
use pixel_lens::config::{self, Config, ZoomAnchor};
use pixel_lens::domain::{cell_index, CellSize, MaxDimension, QuantizationMode};
use pixel_lens::quantize::{self, GridSession, LoadOutcome};
use pixel_lens::render::{palette, PixmapSurface, RenderEngine};
use pixel_lens::selection::{SelectionBroker, SelectionState};
use pixel_lens::ui::grid_view::input::{self, Effect, Message};
use pixel_lens::ui::inspector;
use pixel_lens::ui::state::ViewportCamera;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::tempdir;

fn png(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("fixture encodes");
    bytes
}

/// Left half red, right half blue.
fn split_png(width: u32, height: u32) -> Vec<u8> {
    png(&RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    }))
}

/// Camera over a grid, no pan, 10px pitch, 200×200 viewport.
fn camera_for(width: u32, height: u32) -> ViewportCamera {
    let mut camera = ViewportCamera::new(CellSize::new(10), ZoomAnchor::Cursor);
    camera.set_viewport(Size::new(200.0, 200.0));
    camera.set_grid(width, height);
    camera.pan_by(iced::Vector::new(0.0, 0.0) - camera.pan());
    camera
}

#[test]
fn wide_image_quantizes_to_bounded_grid() {
    let image = quantize::quantize(
        &split_png(200, 100),
        MaxDimension::new(64),
        QuantizationMode::Bit24,
    )
    .expect("quantizes");

    assert_eq!((image.grid.width(), image.grid.height()), (64, 32));
    assert_eq!(image.grid.len(), 64 * 32);
    assert_eq!((image.original.width(), image.original.height()), (200, 100));

    let left = image.grid.cell(0, 0).expect("in range");
    let right = image.grid.cell(63, 31).expect("in range");
    assert_eq!(left.hex(), "#FF0000");
    assert_eq!(right.hex(), "#0000FF");
}

#[test]
fn small_image_is_not_upscaled() {
    let image = quantize::quantize(
        &split_png(10, 6),
        MaxDimension::new(32),
        QuantizationMode::Bit4,
    )
    .expect("quantizes");
    assert_eq!((image.grid.width(), image.grid.height()), (10, 6));
    assert_eq!(image.grid.mode(), QuantizationMode::Bit4);
}

#[test]
fn undecodable_bytes_leave_session_grid_untouched() {
    let mut session = GridSession::new(MaxDimension::new(16), QuantizationMode::Bit24);

    let ticket = session.begin(Arc::new(split_png(8, 8)));
    let result = quantize::quantize(&split_png(8, 8), MaxDimension::new(16), QuantizationMode::Bit24);
    assert_eq!(session.complete(ticket, result), LoadOutcome::Applied);
    let before = session.current().map(|image| image.grid.id());

    let ticket = session.begin(Arc::new(b"not an image".to_vec()));
    let result = quantize::quantize(b"not an image", MaxDimension::new(16), QuantizationMode::Bit24);
    assert!(matches!(session.complete(ticket, result), LoadOutcome::Failed(_)));

    assert_eq!(session.current().map(|image| image.grid.id()), before);
}

#[test]
fn click_in_grid_view_reaches_inspector() {
    let mut camera = camera_for(8, 8);
    let broker = SelectionBroker::new();
    let mut table = inspector::State::new(broker.subscribe());
    let mut controller = input::State::default();

    controller.handle(Message::PointerDown(Point::new(35.0, 25.0)), &mut camera, &broker);
    let effect = controller.handle(Message::PointerUp(Point::new(37.0, 26.0)), &mut camera, &broker);

    let expected = cell_index(3, 2, 8);
    assert_eq!(effect, Effect::Selected(expected));
    assert!(table.sync());
    assert_eq!(table.selection().active_index, Some(expected));
}

#[test]
fn table_click_centers_grid_camera() {
    let mut camera = camera_for(20, 20);
    let broker = SelectionBroker::new();
    let mut table = inspector::State::new(broker.subscribe());

    let index = cell_index(15, 12, 20);
    table.handle(inspector::Message::Clicked(index), &broker);

    assert!(input::consume_center_request(&mut camera, &broker));
    assert_eq!(broker.active_index(), Some(index));
    assert_eq!(camera.screen_to_index(Point::new(100.0, 100.0)), Some(index));

    // The request is one-shot.
    assert!(!input::consume_center_request(&mut camera, &broker));
}

#[test]
fn drag_and_click_are_disjoint() {
    for step in 0..40 {
        let distance = step as f32 * 0.25;
        let mut camera = camera_for(20, 20);
        let broker = SelectionBroker::new();
        let mut controller = input::State::default();
        let start = Point::new(52.0, 52.0);
        let end = Point::new(start.x + distance, start.y);
        let pan_before = camera.pan();

        controller.handle(Message::PointerDown(start), &mut camera, &broker);
        controller.handle(Message::PointerMoved(end), &mut camera, &broker);
        let effect = controller.handle(Message::PointerUp(end), &mut camera, &broker);

        if distance < 5.0 {
            assert!(matches!(effect, Effect::Selected(_)), "click at {distance}px");
            assert_eq!(camera.pan(), pan_before);
        } else {
            assert_eq!(effect, Effect::None, "drag at {distance}px");
            assert_eq!(broker.active_index(), None);
            assert!((camera.pan().x - pan_before.x - distance).abs() < 1e-4);
        }
    }
}

#[test]
fn clicks_outside_grid_are_ignored() {
    let mut camera = camera_for(4, 4);
    let broker = SelectionBroker::new();
    let mut controller = input::State::default();

    controller.handle(Message::PointerDown(Point::new(150.0, 150.0)), &mut camera, &broker);
    let effect = controller.handle(Message::PointerUp(Point::new(150.0, 150.0)), &mut camera, &broker);

    assert_eq!(effect, Effect::None);
    assert_eq!(broker.snapshot(), SelectionState::default());
}

#[test]
fn rendered_frame_matches_hit_testing_at_high_density() {
    let image = quantize::quantize(
        &split_png(16, 16),
        MaxDimension::new(16),
        QuantizationMode::Bit24,
    )
    .expect("quantizes");
    let camera = camera_for(16, 16);
    let mut engine = RenderEngine::new();
    engine
        .prepare(&image.grid, camera.cell_size())
        .expect("layer fits");

    let broker = SelectionBroker::new();
    let mut surface = PixmapSurface::new(Size::new(200.0, 200.0), 2.0).expect("surface");
    engine.render_frame(&mut surface, Some(&*image.grid), &camera, &broker.snapshot());

    for &(x, y) in &[(5.0, 5.0), (95.0, 42.0), (155.0, 125.0)] {
        let position = Point::new(x, y);
        let index = camera.screen_to_index(position).expect("inside grid");
        let cell = image.grid.cell_at(index).expect("valid index");
        let [r, g, b, _] = surface.pixel_at(position).expect("inside surface");
        assert_eq!([r, g, b], cell.rgb(), "pixel at {position:?}");
    }

    let outside = surface.pixel_at(Point::new(195.0, 195.0)).expect("inside surface");
    assert_eq!(outside, palette::BACKGROUND.into_rgba8());
}

#[test]
fn settings_survive_a_save_load_cycle() {
    let dir = tempdir().expect("temp dir");
    let mut settings = Config::default();
    settings.grid.mode = Some(QuantizationMode::Bit1);
    settings.grid.max_dimension = Some(80);
    settings.view.zoom_anchor = Some(ZoomAnchor::Center);

    config::save_with_override(&settings, Some(dir.path().to_path_buf())).expect("saved");
    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));

    assert!(warning.is_none());
    assert_eq!(loaded, settings);
    assert_eq!(loaded.grid.max_dimension().value(), 80);
}
