// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the grid view, the
//! tabular view and the quantizer.
//!
//! The `App` struct owns every piece of per-session state (load session,
//! camera, render cache, selection broker) and translates messages into
//! state changes and background tasks.

mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::config::{self, Config};
use crate::domain::MaxDimension;
use crate::quantize::GridSession;
use crate::render::RenderEngine;
use crate::selection::SelectionBroker;
use crate::ui::grid_view::input;
use crate::ui::inspector;
use crate::ui::state::ViewportCamera;
use iced::{window, Task, Theme};
use std::fmt;

/// Root Iced application state.
pub struct App {
    config: Config,
    session: GridSession,
    camera: ViewportCamera,
    engine: RenderEngine,
    input: input::State,
    selection: SelectionBroker,
    inspector: inspector::State,
    /// Slider value while the max-dimension slider is being dragged.
    max_dimension_draft: Option<MaxDimension>,
    /// Last user-facing error (decode failure, unreadable file, ...).
    status: Option<String>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("generation", &self.session.generation())
            .field("has_grid", &self.session.current().is_some())
            .field("selection", &self.selection.snapshot())
            .finish()
    }
}

pub const WINDOW_DEFAULT_WIDTH: u32 = 1100;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 720;
pub const MIN_WINDOW_WIDTH: u32 = 640;
pub const MIN_WINDOW_HEIGHT: u32 = 480;

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires an `Fn` boot function; flags are consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Initializes application state and optionally kicks off loading of the
    /// image passed on the command line.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        let mut app = Self::with_config(config, &flags);
        app.status = config_warning;

        let task = match flags.file_path {
            Some(path) => app.open(path),
            None => Task::none(),
        };
        (app, task)
    }

    /// Builds the initial state from settings, applying command-line overrides.
    fn with_config(config: Config, flags: &Flags) -> Self {
        let max_dimension = flags
            .max_dimension
            .map(MaxDimension::new)
            .unwrap_or_else(|| config.grid.max_dimension());
        let mode = flags.mode.unwrap_or_else(|| config.grid.mode());

        let selection = SelectionBroker::new();
        let inspector = inspector::State::new(selection.subscribe());
        Self {
            session: GridSession::new(max_dimension, mode),
            camera: ViewportCamera::new(config.view.cell_size(), config.view.zoom_anchor()),
            engine: RenderEngine::new(),
            input: input::State::default(),
            selection,
            inspector,
            max_dimension_draft: None,
            status: None,
            config,
        }
    }

    fn title(&self) -> String {
        match self.session.current() {
            Some(image) => format!(
                "Pixel Lens - {}x{} {}",
                image.grid.width(),
                image.grid.height(),
                image.grid.mode().as_str()
            ),
            None => "Pixel Lens".to_string(),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellSize, MaxDimension, QuantizationMode};
    use crate::error::Error;
    use crate::quantize::{self, QuantizedImage};
    use crate::test_utils::solid_png;
    use crate::ui::grid_view;
    use crate::ui::toolbar;
    use iced::{Point, Size};
    use std::sync::Arc;

    fn app() -> App {
        App::with_config(Config::default(), &Flags::default())
    }

    fn quantized(bytes: &[u8]) -> crate::error::Result<QuantizedImage> {
        quantize::quantize(bytes, MaxDimension::new(16), QuantizationMode::Bit24)
    }

    /// Runs one load to completion without the async runtime.
    fn load(app: &mut App, bytes: Vec<u8>) {
        let ticket = app.session.begin(Arc::new(bytes.clone()));
        let _ = app.update(Message::Quantized(ticket, quantized(&bytes)));
    }

    #[test]
    fn flags_override_config() {
        let flags = Flags {
            file_path: None,
            max_dimension: Some(500),
            mode: Some(QuantizationMode::Bit1),
        };
        let app = App::with_config(Config::default(), &flags);
        assert_eq!(app.session.max_dimension().value(), 100);
        assert_eq!(app.session.mode(), QuantizationMode::Bit1);
    }

    #[test]
    fn applied_load_prepares_views() {
        let mut app = app();
        let _ = app.update(Message::Grid(grid_view::Message::Resized(Size::new(
            400.0, 300.0,
        ))));
        app.selection.set_active(Some(0));

        load(&mut app, solid_png(8, 4, [10, 20, 30, 255]));

        assert_eq!(app.camera.grid_dimensions(), (8, 4));
        assert!(app.engine.layer().is_some());
        assert_eq!(app.selection.active_index(), None);
        assert!(app.status.is_none());
        assert!(app.title().contains("8x4"));
    }

    #[test]
    fn stale_result_is_discarded() {
        let mut app = app();
        let old = solid_png(4, 4, [255, 0, 0, 255]);
        let new = solid_png(6, 3, [0, 0, 255, 255]);
        let first = app.session.begin(Arc::new(old.clone()));
        let second = app.session.begin(Arc::new(new.clone()));

        let _ = app.update(Message::Quantized(second, quantized(&new)));
        let _ = app.update(Message::Quantized(first, quantized(&old)));

        let grid = &app.session.current().expect("newest load applied").grid;
        assert_eq!((grid.width(), grid.height()), (6, 3));
    }

    #[test]
    fn failed_load_reports_and_keeps_grid() {
        let mut app = app();
        load(&mut app, solid_png(4, 4, [255, 0, 0, 255]));
        let before = app.session.current().map(|image| image.grid.id());

        let ticket = app.session.begin(Arc::new(vec![1, 2, 3]));
        let _ = app.update(Message::Quantized(
            ticket,
            Err(Error::Decode("bad data".into())),
        ));

        assert_eq!(app.session.current().map(|image| image.grid.id()), before);
        assert!(app.status.as_deref().is_some_and(|s| s.contains("bad data")));
    }

    #[test]
    fn read_error_sets_status() {
        let mut app = app();
        let generation = app.session.reserve();
        let _ = app.update(Message::SourceRead(generation, Err(Error::Io("gone".into()))));
        assert!(app.status.is_some());
        assert!(!app.session.is_loading());
    }

    #[test]
    fn reads_finishing_out_of_order_keep_latest_file() {
        let mut app = app();
        let large = app.session.reserve();
        let small = app.session.reserve();
        let small_bytes = solid_png(6, 3, [0, 0, 255, 255]);

        let _ = app.update(Message::SourceRead(small, Ok(Arc::new(small_bytes.clone()))));
        let _ = app.update(Message::SourceRead(
            large,
            Ok(Arc::new(solid_png(4, 4, [255, 0, 0, 255]))),
        ));
        assert_eq!(app.session.generation(), small);

        // The task spawned for the small file carries this same ticket.
        let ticket = app
            .session
            .begin_reserved(small, Arc::new(small_bytes.clone()))
            .expect("latest read");
        let _ = app.update(Message::Quantized(ticket, quantized(&small_bytes)));
        let grid = &app.session.current().expect("latest file applied").grid;
        assert_eq!((grid.width(), grid.height()), (6, 3));
    }

    #[test]
    fn stale_read_error_is_silent() {
        let mut app = app();
        let old = app.session.reserve();
        let _ = app.session.reserve();
        let _ = app.update(Message::SourceRead(old, Err(Error::Io("gone".into()))));
        assert!(app.status.is_none());
        assert!(app.session.is_loading());
    }

    #[test]
    fn toolbar_zoom_needs_a_grid() {
        let mut app = app();
        let before = app.camera.cell_size();
        let _ = app.update(Message::Toolbar(toolbar::Message::ZoomIn));
        assert_eq!(app.camera.cell_size(), before);

        load(&mut app, solid_png(4, 4, [255, 0, 0, 255]));
        let _ = app.update(Message::Toolbar(toolbar::Message::ZoomOut));
        assert!(app.camera.cell_size().value() < before.value());
        let layer = app.engine.layer().expect("layer rebuilt");
        assert_eq!(layer.key().cell_size, app.camera.cell_size());
    }

    #[test]
    fn grid_click_reaches_inspector() {
        let mut app = app();
        let viewport = Size::new(200.0, 200.0);
        let _ = app.update(Message::Grid(grid_view::Message::Resized(viewport)));
        load(&mut app, solid_png(4, 4, [255, 0, 0, 255]));

        let origin = app.camera.world_to_screen(1, 2);
        let at = Point::new(origin.x + 3.0, origin.y + 3.0);
        for event in [input::Message::PointerDown(at), input::Message::PointerUp(at)] {
            let _ = app.update(Message::Grid(grid_view::Message::Input { viewport, event }));
        }

        assert_eq!(app.selection.active_index(), Some(9));
        assert_eq!(app.inspector.selection().active_index, Some(9));
    }

    #[test]
    fn inspector_click_centers_grid() {
        let mut app = app();
        let viewport = Size::new(200.0, 200.0);
        let _ = app.update(Message::Grid(grid_view::Message::Resized(viewport)));
        load(&mut app, solid_png(30, 30, [255, 0, 0, 255]));

        let _ = app.update(Message::Inspector(inspector::Message::Clicked(93)));

        let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        assert_eq!(app.camera.screen_to_index(center), Some(93));
        assert_eq!(app.selection.snapshot().center_request, None);
        assert_eq!(app.inspector.selection().active_index, Some(93));
    }

    #[test]
    fn slider_moves_only_update_the_readout() {
        let mut app = app();
        load(&mut app, solid_png(40, 40, [255, 0, 0, 255]));
        let generation = app.session.generation();

        for value in [20, 24, 28] {
            let _ = app.update(Message::Toolbar(toolbar::Message::MaxDimensionChanged(value)));
        }

        assert_eq!(app.session.generation(), generation);
        assert_eq!(app.session.max_dimension(), MaxDimension::default());
        assert_eq!(app.max_dimension_draft, Some(MaxDimension::new(28)));
    }

    #[test]
    fn slider_release_without_change_is_a_no_op() {
        let mut app = app();
        let generation = app.session.generation();
        let current = app.session.max_dimension().value();

        let _ = app.update(Message::Toolbar(toolbar::Message::MaxDimensionChanged(current)));
        let _ = app.update(Message::Toolbar(toolbar::Message::MaxDimensionReleased));
        let _ = app.update(Message::Toolbar(toolbar::Message::MaxDimensionReleased));

        assert_eq!(app.session.generation(), generation);
        assert!(app.max_dimension_draft.is_none());
    }

    #[test]
    fn default_cell_size_comes_from_config() {
        let mut config = Config::default();
        config.view.cell_size = Some(9);
        let app = App::with_config(config, &Flags::default());
        assert_eq!(app.camera.cell_size(), CellSize::new(9));
    }
}
